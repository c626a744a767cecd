//! # packetc — Packet Schema Validator and Wire-Codec Compiler
//!
//! Compiles a declarative packet schema — groups of message types annotated
//! with field order and identity metadata — into binary encode/decode plans
//! for a compact, length- and type-prefixed wire format.
//!
//! ## Pipeline
//!
//! - **Input**: [`schema::GroupRecord`]s produced by an external extraction
//!   collaborator (syntax-tree walker, reflection, or a hand-written schema
//!   file). The core never inspects source syntax.
//! - **Validation**: [`validate::compile`] classifies every candidate's
//!   shape, resolves field order and wire kinds, and collects diagnostics.
//!   Errors are accumulated, never thrown; a failing field excludes its
//!   message, a failing member excludes only that member.
//! - **Output**: per-group [`codec::GroupPlan`]s (only for groups that
//!   validated clean) plus the full diagnostic list.
//!
//! ## Wire format
//!
//! Little-endian throughout. A 4-byte identity tag precedes the field
//! payload; bytes are copied verbatim, wider integers are `width` bytes LE,
//! enums travel as their underlying integer, and strings carry a u16
//! byte-length prefix followed by UTF-8 bytes. Message reads are atomic:
//! a short read fails the whole message and leaves the cursor untouched.
//!
//! ## Example
//!
//! ```
//! use packetc::{
//!     CandidateRecord, CreationStrategy, DeclaredType, GroupRecord, InitializerRecord,
//!     Location, MemberRecord, MessageAnnotation, MessageValue, TypeKind, Value, Visibility,
//! };
//!
//! let group = GroupRecord {
//!     name: "ChatPackets".to_string(),
//!     namespace: vec!["chat".to_string()],
//!     modifiers: "pub".to_string(),
//!     hierarchy: Vec::new(),
//!     location: Location::new("chat.schema", 0, 11),
//!     is_static: true,
//!     is_multi_part: true,
//!     has_message_annotation: false,
//!     enclosing_group: None,
//!     members: vec![CandidateRecord {
//!         name: "Ping".to_string(),
//!         qualified_name: "chat.ChatPackets.Ping".to_string(),
//!         location: Location::new("chat.schema", 20, 24),
//!         kind: TypeKind::Struct,
//!         is_multi_part: false,
//!         message: Some(MessageAnnotation { id: Some(1) }),
//!         has_group_annotation: false,
//!         initializers: vec![InitializerRecord {
//!             visibility: Visibility::Public,
//!             params: Vec::new(),
//!         }],
//!         members: vec![MemberRecord {
//!             name: "Token".to_string(),
//!             location: Location::new("chat.schema", 30, 35),
//!             declared_type: DeclaredType::Text,
//!             annotation: None,
//!             setter: Some(Visibility::Public),
//!             synthesized: false,
//!         }],
//!     }],
//! };
//!
//! let compiled = packetc::compile(&[group]);
//! assert!(compiled.diagnostics.is_empty());
//!
//! let plan = compiled.plans[0].message(1).unwrap();
//! assert_eq!(plan.strategy, CreationStrategy::PropertyInitialized);
//!
//! let value = MessageValue::properties([("Token", Value::Str("abc".to_string()))]);
//! let bytes = plan.encode(&value).unwrap();
//! let mut pos = 4; // past the identity tag
//! let decoded = plan.decode(&bytes, &mut pos).unwrap();
//! assert_eq!(decoded, value);
//! assert_eq!(pos, bytes.len());
//! ```

pub mod analyzer;
pub mod codec;
pub mod diagnostics;
pub mod ordering;
pub mod schema;
pub mod shape;
pub mod validate;
pub mod value;
pub mod wire;

pub use codec::{CodecError, GroupPlan, MessagePlan, PlanField, TAG_LEN};
pub use diagnostics::{Diagnostic, DiagnosticCode, Severity};
pub use schema::{
    CandidateRecord, CreationStrategy, DeclaredType, EnclosingType, FieldAnnotation, FieldSchema,
    GroupRecord, GroupSchema, InitializerRecord, Location, MemberRecord, MessageAnnotation,
    MessageSchema, ParamPassing, ParamRecord, TypeKind, Visibility,
};
pub use validate::{compile, validate_group, Compilation};
pub use value::{MessageValue, Value};
pub use wire::{resolve as resolve_wire_kind, EnumRepr, FixedInt, WireKind};
