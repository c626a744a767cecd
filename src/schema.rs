//! Data model for the schema compiler: extraction-side records and the
//! validated output schema.
//!
//! The records in the first half are produced by an external extraction
//! collaborator (a syntax-tree walker, reflection, or a hand-written schema
//! file) and are immutable once constructed. Annotation payloads are typed
//! fields, not string-keyed lookups. The second half is what validation
//! produces and the codec compiler consumes.

use std::fmt;

use crate::wire::WireKind;

/// Source position of a declaration: file plus byte span.
///
/// Ordered by file, then span start, so declaration order within one file is
/// recoverable without re-reading source.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Location {
    pub file: String,
    pub start: u32,
    pub end: u32,
}

impl Location {
    pub fn new(file: impl Into<String>, start: u32, end: u32) -> Self {
        Location { file: file.into(), start, end }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}..{}", self.file, self.start, self.end)
    }
}

/// Declared visibility of an initializer or member setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Internal,
    ProtectedInternal,
    Protected,
    Private,
}

impl Visibility {
    /// Whether the declaration participates in shape/field discovery.
    pub fn is_accessible(self) -> bool {
        matches!(
            self,
            Visibility::Public | Visibility::Internal | Visibility::ProtectedInternal
        )
    }
}

/// Reference vs. value semantics of a message candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Struct,
}

/// How an initializer parameter is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamPassing {
    Value,
    Ref,
    Out,
    InOut,
}

impl ParamPassing {
    /// Lowercase mode name used in diagnostics.
    pub fn mode_name(self) -> &'static str {
        match self {
            ParamPassing::Value => "value",
            ParamPassing::Ref => "ref",
            ParamPassing::Out => "out",
            ParamPassing::InOut => "in-out",
        }
    }
}

/// A field's declared type as seen by the extraction collaborator.
///
/// Enum underlying types are always integers (depth exactly one); anything
/// outside this closed set arrives as `Named` and is rejected during
/// validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredType {
    Text,
    UInt8,
    Int8,
    UInt16,
    Int16,
    UInt32,
    Int32,
    UInt64,
    Int64,
    Enum {
        name: String,
        underlying: Box<DeclaredType>,
    },
    Named(String),
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredType::Text => write!(f, "string"),
            DeclaredType::UInt8 => write!(f, "u8"),
            DeclaredType::Int8 => write!(f, "i8"),
            DeclaredType::UInt16 => write!(f, "u16"),
            DeclaredType::Int16 => write!(f, "i16"),
            DeclaredType::UInt32 => write!(f, "u32"),
            DeclaredType::Int32 => write!(f, "i32"),
            DeclaredType::UInt64 => write!(f, "u64"),
            DeclaredType::Int64 => write!(f, "i64"),
            DeclaredType::Enum { name, .. } => write!(f, "{name}"),
            DeclaredType::Named(name) => write!(f, "{name}"),
        }
    }
}

/// Message annotation payload. `id` is required upstream; a record arriving
/// without one is skipped silently rather than diagnosed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageAnnotation {
    pub id: Option<i32>,
}

/// Field annotation payload: an optional explicit order index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldAnnotation {
    pub order: Option<i32>,
}

/// One enclosing type between the namespace and the group, outermost first.
/// Carried through so a downstream emitter can reproduce the nesting context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnclosingType {
    pub name: String,
    pub keyword: String,
    pub modifiers: String,
}

/// One annotated packet group as extracted from the program surface.
#[derive(Debug, Clone)]
pub struct GroupRecord {
    pub name: String,
    pub namespace: Vec<String>,
    pub modifiers: String,
    pub hierarchy: Vec<EnclosingType>,
    pub location: Location,
    pub is_static: bool,
    pub is_multi_part: bool,
    /// The group type itself also carries the message annotation.
    pub has_message_annotation: bool,
    /// Name and location of an enclosing group, if this group is nested in one.
    pub enclosing_group: Option<(String, Location)>,
    pub members: Vec<CandidateRecord>,
}

/// A direct member type of a group: a message candidate.
#[derive(Debug, Clone)]
pub struct CandidateRecord {
    pub name: String,
    pub qualified_name: String,
    pub location: Location,
    pub kind: TypeKind,
    /// Declaration split across more than one physical fragment.
    pub is_multi_part: bool,
    /// Absent for non-message members.
    pub message: Option<MessageAnnotation>,
    /// The member itself also carries the group annotation.
    pub has_group_annotation: bool,
    pub initializers: Vec<InitializerRecord>,
    pub members: Vec<MemberRecord>,
}

/// An instance initializer declared on a candidate.
#[derive(Debug, Clone)]
pub struct InitializerRecord {
    pub visibility: Visibility,
    pub params: Vec<ParamRecord>,
}

/// One initializer parameter.
#[derive(Debug, Clone)]
pub struct ParamRecord {
    pub name: String,
    pub location: Location,
    pub passing: ParamPassing,
    pub declared_type: DeclaredType,
    pub annotation: Option<FieldAnnotation>,
}

/// One assignable member declared on a candidate (field source for the
/// property-initialized path).
#[derive(Debug, Clone)]
pub struct MemberRecord {
    pub name: String,
    pub location: Location,
    pub declared_type: DeclaredType,
    pub annotation: Option<FieldAnnotation>,
    /// Setter visibility; `None` when the member cannot be assigned.
    pub setter: Option<Visibility>,
    /// Compiler-synthesized members never become fields.
    pub synthesized: bool,
}

impl MemberRecord {
    /// Members participate in field discovery only when explicitly declared
    /// with an accessible setter.
    pub fn is_field_candidate(&self) -> bool {
        !self.synthesized && self.setter.is_some_and(Visibility::is_accessible)
    }
}

/// How a validated message is constructed when a decode succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationStrategy {
    /// No fields; the sole instance is produced with no arguments.
    EmptyBody,
    /// Fields are assigned by name to a fresh instance.
    PropertyInitialized,
    /// The chosen initializer is invoked positionally in resolved order.
    ConstructorInitialized,
}

/// One wire-carried value in its final resolved position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    pub name: String,
    /// Present only when the source opted into explicit ordering.
    pub order: Option<i32>,
    pub wire: WireKind,
}

/// A fully validated message, ready for codec compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSchema {
    pub name: String,
    pub qualified_name: String,
    pub id: i32,
    pub strategy: CreationStrategy,
    /// Empty for `EmptyBody`; total and gap-free otherwise.
    pub fields: Vec<FieldSchema>,
}

/// A validated group: the subset of its candidates that survived validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSchema {
    pub name: String,
    pub namespace: Vec<String>,
    pub modifiers: String,
    pub hierarchy: Vec<EnclosingType>,
    pub messages: Vec<MessageSchema>,
}
