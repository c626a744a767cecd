//! Codec compilation and the runtime interpreter for compiled plans.
//!
//! A [`MessagePlan`] is the ordered read/write algorithm for one validated
//! message. Encoding writes the 4-byte little-endian identity tag followed by
//! the fields in resolved order, with no padding and no delimiters besides
//! each string's length prefix. Decoding covers the body only: an external
//! dispatcher consumes the tag and routes to the matching plan.
//!
//! Decode is all-or-nothing against the caller's cursor. If any field cannot
//! be fully read, the whole read fails and the position is left unchanged, so
//! a streaming caller can retry once more bytes arrive.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::schema::{CreationStrategy, GroupSchema, MessageSchema};
use crate::value::{MessageValue, Value};
use crate::wire::{EnumRepr, FixedInt, WireKind};

/// Bytes occupied by the identity tag ahead of an encoded body.
pub const TAG_LEN: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("string field `{field}`: {len} encoded bytes exceed the 16-bit length prefix")]
    StringTooLong { field: String, len: usize },
    #[error("missing value for field `{0}`")]
    MissingField(String),
    #[error("field `{field}`: expected a {expected} value")]
    ValueMismatch { field: String, expected: &'static str },
    #[error("expected {expected} positional values, got {got}")]
    ArityMismatch { expected: usize, got: usize },
    #[error("value shape does not match the message's creation strategy")]
    StrategyMismatch,
}

/// One field of a compiled plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanField {
    pub name: String,
    pub wire: WireKind,
}

/// The compiled read/write algorithm for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePlan {
    pub type_name: String,
    pub id: i32,
    pub strategy: CreationStrategy,
    pub fields: Vec<PlanField>,
    pub has_body: bool,
}

impl MessagePlan {
    pub fn from_schema(message: &MessageSchema) -> Self {
        let fields: Vec<PlanField> = message
            .fields
            .iter()
            .map(|f| PlanField {
                name: f.name.clone(),
                wire: f.wire.clone(),
            })
            .collect();
        MessagePlan {
            type_name: message.qualified_name.clone(),
            id: message.id,
            strategy: message.strategy,
            has_body: !fields.is_empty(),
            fields,
        }
    }

    /// Encode the identity tag and the field payload.
    ///
    /// Built into a fresh buffer so a checked failure (oversized string,
    /// missing value) produces no partial output.
    pub fn encode(&self, value: &MessageValue) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        out.write_i32::<LittleEndian>(self.id)?;

        match (self.strategy, value) {
            (CreationStrategy::EmptyBody, MessageValue::Empty) => {}
            (CreationStrategy::PropertyInitialized, MessageValue::Properties(map)) => {
                for field in &self.fields {
                    let v = map
                        .get(&field.name)
                        .ok_or_else(|| CodecError::MissingField(field.name.clone()))?;
                    encode_field(&mut out, field, v)?;
                }
            }
            (CreationStrategy::ConstructorInitialized, MessageValue::Constructor(values)) => {
                if values.len() != self.fields.len() {
                    return Err(CodecError::ArityMismatch {
                        expected: self.fields.len(),
                        got: values.len(),
                    });
                }
                for (field, v) in self.fields.iter().zip(values) {
                    encode_field(&mut out, field, v)?;
                }
            }
            _ => return Err(CodecError::StrategyMismatch),
        }

        Ok(out)
    }

    /// Decode one message body starting at `*position`.
    ///
    /// On success the position advances past exactly the consumed bytes; on
    /// any failure it is left untouched. An empty-body message always decodes
    /// successfully, consuming zero bytes.
    pub fn decode(&self, buffer: &[u8], position: &mut usize) -> Result<MessageValue, CodecError> {
        if self.strategy == CreationStrategy::EmptyBody {
            return Ok(MessageValue::Empty);
        }

        let rest = buffer.get(*position..).unwrap_or(&[]);
        let mut cursor = Cursor::new(rest);
        let decoded = self.decode_fields(&mut cursor)?;
        *position += cursor.position() as usize;
        Ok(decoded)
    }

    fn decode_fields(&self, cursor: &mut Cursor<&[u8]>) -> Result<MessageValue, CodecError> {
        match self.strategy {
            CreationStrategy::EmptyBody => Ok(MessageValue::Empty),
            CreationStrategy::PropertyInitialized => {
                let mut map = HashMap::with_capacity(self.fields.len());
                for field in &self.fields {
                    let v = decode_field(cursor, &field.wire)?;
                    map.insert(field.name.clone(), v);
                }
                Ok(MessageValue::Properties(map))
            }
            CreationStrategy::ConstructorInitialized => {
                let mut values = Vec::with_capacity(self.fields.len());
                for field in &self.fields {
                    values.push(decode_field(cursor, &field.wire)?);
                }
                Ok(MessageValue::Constructor(values))
            }
        }
    }
}

/// The compiled plans of one group, emitted only when the group validated
/// without diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPlan {
    pub name: String,
    pub messages: Vec<MessagePlan>,
}

impl GroupPlan {
    pub fn from_schema(group: &GroupSchema) -> Self {
        GroupPlan {
            name: group.name.clone(),
            messages: group.messages.iter().map(MessagePlan::from_schema).collect(),
        }
    }

    /// Look up the plan for a dispatched identity tag.
    pub fn message(&self, id: i32) -> Option<&MessagePlan> {
        self.messages.iter().find(|m| m.id == id)
    }
}

fn encode_field(out: &mut Vec<u8>, field: &PlanField, v: &Value) -> Result<(), CodecError> {
    match &field.wire {
        WireKind::String => {
            let Value::Str(s) = v else {
                return Err(mismatch(field, "string"));
            };
            let bytes = s.as_bytes();
            if bytes.len() > u16::MAX as usize {
                return Err(CodecError::StringTooLong {
                    field: field.name.clone(),
                    len: bytes.len(),
                });
            }
            out.write_u16::<LittleEndian>(bytes.len() as u16)?;
            out.extend_from_slice(bytes);
            Ok(())
        }
        WireKind::Byte => {
            let Value::U8(x) = v else {
                return Err(mismatch(field, "u8"));
            };
            out.write_u8(*x)?;
            Ok(())
        }
        WireKind::SByte => {
            let Value::I8(x) = v else {
                return Err(mismatch(field, "i8"));
            };
            out.write_i8(*x)?;
            Ok(())
        }
        WireKind::Fixed(int) => encode_fixed(out, field, *int, v),
        // An enum travels exactly as its underlying representation; the
        // value already is the underlying integer.
        WireKind::Enum(EnumRepr::Byte) => {
            let Value::U8(x) = v else {
                return Err(mismatch(field, "u8"));
            };
            out.write_u8(*x)?;
            Ok(())
        }
        WireKind::Enum(EnumRepr::SByte) => {
            let Value::I8(x) = v else {
                return Err(mismatch(field, "i8"));
            };
            out.write_i8(*x)?;
            Ok(())
        }
        WireKind::Enum(EnumRepr::Fixed(int)) => encode_fixed(out, field, *int, v),
    }
}

fn encode_fixed(
    out: &mut Vec<u8>,
    field: &PlanField,
    int: FixedInt,
    v: &Value,
) -> Result<(), CodecError> {
    match (int, v) {
        (FixedInt::U16, Value::U16(x)) => out.write_u16::<LittleEndian>(*x)?,
        (FixedInt::I16, Value::I16(x)) => out.write_i16::<LittleEndian>(*x)?,
        (FixedInt::U32, Value::U32(x)) => out.write_u32::<LittleEndian>(*x)?,
        (FixedInt::I32, Value::I32(x)) => out.write_i32::<LittleEndian>(*x)?,
        (FixedInt::U64, Value::U64(x)) => out.write_u64::<LittleEndian>(*x)?,
        (FixedInt::I64, Value::I64(x)) => out.write_i64::<LittleEndian>(*x)?,
        (FixedInt::U16, _) => return Err(mismatch(field, "u16")),
        (FixedInt::I16, _) => return Err(mismatch(field, "i16")),
        (FixedInt::U32, _) => return Err(mismatch(field, "u32")),
        (FixedInt::I32, _) => return Err(mismatch(field, "i32")),
        (FixedInt::U64, _) => return Err(mismatch(field, "u64")),
        (FixedInt::I64, _) => return Err(mismatch(field, "i64")),
    }
    Ok(())
}

fn decode_field(cursor: &mut Cursor<&[u8]>, wire: &WireKind) -> Result<Value, CodecError> {
    match wire {
        WireKind::String => {
            let len = cursor.read_u16::<LittleEndian>()?;
            let mut buf = vec![0u8; len as usize];
            cursor.read_exact(&mut buf)?;
            // Malformed UTF-8 decodes with replacement, never fails.
            Ok(Value::Str(String::from_utf8_lossy(&buf).into_owned()))
        }
        WireKind::Byte | WireKind::Enum(EnumRepr::Byte) => Ok(Value::U8(cursor.read_u8()?)),
        WireKind::SByte | WireKind::Enum(EnumRepr::SByte) => Ok(Value::I8(cursor.read_i8()?)),
        WireKind::Fixed(int) | WireKind::Enum(EnumRepr::Fixed(int)) => decode_fixed(cursor, *int),
    }
}

fn decode_fixed(cursor: &mut Cursor<&[u8]>, int: FixedInt) -> Result<Value, CodecError> {
    Ok(match int {
        FixedInt::U16 => Value::U16(cursor.read_u16::<LittleEndian>()?),
        FixedInt::I16 => Value::I16(cursor.read_i16::<LittleEndian>()?),
        FixedInt::U32 => Value::U32(cursor.read_u32::<LittleEndian>()?),
        FixedInt::I32 => Value::I32(cursor.read_i32::<LittleEndian>()?),
        FixedInt::U64 => Value::U64(cursor.read_u64::<LittleEndian>()?),
        FixedInt::I64 => Value::I64(cursor.read_i64::<LittleEndian>()?),
    })
}

fn mismatch(field: &PlanField, expected: &'static str) -> CodecError {
    CodecError::ValueMismatch {
        field: field.name.clone(),
        expected,
    }
}
