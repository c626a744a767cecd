//! Runtime values carried through encode/decode.

use std::collections::HashMap;

/// A single field value.
///
/// Enumeration fields are carried as their underlying integer; the consumer
/// reinterprets the bit pattern, so tags with no named case pass through
/// unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    Str(String),
}

impl Value {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::U8(x) => Some(*x as u64),
            Value::U16(x) => Some(*x as u64),
            Value::U32(x) => Some(*x as u64),
            Value::U64(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I8(x) => Some(*x as i64),
            Value::I16(x) => Some(*x as i64),
            Value::I32(x) => Some(*x as i64),
            Value::I64(x) => Some(*x),
            Value::U8(x) => Some(*x as i64),
            Value::U16(x) => Some(*x as i64),
            Value::U32(x) => Some(*x as i64),
            Value::U64(x) => Some(*x as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// A whole message's worth of values, shaped by its creation strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageValue {
    /// No body; the sole instance.
    Empty,
    /// Fields assigned by name to a fresh instance.
    Properties(HashMap<String, Value>),
    /// Fields passed positionally to the chosen initializer, in resolved
    /// order.
    Constructor(Vec<Value>),
}

impl MessageValue {
    pub fn properties<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        MessageValue::Properties(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            MessageValue::Properties(map) => map.get(name),
            _ => None,
        }
    }
}
