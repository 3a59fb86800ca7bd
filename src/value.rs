// SPDX-License-Identifier: MIT OR Apache-2.0

//! The values a context repository can hold.
//!
//! Context values form a closed set of shapes: scalars, ordered lists, keyed maps and
//! *structured objects*. A structured object is an instance of a Rust type that
//! implements [`Structured`] (usually via `#[derive(Structured)]`), stored as its type
//! name plus its serde state. Keeping the set closed is what lets the codec tell a value
//! it can rebuild from one it cannot.
//!
//! ```rust
//! use contextwise::{Structured, Value};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize, Structured)]
//! struct Tenant {
//!     id: u64,
//! }
//!
//! let value = Value::object(&Tenant { id: 7 }).unwrap();
//! assert_eq!(value.to_object::<Tenant>().unwrap(), Tenant { id: 7 });
//! ```

use crate::error::CodecError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

/// A keyed collection of values, as used for context partitions and log fields.
pub type Fields = BTreeMap<String, Value>;

/// A type that may be stored in context as a structured object.
///
/// `TYPE_NAME` identifies the type on both sides of a hand-off, so it must be stable
/// across the processes that exchange snapshots.
pub trait Structured: Serialize + DeserializeOwned {
    const TYPE_NAME: &'static str;
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// An ordered sequence. Lists are the only values `push` may append to.
    List(Vec<Value>),
    Map(Fields),
    Object(Object),
}

/// A structured object: a registered type name and the serde state of the instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    pub type_name: String,
    pub state: Box<Value>,
}

impl Value {
    /// Captures `value` as a structured object.
    pub fn object<T: Structured>(value: &T) -> Result<Value, CodecError> {
        let state = serde_json::to_value(value)?;
        Ok(Value::Object(Object {
            type_name: T::TYPE_NAME.to_string(),
            state: Box::new(Value::from(state)),
        }))
    }

    /// Rebuilds the structured object stored in this value.
    pub fn to_object<T: Structured>(&self) -> Result<T, CodecError> {
        match self {
            Value::Object(object) if object.type_name == T::TYPE_NAME => {
                Ok(serde_json::from_value(object.state.to_json())?)
            }
            Value::Object(object) => Err(CodecError::TypeMismatch {
                expected: T::TYPE_NAME,
                found: object.type_name.clone(),
            }),
            other => Err(CodecError::TypeMismatch {
                expected: T::TYPE_NAME,
                found: other.kind().to_string(),
            }),
        }
    }

    /// Short name of the value's shape, for messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Fields> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Plain JSON rendering, used when writing records. Objects render as their state.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Integer(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => items.iter().map(Value::to_json).collect(),
            Value::Map(map) => fields_to_json(map),
            Value::Object(object) => object.state.to_json(),
        }
    }
}

/// Renders a set of fields as a JSON object.
pub fn fields_to_json(fields: &Fields) -> serde_json::Value {
    serde_json::Value::Object(
        fields
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect(),
    )
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

macro_rules! from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Integer(i64::from(value))
                }
            }
        )*
    };
}
from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(Value::Float(value as f64), Value::Integer)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::from(value as u64)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::String(value.clone())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<Fields> for Value {
    fn from(value: Fields) -> Self {
        Value::Map(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::List(iter.into_iter().map(Into::into).collect())
    }
}
