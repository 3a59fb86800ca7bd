// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reversible encoding of context values.
//!
//! Values are encoded as JSON in a self-describing, tagged shape (see [`Value`]'s serde
//! representation), so a float stays a float and a structured object keeps its type
//! name across the trip.
//!
//! Decoding is where incompleteness is caught. An object whose type name is unknown to
//! the decoding side's [`TypeRegistry`], or whose state no longer rebuilds the registered
//! type, is reported as [`CodecError::Incomplete`] instead of being handed back as a
//! half-built value.

use crate::error::CodecError;
use crate::value::{Structured, Value};
use std::collections::HashMap;
use std::fmt::Debug;

/// Checks that a stored state rebuilds its registered type.
type Validator = fn(&Value) -> Result<(), serde_json::Error>;

fn validate<T: Structured>(state: &Value) -> Result<(), serde_json::Error> {
    serde_json::from_value::<T>(state.to_json()).map(drop)
}

/// The set of structured types a decoder can rebuild.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<String, Validator>,
}

impl Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.types.keys().collect();
        names.sort();
        f.debug_struct("TypeRegistry").field("types", &names).finish()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Structured>(&mut self) -> &mut Self {
        self.types.insert(T::TYPE_NAME.to_string(), validate::<T>);
        self
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Walks `value` and fails on the first object this registry cannot rebuild.
    fn check(&self, value: &Value) -> Result<(), CodecError> {
        match value {
            Value::List(items) => items.iter().try_for_each(|item| self.check(item)),
            Value::Map(map) => map.values().try_for_each(|item| self.check(item)),
            Value::Object(object) => {
                let Some(validator) = self.types.get(&object.type_name) else {
                    return Err(CodecError::Incomplete {
                        type_name: object.type_name.clone(),
                        reason: "type is not registered".to_string(),
                    });
                };
                validator(&object.state).map_err(|e| CodecError::Incomplete {
                    type_name: object.type_name.clone(),
                    reason: e.to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// Fails on the first float that would not survive a round trip.
fn check_finite(value: &Value) -> Result<(), CodecError> {
    match value {
        Value::Float(f) if !f.is_finite() => Err(CodecError::NonFinite(*f)),
        Value::List(items) => items.iter().try_for_each(check_finite),
        Value::Map(map) => map.values().try_for_each(check_finite),
        Value::Object(object) => check_finite(&object.state),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Default)]
pub struct Codec {
    registry: TypeRegistry,
}

impl Codec {
    pub fn new(registry: TypeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut self.registry
    }

    /// Encodes `value`. Non-finite floats anywhere inside it are rejected, since their
    /// encoding could not be decoded.
    pub fn encode(&self, value: &Value) -> Result<String, CodecError> {
        check_finite(value)?;
        Ok(serde_json::to_string(value)?)
    }

    pub fn decode(&self, encoded: &str) -> Result<Value, CodecError> {
        let value: Value = serde_json::from_str(encoded)?;
        self.registry.check(&value)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Tenant {
        id: u64,
        name: String,
    }

    impl Structured for Tenant {
        const TYPE_NAME: &'static str = "Tenant";
    }

    fn codec() -> Codec {
        let mut registry = TypeRegistry::new();
        registry.register::<Tenant>();
        Codec::new(registry)
    }

    #[test]
    fn round_trips_every_shape() {
        let codec = codec();
        let tenant = Value::object(&Tenant {
            id: 9,
            name: "acme".into(),
        })
        .unwrap();
        let values = [
            Value::Null,
            Value::Bool(false),
            Value::Integer(-12),
            Value::Float(2.0),
            Value::from("text"),
            Value::from(vec![Value::from(1), Value::from("two")]),
            Value::from(fields! {"nested" => fields! {"deep" => 1.25}}),
            tenant.clone(),
            Value::from(vec![tenant]),
        ];
        for value in values {
            let encoded = codec.encode(&value).unwrap();
            assert_eq!(codec.decode(&encoded).unwrap(), value, "{encoded}");
        }
    }

    #[test]
    fn float_stays_float() {
        let codec = Codec::default();
        let encoded = codec.encode(&Value::Float(3.0)).unwrap();
        assert_eq!(codec.decode(&encoded).unwrap(), Value::Float(3.0));
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        let codec = Codec::default();
        for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = codec.encode(&Value::Float(f)).unwrap_err();
            assert!(matches!(err, CodecError::NonFinite(_)), "{err}");
        }
        let list = vec![Value::from(1.0), Value::Float(f64::NAN)];
        let nested = Value::from(fields! {"list" => list});
        assert!(matches!(codec.encode(&nested), Err(CodecError::NonFinite(_))));

        let object = Value::Object(crate::value::Object {
            type_name: "Tenant".into(),
            state: Box::new(Value::Float(f64::INFINITY)),
        });
        assert!(matches!(codec.encode(&object), Err(CodecError::NonFinite(_))));
    }

    #[test]
    fn malformed_input() {
        let err = Codec::default().decode("{not json").unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)));
        let err = Codec::default().decode(r#"{"type":"nope"}"#).unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)));
    }

    #[test]
    fn unregistered_type_is_incomplete() {
        let value = Value::object(&Tenant {
            id: 1,
            name: "a".into(),
        })
        .unwrap();
        let encoded = codec().encode(&value).unwrap();

        let err = Codec::default().decode(&encoded).unwrap_err();
        assert!(matches!(err, CodecError::Incomplete { ref type_name, .. } if type_name == "Tenant"));

        // nested inside a list
        let encoded = codec().encode(&Value::from(vec![value])).unwrap();
        assert!(matches!(
            Codec::default().decode(&encoded),
            Err(CodecError::Incomplete { .. })
        ));
    }

    #[test]
    fn state_that_does_not_rebuild_is_incomplete() {
        let encoded =
            r#"{"type":"object","value":{"type_name":"Tenant","state":{"type":"integer","value":4}}}"#;
        let err = codec().decode(encoded).unwrap_err();
        assert!(matches!(err, CodecError::Incomplete { ref type_name, .. } if type_name == "Tenant"));
    }

    #[test]
    fn registry_debug_lists_names() {
        let rendered = format!("{:?}", codec().registry());
        assert!(rendered.contains("Tenant"));
    }
}
