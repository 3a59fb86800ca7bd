// SPDX-License-Identifier: MIT OR Apache-2.0
use contextwise::{Codec, CodecError, Structured, TypeRegistry, Value};
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_test::*;
#[cfg(target_arch = "wasm32")]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

#[derive(Debug, PartialEq, Serialize, Deserialize, Structured)]
struct Session {
    user: String,
    admin: bool,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Structured)]
pub enum Plan {
    Free,
    Paid { seats: u32 },
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn derive_uses_the_type_name() {
    assert_eq!(Session::TYPE_NAME, "Session");
    assert_eq!(<Plan as Structured>::TYPE_NAME, "Plan");
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn derived_types_round_trip_through_the_codec() {
    let mut registry = TypeRegistry::new();
    registry.register::<Session>().register::<Plan>();
    let codec = Codec::new(registry);

    let plan = Value::object(&Plan::Paid { seats: 3 }).unwrap();
    let decoded = codec.decode(&codec.encode(&plan).unwrap()).unwrap();
    assert_eq!(decoded.to_object::<Plan>().unwrap(), Plan::Paid { seats: 3 });

    let session = Value::object(&Session {
        user: "ada".into(),
        admin: false,
    })
    .unwrap();
    assert!(matches!(
        session.to_object::<Plan>(),
        Err(CodecError::TypeMismatch {
            expected: "Plan",
            ..
        })
    ));
}
