// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log messages that are not plain strings.
//!
//! The [`Logger`](crate::Logger) accepts anything convertible into a [`Message`] and
//! turns it into text before it reaches the writer:
//!
//! | Message shape            | Rendered as              |
//! |--------------------------|--------------------------|
//! | text                     | itself                   |
//! | keyed map ([`Fields`])   | pretty-printed JSON      |
//! | JSON-capable value       | compact JSON             |
//! | [`Arrayable`]            | pretty-printed JSON of `to_array()` |
//!
//! Formatting never fails; a value that cannot be serialized is rendered as the
//! serializer's error text.

use crate::value::{Fields, fields_to_json};
use serde::Serialize;
use std::borrow::Cow;
use std::fmt::Debug;

/// A value that can present itself as a keyed map for logging.
pub trait Arrayable {
    fn to_array(&self) -> Fields;
}

#[derive(Clone)]
pub enum Message<'a> {
    Text(Cow<'a, str>),
    Map(Fields),
    Json(serde_json::Value),
    Arrayable(&'a dyn Arrayable),
}

impl Debug for Message<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Message::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Message::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Message::Json(json) => f.debug_tuple("Json").field(json).finish(),
            Message::Arrayable(value) => {
                f.debug_tuple("Arrayable").field(&value.to_array()).finish()
            }
        }
    }
}

impl Message<'_> {
    /// A JSON-capable message.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Message<'static> {
        match serde_json::to_value(value) {
            Ok(json) => Message::Json(json),
            Err(e) => Message::Text(Cow::Owned(e.to_string())),
        }
    }

    /// Renders the message as text.
    pub fn format(self) -> String {
        match self {
            Message::Text(text) => text.into_owned(),
            Message::Map(map) => pretty(&fields_to_json(&map)),
            Message::Json(json) => json.to_string(),
            Message::Arrayable(value) => pretty(&fields_to_json(&value.to_array())),
        }
    }
}

fn pretty(json: &serde_json::Value) -> String {
    serde_json::to_string_pretty(json).unwrap_or_else(|_| json.to_string())
}

impl<'a> From<&'a str> for Message<'a> {
    fn from(value: &'a str) -> Self {
        Message::Text(Cow::Borrowed(value))
    }
}

impl From<String> for Message<'_> {
    fn from(value: String) -> Self {
        Message::Text(Cow::Owned(value))
    }
}

impl From<Fields> for Message<'_> {
    fn from(value: Fields) -> Self {
        Message::Map(value)
    }
}

impl From<serde_json::Value> for Message<'_> {
    fn from(value: serde_json::Value) -> Self {
        Message::Json(value)
    }
}

impl From<std::fmt::Arguments<'_>> for Message<'_> {
    fn from(value: std::fmt::Arguments<'_>) -> Self {
        Message::Text(Cow::Owned(value.to_string()))
    }
}

impl<'a, T: Arrayable> From<&'a T> for Message<'a> {
    fn from(value: &'a T) -> Self {
        Message::Arrayable(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;

    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen_test::*;

    struct Order {
        id: u32,
    }

    impl Arrayable for Order {
        fn to_array(&self) -> Fields {
            fields! {"id" => self.id}
        }
    }

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn text_is_unchanged() {
        assert_eq!(Message::from("hello {name}").format(), "hello {name}");
        assert_eq!(Message::from(format_args!("n={}", 3)).format(), "n=3");
    }

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn map_is_pretty() {
        let text = Message::from(fields! {"a" => 1}).format();
        assert_eq!(text, "{\n  \"a\": 1\n}");
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["a"], 1);
    }

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn json_is_compact() {
        #[derive(Serialize)]
        struct Point {
            x: i32,
            y: i32,
        }
        assert_eq!(Message::json(&Point { x: 1, y: 2 }).format(), r#"{"x":1,"y":2}"#);
        assert_eq!(Message::json(&[1, 2]).format(), "[1,2]");
    }

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn unserializable_json_falls_back_to_text() {
        let mut map = std::collections::HashMap::new();
        map.insert((1, 2), "tuple keys are not json");
        let text = Message::json(&map).format();
        assert!(!text.is_empty());
    }

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn arrayable_is_pretty() {
        let order = Order { id: 9 };
        assert_eq!(Message::from(&order).format(), "{\n  \"id\": 9\n}");
    }
}
