// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declarative macros.

/// Builds a [`Fields`](crate::Fields) map from `key => value` pairs.
///
/// Keys are anything convertible into `String`; values are anything convertible into
/// [`Value`](crate::Value). Later pairs overwrite earlier pairs with the same key.
///
/// # Examples
///
/// ```rust
/// use contextwise::{fields, Value};
///
/// let fields = fields! {
///     "request_id" => "abc",
///     "attempt" => 2,
///     "nested" => fields! {"ok" => true},
/// };
/// assert_eq!(fields["attempt"], Value::Integer(2));
/// assert!(fields! {}.is_empty());
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $(
            fields.insert(::std::string::String::from($key), $crate::Value::from($value));
        )+
        fields
    }};
}

#[cfg(test)]
mod tests {
    use crate::Value;

    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen_test::*;

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn later_pairs_win() {
        let fields = fields! {"k" => 1, "k" => "two"};
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["k"], Value::from("two"));
    }

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn owned_keys() {
        let key = String::from("dynamic");
        let fields = fields! {key.clone() => Value::Null};
        assert!(fields.contains_key(&key));
    }
}
