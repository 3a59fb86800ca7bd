//SPDX-License-Identifier: MIT OR Apache-2.0

//! # contextwise procedural macros
//!
//! Provides `#[derive(Structured)]`, which registers a type's name with contextwise's
//! value model so instances can be stored in a context repository and survive a
//! dehydrate/hydrate round trip.
//!
//! The derive does not implement serialization itself. The type must also derive
//! (or implement) `serde::Serialize` and `serde::Deserialize`.
//!
//! ```rust
//! use contextwise::Structured;
//!
//! #[derive(serde::Serialize, serde::Deserialize, Structured)]
//! struct Tenant {
//!     id: u64,
//!     name: String,
//! }
//! // Expands to:
//! // impl ::contextwise::Structured for Tenant {
//! //     const TYPE_NAME: &'static str = "Tenant";
//! // }
//! assert_eq!(Tenant::TYPE_NAME, "Tenant");
//! ```
//!
//! Generic types are rejected: a type name must identify exactly one shape on both
//! sides of a hand-off.

use proc_macro::{TokenStream, TokenTree};
use std::iter::Peekable;

/// Emits a `compile_error!` with the given message.
fn error(message: &str) -> TokenStream {
    format!("compile_error!({message:?});").parse().unwrap()
}

/// Skips tokens until the `struct` or `enum` keyword and returns the type name after it.
///
/// Attributes are a `#` followed by a bracket group, so idents inside them never
/// appear at the top level of the stream and need no special handling.
fn parse_type_name<I: Iterator<Item = TokenTree>>(input: &mut Peekable<I>) -> Option<String> {
    while let Some(token) = input.next() {
        if let TokenTree::Ident(ident) = &token {
            let keyword = ident.to_string();
            if keyword == "struct" || keyword == "enum" {
                return match input.next() {
                    Some(TokenTree::Ident(name)) => {
                        Some(name.to_string().trim_start_matches("r#").to_string())
                    }
                    _ => None,
                };
            }
        }
    }
    None
}

/// Derives `contextwise::Structured` using the type's own name as its registered name.
#[proc_macro_derive(Structured)]
pub fn derive_structured(input: TokenStream) -> TokenStream {
    let mut input = input.into_iter().peekable();
    let Some(name) = parse_type_name(&mut input) else {
        return error("Structured can only be derived for structs and enums");
    };
    if let Some(TokenTree::Punct(punct)) = input.peek() {
        if punct.as_char() == '<' {
            return error("Structured cannot be derived for generic types");
        }
    }
    let src = format!(
        r#"
        impl ::contextwise::Structured for {name} {{
            const TYPE_NAME: &'static str = "{name}";
        }}
    "#
    );
    src.parse().unwrap()
}
