// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log record type.
//!
//! A [`LogRecord`] is what a writer saw: the level, the already-formatted message and
//! the merged context. The [`InMemoryWriter`](crate::InMemoryWriter) keeps them for
//! inspection.
//!
//! # Example
//!
//! ```rust
//! use contextwise::{fields, Level, LogRecord};
//!
//! let record = LogRecord::new(Level::Info, "checkout complete", fields! {"order" => 7});
//! assert_eq!(record.to_string(), r#"[info] checkout complete {"order":7}"#);
//! ```

use crate::Level;
use crate::value::{Fields, fields_to_json};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: Level,
    pub message: String,
    pub context: Fields,
}

impl LogRecord {
    pub fn new(level: Level, message: impl Into<String>, context: Fields) -> Self {
        Self {
            level,
            message: message.into(),
            context,
        }
    }
}

impl Default for LogRecord {
    fn default() -> Self {
        Self::new(Level::Info, String::new(), Fields::new())
    }
}

impl Display for LogRecord {
    /// `[level] message`, followed by the context as compact JSON when there is any.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)?;
        if !self.context.is_empty() {
            write!(f, " {}", fields_to_json(&self.context))?;
        }
        Ok(())
    }
}
/*
Boilerplate notes for LogRecord:

IMPLEMENTED:
- Debug, Clone, PartialEq: derived, records are compared in tests
- Default: Info level, empty message and context
- Display: one line per record, used by the writers

NOT IMPLEMENTED:
- Eq/Hash: context may hold floats
- Copy: owns heap data
- Ord/PartialOrd: no meaningful ordering for log records
*/

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen_test::*;

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn display_without_context() {
        let record = LogRecord::new(Level::Warning, "disk low", Fields::new());
        assert_eq!(record.to_string(), "[warning] disk low");
    }

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn default_record() {
        let record = LogRecord::default();
        assert_eq!(record.level, Level::Info);
        assert!(record.message.is_empty());
    }
}
