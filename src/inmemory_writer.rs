// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-Memory Writer
//!
//! A [`Writer`] that keeps every record in memory instead of writing it anywhere. It is
//! meant for tests that need to check what was logged, and for environments where
//! stderr is not available.
//!
//! The buffer is a `parking_lot::Mutex<Vec<LogRecord>>`, so the writer may be shared
//! across threads behind an `Arc`.

use crate::Level;
use crate::log_record::LogRecord;
use crate::value::Fields;
use crate::writer::Writer;
use parking_lot::Mutex;

/// Captures log records in memory.
///
/// # Example
///
/// ```rust
/// use contextwise::{fields, InMemoryWriter, Logger};
/// use std::sync::Arc;
///
/// let writer = Arc::new(InMemoryWriter::new());
/// let logger = Logger::new(writer.clone());
/// logger.warning("Something suspicious happened", fields! {});
/// logger.error("An error occurred", fields! {"code" => 404});
///
/// let logs = writer.drain_logs();
/// assert!(logs.contains("Something suspicious happened"));
/// assert!(logs.contains(r#"An error occurred {"code":404}"#));
///
/// // Buffer is now empty
/// assert_eq!(writer.drain_logs(), "");
/// ```
#[derive(Debug)]
pub struct InMemoryWriter {
    records: Mutex<Vec<LogRecord>>,
}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Debug: derived, required by Writer
// - Default: empty buffer
// - Clone: NOT implemented, writers are shared through Arc
// - PartialEq/Eq/Hash: NOT implemented, comparing mutex state is problematic
// - Send/Sync: automatic through Mutex

impl Default for InMemoryWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryWriter {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// A copy of every record captured so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    /// Takes every captured record, clearing the buffer.
    pub fn drain(&self) -> Vec<LogRecord> {
        std::mem::take(&mut *self.records.lock())
    }

    /// Drains all records into a single string, one record per line.
    pub fn drain_logs(&self) -> String {
        self.drain()
            .iter()
            .map(LogRecord::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Prints and clears the buffer: stderr natively, the browser console on wasm.
    pub fn drain_to_console(&self) {
        for record in self.drain() {
            #[cfg(target_arch = "wasm32")]
            web_sys::console::log_1(&record.to_string().into());
            #[cfg(not(target_arch = "wasm32"))]
            eprintln!("{}", record);
        }
    }
}

impl Writer for InMemoryWriter {
    fn log(&self, level: Level, message: &str, context: &Fields) {
        self.records
            .lock()
            .push(LogRecord::new(level, message, context.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use std::sync::Arc;
    use std::thread;

    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen_test::*;

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn test_new_logger_is_empty() {
        let writer = InMemoryWriter::new();
        assert!(writer.records().is_empty());
        assert_eq!(writer.drain_logs(), "");
    }

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn test_level_methods_record_their_level() {
        let writer = InMemoryWriter::new();
        writer.notice("n", &Fields::new());
        writer.critical("c", &fields! {"k" => 1});

        let records = writer.drain();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].level, Level::Notice);
        assert_eq!(records[1].level, Level::Critical);
        assert_eq!(records[1].context, fields! {"k" => 1});
        assert!(writer.records().is_empty());
    }

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn test_drain_logs_joins_lines() {
        let writer = InMemoryWriter::new();
        writer.info("first", &Fields::new());
        writer.debug("second", &Fields::new());
        assert_eq!(writer.drain_logs(), "[info] first\n[debug] second");
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_concurrent_writes() {
        let writer = Arc::new(InMemoryWriter::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let writer = writer.clone();
                thread::spawn(move || {
                    for j in 0..10 {
                        writer.info(&format!("thread {i} message {j}"), &Fields::new());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(writer.records().len(), 40);
    }
}
