// SPDX-License-Identifier: MIT OR Apache-2.0

//! Forwards records into [`tracing`].
//!
//! `tracing` has five levels; the eight severities collapse onto them: `debug` to
//! `DEBUG`, `info` and `notice` to `INFO`, `warning` to `WARN`, and everything more
//! severe to `ERROR`. The severity name is kept in the `severity` field, and the merged
//! context is attached as a JSON string in `context`.

use crate::Level;
use crate::value::{Fields, fields_to_json};
use crate::writer::Writer;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TracingWriter;

impl TracingWriter {
    pub const fn new() -> Self {
        Self
    }
}

impl Writer for TracingWriter {
    fn log(&self, level: Level, message: &str, context: &Fields) {
        let severity = level.as_str();
        let context = fields_to_json(context).to_string();
        match level {
            Level::Debug => tracing::debug!(severity, %context, "{message}"),
            Level::Info | Level::Notice => tracing::info!(severity, %context, "{message}"),
            Level::Warning => tracing::warn!(severity, %context, "{message}"),
            _ => tracing::error!(severity, %context, "{message}"),
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::fields;
    use parking_lot::Mutex;
    use std::io::Write;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn records_reach_the_subscriber() {
        let capture = Capture::default();
        let sink = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            TracingWriter::new().notice("queued", &fields! {"job" => 1});
            TracingWriter::new().alert("paged", &Fields::new());
        });

        let output = String::from_utf8(capture.0.lock().clone()).unwrap();
        assert!(output.contains("INFO"));
        assert!(output.contains("queued"));
        assert!(output.contains("severity=\"notice\""));
        assert!(output.contains("ERROR"));
        assert!(output.contains("severity=\"alert\""));
    }
}
