// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::Level;
use crate::config::LogConfig;
use crate::value::{Fields, fields_to_json};
use crate::writer::Writer;

/**
A reference writer that writes to stderr, or to the browser console on wasm.

Each record is one line: `[name.level] message {context}`. Records below the configured
level are discarded.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StdErrorWriter {
    config: LogConfig,
}

impl StdErrorWriter {
    pub fn new(config: LogConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    fn line(&self, level: Level, message: &str, context: &Fields) -> String {
        let mut line = format!("[{}.{}] {}", self.config.name, level, message);
        if !context.is_empty() {
            line.push(' ');
            line.push_str(&fields_to_json(context).to_string());
        }
        line
    }
}

impl Writer for StdErrorWriter {
    fn log(&self, level: Level, message: &str, context: &Fields) {
        if !self.config.enabled(level) {
            return;
        }
        let line = self.line(level, message, context);
        #[cfg(not(target_arch = "wasm32"))]
        {
            use std::io::Write;
            let mut lock = std::io::stderr().lock();
            //nowhere to report a failure to write to stderr
            let _ = writeln!(lock, "{line}");
        }
        #[cfg(target_arch = "wasm32")]
        {
            let line = wasm_bindgen::JsValue::from(line);
            match level {
                Level::Debug => web_sys::console::debug_1(&line),
                Level::Info | Level::Notice => web_sys::console::info_1(&line),
                Level::Warning => web_sys::console::warn_1(&line),
                _ => web_sys::console::error_1(&line),
            }
        }
    }

    fn flush(&self) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            use std::io::Write;
            let _ = std::io::stderr().flush();
        }
    }
}
