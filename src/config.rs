// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration.
//!
//! [`ContextConfig`] is handed to whoever constructs repositories. It carries the codec's
//! type registry and the decode-recovery hook; the default registers no types and has no
//! hook, so decode failures propagate.
//!
//! [`LogConfig`] configures the reference writers. It is plain serde data:
//!
//! ```rust
//! use contextwise::{Level, LogConfig};
//!
//! let config = LogConfig::from_json(r#"{"name": "worker", "level": "notice"}"#).unwrap();
//! assert_eq!(config.level, Level::Notice);
//! ```

use crate::codec::{Codec, TypeRegistry};
use crate::context::Visibility;
use crate::error::CodecError;
use crate::value::{Structured, Value};
use crate::Level;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;

/// What a recovery hook is told about a value that failed to decode.
///
/// `Debug` output omits `raw` for hidden entries.
pub struct DecodeFailure<'a> {
    pub error: &'a CodecError,
    pub key: &'a str,
    /// The encoded value exactly as it appeared in the snapshot.
    pub raw: &'a str,
    pub visibility: Visibility,
}

impl Debug for DecodeFailure<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let raw: &dyn Debug = if self.is_hidden() { &"<redacted>" } else { &self.raw };
        f.debug_struct("DecodeFailure")
            .field("error", self.error)
            .field("key", &self.key)
            .field("raw", raw)
            .field("visibility", &self.visibility)
            .finish()
    }
}

impl DecodeFailure<'_> {
    pub fn is_hidden(&self) -> bool {
        self.visibility == Visibility::Hidden
    }
}

/// Produces a replacement value for an entry that failed to decode.
pub type RecoveryHook = Arc<dyn Fn(DecodeFailure<'_>) -> Value + Send + Sync>;

#[derive(Clone, Default)]
pub struct ContextConfig {
    codec: Codec,
    recovery: Option<RecoveryHook>,
}

impl Debug for ContextConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextConfig")
            .field("codec", &self.codec)
            .field("recovery", &self.recovery.is_some())
            .finish()
    }
}

impl ContextConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allows values of type `T` to be rebuilt during hydration.
    pub fn register<T: Structured>(mut self) -> Self {
        self.codec.registry_mut().register::<T>();
        self
    }

    pub fn with_registry(mut self, registry: TypeRegistry) -> Self {
        self.codec = Codec::new(registry);
        self
    }

    /// Substitutes the hook's value for any entry that fails to decode during hydration.
    pub fn recover_with(
        mut self,
        hook: impl Fn(DecodeFailure<'_>) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.recovery = Some(Arc::new(hook));
        self
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    pub fn recovery(&self) -> Option<&RecoveryHook> {
        self.recovery.as_ref()
    }

    pub(crate) fn set_recovery(&mut self, hook: Option<RecoveryHook>) {
        self.recovery = hook;
    }
}

fn default_name() -> String {
    "app".to_string()
}

fn default_level() -> Level {
    Level::Debug
}

/// Configuration for the reference writers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Channel name printed with each record.
    #[serde(default = "default_name")]
    pub name: String,
    /// Records below this level are discarded.
    #[serde(default = "default_level")]
    pub level: Level,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            level: default_level(),
        }
    }
}

impl LogConfig {
    pub fn from_json(json: &str) -> Result<Self, crate::Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_config_defaults() {
        let config = LogConfig::from_json("{}").unwrap();
        assert_eq!(config, LogConfig::default());
        assert_eq!(config.name, "app");
        assert!(config.enabled(Level::Debug));
    }

    #[test]
    fn log_config_threshold() {
        let config = LogConfig::from_json(r#"{"level": "error"}"#).unwrap();
        assert!(!config.enabled(Level::Warning));
        assert!(config.enabled(Level::Error));
        assert!(config.enabled(Level::Emergency));
    }

    #[test]
    fn log_config_rejects_unknown_level() {
        let err = LogConfig::from_json(r#"{"level": "loud"}"#).unwrap_err();
        assert!(matches!(err, crate::Error::Json(_)));
    }

    #[test]
    fn context_config_debug_hides_hook() {
        let config = ContextConfig::new().recover_with(|_| Value::Null);
        assert!(config.recovery().is_some());
        assert!(format!("{config:?}").contains("recovery: true"));
    }

    #[test]
    fn decode_failure_debug_redacts_hidden_raw() {
        let error = CodecError::NonFinite(f64::NAN);
        let mut failure = DecodeFailure {
            error: &error,
            key: "token",
            raw: r#"{"type":"string","value":"s3cr3t"}"#,
            visibility: Visibility::Hidden,
        };
        let hidden = format!("{failure:?}");
        assert!(hidden.contains("token"));
        assert!(hidden.contains("<redacted>"));
        assert!(!hidden.contains("s3cr3t"));

        failure.visibility = Visibility::Visible;
        assert!(format!("{failure:?}").contains("s3cr3t"));
    }
}
