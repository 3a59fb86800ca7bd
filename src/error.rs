// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types.
//!
//! [`Error`] is returned by repository, logger and configuration operations.
//! [`CodecError`] describes why a single value could not be encoded or rebuilt; it is
//! what a recovery hook receives during hydration.

use crate::context::Visibility;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// `push` on a key whose current value is not a list.
    #[error("unable to push value onto {visibility} stack for key [{key}]")]
    NotStackable { key: String, visibility: Visibility },

    /// `Logger::listen` without an attached dispatcher.
    #[error("events dispatcher has not been set")]
    MissingDispatcher,

    /// A value could not be decoded during hydration and no recovery hook was installed.
    #[error("unable to decode {visibility} value for key [{key}]")]
    Decode {
        key: String,
        visibility: Visibility,
        #[source]
        source: CodecError,
    },

    /// A value could not be encoded during dehydration.
    #[error("unable to encode {visibility} value for key [{key}]")]
    Encode {
        key: String,
        visibility: Visibility,
        #[source]
        source: CodecError,
    },

    #[error("invalid log level [{0}]")]
    InvalidLevel(String),

    /// A payload or configuration document was not valid JSON of the expected shape.
    #[error("invalid json document")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodecError {
    #[error("malformed encoded value")]
    Malformed(#[from] serde_json::Error),

    /// The encoded object could not be rebuilt into its registered type.
    #[error("value is an incomplete object of type [{type_name}]: {reason}")]
    Incomplete { type_name: String, reason: String },

    /// NaN and the infinities have no JSON form, so they could not be decoded again.
    #[error("non-finite float [{0}] cannot be encoded")]
    NonFinite(f64),

    /// `Value::to_object` was asked for a different type than the one stored.
    #[error("expected an object of type [{expected}], found {found}")]
    TypeMismatch { expected: &'static str, found: String },
}
