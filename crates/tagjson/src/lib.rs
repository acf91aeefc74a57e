//! tagjson: JSON with pluggable tagged codecs.
//!
//! Values JSON cannot express (big integers, patterns, timestamps, keyed and
//! unique collections, application types) are written as ordinary JSON
//! strings prefixed with a registered tag, and turned back into values when
//! the text is read with the same codecs.
//!
//! # Example
//!
//! ```
//! use tagjson::{DateTime, Indent, Registry, Value};
//!
//! let mut registry = Registry::new();
//! registry.register_standard().expect("fresh registry");
//!
//! let when = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
//! let value = Value::object([("age", Value::from(27)), ("when", Value::from(when))]);
//!
//! let text = registry.serialize(value.clone(), Indent::Compact).unwrap();
//! assert_eq!(text, r#"{"age":"(00)r","when":"(03)loyw3v28"}"#);
//! assert_eq!(registry.deserialize(&text).unwrap(), value);
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod codec;
pub mod global;
pub mod pass;
pub mod registry;
pub mod standard;

#[cfg(test)]
mod registry_tests;

pub use codec::{Decoder, Encoder, Predicate};
pub use global::{
    activate_standard_codecs, default_registry, deserialize, modify_codec, register_codec,
    serialize, unregister_codec,
};
pub use pass::{Limits, Pass};
pub use registry::{CodecMut, Registry};
pub use standard::StandardCodec;

pub use tagjson_core::{
    BigInt, DateTime, Extension, ExtensionValue, FormatError, Indent, Key, KeyedMap, Kind,
    Object, Pattern, PatternError, UniqueSet, Utc, Value,
};

/// Errors raised by registry operations and by the codec passes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A codec with this tag is already registered.
    #[error("codec tag `{0}` is already registered")]
    DuplicateTag(String),

    /// No codec is registered under this tag.
    #[error("no codec registered for tag `{0}`")]
    NotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Codecs re-entered serialize/deserialize too many times.
    #[error("codec recursion limit of {0} exceeded")]
    RecursionLimitExceeded(u32),

    /// Serialized text grew past the output limit.
    #[error("serialized output exceeds {0} bytes")]
    OutputLimitExceeded(usize),

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Result type for registry and codec operations.
pub type Result<T> = std::result::Result<T, Error>;
