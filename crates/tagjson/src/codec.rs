//! The three replaceable slots of a codec entry.
//!
//! Each slot is either built in (a kind test, or one of the standard codecs)
//! or a custom closure. Custom encoders and decoders receive the active
//! [`Pass`] so they can re-enter serialization for nested content.

use std::fmt;
use std::sync::Arc;

use tagjson_core::{Kind, Value};

use crate::Result;
use crate::pass::Pass;
use crate::standard::StandardCodec;

type PredicateFn = dyn Fn(&Value) -> bool + Send + Sync;
type EncodeFn = dyn Fn(&Value, &mut Pass<'_>) -> Result<Option<String>> + Send + Sync;
type DecodeFn = dyn Fn(&str, &mut Pass<'_>) -> Result<Option<Value>> + Send + Sync;

/// Decides whether an encoder applies to a value.
#[derive(Clone)]
pub enum Predicate {
    /// Matches values of exactly this kind.
    Kind(Kind),
    Custom(Arc<PredicateFn>),
}

impl Predicate {
    pub fn kind(kind: Kind) -> Self {
        Predicate::Kind(kind)
    }

    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Predicate::Custom(Arc::new(f))
    }

    pub fn test(&self, value: &Value) -> bool {
        match self {
            Predicate::Kind(kind) => value.kind() == *kind,
            Predicate::Custom(f) => f(value),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Kind(kind) => write!(f, "Kind({kind})"),
            Predicate::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Turns a matched value into the payload that follows the tag.
///
/// `Ok(None)` and `Ok(Some(""))` both decline; the next entry is tried.
#[derive(Clone)]
pub enum Encoder {
    Standard(StandardCodec),
    Custom(Arc<EncodeFn>),
}

impl Encoder {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, &mut Pass<'_>) -> Result<Option<String>> + Send + Sync + 'static,
    {
        Encoder::Custom(Arc::new(f))
    }

    pub fn encode(&self, value: &Value, cx: &mut Pass<'_>) -> Result<Option<String>> {
        let payload = match self {
            Encoder::Standard(codec) => codec.encode(value, cx)?,
            Encoder::Custom(f) => f(value, cx)?,
        };
        Ok(payload.filter(|p| !p.is_empty()))
    }
}

impl fmt::Debug for Encoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoder::Standard(codec) => write!(f, "Standard({codec:?})"),
            Encoder::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Rebuilds a value from the text that follows the tag.
///
/// `Ok(None)` declines and leaves the string for later entries.
#[derive(Clone)]
pub enum Decoder {
    Standard(StandardCodec),
    Custom(Arc<DecodeFn>),
}

impl Decoder {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str, &mut Pass<'_>) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        Decoder::Custom(Arc::new(f))
    }

    pub fn decode(&self, payload: &str, cx: &mut Pass<'_>) -> Result<Option<Value>> {
        match self {
            Decoder::Standard(codec) => codec.decode(payload, cx),
            Decoder::Custom(f) => f(payload, cx),
        }
    }
}

impl fmt::Debug for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decoder::Standard(codec) => write!(f, "Standard({codec:?})"),
            Decoder::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
