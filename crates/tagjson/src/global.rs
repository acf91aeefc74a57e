//! Process-wide default registry.
//!
//! Opt-in convenience for callers that want one shared codec policy. Every
//! call runs on a snapshot taken under a read lock, so codecs may register or
//! modify entries on the default registry without deadlocking; such changes
//! apply from the next call on.

use std::sync::LazyLock;

use parking_lot::RwLock;
use tagjson_core::{Indent, Value};

use crate::Result;
use crate::codec::{Decoder, Encoder, Predicate};
use crate::registry::{CodecMut, Registry};

static DEFAULT: LazyLock<RwLock<Registry>> = LazyLock::new(|| RwLock::new(Registry::new()));

/// The default registry. Starts empty.
pub fn default_registry() -> &'static RwLock<Registry> {
    &DEFAULT
}

fn snapshot() -> Registry {
    DEFAULT.read().clone()
}

/// [`Registry::serialize`] on the default registry.
pub fn serialize(value: Value, indent: impl Into<Indent>) -> Result<String> {
    snapshot().serialize(value, indent)
}

/// [`Registry::deserialize`] on the default registry.
pub fn deserialize(text: &str) -> Result<Value> {
    snapshot().deserialize(text)
}

/// [`Registry::register`] on the default registry.
pub fn register_codec(
    tag: impl Into<String>,
    predicate: Predicate,
    encoder: Encoder,
    decoder: Decoder,
) -> Result<()> {
    DEFAULT.write().register(tag, predicate, encoder, decoder)?;
    Ok(())
}

/// Replace slots of a codec on the default registry.
///
/// ```
/// use tagjson::{Decoder, Encoder, Kind, Predicate};
///
/// tagjson::register_codec(
///     "(doc)",
///     Predicate::kind(Kind::Bool),
///     Encoder::new(|_, _| Ok(None)),
///     Decoder::new(|_, _| Ok(None)),
/// )
/// .unwrap();
/// tagjson::modify_codec("(doc)", |codec| {
///     codec.encoder(Encoder::new(|v, _| Ok(Some(format!("{v:?}")))));
/// })
/// .unwrap();
/// ```
pub fn modify_codec(tag: &str, f: impl FnOnce(&mut CodecMut<'_>)) -> Result<()> {
    let mut registry = DEFAULT.write();
    let mut codec = registry.modify(tag)?;
    f(&mut codec);
    Ok(())
}

/// [`Registry::unregister`] on the default registry.
pub fn unregister_codec(tag: &str) -> Result<()> {
    DEFAULT.write().unregister(tag)
}

/// [`Registry::register_standard`] on the default registry.
pub fn activate_standard_codecs() -> Result<()> {
    DEFAULT.write().register_standard()?;
    Ok(())
}
