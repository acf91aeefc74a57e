//! Ordered codec registry.
//!
//! Encode and decode entries live in two sequences. Registration appends to
//! both, and insertion order is precedence: the first matching entry wins.

use std::fmt;

use tagjson_core::{Indent, Value};
use tracing::debug;

use crate::codec::{Decoder, Encoder, Predicate};
use crate::pass::{Limits, Pass};
use crate::standard::StandardCodec;
use crate::{Error, Result};

#[derive(Clone, Debug)]
pub(crate) struct EncodeEntry {
    pub(crate) tag: String,
    pub(crate) predicate: Predicate,
    pub(crate) encoder: Encoder,
}

#[derive(Clone, Debug)]
pub(crate) struct DecodeEntry {
    pub(crate) tag: String,
    pub(crate) decoder: Decoder,
}

/// Ordered set of tagged codecs plus the limits its passes run under.
///
/// Cloning is cheap (custom callables are shared), which is how the default
/// registry hands out snapshots.
#[derive(Clone, Default)]
pub struct Registry {
    pub(crate) encoders: Vec<EncodeEntry>,
    pub(crate) decoders: Vec<DecodeEntry>,
    limits: Limits,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the six standard codecs already registered.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for codec in StandardCodec::ALL {
            registry.push(codec.tag(), codec.predicate(), codec.encoder(), codec.decoder());
        }
        registry
    }

    /// Set the limits for passes run through this registry.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Append a codec.
    ///
    /// Fails with [`Error::DuplicateTag`] if either side already holds `tag`,
    /// and with [`Error::InvalidArgument`] if `tag` is empty.
    pub fn register(
        &mut self,
        tag: impl Into<String>,
        predicate: Predicate,
        encoder: Encoder,
        decoder: Decoder,
    ) -> Result<&mut Self> {
        let tag = tag.into();
        self.check_new_tag(&tag)?;
        debug!(tag = %tag, "registered codec");
        self.push(tag, predicate, encoder, decoder);
        Ok(self)
    }

    /// Register the standard codec set.
    ///
    /// All-or-nothing: if any standard tag is taken, nothing is registered.
    pub fn register_standard(&mut self) -> Result<&mut Self> {
        for codec in StandardCodec::ALL {
            self.check_new_tag(codec.tag())?;
        }
        for codec in StandardCodec::ALL {
            self.push(codec.tag(), codec.predicate(), codec.encoder(), codec.decoder());
        }
        debug!(count = StandardCodec::ALL.len(), "registered standard codecs");
        Ok(self)
    }

    /// Remove `tag` from both sequences.
    ///
    /// Removes whichever side holds it; [`Error::NotFound`] if neither does.
    pub fn unregister(&mut self, tag: &str) -> Result<()> {
        let before = self.encoders.len() + self.decoders.len();
        self.encoders.retain(|e| e.tag != tag);
        self.decoders.retain(|d| d.tag != tag);
        if self.encoders.len() + self.decoders.len() == before {
            return Err(Error::NotFound(tag.to_owned()));
        }
        debug!(tag, "unregistered codec");
        Ok(())
    }

    /// Indices of `tag` in the encode and decode sequences.
    ///
    /// Only a tag present on both sides counts as registered.
    pub fn find_by_tag(&self, tag: &str) -> Option<(usize, usize)> {
        let enc = self.encoders.iter().position(|e| e.tag == tag)?;
        let dec = self.decoders.iter().position(|d| d.tag == tag)?;
        Some((enc, dec))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.find_by_tag(tag).is_some()
    }

    /// Handle for replacing any slot of the codec registered under `tag`.
    pub fn modify(&mut self, tag: &str) -> Result<CodecMut<'_>> {
        let (enc, dec) = self
            .find_by_tag(tag)
            .ok_or_else(|| Error::NotFound(tag.to_owned()))?;
        Ok(CodecMut {
            registry: self,
            enc,
            dec,
        })
    }

    pub fn replace_predicate(&mut self, tag: &str, predicate: Predicate) -> Result<&mut Self> {
        self.modify(tag)?.predicate(predicate);
        Ok(self)
    }

    pub fn replace_encoder(&mut self, tag: &str, encoder: Encoder) -> Result<&mut Self> {
        self.modify(tag)?.encoder(encoder);
        Ok(self)
    }

    pub fn replace_decoder(&mut self, tag: &str, decoder: Decoder) -> Result<&mut Self> {
        self.modify(tag)?.decoder(decoder);
        Ok(self)
    }

    /// Registered tags, in precedence order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.encoders.iter().map(|e| e.tag.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }

    /// Encode `value` and emit it as JSON text.
    pub fn serialize(&self, value: Value, indent: impl Into<Indent>) -> Result<String> {
        Pass::new(self).serialize_with(value, &indent.into())
    }

    /// Parse JSON text and resolve tagged strings.
    pub fn deserialize(&self, text: &str) -> Result<Value> {
        Pass::new(self).deserialize(text)
    }

    /// Run the encode pass over an in-memory tree, rewriting it in place.
    pub fn encode(&self, value: &mut Value) -> Result<()> {
        Pass::new(self).encode_tree(value)
    }

    /// Run the tag resolver over an in-memory tree.
    pub fn decode(&self, value: Value) -> Result<Value> {
        Pass::new(self).decode_tree(value)
    }

    fn check_new_tag(&self, tag: &str) -> Result<()> {
        if tag.is_empty() {
            return Err(Error::InvalidArgument("codec tag must not be empty".into()));
        }
        let taken = self.encoders.iter().any(|e| e.tag == tag)
            || self.decoders.iter().any(|d| d.tag == tag);
        if taken {
            return Err(Error::DuplicateTag(tag.to_owned()));
        }
        Ok(())
    }

    fn push(
        &mut self,
        tag: impl Into<String>,
        predicate: Predicate,
        encoder: Encoder,
        decoder: Decoder,
    ) {
        let tag = tag.into();
        self.encoders.push(EncodeEntry {
            tag: tag.clone(),
            predicate,
            encoder,
        });
        self.decoders.push(DecodeEntry { tag, decoder });
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("tags", &self.tags().collect::<Vec<_>>())
            .field("limits", &self.limits)
            .finish()
    }
}

/// Mutable view of one registered codec.
pub struct CodecMut<'r> {
    registry: &'r mut Registry,
    enc: usize,
    dec: usize,
}

impl CodecMut<'_> {
    pub fn tag(&self) -> &str {
        &self.registry.encoders[self.enc].tag
    }

    pub fn predicate(&mut self, predicate: Predicate) -> &mut Self {
        debug!(tag = self.tag(), "replaced codec predicate");
        self.registry.encoders[self.enc].predicate = predicate;
        self
    }

    pub fn encoder(&mut self, encoder: Encoder) -> &mut Self {
        debug!(tag = self.tag(), "replaced codec encoder");
        self.registry.encoders[self.enc].encoder = encoder;
        self
    }

    pub fn decoder(&mut self, decoder: Decoder) -> &mut Self {
        debug!(tag = self.tag(), "replaced codec decoder");
        self.registry.decoders[self.dec].decoder = decoder;
        self
    }
}
