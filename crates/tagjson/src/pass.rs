//! Encode pass and tag resolver.
//!
//! A [`Pass`] borrows a registry for the duration of one top-level
//! `serialize` or `deserialize` call. Composite codecs receive the pass and
//! re-enter it for their nested content, which is how the recursion guard
//! sees every level.

use tagjson_core::json;
use tagjson_core::{Indent, Key, Value};
use tracing::trace;

use crate::registry::Registry;
use crate::{Error, Result};

/// Limits for codec passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting of serialize/deserialize entries (default: 64).
    pub(crate) recursion_limit: u32,
    /// Maximum array/object nesting within one text (default: 128).
    pub(crate) depth_limit: usize,
    /// Maximum length in bytes of any text a serialize call produces,
    /// nested payloads included (default: 16 MiB).
    pub(crate) output_limit: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            recursion_limit: 64,
            depth_limit: 128,
            output_limit: 16 << 20,
        }
    }
}

impl Limits {
    /// Create new limits with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the re-entry limit. Counts the outermost call.
    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// Set the structural nesting limit.
    pub fn depth_limit(mut self, limit: usize) -> Self {
        self.depth_limit = limit;
        self
    }

    /// Set the output size limit.
    ///
    /// Collection payloads are escaped again at every level they are nested
    /// in, so text roughly doubles per nesting level.
    pub fn output_limit(mut self, bytes: usize) -> Self {
        self.output_limit = bytes;
        self
    }

    pub fn get_recursion_limit(&self) -> u32 {
        self.recursion_limit
    }
    pub fn get_depth_limit(&self) -> usize {
        self.depth_limit
    }
    pub fn get_output_limit(&self) -> usize {
        self.output_limit
    }
}

/// One traversal through a registry.
pub struct Pass<'r> {
    registry: &'r Registry,
    depth: u32,
}

impl<'r> Pass<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry, depth: 0 }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Current serialize/deserialize nesting (1 inside the outermost call).
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Serialize `value` compactly through the same registry.
    ///
    /// Composite codecs call this on their contents so nested values are
    /// tagged too.
    pub fn serialize(&mut self, value: Value) -> Result<String> {
        self.serialize_with(value, &Indent::Compact)
    }

    pub(crate) fn serialize_with(&mut self, value: Value, indent: &Indent) -> Result<String> {
        let limits = self.registry.limits();
        let text = self.enter(|cx| {
            json::stringify(value, indent, limits.depth_limit, |key, node| {
                cx.encode_node(key, node)
            })
        })?;
        if text.len() > limits.output_limit {
            return Err(Error::OutputLimitExceeded(limits.output_limit));
        }
        Ok(text)
    }

    /// Parse `text` and resolve tagged strings through the same registry.
    pub fn deserialize(&mut self, text: &str) -> Result<Value> {
        let depth_limit = self.registry.limits().depth_limit;
        self.enter(|cx| {
            json::parse(text, depth_limit, |key, scalar| cx.resolve_scalar(key, scalar))
        })
    }

    pub(crate) fn encode_tree(&mut self, root: &mut Value) -> Result<()> {
        self.enter(|cx| cx.encode_walk(Key::Root, root))
    }

    pub(crate) fn decode_tree(&mut self, root: Value) -> Result<Value> {
        self.enter(|cx| cx.decode_walk(Key::Root, root))
    }

    fn enter<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let limit = self.registry.limits().recursion_limit;
        if self.depth >= limit {
            return Err(Error::RecursionLimitExceeded(limit));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Replace `node` with a tagged string if an encode entry claims it.
    ///
    /// Entries are tried in registration order; the first whose predicate
    /// holds and whose encoder yields a payload wins.
    fn encode_node(&mut self, key: Key<'_>, node: &mut Value) -> Result<()> {
        let registry = self.registry;
        for entry in &registry.encoders {
            if !entry.predicate.test(node) {
                continue;
            }
            if let Some(payload) = entry.encoder.encode(node, self)? {
                trace!(tag = %entry.tag, %key, "encoded");
                *node = Value::String(format!("{}{payload}", entry.tag));
                return Ok(());
            }
        }
        Ok(())
    }

    /// Resolve a tagged string scalar. Everything else passes through.
    fn resolve_scalar(&mut self, key: Key<'_>, scalar: Value) -> Result<Value> {
        let Value::String(text) = &scalar else {
            return Ok(scalar);
        };
        let registry = self.registry;
        for entry in &registry.decoders {
            let Some(payload) = text.strip_prefix(entry.tag.as_str()) else {
                continue;
            };
            match entry.decoder.decode(payload, self)? {
                Some(value) => {
                    trace!(tag = %entry.tag, %key, "decoded");
                    return Ok(value);
                }
                None => trace!(tag = %entry.tag, %key, "decoder declined"),
            }
        }
        Ok(scalar)
    }

    fn encode_walk(&mut self, key: Key<'_>, node: &mut Value) -> Result<()> {
        self.encode_node(key, node)?;
        match node {
            Value::Array(items) => {
                for (i, item) in items.iter_mut().enumerate() {
                    self.encode_walk(Key::Index(i), item)?;
                }
            }
            Value::Object(members) => {
                for (name, member) in members.iter_mut() {
                    self.encode_walk(Key::Field(name), member)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn decode_walk(&mut self, key: Key<'_>, node: Value) -> Result<Value> {
        match node {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| self.decode_walk(Key::Index(i), item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Value::Object(members) => members
                .into_iter()
                .map(|(name, member)| {
                    let member = self.decode_walk(Key::Field(&name), member)?;
                    Ok((name, member))
                })
                .collect::<Result<_>>()
                .map(Value::Object),
            scalar => self.resolve_scalar(key, scalar),
        }
    }
}
