//! JSON bridge between [`Value`] trees and text.
//!
//! `serde_json` does the actual formatting and parsing. This module walks the
//! tree on either side of it and hands every node to a caller-supplied hook:
//! top-down before emitting ([`stringify`]), bottom-up per scalar after
//! parsing ([`parse`]).

use std::borrow::Cow;
use std::cell::Cell;

use serde::Serialize;
use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::ser::PrettyFormatter;

use crate::value::{Kind, Object, Value};

/// Longest indent unit honored by [`Indent`].
pub const MAX_INDENT: usize = 10;

/// Error while moving a value tree through JSON.
#[derive(Debug)]
pub enum FormatError {
    Json(serde_json::Error),
    /// A kind with no JSON form reached the emitter untagged.
    Unrepresentable(Kind),
    /// NaN and infinities have no JSON form.
    NonFiniteNumber(f64),
    /// Arrays/objects nested deeper than the configured limit.
    DepthExceeded(usize),
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::Unrepresentable(kind) => {
                write!(f, "no codec produced a JSON form for a {kind} value")
            }
            Self::NonFiniteNumber(n) => write!(f, "non-finite number {n} has no JSON form"),
            Self::DepthExceeded(limit) => write!(f, "nesting deeper than {limit} levels"),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

/// Position of a node within its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key<'a> {
    /// The top-level value.
    Root,
    Field(&'a str),
    Index(usize),
}

impl std::fmt::Display for Key<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Root => Ok(()),
            Key::Field(name) => f.write_str(name),
            Key::Index(i) => write!(f, "{i}"),
        }
    }
}

/// Pretty-printing unit. Has no effect on what is encoded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Indent {
    #[default]
    Compact,
    /// Indent with this many spaces (at most [`MAX_INDENT`]).
    Spaces(usize),
    /// Indent with this text (first [`MAX_INDENT`] chars).
    Text(String),
}

impl Indent {
    /// Indent unit, or `None` for compact output.
    pub fn unit(&self) -> Option<Cow<'_, str>> {
        let unit: Cow<'_, str> = match self {
            Indent::Compact => return None,
            Indent::Spaces(n) => Cow::Owned(" ".repeat((*n).min(MAX_INDENT))),
            Indent::Text(s) => match s.char_indices().nth(MAX_INDENT) {
                Some((end, _)) => Cow::Borrowed(&s[..end]),
                None => Cow::Borrowed(s),
            },
        };
        (!unit.is_empty()).then_some(unit)
    }
}

impl From<()> for Indent {
    fn from(_: ()) -> Self {
        Indent::Compact
    }
}

impl From<usize> for Indent {
    fn from(n: usize) -> Self {
        Indent::Spaces(n)
    }
}

impl From<&str> for Indent {
    fn from(s: &str) -> Self {
        Indent::Text(s.to_owned())
    }
}

impl From<String> for Indent {
    fn from(s: String) -> Self {
        Indent::Text(s)
    }
}

/// Emit `value` as JSON text.
///
/// `replacer` sees every node top-down (root first, then object members and
/// array elements) and may rewrite it in place before it is emitted. Children
/// of the rewritten node are visited next.
pub fn stringify<E, F>(
    value: Value,
    indent: &Indent,
    depth_limit: usize,
    mut replacer: F,
) -> Result<String, E>
where
    F: FnMut(Key<'_>, &mut Value) -> Result<(), E>,
    E: From<FormatError>,
{
    let json = lower(Key::Root, value, 0, depth_limit, &mut replacer)?;
    Ok(write(&json, indent)?)
}

fn lower<E, F>(
    key: Key<'_>,
    mut value: Value,
    depth: usize,
    depth_limit: usize,
    replacer: &mut F,
) -> Result<serde_json::Value, E>
where
    F: FnMut(Key<'_>, &mut Value) -> Result<(), E>,
    E: From<FormatError>,
{
    replacer(key, &mut value)?;

    let json = match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(b),
        Value::Int(n) => serde_json::Value::from(n),
        Value::Float(n) => serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .ok_or(FormatError::NonFiniteNumber(n))?,
        Value::String(s) => serde_json::Value::String(s),
        Value::Array(items) => {
            ensure_depth(depth, depth_limit)?;
            let items = items
                .into_iter()
                .enumerate()
                .map(|(i, item)| {
                    lower(Key::Index(i), item, depth + 1, depth_limit, &mut *replacer)
                })
                .collect::<Result<Vec<_>, E>>()?;
            serde_json::Value::Array(items)
        }
        Value::Object(members) => {
            ensure_depth(depth, depth_limit)?;
            let mut out = serde_json::Map::with_capacity(members.len());
            for (name, member) in members {
                let member =
                    lower(Key::Field(&name), member, depth + 1, depth_limit, &mut *replacer)?;
                out.insert(name, member);
            }
            serde_json::Value::Object(out)
        }
        other => return Err(FormatError::Unrepresentable(other.kind()).into()),
    };
    Ok(json)
}

fn write(json: &serde_json::Value, indent: &Indent) -> Result<String, FormatError> {
    let Some(unit) = indent.unit() else {
        return serde_json::to_string(json).map_err(FormatError::Json);
    };

    let mut buf = Vec::with_capacity(128);
    let formatter = PrettyFormatter::with_indent(unit.as_bytes());
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    json.serialize(&mut ser).map_err(FormatError::Json)?;
    Ok(String::from_utf8(buf).expect("serde_json emits UTF-8"))
}

/// Parse JSON text into a value tree.
///
/// `reviver` sees every scalar (null, bool, number, string) bottom-up and its
/// return value takes the scalar's place. Arrays and objects are rebuilt from
/// their revived children.
///
/// `depth_limit` is the only nesting bound: `serde_json`'s built-in limit is
/// disabled so text produced by [`stringify`] under the same limit always
/// parses.
pub fn parse<E, F>(text: &str, depth_limit: usize, mut reviver: F) -> Result<Value, E>
where
    F: FnMut(Key<'_>, Value) -> Result<Value, E>,
    E: From<FormatError>,
{
    let exceeded = Cell::new(false);
    let mut deserializer = serde_json::Deserializer::from_str(text);
    deserializer.disable_recursion_limit();

    let bounded = Bounded {
        depth: 0,
        limit: depth_limit,
        exceeded: &exceeded,
    };
    let json = bounded
        .deserialize(&mut deserializer)
        .and_then(|json| deserializer.end().map(|()| json))
        .map_err(|e| {
            if exceeded.get() {
                FormatError::DepthExceeded(depth_limit)
            } else {
                FormatError::Json(e)
            }
        })?;
    raise(Key::Root, json, &mut reviver)
}

/// Deserializes a `serde_json::Value`, failing once arrays/objects nest
/// `limit` deep.
#[derive(Clone, Copy)]
struct Bounded<'a> {
    depth: usize,
    limit: usize,
    exceeded: &'a Cell<bool>,
}

impl Bounded<'_> {
    fn enter<E: de::Error>(self) -> Result<Self, E> {
        if self.depth >= self.limit {
            self.exceeded.set(true);
            return Err(E::custom(FormatError::DepthExceeded(self.limit)));
        }
        Ok(Self {
            depth: self.depth + 1,
            ..self
        })
    }
}

impl<'de> DeserializeSeed<'de> for Bounded<'_> {
    type Value = serde_json::Value;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for Bounded<'_> {
    type Value = serde_json::Value;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(serde_json::Value::Null)
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<Self::Value, E> {
        Ok(serde_json::Value::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, n: i64) -> Result<Self::Value, E> {
        Ok(serde_json::Value::from(n))
    }

    fn visit_u64<E: de::Error>(self, n: u64) -> Result<Self::Value, E> {
        Ok(serde_json::Value::from(n))
    }

    fn visit_f64<E: de::Error>(self, n: f64) -> Result<Self::Value, E> {
        let number = serde_json::Number::from_f64(n);
        Ok(number.map_or(serde_json::Value::Null, serde_json::Value::Number))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Self::Value, E> {
        Ok(serde_json::Value::String(s.to_owned()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<Self::Value, E> {
        Ok(serde_json::Value::String(s))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let inner = self.enter::<A::Error>()?;
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element_seed(inner)? {
            items.push(item);
        }
        Ok(serde_json::Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let inner = self.enter::<A::Error>()?;
        let mut out = serde_json::Map::new();
        while let Some(name) = map.next_key::<String>()? {
            let member = map.next_value_seed(inner)?;
            out.insert(name, member);
        }
        Ok(serde_json::Value::Object(out))
    }
}

fn raise<E, F>(key: Key<'_>, json: serde_json::Value, reviver: &mut F) -> Result<Value, E>
where
    F: FnMut(Key<'_>, Value) -> Result<Value, E>,
    E: From<FormatError>,
{
    let scalar = match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => number(&n),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => {
            let items = items
                .into_iter()
                .enumerate()
                .map(|(i, item)| raise(Key::Index(i), item, &mut *reviver))
                .collect::<Result<Vec<_>, E>>()?;
            return Ok(Value::Array(items));
        }
        serde_json::Value::Object(members) => {
            let mut out = Object::with_capacity(members.len());
            for (name, member) in members {
                let member = raise(Key::Field(&name), member, &mut *reviver)?;
                out.insert(name, member);
            }
            return Ok(Value::Object(out));
        }
    };
    reviver(key, scalar)
}

/// Integers that fit `i64` stay exact; everything else becomes a float.
fn number(n: &serde_json::Number) -> Value {
    match n.as_i64() {
        Some(i) => Value::Int(i),
        None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
    }
}

fn ensure_depth(depth: usize, depth_limit: usize) -> Result<(), FormatError> {
    if depth >= depth_limit {
        return Err(FormatError::DepthExceeded(depth_limit));
    }
    Ok(())
}
