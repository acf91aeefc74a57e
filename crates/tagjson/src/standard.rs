//! The standard codec set.
//!
//! | Tag    | Codec             | Payload                                   |
//! |--------|-------------------|-------------------------------------------|
//! | `(00)` | exact-number      | base-36 digits of an `Int`                |
//! | `(01)` | big-integer       | decimal digits                            |
//! | `(02)` | pattern/flags     | `source` `___flags___` `flags`            |
//! | `(03)` | timestamp         | base-36 epoch milliseconds                |
//! | `(04)` | keyed-collection  | nested JSON of `[[key, value], ...]`      |
//! | `(05)` | unique-collection | nested JSON of `[member, ...]`            |
//!
//! Malformed payloads decline rather than fail, so the string is kept as is.
//! Numeric payloads must be in the exact form the encoder writes.

use tagjson_core::{BigInt, DateTime, FormatError, KeyedMap, Kind, Pattern, UniqueSet, Utc, Value};

use crate::codec::{Decoder, Encoder, Predicate};
use crate::pass::Pass;
use crate::{Error, Result};

pub const EXACT_NUMBER: &str = "(00)";
pub const BIG_INTEGER: &str = "(01)";
pub const PATTERN: &str = "(02)";
pub const TIMESTAMP: &str = "(03)";
pub const KEYED_COLLECTION: &str = "(04)";
pub const UNIQUE_COLLECTION: &str = "(05)";

/// Separates pattern source from flags. Split on the last occurrence, since
/// flags never contain it.
pub const FLAGS_SEPARATOR: &str = "___flags___";

const RADIX: u32 = 36;

/// One of the six built-in codecs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StandardCodec {
    ExactNumber,
    BigInteger,
    Pattern,
    Timestamp,
    KeyedCollection,
    UniqueCollection,
}

impl StandardCodec {
    /// All standard codecs, in registration order.
    pub const ALL: [StandardCodec; 6] = [
        StandardCodec::ExactNumber,
        StandardCodec::BigInteger,
        StandardCodec::Pattern,
        StandardCodec::Timestamp,
        StandardCodec::KeyedCollection,
        StandardCodec::UniqueCollection,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            StandardCodec::ExactNumber => EXACT_NUMBER,
            StandardCodec::BigInteger => BIG_INTEGER,
            StandardCodec::Pattern => PATTERN,
            StandardCodec::Timestamp => TIMESTAMP,
            StandardCodec::KeyedCollection => KEYED_COLLECTION,
            StandardCodec::UniqueCollection => UNIQUE_COLLECTION,
        }
    }

    /// Kind of value this codec claims.
    pub fn kind(self) -> Kind {
        match self {
            StandardCodec::ExactNumber => Kind::Int,
            StandardCodec::BigInteger => Kind::BigInt,
            StandardCodec::Pattern => Kind::Pattern,
            StandardCodec::Timestamp => Kind::Date,
            StandardCodec::KeyedCollection => Kind::Map,
            StandardCodec::UniqueCollection => Kind::Set,
        }
    }

    pub fn predicate(self) -> Predicate {
        Predicate::Kind(self.kind())
    }

    pub fn encoder(self) -> Encoder {
        Encoder::Standard(self)
    }

    pub fn decoder(self) -> Decoder {
        Decoder::Standard(self)
    }

    pub fn encode(self, value: &Value, cx: &mut Pass<'_>) -> Result<Option<String>> {
        let payload = match (self, value) {
            (StandardCodec::ExactNumber, Value::Int(n)) => to_base36(*n),
            (StandardCodec::BigInteger, Value::BigInt(n)) => n.to_string(),
            (StandardCodec::Pattern, Value::Pattern(p)) => {
                format!("{}{FLAGS_SEPARATOR}{}", p.source(), p.flags())
            }
            (StandardCodec::Timestamp, Value::Date(at)) => to_base36(at.timestamp_millis()),
            (StandardCodec::KeyedCollection, Value::Map(map)) => {
                let pairs = map
                    .iter()
                    .map(|(k, v)| Value::Array(vec![k.clone(), v.clone()]))
                    .collect();
                cx.serialize(Value::Array(pairs))?
            }
            (StandardCodec::UniqueCollection, Value::Set(set)) => {
                cx.serialize(Value::Array(set.iter().cloned().collect()))?
            }
            // A replaced predicate handed us a kind this codec cannot write.
            _ => return Ok(None),
        };
        Ok(Some(payload))
    }

    pub fn decode(self, payload: &str, cx: &mut Pass<'_>) -> Result<Option<Value>> {
        let value = match self {
            StandardCodec::ExactNumber => from_base36(payload).map(Value::Int),
            StandardCodec::BigInteger => payload
                .parse::<BigInt>()
                .ok()
                .filter(|n| n.to_string() == payload)
                .map(Value::BigInt),
            StandardCodec::Pattern => payload
                .rsplit_once(FLAGS_SEPARATOR)
                .and_then(|(source, flags)| Pattern::new(source, flags).ok())
                .map(Value::Pattern),
            StandardCodec::Timestamp => from_base36(payload)
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .map(Value::Date),
            StandardCodec::KeyedCollection => nested_items(payload, cx)?.and_then(|items| {
                items
                    .into_iter()
                    .map(into_pair)
                    .collect::<Option<KeyedMap>>()
                    .map(Value::Map)
            }),
            StandardCodec::UniqueCollection => nested_items(payload, cx)?
                .map(|items| Value::Set(items.into_iter().collect::<UniqueSet>())),
        };
        Ok(value)
    }
}

/// Deserialize a nested array payload. Text that is not a JSON array
/// declines; limit violations still propagate.
fn nested_items(payload: &str, cx: &mut Pass<'_>) -> Result<Option<Vec<Value>>> {
    match cx.deserialize(payload) {
        Ok(Value::Array(items)) => Ok(Some(items)),
        Ok(_) | Err(Error::Format(FormatError::Json(_))) => Ok(None),
        Err(e) => Err(e),
    }
}

fn into_pair(item: Value) -> Option<(Value, Value)> {
    let Value::Array(pair) = item else {
        return None;
    };
    let [key, value]: [Value; 2] = pair.try_into().ok()?;
    Some((key, value))
}

fn to_base36(n: i64) -> String {
    BigInt::from(n).to_str_radix(RADIX)
}

/// Only the exact text [`to_base36`] emits is accepted: no sign other than a
/// leading `-`, no uppercase, no leading zeros.
fn from_base36(text: &str) -> Option<i64> {
    i64::from_str_radix(text, RADIX)
        .ok()
        .filter(|&n| to_base36(n) == text)
}
