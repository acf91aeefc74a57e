//! Value tree handled by the codec passes.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use num_bigint::BigInt;

use crate::collections::{KeyedMap, UniqueSet};
use crate::extension::{Extension, ExtensionValue};
use crate::pattern::Pattern;

/// Object members, in insertion order.
pub type Object = IndexMap<String, Value>;

/// Self-contained value tree.
///
/// The first seven variants map 1:1 onto JSON. The rest have no JSON form of
/// their own and must be turned into tagged strings by a codec before the
/// tree reaches the emitter.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    /// Object with ordered members.
    Object(Object),
    /// Arbitrary-precision integer.
    BigInt(BigInt),
    Pattern(Pattern),
    /// Instant in time, millisecond precision once encoded.
    Date(DateTime<Utc>),
    /// Insertion-ordered key→value collection.
    Map(KeyedMap),
    /// Insertion-ordered collection of unique members.
    Set(UniqueSet),
    /// Application-defined value.
    Extension(Extension),
}

/// Runtime kind of a [`Value`], used by kind-based codec predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Int,
    Float,
    String,
    Array,
    Object,
    BigInt,
    Pattern,
    Date,
    Map,
    Set,
    Extension,
}

impl Kind {
    /// Whether values of this kind have a direct JSON representation.
    pub fn is_native(self) -> bool {
        matches!(
            self,
            Kind::Null
                | Kind::Bool
                | Kind::Int
                | Kind::Float
                | Kind::String
                | Kind::Array
                | Kind::Object
        )
    }

    /// Whether values of this kind hold child values.
    pub fn is_container(self) -> bool {
        matches!(self, Kind::Array | Kind::Object | Kind::Map | Kind::Set)
    }

    pub fn name(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
            Kind::BigInt => "bigint",
            Kind::Pattern => "pattern",
            Kind::Date => "date",
            Kind::Map => "map",
            Kind::Set => "set",
            Kind::Extension => "extension",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
            Value::BigInt(_) => Kind::BigInt,
            Value::Pattern(_) => Kind::Pattern,
            Value::Date(_) => Kind::Date,
            Value::Map(_) => Kind::Map,
            Value::Set(_) => Kind::Set,
            Value::Extension(_) => Kind::Extension,
        }
    }

    /// Build an object from `(key, value)` pairs, keeping their order.
    ///
    /// # Examples
    /// ```
    /// use tagjson_core::Value;
    /// let user = Value::object([("name", Value::from("ada")), ("age", Value::from(36))]);
    /// assert_eq!(user.get("age"), Some(&Value::Int(36)));
    /// ```
    pub fn object<K, I>(members: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(members.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Wrap an application value.
    pub fn extension<T: ExtensionValue>(value: T) -> Self {
        Value::Extension(Extension::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(members) => Some(members),
            _ => None,
        }
    }

    /// Member lookup on objects. `None` for every other kind.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object()?.get(key)
    }

    /// Downcast an [`Value::Extension`] to its concrete type.
    pub fn downcast_ref<T: ExtensionValue>(&self) -> Option<&T> {
        match self {
            Value::Extension(ext) => ext.downcast_ref(),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Object> for Value {
    fn from(members: Object) -> Self {
        Value::Object(members)
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Value::BigInt(n)
    }
}

impl From<Pattern> for Value {
    fn from(p: Pattern) -> Self {
        Value::Pattern(p)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(at: DateTime<Utc>) -> Self {
        Value::Date(at)
    }
}

impl From<KeyedMap> for Value {
    fn from(map: KeyedMap) -> Self {
        Value::Map(map)
    }
}

impl From<UniqueSet> for Value {
    fn from(set: UniqueSet) -> Self {
        Value::Set(set)
    }
}

impl From<Extension> for Value {
    fn from(ext: Extension) -> Self {
        Value::Extension(ext)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}
