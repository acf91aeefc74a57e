#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for tagjson.
//!
//! Two layers:
//! - **Value layer**: [`Value`] trees, including kinds JSON cannot express
//!   (big integers, patterns, timestamps, keyed and unique collections,
//!   application extensions)
//! - **Bridge layer**: [`json`], which moves `Value` trees in and out of JSON
//!   text through `serde_json`, calling a hook on every node

mod collections;
mod extension;
pub mod json;
pub mod pattern;
mod value;

#[cfg(test)]
mod json_tests;

pub use collections::{KeyedMap, UniqueSet};
pub use extension::{Extension, ExtensionValue};
pub use json::{FormatError, Indent, Key};
pub use pattern::{Pattern, PatternError};
pub use value::{Kind, Object, Value};

pub use chrono::{DateTime, Utc};
pub use num_bigint::BigInt;
