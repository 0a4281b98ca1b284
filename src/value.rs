//! The in-memory document tree.
//!
//! This module provides [`Value`], the closed tagged union every other part of
//! the engine operates on, together with [`Number`] and the ordered [`Mapping`]
//! type. Consumers match on `Value` exhaustively; there is no implicit coercion
//! between variants.

use std::fmt::{self, Display};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::path::{Path, PathSegment};

/// An ordered mapping with unique string keys.
///
/// Insertion order is the document order. Equality is order-insensitive, so two
/// mappings holding the same entries compare equal.
pub type Mapping = IndexMap<String, Value>;

/// A numeric scalar.
///
/// Integers and floats are kept apart so that `1` and `1.0` survive a
/// parse/serialize round trip with their original type. Equality follows the
/// same split, and a NaN equals another NaN so a parsed `.nan` compares equal
/// to itself.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    /// A signed integer that fits in 64 bits.
    Int(i64),
    /// A double precision float, including `.inf` and `.nan`.
    Float(f64),
}

impl Number {
    /// Returns the value as an `f64`.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    /// Returns true if the number has no fractional part.
    ///
    /// Floats such as `2.0` count as integral.
    pub fn is_integral(&self) -> bool {
        match *self {
            Number::Int(_) => true,
            Number::Float(f) => f.is_finite() && f.fract() == 0.0,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (Number::Float(a), Number::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            _ => false,
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(x) if x.is_nan() => write!(f, ".nan"),
            Number::Float(x) if x.is_infinite() => {
                if x > 0.0 {
                    write!(f, ".inf")
                } else {
                    write!(f, "-.inf")
                }
            }
            // `{:?}` always keeps a fractional part or exponent, so the text
            // re-infers as a float.
            Number::Float(x) => write!(f, "{:?}", x),
        }
    }
}

/// A node in a parsed document.
///
/// # Example
///
/// ```rust
/// use docweave::{Mapping, Value};
///
/// let mut mapping = Mapping::new();
/// mapping.insert("title".to_string(), Value::from("Hello"));
/// let value = Value::Mapping(mapping);
///
/// assert_eq!(value.get("title").and_then(Value::as_str), Some("Hello"));
/// assert_eq!(value.type_name(), "object");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// The absence of a value.
    #[default]
    Null,
    /// A boolean scalar.
    Bool(bool),
    /// A numeric scalar.
    Number(Number),
    /// A string scalar.
    String(String),
    /// An ordered list of values.
    Sequence(Vec<Value>),
    /// An ordered mapping with unique keys.
    Mapping(Mapping),
}

impl Value {
    /// Returns the schema type name of this value.
    ///
    /// Integers report `"integer"` and floats `"number"`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(Number::Int(_)) => "integer",
            Value::Number(Number::Float(_)) => "number",
            Value::String(_) => "string",
            Value::Sequence(_) => "array",
            Value::Mapping(_) => "object",
        }
    }

    /// Returns true for `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true for mappings and sequences.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Mapping(_) | Value::Sequence(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(Number::Int(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up a key when this value is a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Resolves a structural path against this value.
    ///
    /// Index segments address sequences by position and mappings by the
    /// decimal key; key segments that parse as an index address sequences.
    ///
    /// # Example
    ///
    /// ```rust
    /// use docweave::{parse, Path};
    ///
    /// let doc = parse("items:\n  - a\n  - b\n").unwrap();
    /// let path = Path::root().push_field("items").push_index(1);
    /// assert_eq!(doc.pointer(&path).and_then(|v| v.as_str()), Some("b"));
    /// ```
    pub fn pointer(&self, path: &Path) -> Option<&Value> {
        path.segments()
            .try_fold(self, |node, segment| node.child(segment))
    }

    /// Mutable counterpart of [`Value::pointer`].
    pub fn pointer_mut(&mut self, path: &Path) -> Option<&mut Value> {
        let mut node = self;
        for segment in path.segments() {
            node = node.child_mut(segment)?;
        }
        Some(node)
    }

    /// Returns the direct child addressed by a single segment.
    pub fn child(&self, segment: &PathSegment) -> Option<&Value> {
        match (self, segment) {
            (Value::Mapping(map), segment) => map.get(&*segment.as_key()),
            (Value::Sequence(items), segment) => segment.as_index().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    pub(crate) fn child_mut(&mut self, segment: &PathSegment) -> Option<&mut Value> {
        match self {
            Value::Mapping(map) => map.get_mut(&*segment.as_key()),
            Value::Sequence(items) => segment.as_index().and_then(move |i| items.get_mut(i)),
            _ => None,
        }
    }

    /// Renders a scalar as plain display text.
    ///
    /// Containers render as `None`; callers that need a textual form for them
    /// should serialize instead.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Value::Null => Some(String::new()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::Sequence(_) | Value::Mapping(_) => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Number(Number::Int(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Number(Number::Float(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Mapping(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Mapping(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Value>();
    assert_sync::<Value>();
};
