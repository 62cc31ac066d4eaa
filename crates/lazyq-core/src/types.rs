//! Keys and dynamically-typed values of the keyed collections lazyq queries.
//!
//! A source is an insertion-ordered map from `Key` to `Value`. Values are
//! loosely typed on purpose: selectors may turn integers into strings, group
//! elements into lists, or join two collections into maps.

use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::schema::ValueKind;

/// The collection a query runs over. Insertion order is significant.
pub type Source = IndexMap<Key, Value>;

/// Build a source keyed `0..n` from a list of values.
pub fn indexed<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Source {
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| (Key::from(i), v.into()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum Key {
    Int(i64),
    Str(String),
}

impl Key {
    /// Normalize a textual key: canonical decimal integers become `Int`.
    ///
    /// `"8"` and `"-3"` are integers, `"08"`, `"+1"`, `"-0"` and `"1.5"` stay strings.
    pub fn from_text(s: &str) -> Key {
        match canonical_int(s) {
            Some(i) => Key::Int(i),
            None => Key::Str(s.to_string()),
        }
    }

    /// Coerce a value returned by a key selector into a key.
    pub fn try_from_value(value: &Value) -> Result<Key> {
        match value {
            Value::Null => Ok(Key::Str(String::new())),
            Value::Bool(b) => Ok(Key::Int(i64::from(*b))),
            Value::Int(i) => Ok(Key::Int(*i)),
            Value::Float(f) => Ok(Key::Int(if f.is_finite() { f.trunc() as i64 } else { 0 })),
            Value::Str(s) => Ok(Key::from_text(s)),
            other => Err(Error::InvalidKey(format!(
                "a {} cannot be used as a key",
                other.kind()
            ))),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Key::Int(i) => Some(*i),
            Key::Str(_) => None,
        }
    }

    /// The key as a value (what selectors receive as their key argument).
    pub fn to_value(&self) -> Value {
        match self {
            Key::Int(i) => Value::Int(*i),
            Key::Str(s) => Value::Str(s.clone()),
        }
    }
}

fn canonical_int(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    if s == "-0" {
        return None;
    }
    s.parse::<i64>().ok()
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{i}"),
            Key::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for Key {
    fn from(v: i64) -> Self {
        Key::Int(v)
    }
}

impl From<i32> for Key {
    fn from(v: i32) -> Self {
        Key::Int(i64::from(v))
    }
}

impl From<usize> for Key {
    fn from(v: usize) -> Self {
        Key::Int(v as i64)
    }
}

impl From<&str> for Key {
    fn from(v: &str) -> Self {
        Key::from_text(v)
    }
}

impl From<String> for Key {
    fn from(v: String) -> Self {
        Key::from_text(&v)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(IndexMap<Key, Value>),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::List(_) => ValueKind::List,
            Value::Map(_) => ValueKind::Map,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::List(_) | Value::Map(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<Key, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Field access on map values; `None` for anything else.
    pub fn get(&self, key: impl Into<Key>) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(&key.into()))
    }

    /// Value equality where integers and floats compare numerically.
    ///
    /// Strict equality (same variant, same content) is `PartialEq`.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                (*a as f64) == *b
            }
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y))
            }
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, x)| b.get(k).map(|y| x.loose_eq(y)).unwrap_or(false))
            }
            _ => self == other,
        }
    }

    /// Total order over scalar values used for sorting; `None` if either side
    /// is a list or a map.
    ///
    /// Kinds rank `null < bool < numbers < strings`; numbers compare
    /// numerically across `Int`/`Float`, NaN sorting after every other number.
    pub fn compare_scalar(&self, other: &Value) -> Option<Ordering> {
        if !self.is_scalar() || !other.is_scalar() {
            return None;
        }
        let ord = match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (a, b) if a.is_numeric() && b.is_numeric() => {
                let (x, y) = (a.as_f64().unwrap_or(f64::NAN), b.as_f64().unwrap_or(f64::NAN));
                x.partial_cmp(&y)
                    .unwrap_or_else(|| x.is_nan().cmp(&y.is_nan()))
            }
            (a, b) => scalar_rank(a).cmp(&scalar_rank(b)),
        };
        Some(ord)
    }

    /// Convert to a `serde_json::Value`. Non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as J;
        match self {
            Value::Null => J::Null,
            Value::Bool(b) => J::Bool(*b),
            Value::Int(i) => J::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(J::Number)
                .unwrap_or(J::Null),
            Value::Str(s) => J::String(s.clone()),
            Value::List(items) => J::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(m) => J::Object(
                m.iter()
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

fn scalar_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Int(_) | Value::Float(_) => 2,
        Value::Str(_) => 3,
        Value::List(_) | Value::Map(_) => 4,
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value as J;
        match v {
            J::Null => Value::Null,
            J::Bool(b) => Value::Bool(b),
            J::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            J::String(s) => Value::Str(s),
            J::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            J::Object(fields) => Value::Map(
                fields
                    .into_iter()
                    .map(|(k, v)| (Key::from_text(&k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Key> for Value {
    fn from(k: Key) -> Self {
        k.to_value()
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<Key, Value>> for Value {
    fn from(m: IndexMap<Key, Value>) -> Self {
        Value::Map(m)
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textual_keys_normalize_canonical_integers_only() {
        assert_eq!(Key::from_text("8"), Key::Int(8));
        assert_eq!(Key::from_text("-3"), Key::Int(-3));
        assert_eq!(Key::from_text("0"), Key::Int(0));
        assert_eq!(Key::from_text("08"), Key::Str("08".into()));
        assert_eq!(Key::from_text("-0"), Key::Str("-0".into()));
        assert_eq!(Key::from_text("1.5"), Key::Str("1.5".into()));
        assert_eq!(Key::from_text("name"), Key::Str("name".into()));
    }

    #[test]
    fn selector_results_coerce_to_keys() {
        assert_eq!(Key::try_from_value(&Value::Bool(true)).unwrap(), Key::Int(1));
        assert_eq!(Key::try_from_value(&Value::Float(2.9)).unwrap(), Key::Int(2));
        assert_eq!(
            Key::try_from_value(&Value::Null).unwrap(),
            Key::Str(String::new())
        );
        let err = Key::try_from_value(&Value::List(vec![])).unwrap_err();
        assert!(matches!(err, Error::InvalidKey(_)));
    }

    #[test]
    fn loose_equality_crosses_numeric_kinds() {
        assert!(Value::Int(1).loose_eq(&Value::Float(1.0)));
        assert_ne!(Value::Int(1), Value::Float(1.0));
        assert!(!Value::Int(1).loose_eq(&Value::Str("1".into())));
        assert!(Value::from(vec![1, 2]).loose_eq(&Value::List(vec![
            Value::Float(1.0),
            Value::Int(2)
        ])));
    }

    #[test]
    fn scalar_ordering_ranks_kinds() {
        assert_eq!(
            Value::Int(2).compare_scalar(&Value::Float(1.5)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            Value::Null.compare_scalar(&Value::Str("a".into())),
            Some(Ordering::Less)
        );
        assert_eq!(Value::List(vec![]).compare_scalar(&Value::Int(1)), None);
    }

    #[test]
    fn indexed_sources_use_positional_keys() {
        let source = indexed(["a", "b"]);
        assert_eq!(source.get_index(1), Some((&Key::Int(1), &Value::from("b"))));
    }

    #[test]
    fn json_conversion_normalizes_object_keys() {
        let json = serde_json::json!({"1": "a", "x": [1, 2.5, null]});
        let value = Value::from(json.clone());
        let map = value.as_map().unwrap();
        assert_eq!(map.get(&Key::Int(1)), Some(&Value::Str("a".into())));
        assert_eq!(value.to_json(), json);
    }
}
