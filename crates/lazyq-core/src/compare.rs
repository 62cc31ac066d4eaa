//! The equality boundary used by `contains` and `sequence_equal`.
//!
//! Comparers receive both sides as `Entry` pairs so an implementation may
//! take keys into account; the default one looks at values only.

use serde::Serialize;

use crate::types::{Key, Value};

/// An immutable `(key, value)` pair with structural equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Entry<V = Value> {
    pub key: Key,
    pub value: V,
}

impl<V> Entry<V> {
    pub fn new(key: impl Into<Key>, value: V) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Two-argument equality capability.
pub trait Comparer: Send + Sync {
    fn equals(&self, x: &Entry, y: &Entry) -> bool;
}

/// Compares values with `Value::loose_eq`, ignoring keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultComparer;

impl Comparer for DefaultComparer {
    fn equals(&self, x: &Entry, y: &Entry) -> bool {
        x.value.loose_eq(&y.value)
    }
}

impl<F> Comparer for F
where
    F: Fn(&Entry, &Entry) -> bool + Send + Sync,
{
    fn equals(&self, x: &Entry, y: &Entry) -> bool {
        self(x, y)
    }
}
