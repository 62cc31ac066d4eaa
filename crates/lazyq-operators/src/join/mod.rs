//! Join steps: correlate each outer element with a captured inner collection.
//!
//! Both kinds scan the whole inner collection per outer element (nested loop);
//! inner collections are small, in-memory, and shared behind an `Arc`.

pub mod group;

use std::sync::Arc;

use lazyq_core::{Result, Source, Value};

use crate::context::PassContext;
use crate::outcome::{KeyMode, Outcome};
use crate::traits::{Operator, PairSelector, Selector};

pub use group::GroupJoin;

/// Key equality used to correlate outer and inner elements.
pub(crate) fn keys_match(outer: &Value, inner: &Value, loose: bool) -> bool {
    if loose {
        outer.loose_eq(inner)
    } else {
        outer == inner
    }
}

/// Inner join: one produced entry per matching inner element.
#[derive(Debug, Clone)]
pub struct Join {
    pub inner: Arc<Source>,
    pub outer_key: Selector,
    pub inner_key: Selector,
    pub result: PairSelector,
    pub loose_keys: bool,
}

impl Join {
    pub fn new(
        inner: Source,
        outer_key: Selector,
        inner_key: Selector,
        result: PairSelector,
    ) -> Self {
        Self {
            inner: Arc::new(inner),
            outer_key,
            inner_key,
            result,
            loose_keys: true,
        }
    }

    pub fn with_loose_keys(mut self, loose: bool) -> Self {
        self.loose_keys = loose;
        self
    }
}

impl Operator for Join {
    fn name(&self) -> &'static str {
        "join"
    }

    fn apply(&self, out: &mut Outcome, _ctx: &mut PassContext, _stage: usize) -> Result<()> {
        if out.excluded {
            return Ok(());
        }
        let outer_key = self.outer_key.call(&out.value, &out.key);
        let mut produced = Vec::new();
        for (inner_key, inner_value) in self.inner.iter() {
            let candidate = self.inner_key.call(inner_value, inner_key);
            if keys_match(&outer_key, &candidate, self.loose_keys) {
                produced.push(self.result.call(&out.value, inner_value));
            }
        }
        out.value = Value::List(produced);
        out.joined = true;
        out.key_mode = KeyMode::Positional;
        Ok(())
    }
}
