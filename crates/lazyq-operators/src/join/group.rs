//! Group join: re-keys each outer element by its join key and hands the
//! result selector every matching inner element, keyed by its inner key.

use std::sync::Arc;

use indexmap::IndexMap;

use lazyq_core::{Key, Result, Source, Value};

use crate::context::PassContext;
use crate::outcome::{KeyMode, Outcome};
use crate::traits::{Operator, PairSelector, Selector};

use super::keys_match;

#[derive(Debug, Clone)]
pub struct GroupJoin {
    pub inner: Arc<Source>,
    pub outer_key: Selector,
    pub inner_key: Selector,
    pub result: PairSelector,
    pub loose_keys: bool,
}

impl GroupJoin {
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

impl Operator for GroupJoin {
    fn name(&self) -> &'static str {
        "group_join"
    }

    fn apply(&self, out: &mut Outcome, _ctx: &mut PassContext, _stage: usize) -> Result<()> {
        if out.excluded {
            return Ok(());
        }
        let outer_key = self.outer_key.call(&out.value, &out.key);
        let mut group: IndexMap<Key, Value> = IndexMap::new();
        for (inner_key, inner_value) in self.inner.iter() {
            let candidate = self.inner_key.call(inner_value, inner_key);
            if keys_match(&outer_key, &candidate, self.loose_keys) {
                group.insert(inner_key.clone(), inner_value.clone());
            }
        }
        out.key = Key::try_from_value(&outer_key)?;
        out.value = self.result.call(&out.value, &Value::Map(group));
        out.key_mode = KeyMode::Rekeyed;
        Ok(())
    }
}
