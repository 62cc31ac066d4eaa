//! Order-by: a pipeline breaker.
//!
//! Sorting needs the whole input, so the chain is split into segments at
//! every `OrderBy`. The segment before it is materialized (keyed), sorted here,
//! and becomes the source of the next segment. Within a segment the step is a
//! pass-through.

use std::cmp::Ordering;

use lazyq_core::{Error, Result, Source, Value};

use crate::context::PassContext;
use crate::outcome::Outcome;
use crate::traits::{Operator, Selector};

#[derive(Debug, Clone)]
pub struct OrderBy {
    pub key_selector: Selector,
    pub descending: bool,
}

impl OrderBy {
    pub fn ascending(key_selector: Selector) -> Self {
        Self {
            key_selector,
            descending: false,
        }
    }

    pub fn descending(key_selector: Selector) -> Self {
        Self {
            key_selector,
            descending: true,
        }
    }

    /// Stable sort of a materialized segment by the selector's scalar result.
    pub fn sort(&self, source: Source) -> Result<Source> {
        let mut keyed: Vec<(Value, _)> = Vec::with_capacity(source.len());
        for (key, value) in source {
            let sort_key = self.key_selector.call(&value, &key);
            if !sort_key.is_scalar() {
                return Err(Error::InvalidSortKey(format!(
                    "a {} cannot be used as a sort key",
                    sort_key.kind()
                )));
            }
            keyed.push((sort_key, (key, value)));
        }

        let descending = self.descending;
        keyed.sort_by(|(a, _), (b, _)| {
            let ord = a.compare_scalar(b).unwrap_or(Ordering::Equal);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        });

        Ok(keyed.into_iter().map(|(_, entry)| entry).collect())
    }
}

impl Operator for OrderBy {
    fn name(&self) -> &'static str {
        if self.descending {
            "order_by_descending"
        } else {
            "order_by"
        }
    }

    fn apply(&self, _out: &mut Outcome, _ctx: &mut PassContext, _stage: usize) -> Result<()> {
        Ok(())
    }
}
