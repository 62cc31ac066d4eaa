//! Sequence-test step behind `any`, `all`, `contains`, and `sequence_equal`.
//!
//! A probe never excludes an element. A hit marks the outcome and bumps the
//! pass-wide match counter; the terminal shapes a boolean from that counter.

use std::fmt;
use std::sync::Arc;

use lazyq_core::prelude::{Comparer, Entry};
use lazyq_core::{Key, Result, Value};

use crate::context::PassContext;
use crate::outcome::Outcome;
use crate::traits::{Operator, Predicate};

#[derive(Clone)]
pub enum Probe {
    /// User predicate over `(value, key)`.
    Predicate(Predicate),
    /// Compare each element to a target entry. Without an explicit key the
    /// target borrows the key of the element it is compared to.
    Contains {
        target: Value,
        key: Option<Key>,
        comparer: Arc<dyn Comparer>,
    },
    /// Compare each element to the entry at the same compacted index of a
    /// second sequence.
    Pairwise {
        second: Arc<Vec<Entry>>,
        comparer: Arc<dyn Comparer>,
    },
}

impl fmt::Debug for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Probe::Predicate(p) => f.debug_tuple("Predicate").field(p).finish(),
            Probe::Contains { target, key, .. } => f
                .debug_struct("Contains")
                .field("target", target)
                .field("key", key)
                .finish_non_exhaustive(),
            Probe::Pairwise { second, .. } => f
                .debug_struct("Pairwise")
                .field("len", &second.len())
                .finish_non_exhaustive(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SequenceTest {
    pub probe: Probe,
}

impl SequenceTest {
    pub fn new(probe: Probe) -> Self {
        Self { probe }
    }

    fn hit(&self, out: &Outcome, ctx: &PassContext) -> bool {
        match &self.probe {
            Probe::Predicate(p) => p.call(&out.value, &out.key),
            Probe::Contains {
                target,
                key,
                comparer,
            } => {
                let item = Entry::new(out.key.clone(), out.value.clone());
                let wanted = Entry::new(key.clone().unwrap_or_else(|| out.key.clone()), target.clone());
                comparer.equals(&item, &wanted)
            }
            Probe::Pairwise { second, comparer } => match second.get(ctx.compacted_index()) {
                Some(other) => {
                    let item = Entry::new(out.key.clone(), out.value.clone());
                    comparer.equals(&item, other)
                }
                None => false,
            },
        }
    }
}

impl Operator for SequenceTest {
    fn name(&self) -> &'static str {
        "sequence_test"
    }

    fn apply(&self, out: &mut Outcome, ctx: &mut PassContext, _stage: usize) -> Result<()> {
        if out.excluded {
            return Ok(());
        }
        if self.hit(out, ctx) {
            out.matched = true;
            ctx.record_match();
        }
        Ok(())
    }
}
