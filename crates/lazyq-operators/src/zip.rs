//! Zip step: merges the element at compacted index `i` with the `i`-th value
//! of a second sequence. Elements past its end are dropped.

use std::sync::Arc;

use lazyq_core::{Result, Value};

use crate::context::PassContext;
use crate::outcome::{KeyMode, Outcome};
use crate::traits::{Operator, PairSelector};

#[derive(Debug, Clone)]
pub struct Zip {
    pub second: Arc<Vec<Value>>,
    pub selector: PairSelector,
}

impl Zip {
    pub fn new(second: Vec<Value>, selector: PairSelector) -> Self {
        Self {
            second: Arc::new(second),
            selector,
        }
    }
}

impl Operator for Zip {
    fn name(&self) -> &'static str {
        "zip"
    }

    fn apply(&self, out: &mut Outcome, ctx: &mut PassContext, _stage: usize) -> Result<()> {
        if out.excluded {
            return Ok(());
        }
        match self.second.get(ctx.compacted_index()) {
            Some(other) => {
                out.value = self.selector.call(&out.value, other);
                out.key_mode = KeyMode::Positional;
            }
            None => out.exclude(ctx),
        }
        Ok(())
    }
}
