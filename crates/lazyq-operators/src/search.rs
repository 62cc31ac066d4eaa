//! Search step: index-of style matching.
//!
//! The callback sees `(value, compacted index, invocation count)`. Elements
//! excluded earlier in the chain are not offered to it and do not count as an
//! invocation. A miss drops the element without compacting the index, so later
//! elements keep their position in the filtered sequence.

use lazyq_core::Result;

use crate::context::PassContext;
use crate::outcome::Outcome;
use crate::traits::{Operator, SearchFn};

#[derive(Debug, Clone)]
pub struct Search {
    pub func: SearchFn,
}

impl Search {
    pub fn new(func: SearchFn) -> Self {
        Self { func }
    }
}

impl Operator for Search {
    fn name(&self) -> &'static str {
        "search"
    }

    fn apply(&self, out: &mut Outcome, ctx: &mut PassContext, _stage: usize) -> Result<()> {
        if out.excluded {
            return Ok(());
        }
        let calls = ctx.next_search_call();
        if !self.func.call(&out.value, ctx.compacted_index(), calls) {
            out.reject();
        }
        Ok(())
    }
}
