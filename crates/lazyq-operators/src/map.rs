//! Project step: replaces the working value with `selector(value, key)`.

use lazyq_core::Result;

use crate::context::PassContext;
use crate::outcome::Outcome;
use crate::traits::{Operator, Selector};

#[derive(Debug, Clone)]
pub struct Project {
    pub selector: Selector,
}

impl Project {
    pub fn new(selector: Selector) -> Self {
        Self { selector }
    }
}

impl Operator for Project {
    fn name(&self) -> &'static str {
        "project"
    }

    fn apply(&self, out: &mut Outcome, _ctx: &mut PassContext, _stage: usize) -> Result<()> {
        if !out.excluded {
            out.value = self.selector.call(&out.value, &out.key);
        }
        Ok(())
    }
}
