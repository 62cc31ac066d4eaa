//! Lookup step behind `to_lookup` and `group_by`: re-keys an element by a
//! grouping key so the materializer appends it into that key's group.

use lazyq_core::{Key, Result};

use crate::context::PassContext;
use crate::outcome::{KeyMode, Outcome};
use crate::traits::{Operator, Selector};

#[derive(Debug, Clone)]
pub struct Lookup {
    pub key_selector: Selector,
    /// Projects the grouped element (`group_by`); the element itself otherwise.
    pub element_selector: Option<Selector>,
}

impl Lookup {
    pub fn new(key_selector: Selector) -> Self {
        Self {
            key_selector,
            element_selector: None,
        }
    }

    pub fn with_element(mut self, selector: Selector) -> Self {
        self.element_selector = Some(selector);
        self
    }
}

impl Operator for Lookup {
    fn name(&self) -> &'static str {
        "lookup"
    }

    fn apply(&self, out: &mut Outcome, _ctx: &mut PassContext, _stage: usize) -> Result<()> {
        if out.excluded {
            return Ok(());
        }
        let group = Key::try_from_value(&self.key_selector.call(&out.value, &out.key))?;
        if let Some(element) = &self.element_selector {
            out.value = element.call(&out.value, &out.key);
        }
        out.key = group;
        out.key_mode = KeyMode::Grouped;
        Ok(())
    }
}
