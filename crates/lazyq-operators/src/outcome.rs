//! The per-element result of running a descriptor chain.

use lazyq_core::{Key, Value};

use crate::context::PassContext;

/// How the materializer should treat an outcome's key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyMode {
    /// Original source key; keyed results overwrite by it.
    #[default]
    Source,
    /// Key replaced by a step (group join); still overwrites.
    Rekeyed,
    /// Grouping key (lookup, group by); values append under it.
    Grouped,
    /// Key is meaningless (zip, join); keyed results append at the next free slot.
    Positional,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub key: Key,
    pub value: Value,
    pub excluded: bool,
    /// Compacted index once the chain has run.
    pub index: i64,
    /// Running aggregate after this element, once an aggregate step fired.
    pub accumulate: Option<Value>,
    /// Set when a sequence test matched this element.
    pub matched: bool,
    pub key_mode: KeyMode,
    /// `value` is a list of join-produced entries to be flattened.
    pub joined: bool,
}

impl Outcome {
    pub fn new(key: Key, value: Value, index: i64) -> Self {
        Self {
            key,
            value,
            excluded: false,
            index,
            accumulate: None,
            matched: false,
            key_mode: KeyMode::Source,
            joined: false,
        }
    }

    /// Drop the element and give its slot back to the compacted index.
    pub fn exclude(&mut self, ctx: &mut PassContext) {
        if !self.excluded {
            self.excluded = true;
            ctx.compact();
        }
    }

    /// Drop the element without touching the compacted index.
    pub fn reject(&mut self) {
        self.excluded = true;
    }

    pub fn is_accepted(&self) -> bool {
        !self.excluded
    }
}
