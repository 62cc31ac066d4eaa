//! Pass-scoped evaluation state.
//!
//! A `PassContext` is created by a terminal call, lent to exactly one
//! evaluation iterator, and dropped afterwards. Nothing here survives between
//! terminal calls on the same builder.

use serde::Serialize;

use lazyq_core::Value;

#[derive(Debug, Default)]
pub struct PassContext {
    /// Compacted index: accepted elements seen so far, corrected by exclusions.
    index: i64,
    /// Raw source position.
    position: usize,
    accumulator: Option<Value>,
    matched: usize,
    search_calls: usize,
    accepted: usize,
    /// Per-descriptor counters (slices), indexed by chain position.
    stage_counters: Vec<usize>,
}

/// Snapshot of a finished pass, for metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassStats {
    pub visited: usize,
    pub accepted: usize,
    pub matched: usize,
    pub search_calls: usize,
}

impl PassContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear everything; called by `rewind`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn index(&self) -> i64 {
        self.index
    }

    /// The compacted index as seen by position-sensitive steps.
    pub fn compacted_index(&self) -> usize {
        usize::try_from(self.index).unwrap_or(0)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Move to the next source element. Always bumps the compacted index;
    /// exclusions correct it through `compact`.
    pub fn advance(&mut self) {
        self.position += 1;
        self.index += 1;
    }

    pub fn compact(&mut self) {
        self.index -= 1;
    }

    pub fn accumulator(&self) -> Option<&Value> {
        self.accumulator.as_ref()
    }

    pub fn set_accumulator(&mut self, value: Value) {
        self.accumulator = Some(value);
    }

    pub fn take_accumulator(&mut self) -> Option<Value> {
        self.accumulator.take()
    }

    pub fn record_match(&mut self) {
        self.matched += 1;
    }

    pub fn matched(&self) -> usize {
        self.matched
    }

    /// Count one search-callback invocation and return the 1-based count.
    pub fn next_search_call(&mut self) -> usize {
        self.search_calls += 1;
        self.search_calls
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls
    }

    pub fn record_accepted(&mut self) {
        self.accepted += 1;
    }

    pub fn accepted(&self) -> usize {
        self.accepted
    }

    pub fn stage_counter(&mut self, stage: usize) -> &mut usize {
        if self.stage_counters.len() <= stage {
            self.stage_counters.resize(stage + 1, 0);
        }
        &mut self.stage_counters[stage]
    }

    pub fn stats(&self) -> PassStats {
        PassStats {
            visited: self.position,
            accepted: self.accepted,
            matched: self.matched,
            search_calls: self.search_calls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_and_compact_track_accepted_slots() {
        let mut ctx = PassContext::new();
        assert_eq!(ctx.compacted_index(), 0);
        ctx.compact();
        assert_eq!(ctx.index(), -1);
        assert_eq!(ctx.compacted_index(), 0);
        ctx.advance();
        assert_eq!(ctx.index(), 0);
        assert_eq!(ctx.position(), 1);
    }

    #[test]
    fn reset_clears_pass_state() {
        let mut ctx = PassContext::new();
        ctx.set_accumulator(Value::Int(3));
        ctx.record_match();
        assert_eq!(ctx.next_search_call(), 1);
        *ctx.stage_counter(4) += 2;
        ctx.reset();
        assert_eq!(ctx.accumulator(), None);
        assert_eq!(ctx.matched(), 0);
        assert_eq!(ctx.search_calls(), 0);
        assert_eq!(*ctx.stage_counter(4), 0);
    }
}
