//! Metrics/tracing hooks.
//!
//! Compiled to no-ops unless the `tracing` feature is enabled. Subscribers are
//! the caller's business; this crate never installs one.

use lazyq_operators::{Outcome, PassStats};

#[cfg(feature = "tracing")]
pub fn emit_pass(terminal: &str, source_len: usize, descriptors: usize, stats: &PassStats) {
    tracing::trace!(
        terminal,
        source_len,
        descriptors,
        visited = stats.visited,
        accepted = stats.accepted,
        matched = stats.matched,
        search_calls = stats.search_calls,
        "pass finished"
    );
}

#[cfg(not(feature = "tracing"))]
pub fn emit_pass(_terminal: &str, _source_len: usize, _descriptors: usize, _stats: &PassStats) {
    /* no-op */
}

#[cfg(feature = "tracing")]
pub fn trace_outcome(out: &Outcome) {
    tracing::trace!(
        key = %out.key,
        index = out.index,
        excluded = out.excluded,
        matched = out.matched,
        joined = out.joined,
        key_mode = ?out.key_mode,
        "outcome"
    );
}

#[cfg(not(feature = "tracing"))]
pub fn trace_outcome(_out: &Outcome) { /* no-op */
}

#[cfg(feature = "tracing")]
pub fn emit_terminal(terminal: &str, descriptors: usize) {
    tracing::debug!(terminal, descriptors, "running terminal");
}

#[cfg(not(feature = "tracing"))]
pub fn emit_terminal(_terminal: &str, _descriptors: usize) { /* no-op */
}
