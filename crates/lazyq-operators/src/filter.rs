//! Filter step: keeps elements whose predicate holds.
//!
//! Exclusion is sticky for the rest of the element's chain and hands the
//! element's slot back to the compacted index.

use lazyq_core::prelude::ValueKind;
use lazyq_core::Result;

use crate::context::PassContext;
use crate::outcome::Outcome;
use crate::traits::{Operator, Predicate};

#[derive(Debug, Clone)]
pub struct Filter {
    pub predicate: Predicate,
}

impl Filter {
    pub fn new(predicate: Predicate) -> Self {
        Self { predicate }
    }

    /// Keep only values of the given runtime kind.
    pub fn of_kind(kind: ValueKind) -> Self {
        Self::new(Predicate::new(move |value, _| value.kind() == kind))
    }

    /// Keep only integers and floats.
    pub fn numeric() -> Self {
        Self::new(Predicate::new(|value, _| value.is_numeric()))
    }
}

impl Operator for Filter {
    fn name(&self) -> &'static str {
        "filter"
    }

    fn apply(&self, out: &mut Outcome, ctx: &mut PassContext, _stage: usize) -> Result<()> {
        if out.excluded {
            return Ok(());
        }
        if !self.predicate.call(&out.value, &out.key) {
            out.exclude(ctx);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazyq_core::{Key, Value};

    #[test]
    fn rejected_element_compacts_index() {
        let mut ctx = PassContext::new();
        let mut out = Outcome::new(Key::Int(0), Value::Int(1), 0);
        let even = Filter::new(Predicate::new(|v, _| v.as_i64().map_or(false, |i| i % 2 == 0)));
        even.apply(&mut out, &mut ctx, 0).unwrap();
        assert!(out.excluded);
        assert_eq!(ctx.index(), -1);
    }

    #[test]
    fn excluded_elements_are_not_revisited() {
        let mut ctx = PassContext::new();
        let mut out = Outcome::new(Key::Int(0), Value::Int(1), 0);
        out.exclude(&mut ctx);
        let calls = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let seen = calls.clone();
        let filter = Filter::new(Predicate::new(move |_, _| {
            seen.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            true
        }));
        filter.apply(&mut out, &mut ctx, 0).unwrap();
        assert!(out.excluded);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
        assert_eq!(ctx.index(), -1);
    }

    #[test]
    fn kind_filter_matches_runtime_category() {
        let mut ctx = PassContext::new();
        let strings = Filter::of_kind(ValueKind::Str);
        let mut keep = Outcome::new(Key::Int(0), Value::from("a"), 0);
        let mut drop = Outcome::new(Key::Int(1), Value::Float(1.0), 0);
        strings.apply(&mut keep, &mut ctx, 0).unwrap();
        strings.apply(&mut drop, &mut ctx, 0).unwrap();
        assert!(keep.is_accepted());
        assert!(drop.excluded);
    }
}
