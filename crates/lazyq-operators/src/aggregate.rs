//! Aggregate step: folds accepted values into the pass accumulator.
//!
//! The first accepted element seeds the accumulator without calling the
//! combinator; excluded elements neither seed nor combine.

use lazyq_core::Result;

use crate::context::PassContext;
use crate::outcome::Outcome;
use crate::traits::{Accumulator, Operator};

#[derive(Debug, Clone)]
pub struct Aggregate {
    pub func: Accumulator,
}

impl Aggregate {
    pub fn new(func: Accumulator) -> Self {
        Self { func }
    }
}

impl Operator for Aggregate {
    fn name(&self) -> &'static str {
        "aggregate"
    }

    fn apply(&self, out: &mut Outcome, ctx: &mut PassContext, _stage: usize) -> Result<()> {
        if out.excluded {
            return Ok(());
        }
        let next = match ctx.accumulator() {
            None => out.value.clone(),
            Some(acc) => self.func.call(acc, &out.value),
        };
        ctx.set_accumulator(next.clone());
        out.accumulate = Some(next);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazyq_core::{Key, Value};

    fn sum() -> Aggregate {
        Aggregate::new(Accumulator::new(|acc, v| {
            Value::Int(acc.as_i64().unwrap_or(0) + v.as_i64().unwrap_or(0))
        }))
    }

    #[test]
    fn seeds_from_first_accepted_element() {
        let mut ctx = PassContext::new();
        let agg = sum();

        let mut skipped = Outcome::new(Key::Int(0), Value::Int(100), 0);
        skipped.exclude(&mut ctx);
        agg.apply(&mut skipped, &mut ctx, 0).unwrap();
        assert_eq!(ctx.accumulator(), None);
        assert_eq!(skipped.accumulate, None);

        let mut first = Outcome::new(Key::Int(1), Value::Int(2), 0);
        agg.apply(&mut first, &mut ctx, 0).unwrap();
        assert_eq!(ctx.accumulator(), Some(&Value::Int(2)));

        let mut second = Outcome::new(Key::Int(2), Value::Int(5), 1);
        agg.apply(&mut second, &mut ctx, 0).unwrap();
        assert_eq!(second.accumulate, Some(Value::Int(7)));
    }
}
