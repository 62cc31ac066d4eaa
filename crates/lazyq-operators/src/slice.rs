//! Take/skip steps. Each slice counts the elements that reach it in the
//! current pass, using its own counter in the pass context.

use lazyq_core::Result;

use crate::context::PassContext;
use crate::outcome::Outcome;
use crate::traits::Operator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceKind {
    Take,
    Skip,
}

#[derive(Debug, Clone, Copy)]
pub struct Slice {
    pub kind: SliceKind,
    pub count: usize,
}

impl Slice {
    pub fn take(count: usize) -> Self {
        Self {
            kind: SliceKind::Take,
            count,
        }
    }

    pub fn skip(count: usize) -> Self {
        Self {
            kind: SliceKind::Skip,
            count,
        }
    }
}

impl Operator for Slice {
    fn name(&self) -> &'static str {
        match self.kind {
            SliceKind::Take => "take",
            SliceKind::Skip => "skip",
        }
    }

    fn apply(&self, out: &mut Outcome, ctx: &mut PassContext, stage: usize) -> Result<()> {
        if out.excluded {
            return Ok(());
        }
        let seen = ctx.stage_counter(stage);
        let pos = *seen;
        *seen += 1;
        let keep = match self.kind {
            SliceKind::Take => pos < self.count,
            SliceKind::Skip => pos >= self.count,
        };
        if !keep {
            out.exclude(ctx);
        }
        Ok(())
    }
}
