//! Evaluation iterator: one cursor over a source, one descriptor chain.
//!
//! Behavior:
//! - `rewind` resets the borrowed `PassContext` and positions on the first
//!   source element (or straight to `Exhausted` for an empty source).
//! - `current` runs the chain for the element under the cursor at most once
//!   per position; repeated calls return the memoized outcome.
//! - `next` moves the raw position and bumps the compacted index. Exclusions
//!   made while evaluating an element correct the index through the context.
//!
//! The chain is expected to be resolved first: `order_by` segments, and joins
//! or groupings with steps after them, are materialized by `resolve` before an
//! iterator is built.

use lazyq_core::prelude::QueryConfig;
use lazyq_core::{Key, Result, Source, Value};
use lazyq_operators::{Descriptor, Operator, Outcome, PassContext};

use crate::metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    NotStarted,
    Positioned(usize),
    Exhausted,
}

pub struct EvalIterator<'a> {
    source: &'a Source,
    chain: &'a [Descriptor],
    config: &'a QueryConfig,
    ctx: &'a mut PassContext,
    cursor: Cursor,
    current: Option<Outcome>,
}

impl<'a> EvalIterator<'a> {
    pub fn new(
        source: &'a Source,
        chain: &'a [Descriptor],
        config: &'a QueryConfig,
        ctx: &'a mut PassContext,
    ) -> Self {
        Self {
            source,
            chain,
            config,
            ctx,
            cursor: Cursor::NotStarted,
            current: None,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn rewind(&mut self) {
        self.ctx.reset();
        self.current = None;
        self.cursor = if self.source.is_empty() {
            Cursor::Exhausted
        } else {
            Cursor::Positioned(0)
        };
    }

    pub fn valid(&self) -> bool {
        matches!(self.cursor, Cursor::Positioned(_))
    }

    pub fn next(&mut self) {
        match self.cursor {
            Cursor::NotStarted => self.rewind(),
            Cursor::Positioned(pos) => {
                self.ctx.advance();
                self.current = None;
                self.cursor = if pos + 1 < self.source.len() {
                    Cursor::Positioned(pos + 1)
                } else {
                    Cursor::Exhausted
                };
            }
            Cursor::Exhausted => {}
        }
    }

    /// Source key under the cursor.
    pub fn key(&self) -> Option<&'a Key> {
        match self.cursor {
            Cursor::Positioned(pos) => self.source.get_index(pos).map(|(k, _)| k),
            _ => None,
        }
    }

    /// Outcome of the element under the cursor, evaluating the chain on
    /// first access.
    pub fn current(&mut self) -> Result<Option<&Outcome>> {
        let Cursor::Positioned(pos) = self.cursor else {
            return Ok(None);
        };
        if self.current.is_none() {
            let Some((key, value)) = self.source.get_index(pos) else {
                return Ok(None);
            };
            let outcome = self.evaluate(key.clone(), value.clone())?;
            self.current = Some(outcome);
        }
        Ok(self.current.as_ref())
    }

    fn evaluate(&mut self, key: Key, value: Value) -> Result<Outcome> {
        let mut out = Outcome::new(key, value, self.ctx.index());
        for (stage, descriptor) in self.chain.iter().enumerate() {
            let ctx = &mut *self.ctx;
            match descriptor {
                Descriptor::Filter(op) => op.apply(&mut out, ctx, stage)?,
                Descriptor::Project(op) => op.apply(&mut out, ctx, stage)?,
                Descriptor::Aggregate(op) => op.apply(&mut out, ctx, stage)?,
                Descriptor::SequenceTest(op) => op.apply(&mut out, ctx, stage)?,
                Descriptor::Search(op) => op.apply(&mut out, ctx, stage)?,
                Descriptor::Lookup(op) => op.apply(&mut out, ctx, stage)?,
                Descriptor::Join(op) => op.apply(&mut out, ctx, stage)?,
                Descriptor::GroupJoin(op) => op.apply(&mut out, ctx, stage)?,
                Descriptor::Zip(op) => op.apply(&mut out, ctx, stage)?,
                Descriptor::Slice(op) => op.apply(&mut out, ctx, stage)?,
                // Resolved into the source before the pass.
                Descriptor::OrderBy(_) => {}
            }
        }
        out.index = self.ctx.index();
        if out.is_accepted() {
            self.ctx.record_accepted();
        }
        if self.config.trace_outcomes {
            metrics::trace_outcome(&out);
        }
        Ok(out)
    }

    /// Drain as a std iterator, yielding every outcome (excluded ones too).
    pub fn into_outcomes(self) -> Outcomes<'a> {
        Outcomes { inner: self }
    }
}

pub struct Outcomes<'a> {
    inner: EvalIterator<'a>,
}

impl Iterator for Outcomes<'_> {
    type Item = Result<Outcome>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.inner.cursor == Cursor::NotStarted {
            self.inner.rewind();
        }
        if !self.inner.valid() {
            return None;
        }
        match self.inner.current().map(|out| out.cloned()) {
            Ok(Some(out)) => {
                self.inner.next();
                Some(Ok(out))
            }
            Ok(None) => None,
            Err(e) => {
                self.inner.cursor = Cursor::Exhausted;
                Some(Err(e))
            }
        }
    }
}
