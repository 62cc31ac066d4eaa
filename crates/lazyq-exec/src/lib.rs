#![forbid(unsafe_code)]
//! lazyq-exec: deferred evaluation of descriptor chains.
//!
//! A `Query` only records descriptors. Each terminal call creates a fresh
//! `PassContext`, resolves `order_by` barriers into a source for the last
//! segment, drives an `EvalIterator` over it once, and lets the
//! `Materializer` shape the outcomes into the returned value.

pub mod iterator;
pub mod materialize;
pub mod metrics;
pub mod query;
pub mod terminal;

pub use iterator::{Cursor, EvalIterator, Outcomes};
pub use materialize::Materializer;
pub use query::Query;
