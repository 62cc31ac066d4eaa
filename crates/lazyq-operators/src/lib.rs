#![forbid(unsafe_code)]
//! lazyq-operators: the descriptors a query chain is made of.
//!
//! Design intent:
//! - One file per descriptor kind; each kind implements `Operator::apply`,
//!   which threads a single element's `Outcome` through that step.
//! - `Descriptor` is the closed set of kinds. The evaluation iterator in
//!   `lazyq-exec` matches on it exhaustively.
//! - Cross-element state (accumulator, counters, compacted index) lives in a
//!   `PassContext` owned by one terminal call, never by a descriptor.

pub mod context;
pub mod descriptor;
pub mod outcome;
pub mod traits;

pub mod aggregate;
pub mod filter;
pub mod lookup;
pub mod map;
pub mod search;
pub mod sequence;
pub mod slice;
pub mod sort;
pub mod zip;

pub mod join;

pub use context::{PassContext, PassStats};
pub use descriptor::Descriptor;
pub use outcome::{KeyMode, Outcome};
pub use traits::{Accumulator, Operator, PairSelector, Predicate, SearchFn, Selector};
