#![forbid(unsafe_code)]
//! lazyq-core: the data model shared by every lazyq crate.
//!
//! - `Key`/`Value`: the ordered keyed collections the engine consumes.
//! - `ValueKind`: runtime categories used by `of_type`.
//! - `Entry`/`Comparer`: the equality boundary used by `contains`/`sequence_equal`.
//! - `QueryConfig` and the crate-wide `Error`.
//!
//! Nothing in here evaluates a query; see `lazyq-exec` for that.

pub mod compare;
pub mod config;
pub mod error;
pub mod prelude;
pub mod schema;
pub mod types;

pub use error::{Error, Result};
pub use types::{indexed, Key, Source, Value};
