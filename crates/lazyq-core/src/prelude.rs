//! Convenient re-exports for downstream crates.

pub use crate::compare::{Comparer, DefaultComparer, Entry};
pub use crate::config::QueryConfig;
pub use crate::error::{Error, Result};
pub use crate::schema::ValueKind;
pub use crate::types::{Key, Source, Value};
