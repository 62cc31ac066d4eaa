#![forbid(unsafe_code)]
//! lazyq: deferred, LINQ-style queries over in-memory keyed collections.
//!
//! ```
//! use lazyq::{Predicate, Query, Value};
//!
//! let evens = Query::from_values([1, 2, 3, 4])
//!     .filter(|v, _| v.as_i64().is_some_and(|n| n % 2 == 0))
//!     .select(|v, _| Value::Int(v.as_i64().unwrap_or(0) * 10));
//!
//! assert_eq!(evens.to_array().unwrap(), vec![Value::Int(20), Value::Int(40)]);
//! let big = Predicate::new(|v, _| v.as_i64() > Some(25));
//! assert_eq!(evens.first(Some(big)).unwrap(), Value::Int(40));
//! ```

pub use lazyq_core::prelude::*;
pub use lazyq_core::{indexed, Error, Key, Result, Source, Value};
pub use lazyq_exec::{Materializer, Query};
pub use lazyq_operators::{Descriptor, PairSelector, Predicate, Selector};

pub use lazyq_exec as exec;
pub use lazyq_operators as operators;
