//! Operator trait + the callback types descriptors capture.
//!
//! Callbacks are reference-counted so a builder (and every descriptor in it)
//! can be cloned cheaply; they must be `Send + Sync` so a built query can be
//! shared across threads and evaluated concurrently.

use std::fmt;
use std::sync::Arc;

use lazyq_core::{Key, Result, Value};

use crate::context::PassContext;
use crate::outcome::Outcome;

macro_rules! callback {
    ($(#[$meta:meta])* $name:ident ( $($arg:ident : $ty:ty),* ) -> $ret:ty) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name(Arc<dyn Fn($($ty),*) -> $ret + Send + Sync>);

        impl $name {
            pub fn new(f: impl Fn($($ty),*) -> $ret + Send + Sync + 'static) -> Self {
                Self(Arc::new(f))
            }

            pub fn call(&self, $($arg: $ty),*) -> $ret {
                (self.0)($($arg),*)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "(..)"))
            }
        }
    };
}

callback!(
    /// `(value, key) -> bool`: filters and sequence tests.
    Predicate(value: &Value, key: &Key) -> bool
);

callback!(
    /// `(value, key) -> value`: projections and key selectors.
    Selector(value: &Value, key: &Key) -> Value
);

callback!(
    /// `(accumulator, value) -> accumulator`.
    Accumulator(acc: &Value, value: &Value) -> Value
);

callback!(
    /// `(value, compacted index, invocation count) -> found`.
    SearchFn(value: &Value, index: usize, calls: usize) -> bool
);

callback!(
    /// `(outer/first, inner/second) -> result`: join, group join, and zip results.
    PairSelector(outer: &Value, inner: &Value) -> Value
);

/// One step of a descriptor chain.
///
/// Invariants:
/// - `apply` never re-includes an element another step excluded.
/// - Cross-element state goes through `ctx`; implementations hold none.
pub trait Operator: Send + Sync {
    /// Human-readable operator name (stable).
    fn name(&self) -> &'static str;

    /// Thread one element's outcome through this step.
    ///
    /// `stage` is this descriptor's position in the chain, for steps that
    /// keep a per-descriptor counter in the pass context.
    fn apply(&self, out: &mut Outcome, ctx: &mut PassContext, stage: usize) -> Result<()>;
}
