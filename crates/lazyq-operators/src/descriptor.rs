//! The closed set of descriptor kinds a chain is made of.

use crate::aggregate::Aggregate;
use crate::filter::Filter;
use crate::join::{GroupJoin, Join};
use crate::lookup::Lookup;
use crate::map::Project;
use crate::search::Search;
use crate::sequence::SequenceTest;
use crate::slice::Slice;
use crate::sort::OrderBy;
use crate::traits::Operator;
use crate::zip::Zip;

/// One immutable step of a query chain, evaluated in append order.
#[derive(Debug, Clone)]
pub enum Descriptor {
    Filter(Filter),
    Project(Project),
    Aggregate(Aggregate),
    SequenceTest(SequenceTest),
    Search(Search),
    Lookup(Lookup),
    Join(Join),
    GroupJoin(GroupJoin),
    Zip(Zip),
    Slice(Slice),
    OrderBy(OrderBy),
}

impl Descriptor {
    /// The step as a trait object.
    pub fn as_operator(&self) -> &dyn Operator {
        match self {
            Descriptor::Filter(op) => op,
            Descriptor::Project(op) => op,
            Descriptor::Aggregate(op) => op,
            Descriptor::SequenceTest(op) => op,
            Descriptor::Search(op) => op,
            Descriptor::Lookup(op) => op,
            Descriptor::Join(op) => op,
            Descriptor::GroupJoin(op) => op,
            Descriptor::Zip(op) => op,
            Descriptor::Slice(op) => op,
            Descriptor::OrderBy(op) => op,
        }
    }

    pub fn name(&self) -> &'static str {
        self.as_operator().name()
    }

    /// True for steps whose whole output must exist before the next step
    /// runs: sorts, and steps that fan out or merge elements.
    pub fn is_barrier(&self) -> bool {
        matches!(
            self,
            Descriptor::OrderBy(_)
                | Descriptor::Join(_)
                | Descriptor::GroupJoin(_)
                | Descriptor::Lookup(_)
        )
    }
}

macro_rules! descriptor_from {
    ($($kind:ident),* $(,)?) => {
        $(
            impl From<$kind> for Descriptor {
                fn from(op: $kind) -> Self {
                    Descriptor::$kind(op)
                }
            }
        )*
    };
}

descriptor_from!(
    Filter,
    Project,
    Aggregate,
    SequenceTest,
    Search,
    Lookup,
    Join,
    GroupJoin,
    Zip,
    Slice,
    OrderBy,
);
