//! Terminal operators: the calls that actually evaluate a `Query`.
//!
//! Every terminal borrows the builder, copies the chain (plus its own
//! descriptor, if it has one), resolves barriers, and runs exactly one pass
//! with a fresh `PassContext`. Because a join or grouping followed by the
//! terminal's descriptor is a barrier, that descriptor sees the same elements
//! `to_array` returns. The builder is left untouched, so a
//! query can be evaluated any number of times and observes source changes
//! only through a new builder.

use std::sync::Arc;

use lazyq_core::prelude::{Comparer, DefaultComparer, Entry};
use lazyq_core::{Error, Key, Result, Source, Value};
use lazyq_operators::filter::Filter;
use lazyq_operators::search::Search;
use lazyq_operators::sequence::{Probe, SequenceTest};
use lazyq_operators::{Descriptor, PassContext, Predicate, SearchFn};

use crate::materialize::{resolve, Materializer};
use crate::metrics;
use crate::query::Query;

fn filtered(predicate: Option<Predicate>) -> Option<Descriptor> {
    predicate.map(|p| Filter::new(p).into())
}

impl Query {
    fn run<T>(
        &self,
        terminal: &'static str,
        extra: Option<Descriptor>,
        mode: impl FnOnce(&Materializer<'_>, &mut PassContext) -> Result<T>,
    ) -> Result<(T, PassContext)> {
        let chain = self.chain_with(extra);
        metrics::emit_terminal(terminal, chain.len());
        let (source, segment) = resolve(self.source(), &chain, self.config())?;
        let mut ctx = PassContext::new();
        let value = mode(&Materializer::new(&source, segment, self.config()), &mut ctx)?;
        metrics::emit_pass(terminal, source.len(), segment.len(), &ctx.stats());
        Ok((value, ctx))
    }

    fn values(&self, terminal: &'static str, predicate: Option<Predicate>) -> Result<Vec<Value>> {
        let (items, _) = self.run(terminal, filtered(predicate), |m, ctx| m.sequential(ctx))?;
        Ok(items)
    }

    // ----- materialization -----

    /// Values in acceptance order; keys are discarded.
    pub fn to_array(&self) -> Result<Vec<Value>> {
        self.values("to_array", None)
    }

    /// Key/value result; later elements overwrite earlier ones under the same key.
    pub fn to_dictionary(&self) -> Result<Source> {
        let (out, _) = self.run("to_dictionary", None, |m, ctx| m.keyed(ctx))?;
        Ok(out)
    }

    pub fn to_list(&self) -> Result<Source> {
        self.to_dictionary()
    }

    // ----- element access -----

    pub fn first(&self, predicate: Option<Predicate>) -> Result<Value> {
        let with_predicate = predicate.is_some();
        self.values("first", predicate)?
            .into_iter()
            .next()
            .ok_or(Error::EmptySequence {
                predicate: with_predicate,
            })
    }

    pub fn first_or_default(&self, predicate: Option<Predicate>, default: Value) -> Result<Value> {
        Ok(self
            .values("first_or_default", predicate)?
            .into_iter()
            .next()
            .unwrap_or(default))
    }

    pub fn last(&self, predicate: Option<Predicate>) -> Result<Value> {
        let with_predicate = predicate.is_some();
        self.values("last", predicate)?
            .pop()
            .ok_or(Error::EmptySequence {
                predicate: with_predicate,
            })
    }

    pub fn last_or_default(&self, predicate: Option<Predicate>, default: Value) -> Result<Value> {
        Ok(self
            .values("last_or_default", predicate)?
            .pop()
            .unwrap_or(default))
    }

    /// The only element; empty and multi-element results are errors.
    pub fn single(&self, predicate: Option<Predicate>) -> Result<Value> {
        let with_predicate = predicate.is_some();
        let mut items = self.values("single", predicate)?;
        match items.len() {
            0 => Err(Error::EmptySequence {
                predicate: with_predicate,
            }),
            1 => Ok(items.remove(0)),
            _ => Err(Error::MultipleElements {
                predicate: with_predicate,
            }),
        }
    }

    /// Like `single`, but an empty result yields `default`. More than one
    /// element is still an error.
    pub fn single_or_default(&self, predicate: Option<Predicate>, default: Value) -> Result<Value> {
        let with_predicate = predicate.is_some();
        let mut items = self.values("single_or_default", predicate)?;
        match items.len() {
            0 => Ok(default),
            1 => Ok(items.remove(0)),
            _ => Err(Error::MultipleElements {
                predicate: with_predicate,
            }),
        }
    }

    pub fn element_at(&self, index: i64) -> Result<Value> {
        let items = self.values("element_at", None)?;
        if items.is_empty() {
            return Err(Error::EmptySequence { predicate: false });
        }
        let len = items.len();
        usize::try_from(index)
            .ok()
            .and_then(|i| items.into_iter().nth(i))
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    pub fn element_at_or_default(&self, index: i64, default: Value) -> Result<Value> {
        let items = self.values("element_at_or_default", None)?;
        Ok(usize::try_from(index)
            .ok()
            .and_then(|i| items.into_iter().nth(i))
            .unwrap_or(default))
    }

    // ----- search -----

    fn search_keys(
        &self,
        terminal: &'static str,
        value: Value,
        start: Option<i64>,
        count: Option<usize>,
    ) -> Result<Vec<Key>> {
        let start = usize::try_from(start.unwrap_or(0)).unwrap_or(0);
        let end = count.map(|c| start.saturating_add(c));
        let search = Search::new(SearchFn::new(move |v, index, _| {
            index >= start && end.map_or(true, |e| index < e) && v == &value
        }));
        let (keys, _) = self.run(terminal, Some(search.into()), |m, ctx| m.keys(ctx))?;
        Ok(keys)
    }

    /// Key of the first element equal to `value` (strict equality) whose
    /// compacted index lies in `start .. start + count`. A negative `start`
    /// counts as 0.
    pub fn index_of(&self, value: Value, start: Option<i64>, count: Option<usize>) -> Result<Option<Key>> {
        Ok(self
            .search_keys("index_of", value, start, count)?
            .into_iter()
            .next())
    }

    pub fn last_index_of(
        &self,
        value: Value,
        start: Option<i64>,
        count: Option<usize>,
    ) -> Result<Option<Key>> {
        Ok(self
            .search_keys("last_index_of", value, start, count)?
            .pop())
    }

    // ----- quantifiers -----

    fn probe(&self, terminal: &'static str, probe: Probe) -> Result<PassContext> {
        let test = SequenceTest::new(probe);
        let (_, ctx) = self.run(terminal, Some(test.into()), |m, ctx| m.drain(ctx))?;
        Ok(ctx)
    }

    /// Without a predicate: whether the result has any element.
    pub fn any(&self, predicate: Option<Predicate>) -> Result<bool> {
        match predicate {
            None => Ok(!self.values("any", None)?.is_empty()),
            Some(p) => Ok(self.probe("any", Probe::Predicate(p))?.matched() > 0),
        }
    }

    /// True when every element satisfies the predicate (vacuously true for an
    /// empty result). A missing predicate is an error once there is an
    /// element to test.
    pub fn all(&self, predicate: Option<Predicate>) -> Result<bool> {
        match predicate {
            None => {
                let (_, ctx) = self.run("all", None, |m, ctx| m.drain(ctx))?;
                if ctx.accepted() > 0 {
                    Err(Error::ArgumentNull("predicate".into()))
                } else {
                    Ok(true)
                }
            }
            Some(p) => {
                let ctx = self.probe("all", Probe::Predicate(p))?;
                Ok(ctx.matched() == ctx.accepted())
            }
        }
    }

    /// Loose equality against each element's value.
    pub fn contains(&self, value: Value) -> Result<bool> {
        self.contains_with(value, Arc::new(DefaultComparer))
    }

    /// Compare each element to `value` with a custom comparer. The target
    /// entry borrows the key of the element it is compared against.
    pub fn contains_with(&self, value: Value, comparer: Arc<dyn Comparer>) -> Result<bool> {
        let probe = Probe::Contains {
            target: value,
            key: None,
            comparer,
        };
        Ok(self.probe("contains", probe)?.matched() > 0)
    }

    /// Compare each element to a fixed key/value entry.
    pub fn contains_entry(&self, entry: Entry, comparer: Arc<dyn Comparer>) -> Result<bool> {
        let probe = Probe::Contains {
            target: entry.value,
            key: Some(entry.key),
            comparer,
        };
        Ok(self.probe("contains", probe)?.matched() > 0)
    }

    pub fn sequence_equal(&self, second: &Source) -> Result<bool> {
        self.sequence_equal_with(second, Arc::new(DefaultComparer))
    }

    /// Pairwise comparison by position. Two empty sequences are not equal.
    pub fn sequence_equal_with(&self, second: &Source, comparer: Arc<dyn Comparer>) -> Result<bool> {
        let entries: Vec<Entry> = second
            .iter()
            .map(|(k, v)| Entry::new(k.clone(), v.clone()))
            .collect();
        let probe = Probe::Pairwise {
            second: Arc::new(entries),
            comparer,
        };
        let ctx = self.probe("sequence_equal", probe)?;
        let accepted = ctx.accepted();
        Ok(accepted > 0 && accepted == second.len() && ctx.matched() == accepted)
    }

    // ----- aggregation -----

    /// Fold the result with `func`, seeded by the first element. `None` for
    /// an empty result.
    pub fn aggregate(
        &self,
        func: impl Fn(&Value, &Value) -> Value + Send + Sync + 'static,
    ) -> Result<Option<Value>> {
        let step = Query::aggregate_step(func);
        let (_, mut ctx) = self.run("aggregate", Some(step), |m, ctx| m.drain(ctx))?;
        Ok(ctx.take_accumulator())
    }

    /// Mean of the numeric elements; non-numeric ones are ignored.
    pub fn average(&self) -> Result<Option<f64>> {
        let (items, _) = self.run("average", Some(Filter::numeric().into()), |m, ctx| {
            m.sequential(ctx)
        })?;
        if items.is_empty() {
            return Ok(None);
        }
        let sum: f64 = items.iter().filter_map(Value::as_f64).sum();
        Ok(Some(sum / items.len() as f64))
    }

    pub fn count(&self, predicate: Option<Predicate>) -> Result<usize> {
        Ok(self.values("count", predicate)?.len())
    }

    /// Nesting rank of the result: 0 when empty, 1 for a flat result, more
    /// as lists and maps nest.
    pub fn rank(&self) -> Result<usize> {
        let items = self.values("rank", None)?;
        if items.is_empty() {
            return Ok(0);
        }
        Ok((nested_rank(items.iter(), items.len(), 0.0) + 1.0).ceil() as usize)
    }
}

fn nested_rank<'v>(items: impl Iterator<Item = &'v Value>, len: usize, mut rank: f64) -> f64 {
    for item in items {
        match item {
            Value::List(children) => {
                rank = nested_rank(children.iter(), children.len(), rank + 1.0);
            }
            Value::Map(children) => {
                rank = nested_rank(children.values(), children.len(), rank + 1.0);
            }
            _ => {}
        }
    }
    rank / len.max(1) as f64
}
