//! Result materializer: drives one pass and shapes accepted outcomes.
//!
//! Modes:
//! - sequential: values only, in acceptance order. Grouped outcomes collapse
//!   into one list slot per group (at the group's first appearance); joined
//!   outcomes contribute each produced entry; re-keyed outcomes overwrite the
//!   slot their key first took.
//! - keyed: later outcomes overwrite earlier ones under the same key. Grouped
//!   values append under their group key; positional values take the next
//!   free integer key.
//! - keys: the key of every accepted outcome, for `index_of`.
//! - drain: run the pass for its side effects on the context only.
//!
//! `resolve` runs ahead of every pass and turns barriers into a materialized
//! source for the last segment of the chain.

use std::borrow::Cow;

use indexmap::IndexMap;

use lazyq_core::prelude::QueryConfig;
use lazyq_core::{Key, Result, Source, Value};
use lazyq_operators::{Descriptor, KeyMode, Outcome, PassContext};

use crate::iterator::EvalIterator;

/// Split `chain` at its barriers. An `order_by` sorts the keyed result of
/// everything before it. A join, group join or lookup with steps after it is
/// materialized keyed, so those steps see produced entries and whole groups;
/// as the last step it stays in the pass. Each resolved segment becomes the
/// source of the next.
pub fn resolve<'s, 'c>(
    source: &'s Source,
    chain: &'c [Descriptor],
    config: &QueryConfig,
) -> Result<(Cow<'s, Source>, &'c [Descriptor])> {
    let mut resolved: Option<Source> = None;
    let mut start = 0;
    for (i, descriptor) in chain.iter().enumerate() {
        if !descriptor.is_barrier() {
            continue;
        }
        let input = resolved.as_ref().unwrap_or(source);
        let mut ctx = PassContext::new();
        let segment = match descriptor {
            Descriptor::OrderBy(order) => {
                order.sort(Materializer::new(input, &chain[start..i], config).keyed(&mut ctx)?)?
            }
            _ if i + 1 == chain.len() => break,
            _ => Materializer::new(input, &chain[start..=i], config).keyed(&mut ctx)?,
        };
        resolved = Some(segment);
        start = i + 1;
    }
    let source = match resolved {
        Some(s) => Cow::Owned(s),
        None => Cow::Borrowed(source),
    };
    Ok((source, &chain[start..]))
}

pub struct Materializer<'a> {
    source: &'a Source,
    chain: &'a [Descriptor],
    config: &'a QueryConfig,
}

impl<'a> Materializer<'a> {
    pub fn new(source: &'a Source, chain: &'a [Descriptor], config: &'a QueryConfig) -> Self {
        Self {
            source,
            chain,
            config,
        }
    }

    /// One full pass; `sink` sees each accepted outcome before the cursor moves.
    fn drive(
        &self,
        ctx: &mut PassContext,
        mut sink: impl FnMut(&Outcome) -> Result<()>,
    ) -> Result<()> {
        let mut it = EvalIterator::new(self.source, self.chain, self.config, ctx);
        it.rewind();
        while it.valid() {
            if let Some(out) = it.current()? {
                if out.is_accepted() {
                    sink(out)?;
                }
            }
            it.next();
        }
        Ok(())
    }

    pub fn sequential(&self, ctx: &mut PassContext) -> Result<Vec<Value>> {
        let mut builder = SequentialBuilder::default();
        self.drive(ctx, |out| {
            builder.push(out);
            Ok(())
        })?;
        Ok(builder.finish())
    }

    pub fn keyed(&self, ctx: &mut PassContext) -> Result<Source> {
        let mut builder = KeyedBuilder::default();
        self.drive(ctx, |out| {
            builder.push(out);
            Ok(())
        })?;
        Ok(builder.finish())
    }

    pub fn keys(&self, ctx: &mut PassContext) -> Result<Vec<Key>> {
        let mut keys = Vec::new();
        self.drive(ctx, |out| {
            keys.push(out.key.clone());
            Ok(())
        })?;
        Ok(keys)
    }

    pub fn drain(&self, ctx: &mut PassContext) -> Result<()> {
        self.drive(ctx, |_| Ok(()))
    }
}

enum Slot {
    Value(Value),
    Group(Key),
}

#[derive(Default)]
struct SequentialBuilder {
    slots: Vec<Slot>,
    groups: IndexMap<Key, Vec<Value>>,
    /// Slot taken by each re-keyed key.
    rekeyed: IndexMap<Key, usize>,
}

impl SequentialBuilder {
    fn push(&mut self, out: &Outcome) {
        match out.key_mode {
            KeyMode::Grouped => {
                if !self.groups.contains_key(&out.key) {
                    self.slots.push(Slot::Group(out.key.clone()));
                }
                self.groups
                    .entry(out.key.clone())
                    .or_default()
                    .push(out.value.clone());
                return;
            }
            KeyMode::Rekeyed => {
                let value = Slot::Value(out.value.clone());
                match self.rekeyed.get(&out.key) {
                    Some(&slot) => self.slots[slot] = value,
                    None => {
                        self.rekeyed.insert(out.key.clone(), self.slots.len());
                        self.slots.push(value);
                    }
                }
                return;
            }
            KeyMode::Source | KeyMode::Positional => {}
        }
        match (&out.value, out.joined) {
            (Value::List(produced), true) => self
                .slots
                .extend(produced.iter().cloned().map(Slot::Value)),
            (value, _) => self.slots.push(Slot::Value(value.clone())),
        }
    }

    fn finish(mut self) -> Vec<Value> {
        self.slots
            .into_iter()
            .map(|slot| match slot {
                Slot::Value(v) => v,
                Slot::Group(k) => Value::List(self.groups.swap_remove(&k).unwrap_or_default()),
            })
            .collect()
    }
}

#[derive(Default)]
struct KeyedBuilder {
    out: Source,
    groups: IndexMap<Key, Vec<Value>>,
    next_slot: i64,
}

impl KeyedBuilder {
    fn insert(&mut self, key: Key, value: Value) {
        if let Key::Int(i) = key {
            self.next_slot = self.next_slot.max(i.saturating_add(1));
        }
        self.out.insert(key, value);
    }

    fn append(&mut self, value: Value) {
        let key = Key::Int(self.next_slot);
        self.insert(key, value);
    }

    fn push(&mut self, out: &Outcome) {
        match out.key_mode {
            KeyMode::Grouped => {
                if !self.out.contains_key(&out.key) {
                    // Placeholder fixes the group's position; filled in `finish`.
                    self.insert(out.key.clone(), Value::Null);
                }
                self.groups
                    .entry(out.key.clone())
                    .or_default()
                    .push(out.value.clone());
            }
            KeyMode::Positional => match (&out.value, out.joined) {
                (Value::List(produced), true) => {
                    for item in produced {
                        self.append(item.clone());
                    }
                }
                (value, _) => self.append(value.clone()),
            },
            KeyMode::Source | KeyMode::Rekeyed => match (&out.value, out.joined) {
                (Value::List(produced), true) => {
                    for item in produced {
                        self.append(item.clone());
                    }
                }
                (value, _) => self.insert(out.key.clone(), value.clone()),
            },
        }
    }

    fn finish(mut self) -> Source {
        for (key, values) in self.groups {
            self.out.insert(key, Value::List(values));
        }
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazyq_core::indexed;
    use lazyq_operators::filter::Filter;
    use lazyq_operators::join::{GroupJoin, Join};
    use lazyq_operators::lookup::Lookup;
    use lazyq_operators::slice::Slice;
    use lazyq_operators::sort::OrderBy;
    use lazyq_operators::{PairSelector, Predicate, Selector};

    fn parity() -> Descriptor {
        Lookup::new(Selector::new(|v, _| {
            Value::from(if v.as_i64().unwrap_or(0) % 2 == 0 { "even" } else { "odd" })
        }))
        .into()
    }

    #[test]
    fn sequential_collapses_groups_at_first_appearance() {
        let source = indexed([1, 2, 3, 4, 5]);
        let chain = [parity()];
        let config = QueryConfig::default();
        let m = Materializer::new(&source, &chain, &config);
        let got = m.sequential(&mut PassContext::new()).unwrap();
        assert_eq!(
            got,
            vec![Value::from(vec![1, 3, 5]), Value::from(vec![2, 4])]
        );
    }

    #[test]
    fn keyed_overwrites_and_groups_append() {
        let source = indexed([1, 2, 3]);
        let chain = [parity()];
        let config = QueryConfig::default();
        let got = Materializer::new(&source, &chain, &config)
            .keyed(&mut PassContext::new())
            .unwrap();
        let keys: Vec<_> = got.keys().cloned().collect();
        assert_eq!(keys, vec![Key::from("odd"), Key::from("even")]);
        assert_eq!(got[&Key::from("odd")], Value::from(vec![1, 3]));
    }

    #[test]
    fn keys_mode_reports_source_keys() {
        let mut source = Source::new();
        source.insert(Key::from("a"), Value::Int(1));
        source.insert(Key::from("b"), Value::Int(2));
        let chain: [Descriptor; 1] =
            [Filter::new(Predicate::new(|v, _| v.as_i64() == Some(2))).into()];
        let config = QueryConfig::default();
        let keys = Materializer::new(&source, &chain, &config)
            .keys(&mut PassContext::new())
            .unwrap();
        assert_eq!(keys, vec![Key::from("b")]);
    }

    #[test]
    fn resolve_sorts_leading_segment() {
        let source = indexed([3, 1, 2]);
        let chain: [Descriptor; 2] = [
            OrderBy::ascending(Selector::new(|v, _| v.clone())).into(),
            Filter::new(Predicate::new(|v, _| v.as_i64() != Some(2))).into(),
        ];
        let config = QueryConfig::default();
        let (sorted, rest) = resolve(&source, &chain, &config).unwrap();
        assert_eq!(rest.len(), 1);
        let keys: Vec<_> = sorted.keys().cloned().collect();
        assert_eq!(keys, vec![Key::Int(1), Key::Int(2), Key::Int(0)]);
        let got = Materializer::new(&sorted, rest, &config)
            .sequential(&mut PassContext::new())
            .unwrap();
        assert_eq!(got, vec![Value::Int(1), Value::Int(3)]);
    }

    fn id() -> Selector {
        Selector::new(|v, _| v.clone())
    }

    #[test]
    fn sequential_collapses_rekeyed_outcomes_by_key() {
        let source = indexed([1, 1, 2]);
        let chain: [Descriptor; 1] = [GroupJoin::new(
            indexed([1]),
            id(),
            id(),
            PairSelector::new(|o, _| o.clone()),
        )
        .into()];
        let config = QueryConfig::default();
        let m = Materializer::new(&source, &chain, &config);
        let seq = m.sequential(&mut PassContext::new()).unwrap();
        assert_eq!(seq, vec![Value::Int(1), Value::Int(2)]);
        let keyed = m.keyed(&mut PassContext::new()).unwrap();
        assert_eq!(keyed.values().cloned().collect::<Vec<_>>(), seq);
    }

    #[test]
    fn resolve_materializes_joins_followed_by_more_steps() {
        let source = indexed([1, 2]);
        let join: Descriptor = Join::new(
            indexed([1, 1]),
            id(),
            id(),
            PairSelector::new(|_, _| Value::Int(10)),
        )
        .into();
        let keep_ten: Descriptor = Filter::new(Predicate::new(|v, _| v == &Value::Int(10))).into();
        let config = QueryConfig::default();

        let (alone, rest) = resolve(&source, std::slice::from_ref(&join), &config).unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(alone.len(), 2);

        let chain = [join, keep_ten];
        let (entries, rest) = resolve(&source, &chain, &config).unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(*entries, indexed([10, 10]));
        let got = Materializer::new(&entries, rest, &config)
            .sequential(&mut PassContext::new())
            .unwrap();
        assert_eq!(got, vec![Value::Int(10), Value::Int(10)]);
    }

    #[test]
    fn resolve_turns_groups_into_list_elements() {
        let source = indexed([1, 2, 3]);
        let chain = [parity(), Slice::take(1).into()];
        let config = QueryConfig::default();
        let (groups, rest) = resolve(&source, &chain, &config).unwrap();
        assert_eq!(groups[&Key::from("odd")], Value::from(vec![1, 3]));
        let got = Materializer::new(&groups, rest, &config)
            .sequential(&mut PassContext::new())
            .unwrap();
        assert_eq!(got, vec![Value::from(vec![1, 3])]);
    }
}
