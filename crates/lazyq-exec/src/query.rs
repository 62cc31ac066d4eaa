//! Query builder: a source plus an ordered chain of descriptors.
//!
//! Non-terminal operators consume the builder and hand it back with one more
//! descriptor appended; nothing is evaluated until a terminal runs (see
//! `terminal.rs`). Cloning a builder is cheap: the source and every callback
//! are reference-counted.

use std::sync::Arc;

use lazyq_core::prelude::{QueryConfig, ValueKind};
use lazyq_core::{indexed, Error, Key, Result, Source, Value};
use lazyq_operators::aggregate::Aggregate;
use lazyq_operators::filter::Filter;
use lazyq_operators::join::{GroupJoin, Join};
use lazyq_operators::lookup::Lookup;
use lazyq_operators::map::Project;
use lazyq_operators::search::Search;
use lazyq_operators::slice::Slice;
use lazyq_operators::sort::OrderBy;
use lazyq_operators::zip::Zip;
use lazyq_operators::{Accumulator, Descriptor, PairSelector, Predicate, SearchFn, Selector};

#[derive(Debug, Clone)]
pub struct Query {
    source: Arc<Source>,
    chain: Vec<Descriptor>,
    config: QueryConfig,
}

impl Query {
    pub fn from_map(source: Source) -> Self {
        Self {
            source: Arc::new(source),
            chain: Vec::new(),
            config: QueryConfig::default(),
        }
    }

    /// A list source, keyed `0..n`.
    pub fn from_values<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::from_map(indexed(values))
    }

    /// Adapt a dynamic value: lists and maps become sources, anything else
    /// is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Err(Error::ArgumentNull("source".into())),
            Value::List(items) => Ok(Self::from_values(items)),
            Value::Map(map) => Ok(Self::from_map(map)),
            other => Err(Error::InvalidArgument(format!(
                "source must be a list or a map, got {}",
                other.kind()
            ))),
        }
    }

    pub fn from_json(json: serde_json::Value) -> Result<Self> {
        Self::from_value(Value::from(json))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Self::from_json(json)
    }

    /// Attach a configuration. Rejects invalid configs and sources over the
    /// configured length limit; join strictness applies to joins already in
    /// the chain as well as later ones.
    pub fn with_config(mut self, config: QueryConfig) -> Result<Self> {
        config.validate()?;
        config.check_source_len(self.source.len())?;
        for descriptor in &mut self.chain {
            match descriptor {
                Descriptor::Join(join) => join.loose_keys = config.loose_join_keys,
                Descriptor::GroupJoin(join) => join.loose_keys = config.loose_join_keys,
                _ => {}
            }
        }
        self.config = config;
        Ok(self)
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn descriptors(&self) -> &[Descriptor] {
        &self.chain
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Append an already-built descriptor.
    pub fn then(mut self, descriptor: impl Into<Descriptor>) -> Self {
        self.chain.push(descriptor.into());
        self
    }

    /// Keep elements the predicate accepts (`where`).
    #[doc(alias = "where")]
    pub fn filter(self, predicate: impl Fn(&Value, &Key) -> bool + Send + Sync + 'static) -> Self {
        self.then(Filter::new(Predicate::new(predicate)))
    }

    pub fn of_type(self, kind: ValueKind) -> Self {
        self.then(Filter::of_kind(kind))
    }

    /// `of_type` by category name (`"int"`, `"string"`, `"list"`, ...).
    pub fn of_type_name(self, name: &str) -> Result<Self> {
        let kind: ValueKind = name.parse()?;
        Ok(self.of_type(kind))
    }

    pub fn select(self, selector: impl Fn(&Value, &Key) -> Value + Send + Sync + 'static) -> Self {
        self.then(Project::new(Selector::new(selector)))
    }

    /// Keep only elements `func(value, index, calls)` accepts. Misses do not
    /// compact the index seen by later elements.
    pub fn search(self, func: impl Fn(&Value, usize, usize) -> bool + Send + Sync + 'static) -> Self {
        self.then(Search::new(SearchFn::new(func)))
    }

    /// Inner join against `inner`. Each outer element is replaced by one
    /// `result(outer, inner)` per inner element whose key matches.
    pub fn join(
        self,
        inner: Source,
        outer_key: impl Fn(&Value, &Key) -> Value + Send + Sync + 'static,
        inner_key: impl Fn(&Value, &Key) -> Value + Send + Sync + 'static,
        result: impl Fn(&Value, &Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        let loose = self.config.loose_join_keys;
        self.then(
            Join::new(
                inner,
                Selector::new(outer_key),
                Selector::new(inner_key),
                PairSelector::new(result),
            )
            .with_loose_keys(loose),
        )
    }

    /// Group join against `inner`: re-keys each outer element by its key and
    /// hands `result` the map of matching inner entries (possibly empty).
    pub fn group_join(
        self,
        inner: Source,
        outer_key: impl Fn(&Value, &Key) -> Value + Send + Sync + 'static,
        inner_key: impl Fn(&Value, &Key) -> Value + Send + Sync + 'static,
        result: impl Fn(&Value, &Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        let loose = self.config.loose_join_keys;
        self.then(
            GroupJoin::new(
                inner,
                Selector::new(outer_key),
                Selector::new(inner_key),
                PairSelector::new(result),
            )
            .with_loose_keys(loose),
        )
    }

    /// Group elements by `key_selector`, optionally projecting each element.
    pub fn group_by(
        self,
        key_selector: impl Fn(&Value, &Key) -> Value + Send + Sync + 'static,
        element_selector: Option<Selector>,
    ) -> Self {
        let lookup = Lookup::new(Selector::new(key_selector));
        match element_selector {
            Some(element) => self.then(lookup.with_element(element)),
            None => self.then(lookup),
        }
    }

    pub fn to_lookup(self, key_selector: impl Fn(&Value, &Key) -> Value + Send + Sync + 'static) -> Self {
        self.group_by(key_selector, None)
    }

    pub fn zip<V: Into<Value>>(
        self,
        second: impl IntoIterator<Item = V>,
        selector: impl Fn(&Value, &Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        let second = second.into_iter().map(Into::into).collect();
        self.then(Zip::new(second, PairSelector::new(selector)))
    }

    pub fn take(self, count: usize) -> Self {
        self.then(Slice::take(count))
    }

    pub fn skip(self, count: usize) -> Self {
        self.then(Slice::skip(count))
    }

    /// Stable sort by a scalar key. Everything before it is evaluated first.
    pub fn order_by(self, key_selector: impl Fn(&Value, &Key) -> Value + Send + Sync + 'static) -> Self {
        self.then(OrderBy::ascending(Selector::new(key_selector)))
    }

    pub fn order_by_descending(
        self,
        key_selector: impl Fn(&Value, &Key) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.then(OrderBy::descending(Selector::new(key_selector)))
    }

    /// Chain plus a terminal's own descriptor, without touching `self`.
    pub(crate) fn chain_with(&self, extra: Option<Descriptor>) -> Vec<Descriptor> {
        let mut chain = self.chain.clone();
        chain.extend(extra);
        chain
    }

    pub(crate) fn aggregate_step(func: impl Fn(&Value, &Value) -> Value + Send + Sync + 'static) -> Descriptor {
        Aggregate::new(Accumulator::new(func)).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_are_not_sources() {
        assert!(matches!(
            Query::from_value(Value::Null),
            Err(Error::ArgumentNull(_))
        ));
        assert!(matches!(
            Query::from_value(Value::Int(3)),
            Err(Error::InvalidArgument(_))
        ));
        let q = Query::from_json(serde_json::json!({"a": 1, "2": "b"})).unwrap();
        let keys: Vec<_> = q.source().keys().cloned().collect();
        assert_eq!(keys, vec![Key::from("a"), Key::Int(2)]);
    }

    #[test]
    fn non_terminals_only_record_descriptors() {
        let q = Query::from_values([1, 2, 3])
            .filter(|v, _| v.as_i64() != Some(2))
            .select(|v, _| v.clone())
            .take(1);
        let names: Vec<_> = q.descriptors().iter().map(Descriptor::name).collect();
        assert_eq!(names, vec!["filter", "project", "take"]);
    }

    #[test]
    fn config_limits_source_length() {
        let config = QueryConfig {
            max_source_len: Some(2),
            ..QueryConfig::default()
        };
        let err = Query::from_values([1, 2, 3]).with_config(config).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn config_reaches_existing_joins() {
        let config = QueryConfig {
            loose_join_keys: false,
            ..QueryConfig::default()
        };
        let q = Query::from_values([1])
            .join(Source::new(), |v, _| v.clone(), |v, _| v.clone(), |o, _| o.clone())
            .with_config(config)
            .unwrap();
        match &q.descriptors()[0] {
            Descriptor::Join(join) => assert!(!join.loose_keys),
            other => panic!("unexpected descriptor {other:?}"),
        }
    }

    #[test]
    fn unknown_type_names_are_rejected() {
        assert!(Query::from_values([1]).of_type_name("widget").is_err());
    }
}
