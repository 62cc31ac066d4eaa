//! Element access, slicing, and the errors they raise.

use lazyq::{Error, Predicate, Query, Value};

fn over(p: fn(i64) -> bool) -> Option<Predicate> {
    Some(Predicate::new(move |v, _| v.as_i64().is_some_and(p)))
}

#[test]
fn first_and_last() {
    let q = Query::from_values([3, 8, 5, 10]);
    assert_eq!(q.first(None).unwrap(), Value::Int(3));
    assert_eq!(q.last(None).unwrap(), Value::Int(10));
    assert_eq!(q.first(over(|n| n > 4)).unwrap(), Value::Int(8));
    assert_eq!(q.last(over(|n| n < 9)).unwrap(), Value::Int(5));
}

#[test]
fn empty_results_distinguish_predicate_from_source() {
    let empty = Query::from_values(Vec::<i64>::new());
    let err = empty.first(None).unwrap_err();
    assert!(matches!(err, Error::EmptySequence { predicate: false }));
    assert_eq!(err.to_string(), "The source sequence is empty");

    let err = Query::from_values([1, 2]).last(over(|n| n > 5)).unwrap_err();
    assert!(matches!(err, Error::EmptySequence { predicate: true }));
    assert_eq!(err.to_string(), "No element satisfies the condition");
}

#[test]
fn or_default_variants_swallow_only_emptiness() {
    let q = Query::from_values([1, 2, 3]);
    let none = over(|n| n > 10);
    assert_eq!(q.first_or_default(none.clone(), Value::Null).unwrap(), Value::Null);
    assert_eq!(q.last_or_default(none.clone(), Value::Int(-1)).unwrap(), Value::Int(-1));
    assert_eq!(q.single_or_default(none, Value::from("none")).unwrap(), Value::from("none"));
    assert!(matches!(
        q.single_or_default(over(|n| n > 1), Value::Null),
        Err(Error::MultipleElements { predicate: true })
    ));
}

#[test]
fn single_requires_exactly_one() {
    let q = Query::from_values([4, 7, 9]);
    assert_eq!(q.single(over(|n| n == 7)).unwrap(), Value::Int(7));
    assert!(matches!(
        q.single(None),
        Err(Error::MultipleElements { predicate: false })
    ));
    assert!(matches!(
        q.single(over(|n| n > 100)),
        Err(Error::EmptySequence { predicate: true })
    ));
    assert_eq!(Query::from_values([1]).single(None).unwrap(), Value::Int(1));
}

#[test]
fn element_at_indexes_the_sequential_result() {
    let q = Query::from_values([10, 20, 30]).filter(|v, _| v.as_i64() != Some(20));
    assert_eq!(q.element_at(1).unwrap(), Value::Int(30));
    assert!(matches!(
        q.element_at(2),
        Err(Error::IndexOutOfRange { index: 2, len: 2 })
    ));
    assert!(matches!(
        q.element_at(-1),
        Err(Error::IndexOutOfRange { index: -1, .. })
    ));
    assert_eq!(q.element_at_or_default(9, Value::Int(0)).unwrap(), Value::Int(0));
    assert!(matches!(
        Query::from_values(Vec::<i64>::new()).element_at(0),
        Err(Error::EmptySequence { predicate: false })
    ));
}

#[test]
fn take_and_skip_count_accepted_elements() {
    let q = Query::from_values(1..=10).filter(|v, _| v.as_i64().is_some_and(|n| n % 2 == 0));
    let page: Vec<i64> = q
        .clone()
        .skip(1)
        .take(2)
        .to_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_i64)
        .collect();
    assert_eq!(page, vec![4, 6]);
    assert_eq!(q.clone().take(0).count(None).unwrap(), 0);
    assert_eq!(q.skip(50).count(None).unwrap(), 0);
}

#[test]
fn count_with_predicate() {
    let q = Query::from_values([1, 2, 3, 4, 5]);
    assert_eq!(q.count(None).unwrap(), 5);
    assert_eq!(q.count(over(|n| n % 2 == 1)).unwrap(), 3);
}
