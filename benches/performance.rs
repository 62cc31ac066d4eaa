use criterion::{criterion_group, criterion_main, Criterion};
use lazyq::{Key, Query, Source, Value};

fn make_source(rows: usize) -> Source {
    (0..rows)
        .map(|i| {
            let record: Value = [
                ("group", Value::from(format!("group-{}", i % 4))),
                ("order", Value::Int(i as i64)),
                ("value", Value::Float((i % 10) as f64)),
            ]
            .into_iter()
            .collect();
            (Key::from(i), record)
        })
        .collect()
}

fn bench_filter_select_aggregate(c: &mut Criterion) {
    let query = Query::from_map(make_source(1024))
        .filter(|v, _| v.get("group").and_then(Value::as_str) != Some("group-0"))
        .select(|v, _| v.get("value").cloned().unwrap_or(Value::Null));
    c.bench_function("filter_select_aggregate", |b| {
        b.iter(|| {
            let _ = query
                .aggregate(|acc, v| {
                    Value::Float(acc.as_f64().unwrap_or(0.0) + v.as_f64().unwrap_or(0.0))
                })
                .unwrap();
        })
    });
}

fn bench_group_by(c: &mut Criterion) {
    let query = Query::from_map(make_source(1024))
        .to_lookup(|v, _| v.get("group").cloned().unwrap_or(Value::Null));
    c.bench_function("group_by", |b| {
        b.iter(|| {
            let _ = query.to_dictionary().unwrap();
        })
    });
}

fn bench_order_by_take(c: &mut Criterion) {
    let query = Query::from_map(make_source(1024))
        .order_by_descending(|v, _| v.get("value").cloned().unwrap_or(Value::Null))
        .take(10);
    c.bench_function("order_by_take", |b| {
        b.iter(|| {
            let _ = query.to_array().unwrap();
        })
    });
}

criterion_group!(
    queries,
    bench_filter_select_aggregate,
    bench_group_by,
    bench_order_by_take
);
criterion_main!(queries);
