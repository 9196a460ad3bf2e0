use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use fluorm::{Builder, Grammar, MySqlGrammar, Record, Value};

/// Build a builder with `n` predicates:
/// SELECT * FROM `t` WHERE `col0` = ? AND `col1` IN (?, ?) ...
fn build_select(n: usize) -> Builder {
    let mut builder = Builder::table("t")
        .join("u", "t.id", "=", "u.t_id")
        .order_by_desc("t.id")
        .limit(10);
    for i in 0..n {
        let column = format!("col{i}");
        builder = if i % 2 == 0 {
            builder.where_eq(&column, i as i64)
        } else {
            builder.where_in(&column, [i as i64, i as i64 + 1])
        };
    }
    builder
}

fn bench_compile_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("grammar/compile_select");

    for n in [1, 5, 10, 50, 100] {
        let builder = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &builder, |b, builder| {
            b.iter(|| black_box((builder.to_sql(), builder.get_bindings())));
        });
    }

    group.finish();
}

fn bench_build_and_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("grammar/build_and_compile");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let builder = build_select(n);
                black_box(builder.to_sql());
            });
        });
    }

    group.finish();
}

fn bench_compile_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("grammar/compile_insert");
    let grammar = MySqlGrammar::new();
    let query = Builder::table("t").query().clone();

    for rows in [1, 10, 100, 1000] {
        let records: Vec<Record> = (0..rows)
            .map(|i| {
                (0..8)
                    .map(|c| (format!("col{c}"), Value::from(i * 8 + c)))
                    .collect()
            })
            .collect();
        group.bench_with_input(
            BenchmarkId::from_parameter(rows),
            &records,
            |b, records| {
                b.iter(|| black_box(grammar.compile_insert(&query, records)));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compile_select,
    bench_build_and_compile,
    bench_compile_insert
);
criterion_main!(benches);
