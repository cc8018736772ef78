//! Benchmarks for rule parsing and evaluation

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rule_ast::rule::get_or_parse;
use rule_ast::{combine_rules, evaluate, parse_rule, Record};

/// Build a rule with `n` conditions joined by AND
fn long_rule(n: usize) -> String {
    (0..n)
        .map(|i| format!("field_{} > {}", i, i))
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Build a record satisfying every condition of `long_rule(n)`
fn long_record(n: usize) -> Record {
    (0..n)
        .map(|i| (format!("field_{}", i), i as i64 + 1))
        .collect()
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    group.bench_function("two_conditions", |b| {
        b.iter(|| parse_rule(black_box("age > 30 AND department = 'Sales'")))
    });

    let rule = long_rule(32);
    group.bench_function("thirty_two_conditions", |b| {
        b.iter(|| parse_rule(black_box(&rule)))
    });

    let rules: Vec<String> = (0..16).map(|i| format!("age > {} AND level < {}", i, i + 10)).collect();
    group.bench_function("combine_sixteen_rules", |b| {
        b.iter(|| combine_rules(black_box(&rules)))
    });

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    let record = Record::new().with("age", 35).with("department", "Sales");
    let ast = parse_rule("age > 30 AND department = 'Sales'").unwrap();
    group.bench_function("two_conditions", |b| {
        b.iter(|| evaluate(black_box(&ast), black_box(&record)))
    });

    let ast = parse_rule(&long_rule(32)).unwrap();
    let record = long_record(32);
    group.bench_function("thirty_two_conditions", |b| {
        b.iter(|| evaluate(black_box(&ast), black_box(&record)))
    });

    let record = Record::new().with("age", 35).with("department", "Sales");
    group.bench_function("cached_two_conditions", |b| {
        b.iter(|| {
            let ast = get_or_parse(black_box("age > 30 AND department = 'Sales'")).unwrap();
            evaluate(&ast, &record)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_evaluate);
criterion_main!(benches);
