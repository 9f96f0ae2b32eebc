//! Commit-path performance benchmarks.
//!
//! Measures duplicate index construction, candidate checks and validation
//! against sheets of increasing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sheetwright::{
    DuplicatePolicyEngine, HeaderRuleInferer, Row, RowContext, RuleSet, ValidationEngine,
};

const HEADERS: &[&str] = &["ID (Unique)", "Name (R)", "Email (duplicate-warn)", "Amount", "Notes"];

/// Build `n` rows with distinct identifiers.
fn generate_rows(n: usize) -> Vec<Row> {
    (0..n)
        .map(|i| {
            Row::new([
                format!("ID{:06}", i),
                format!("Person {}", i),
                format!("person{}@example.com", i),
                format!("{}.{:02}", i % 1000, i % 100),
                String::new(),
            ])
        })
        .collect()
}

fn rules() -> RuleSet {
    let headers = sheetwright::Header::from_names(HEADERS.iter().copied());
    HeaderRuleInferer::new().infer(&headers)
}

/// Benchmark building the duplicate index.
fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("duplicate_index");
    let engine = DuplicatePolicyEngine::new();
    let rules = rules();

    for size in [100, 1_000, 10_000] {
        let rows = generate_rows(size);
        group.bench_with_input(BenchmarkId::new("build", size), &rows, |b, rows| {
            b.iter(|| black_box(engine.index(rows, &rules, None)))
        });
    }

    group.finish();
}

/// Benchmark checking candidates against a prebuilt index.
fn bench_candidate_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("duplicate_check");
    let engine = DuplicatePolicyEngine::new();
    let rules = rules();
    let rows = generate_rows(10_000);
    let index = engine.index(&rows, &rules, None);

    let fresh = Row::new(["ID999999", "New Person", "new@example.com", "1.00", ""]);
    let clash = rows[5_000].clone();

    group.bench_function("fresh_candidate", |b| {
        b.iter(|| black_box(index.check(&fresh, None)))
    });

    group.bench_function("colliding_candidate", |b| {
        b.iter(|| black_box(index.check(&clash, None)))
    });

    group.finish();
}

/// Benchmark full row validation.
fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");
    let engine = ValidationEngine::new();
    let rules = rules();
    let rows = generate_rows(100);

    group.bench_function("single_row", |b| {
        b.iter(|| black_box(engine.validate(&rows[0], &rules, RowContext::New)))
    });

    group.bench_function("batch_100", |b| {
        b.iter(|| {
            for row in &rows {
                black_box(engine.validate(row, &rules, RowContext::New));
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_index_build, bench_candidate_check, bench_validation);
criterion_main!(benches);
