//! Benchmarks for wheel analysis.

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lottostat::prelude::*;

/// Generate `n` draws of five distinct numbers, most recent first
fn generate_rows(n: usize) -> Vec<DrawnNumber> {
  let latest = NaiveDate::from_ymd_opt(2025, 10, 14).unwrap();
  let mut rows = Vec::with_capacity(n * 5);

  for i in 0..n {
    let date = latest - Duration::days(i as i64);
    for j in 0..5 {
      let number = ((i * 31 + j * 13 + (i * i) % 7) % 90 + 1) as u8; // Deterministic "random"
      rows.push(DrawnNumber::new(date, number));
    }
  }

  rows
}

fn generate_source(n: usize) -> MemorySource {
  let mut source = MemorySource::new();
  for wheel in Wheel::ALL {
    for row in generate_rows(n) {
      source.push(SourceRow { wheel, date: row.date, seq: 0, number: row.number });
    }
  }
  source
}

fn bench_single_wheel(c: &mut Criterion) {
  let rows = generate_rows(1000);
  let analyzer = Analyzer::default();

  c.bench_function("analyze_1000_draws", |b| {
    b.iter(|| {
      let _ = black_box(analyzer.analyze("Bari", black_box(&rows)));
    })
  });
}

fn bench_grouping(c: &mut Criterion) {
  let rows = generate_rows(1000);

  c.bench_function("group_1000_draws", |b| {
    b.iter(|| {
      let _ = black_box(group_draws(black_box(&rows)));
    })
  });
}

fn bench_scaling(c: &mut Criterion) {
  let analyzer = Analyzer::default();

  let mut group = c.benchmark_group("scaling");

  for size in [100, 500, 1000, 5000, 10000].iter() {
    let rows = generate_rows(*size);

    group.bench_with_input(BenchmarkId::new("analyze", size), size, |b, _| {
      b.iter(|| {
        let _ = black_box(analyzer.analyze("Bari", black_box(&rows)));
      })
    });
  }

  group.finish();
}

fn bench_parallel_wheels(c: &mut Criterion) {
  let source = generate_source(1000);
  let analyzer = Analyzer::default();
  let wheels: Vec<&str> = Wheel::ALL.iter().map(|w| w.as_str()).collect();

  c.bench_function("parallel_all_wheels", |b| {
    b.iter(|| {
      let _ = black_box(analyze_parallel(black_box(&analyzer), &source, wheels.clone()));
    })
  });
}

criterion_group!(benches, bench_single_wheel, bench_grouping, bench_scaling, bench_parallel_wheels);
criterion_main!(benches);
