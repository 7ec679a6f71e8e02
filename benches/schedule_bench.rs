// ABOUTME: Criterion benchmarks for payment schedule walking and in-memory seeding runs
// ABOUTME: Measures weekly and monthly schedules over long histories and a full simple seed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for schedule generation.
//!
//! Weekly schedules over ten years dominate payment volume; the full
//! in-memory seed shows the cost of generation plus invariant checks.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

use boardfund_seed::config::SeedConfig;
use boardfund_seed::generator::Generator;
use boardfund_seed::models::IntervalUnit;
use boardfund_seed::schedule::payment_dates;
use boardfund_seed::seeder::seed_simple;
use boardfund_seed::sink::MemorySink;
use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn bench_payment_schedules(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2024, 6, 22, 12, 0, 0).unwrap();
    let mut group = c.benchmark_group("payment_schedule");

    for years in [1_i64, 5, 10] {
        let start = now - Duration::days(365 * years);
        for unit in IntervalUnit::ALL {
            let payments = payment_dates(start, unit, now).count();
            group.throughput(Throughput::Elements(payments as u64));
            group.bench_with_input(
                BenchmarkId::new(unit.as_str(), format!("{years}y")),
                &start,
                |b, start| b.iter(|| payment_dates(black_box(*start), unit, now).count()),
            );
        }
    }

    group.finish();
}

fn bench_simple_seed(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2024, 6, 22, 12, 0, 0).unwrap();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let config = SeedConfig {
        seed: Some(42),
        ..SeedConfig::default()
    };

    c.bench_function("seed_simple_in_memory", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let mut generator = Generator::new(42, now);
                let mut sink = MemorySink::new(config.batch_size);
                black_box(seed_simple(&mut generator, &mut sink, &config).await.unwrap())
            })
        });
    });
}

criterion_group!(benches, bench_payment_schedules, bench_simple_seed);
criterion_main!(benches);
