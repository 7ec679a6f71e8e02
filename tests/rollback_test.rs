// ABOUTME: Integration tests for all-or-nothing seeding runs
// ABOUTME: A failing insert anywhere in the run leaves the committed tables untouched
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use boardfund_seed::constants::tables;
use boardfund_seed::errors::ErrorCode;
use boardfund_seed::generator::Generator;
use boardfund_seed::seeder::{finish_run, seed_simple};
use boardfund_seed::sink::memory::MemoryTables;
use boardfund_seed::sink::{MemorySink, SeedSink};
use boardfund_seed::config::SeedConfig;
use common::{capture_logs, fixed_now, init_test_logging, small_config};
use tracing::Level;

#[tokio::test]
async fn test_failed_payment_batch_rolls_back_everything() {
    init_test_logging();
    let config = small_config(11);
    let mut sink = MemorySink::new(config.batch_size).failing_on(tables::DONATION_PAYMENT);

    let outcome = seed_simple(&mut Generator::new(11, fixed_now()), &mut sink, &config).await;
    assert!(outcome.is_err());
    assert!(!sink.staged().donations.is_empty());

    let err = finish_run(&mut sink, outcome).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::DatabaseError);
    assert_eq!(err.exit_code(), 1);
    assert_eq!(sink.committed(), &MemoryTables::default());
    assert_eq!(sink.staged(), &MemoryTables::default());
}

#[tokio::test]
async fn test_failed_run_keeps_previous_data() {
    init_test_logging();
    let mut first = MemorySink::new(100);
    let outcome = seed_simple(
        &mut Generator::new(12, fixed_now()),
        &mut first,
        &small_config(12),
    )
    .await;
    finish_run(&mut first, outcome).await.unwrap();
    let before = first.committed().clone();

    let mut sink = MemorySink::with_committed(before.clone(), 100).failing_on(tables::FUND);
    let mut config = small_config(13);
    config.reset = true;
    let outcome = seed_simple(&mut Generator::new(13, fixed_now()), &mut sink, &config).await;
    finish_run(&mut sink, outcome).await.unwrap_err();

    assert_eq!(sink.committed(), &before);
    assert!(sink.commit().await.is_err());
}

#[tokio::test]
async fn test_rollback_log_distinguishes_rejected_input_from_failed_writes() {
    let (logs, _guard) = capture_logs(Level::ERROR);

    let config = SeedConfig {
        batch_size: 0,
        ..small_config(14)
    };
    let mut sink = MemorySink::new(10);
    let outcome = seed_simple(&mut Generator::new(14, fixed_now()), &mut sink, &config).await;
    let err = finish_run(&mut sink, outcome).await.unwrap_err();
    assert!(err.code.is_pre_write());
    assert!(logs.contents().contains("Seeding aborted before any write"));
    assert!(!logs.contents().contains("rolling back all staged rows"));

    let config = small_config(15);
    let mut sink = MemorySink::new(config.batch_size).failing_on(tables::DONATION);
    let outcome = seed_simple(&mut Generator::new(15, fixed_now()), &mut sink, &config).await;
    let err = finish_run(&mut sink, outcome).await.unwrap_err();
    assert!(!err.code.is_pre_write());
    assert!(logs.contents().contains("rolling back all staged rows"));
}
