// ABOUTME: Shared helpers for integration tests
// ABOUTME: Quiet logging, a pinned clock, small configurations, and invariant assertions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs, dead_code)]

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex, Once};

use boardfund_seed::config::SeedConfig;
use boardfund_seed::models::{IntervalUnit, PayoutFrequency};
use boardfund_seed::schedule::payment_dates;
use boardfund_seed::sink::memory::MemoryTables;
use chrono::{DateTime, TimeZone, Utc};
use tracing::subscriber::DefaultGuard;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Log output captured by [`capture_logs`]
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Route this thread's events at `level` and above into a buffer until the guard drops
pub fn capture_logs(level: tracing::Level) -> (CapturedLogs, DefaultGuard) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(move || writer.clone())
        .finish();
    (logs, tracing::subscriber::set_default(subscriber))
}

/// Clock every integration test runs against
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 22, 12, 0, 0).unwrap()
}

/// Default configuration with a fixed seed and a small batch size
pub fn small_config(seed: u64) -> SeedConfig {
    SeedConfig {
        member_count: 12,
        donation_count: 200,
        batch_size: 64,
        seed: Some(seed),
        ..SeedConfig::default()
    }
}

/// Assert every data-model invariant over committed tables
pub fn assert_consistent(tables: &MemoryTables, now: DateTime<Utc>) {
    let funds: HashMap<Uuid, _> = tables.funds.iter().map(|f| (f.id, f)).collect();
    let plans: HashMap<Uuid, _> = tables.plans.iter().map(|p| (p.id, p)).collect();

    for plan in &tables.plans {
        let fund = funds[&plan.fund_id];
        assert_eq!(
            fund.payout_frequency,
            PayoutFrequency::Monthly,
            "plan {} on once fund",
            plan.id
        );
    }

    let mut payments: HashMap<Uuid, Vec<_>> = HashMap::new();
    for payment in &tables.payments {
        payments.entry(payment.donation_id).or_default().push(payment);
    }

    for donation in &tables.donations {
        let fund = funds[&donation.fund_id];
        assert!(donation.created >= fund.created, "donation before fund");
        assert!(fund.is_open_at(donation.created, now), "donation outside fund lifetime");

        let paid = payments.get(&donation.id).cloned().unwrap_or_default();
        if donation.recurring {
            let plan = plans[&donation.donation_plan_id.unwrap()];
            assert_eq!(plan.fund_id, donation.fund_id);

            let expected: Vec<_> = payment_dates(donation.created, plan.interval_unit, now).collect();
            assert_eq!(paid.len(), expected.len(), "schedule length for {}", donation.id);
            for (payment, at) in paid.iter().zip(&expected) {
                assert_eq!(payment.created, *at);
                assert_eq!(payment.amount_cents, plan.amount_cents);
                assert!(payment.created <= now);
            }
            if plan.interval_unit == IntervalUnit::Week {
                let weeks = (now - donation.created).num_weeks();
                assert_eq!(i64::try_from(paid.len()).unwrap(), weeks + 1);
            }
        } else {
            assert!(donation.donation_plan_id.is_none());
            assert_eq!(fund.payout_frequency, PayoutFrequency::Once);
            assert_eq!(paid.len(), 1);
            assert_eq!(paid[0].created, donation.created);
        }
    }
}
