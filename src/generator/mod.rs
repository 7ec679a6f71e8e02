// ABOUTME: Synthetic data generator for members, funds, plans, donations, and payments
// ABOUTME: Seeded RNG plus a fixed clock so every run is reproducible for a given seed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Synthetic Data Generator
//!
//! [`Generator`] produces in-memory rows for the five seeded tables. It owns
//! a `StdRng` seeded once per run and captures `now` at construction, so the
//! same seed and clock always yield the same data shape (identifiers are
//! random v4 UUIDs and are not part of that guarantee).
//!
//! Generation is split by entity:
//!
//! - [`members`]: donors with faker names and emails
//! - [`funds`]: funds with payout frequency and next-payment dates
//! - [`plans`]: unique (amount, interval, fund) plans with a bounded retry loop
//! - [`donations`]: the simple sampling variant and the fund-lifetime variant
//! - [`payments`]: recurring schedules and one-time payments, plus batching
//! - [`invariants`]: consistency checks run before the transaction commits

/// Donation generation (simple and lifetime-distributed variants)
pub mod donations;
/// Fund generation
pub mod funds;
/// Consistency checks over generated rows
pub mod invariants;
/// Member generation
pub mod members;
/// Payment generation and batching
pub mod payments;
/// Donation plan generation
pub mod plans;

pub use donations::DonationDraws;
pub use invariants::Violation;
pub use payments::PaymentBuffer;
pub use plans::{PlanBatch, PlanShortfall};

use boardfund_core::constants::amounts;
use chrono::{DateTime, Duration, Utc};
use rand::distributions::{Alphanumeric, DistString};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Length of generated provider identifiers
const PROVIDER_REFERENCE_LEN: usize = 17;

/// Random row factory bound to one seed and one clock
#[derive(Debug)]
pub struct Generator {
    rng: StdRng,
    seed: u64,
    now: DateTime<Utc>,
}

impl Generator {
    /// Create a generator for a run starting at `now`
    #[must_use]
    pub fn new(seed: u64, now: DateTime<Utc>) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            now,
        }
    }

    /// Seed the RNG was created with
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// The run's notion of "now"
    #[must_use]
    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Uniform instant in `[start, end]`, or `start` if the range is empty
    fn instant_between(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> DateTime<Utc> {
        let span = (end - start).num_seconds();
        if span <= 0 {
            return start;
        }
        start + Duration::seconds(self.rng.gen_range(0..=span))
    }

    /// Uniform instant within `window` before now
    fn instant_within(&mut self, window: Duration) -> DateTime<Utc> {
        self.instant_between(self.now - window, self.now)
    }

    /// Whole-dollar amount in cents between the configured bounds
    fn amount_cents(&mut self) -> i32 {
        self.rng.gen_range(amounts::MIN_DOLLARS..=amounts::MAX_DOLLARS) * amounts::CENTS_PER_DOLLAR
    }

    /// Provider-style reference such as `PAY-8XK2...`
    fn provider_reference(&mut self, prefix: &str) -> String {
        let suffix = Alphanumeric
            .sample_string(&mut self.rng, PROVIDER_REFERENCE_LEN)
            .to_uppercase();
        format!("{prefix}-{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_instant_between_stays_in_range() {
        let now = Utc.with_ymd_and_hms(2024, 6, 22, 12, 0, 0).unwrap();
        let mut generator = Generator::new(3, now);
        let start = now - Duration::days(10);

        for _ in 0..200 {
            let at = generator.instant_between(start, now);
            assert!(at >= start && at <= now);
        }
        assert_eq!(generator.instant_between(now, start), now);
    }

    #[test]
    fn test_amounts_are_whole_dollars() {
        let now = Utc.with_ymd_and_hms(2024, 6, 22, 12, 0, 0).unwrap();
        let mut generator = Generator::new(3, now);

        for _ in 0..200 {
            let cents = generator.amount_cents();
            assert_eq!(cents % 100, 0);
            assert!((1_000..=10_000).contains(&cents));
        }
    }

    #[test]
    fn test_provider_reference_format() {
        let now = Utc.with_ymd_and_hms(2024, 6, 22, 12, 0, 0).unwrap();
        let mut generator = Generator::new(3, now);

        let reference = generator.provider_reference("PAY");
        assert!(reference.starts_with("PAY-"));
        assert_eq!(reference.len(), 4 + PROVIDER_REFERENCE_LEN);
    }
}
