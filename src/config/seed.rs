// ABOUTME: Generation parameters for a seeding run
// ABOUTME: Entity counts, history window, plan sampling bounds, batch size, and RNG seed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashSet;
use std::ops::RangeInclusive;
use std::time::{SystemTime, UNIX_EPOCH};

use boardfund_core::constants::{amounts, defaults, FUND_NAMES};
use boardfund_core::models::IntervalUnit;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Constraints on donation plan sampling
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanSpec {
    /// Whole-dollar amounts to sample from
    pub amount_dollars: RangeInclusive<i32>,
    /// Billing intervals to sample from
    pub interval_units: Vec<IntervalUnit>,
    /// Draws allowed before giving up on reaching the target
    pub max_attempts: usize,
}

impl Default for PlanSpec {
    fn default() -> Self {
        Self {
            amount_dollars: amounts::MIN_DOLLARS..=amounts::MAX_DOLLARS,
            interval_units: IntervalUnit::ALL.to_vec(),
            max_attempts: defaults::PLAN_MAX_ATTEMPTS,
        }
    }
}

/// Everything a seeding run needs besides the database connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Members to create
    pub member_count: usize,
    /// Funds to create, one per name
    pub fund_names: Vec<String>,
    /// Unique plans requested
    pub plan_count: usize,
    /// Plan sampling constraints
    pub plan_spec: PlanSpec,
    /// Donation budget
    pub donation_count: usize,
    /// Share of simple-variant donations attached to a plan
    pub recurring_ratio: f64,
    /// Days before now covered by generated timestamps
    pub history_window_days: i64,
    /// Rows per multi-row insert
    pub batch_size: usize,
    /// RNG seed; drawn from the clock when absent
    pub seed: Option<u64>,
    /// Delete existing seeded rows inside the same transaction first
    pub reset: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            member_count: defaults::MEMBER_COUNT,
            fund_names: FUND_NAMES.iter().map(|name| (*name).to_owned()).collect(),
            plan_count: defaults::PLAN_COUNT,
            plan_spec: PlanSpec::default(),
            donation_count: defaults::DONATION_COUNT,
            recurring_ratio: defaults::RECURRING_RATIO,
            history_window_days: defaults::HISTORY_WINDOW_DAYS,
            batch_size: defaults::BATCH_SIZE,
            seed: None,
            reset: false,
        }
    }
}

impl SeedConfig {
    /// Reject settings the generator cannot honor
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a zero batch size, a ratio outside `[0, 1]`,
    /// a non-positive history window, or an empty plan sampling space
    pub fn validate(&self) -> AppResult<()> {
        if self.batch_size == 0 {
            return Err(AppError::invalid_input("batch size must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.recurring_ratio) {
            return Err(AppError::invalid_input(format!(
                "recurring ratio must be between 0 and 1, got {}",
                self.recurring_ratio
            )));
        }
        if self.history_window_days <= 0 {
            return Err(AppError::invalid_input(
                "history window must cover at least one day",
            ));
        }
        if self.plan_spec.amount_dollars.is_empty() || self.plan_spec.interval_units.is_empty() {
            return Err(AppError::invalid_input(
                "plan amounts and interval units must not be empty",
            ));
        }
        Ok(())
    }

    /// History window as a duration
    #[must_use]
    pub fn history_window(&self) -> Duration {
        Duration::days(self.history_window_days)
    }

    /// The configured seed, or one derived from the clock
    #[must_use]
    pub fn seed_or_clock(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(12345, |d| d.as_secs())
        })
    }
}

/// Parse the fund-history positional arguments: exactly three fund UUIDs
///
/// # Errors
///
/// Returns `InvalidInput` if the count is not three, an argument is not a UUID,
/// or the same fund is named twice
pub fn parse_fund_ids(args: &[String]) -> AppResult<Vec<Uuid>> {
    if args.len() != defaults::FUND_HISTORY_FUND_COUNT {
        return Err(AppError::invalid_input(format!(
            "expected exactly {} fund ids, got {}",
            defaults::FUND_HISTORY_FUND_COUNT,
            args.len()
        )));
    }

    let ids = args
        .iter()
        .map(|arg| {
            Uuid::parse_str(arg.trim())
                .map_err(|e| AppError::invalid_input(format!("'{arg}' is not a fund id: {e}")))
        })
        .collect::<AppResult<Vec<Uuid>>>()?;
    ensure_distinct_funds(&ids)?;
    Ok(ids)
}

/// Reject a fund id that appears more than once
///
/// # Errors
///
/// Returns `InvalidInput` naming the first repeated id
pub fn ensure_distinct_funds(ids: &[Uuid]) -> AppResult<()> {
    let mut seen = HashSet::with_capacity(ids.len());
    match ids.iter().find(|id| !seen.insert(**id)) {
        Some(id) => Err(AppError::invalid_input(format!("fund {id} is listed more than once"))),
        None => Ok(()),
    }
}
