// ABOUTME: Constants for the donation seeders organized by domain
// ABOUTME: Fund names, table names, provider identifiers, and generation defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Values here mirror what the development database expects: fixed fund
//! names, the payment provider name, and the knobs the seeders fall back
//! to when the command line does not override them.

/// Fund names created by the simple seeder, one fund per name
pub const FUND_NAMES: &[&str] = &[
    "roxy's dental fund",
    "bco general fund",
    "server costs",
    "whelky homecoming fund",
    "bco fund server costs",
    "gaza relief fund",
];

/// Payment provider recorded on every fund
pub const PROVIDER_NAME: &str = "paypal";

/// Schema table names
pub mod tables {
    /// Members (donors)
    pub const MEMBER: &str = "member";
    /// Funds (donation targets)
    pub const FUND: &str = "fund";
    /// Recurring donation plans
    pub const DONATION_PLAN: &str = "donation_plan";
    /// Donations
    pub const DONATION: &str = "donation";
    /// Individual donation payments
    pub const DONATION_PAYMENT: &str = "donation_payment";

    /// Tables in foreign-key order (parents first)
    pub const INSERT_ORDER: &[&str] = &[MEMBER, FUND, DONATION_PLAN, DONATION, DONATION_PAYMENT];
}

/// Generation defaults
pub mod defaults {
    /// Members created per run
    pub const MEMBER_COUNT: usize = 20;
    /// Unique donation plans requested per run
    pub const PLAN_COUNT: usize = 10;
    /// Draws allowed before plan generation gives up on uniqueness
    pub const PLAN_MAX_ATTEMPTS: usize = 1_000;
    /// Donations drawn by the simple seeder
    pub const DONATION_COUNT: usize = 500;
    /// Share of simple-seeder donations attached to a plan
    pub const RECURRING_RATIO: f64 = 0.8;
    /// Window (days before now) for member, fund, and donation timestamps
    pub const HISTORY_WINDOW_DAYS: i64 = 365;
    /// Rows per multi-row insert
    pub const BATCH_SIZE: usize = 1_000;
    /// Upper bound of the forward jitter applied to donations predating their fund
    pub const DONATION_JITTER_MAX_DAYS: i64 = 30;
    /// Funds named on the fund-history command line
    pub const FUND_HISTORY_FUND_COUNT: usize = 3;
}

/// Donation amounts
pub mod amounts {
    /// Smallest whole-dollar amount generated
    pub const MIN_DOLLARS: i32 = 10;
    /// Largest whole-dollar amount generated
    pub const MAX_DOLLARS: i32 = 100;
    /// Cents per dollar
    pub const CENTS_PER_DOLLAR: i32 = 100;
}

/// Donation plan shape
pub mod plans {
    /// Smallest `interval_count` stored on a plan
    pub const MIN_INTERVAL_COUNT: i32 = 1;
    /// Largest `interval_count` stored on a plan
    pub const MAX_INTERVAL_COUNT: i32 = 12;
    /// Days between weekly payments
    pub const DAYS_PER_WEEK: i64 = 7;
}
