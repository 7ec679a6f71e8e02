// ABOUTME: Core domain types for the Boardfund donation platform seeders
// ABOUTME: Foundation crate with entity models, payout schedules, and seeding constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Boardfund Core
//!
//! Foundation crate providing the donation-platform entities and the calendar
//! arithmetic shared by every seeder. Nothing in here performs I/O, which keeps
//! the schedule rules testable without a database.
//!
//! ## Modules
//!
//! - **models**: `Member`, `Fund`, `DonationPlan`, `Donation`, `DonationPayment`
//! - **schedule**: month addition with day clamping, fund next-payment dates,
//!   recurring payment schedules
//! - **constants**: fund names, table names, and generation defaults

/// Seeding defaults, fund names, and table identifiers
pub mod constants;

/// Entity models mirroring the donation-platform schema
pub mod models;

/// Calendar arithmetic for fund payouts and recurring payments
pub mod schedule;
