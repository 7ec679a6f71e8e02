// ABOUTME: Library entry point for the donation platform seeding tools
// ABOUTME: Synthetic data generation, batched sinks, and the orchestration shared by the seed binaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Boardfund Seed
//!
//! Populates a donation-platform `PostgreSQL` schema (`member`, `fund`,
//! `donation_plan`, `donation`, `donation_payment`) with synthetic data for
//! development environments.
//!
//! ## Architecture
//!
//! - **Generator**: seeded, clock-pinned factory for every entity, including
//!   recurring payment schedules
//! - **Sink**: where rows go; `PostgreSQL` inside one transaction, or memory
//! - **Seeder**: runs a variant end to end and reports what it wrote
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use boardfund_seed::config::SeedConfig;
//! use boardfund_seed::errors::AppResult;
//! use boardfund_seed::generator::Generator;
//! use boardfund_seed::seeder::{finish_run, seed_simple};
//! use boardfund_seed::sink::MemorySink;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> AppResult<()> {
//!     let config = SeedConfig::default();
//!     let mut generator = Generator::new(config.seed_or_clock(), chrono::Utc::now());
//!     let mut sink = MemorySink::new(config.batch_size);
//!
//!     let outcome = seed_simple(&mut generator, &mut sink, &config).await;
//!     let report = finish_run(&mut sink, outcome).await?;
//!     report.log_summary();
//!     Ok(())
//! }
//! ```

/// Connection and generation settings
pub mod config;

/// Unified error handling
pub mod errors;

/// Synthetic data generation
pub mod generator;

/// Structured logging setup
pub mod logging;

/// Seeding run orchestration
pub mod seeder;

/// Destinations for generated rows
pub mod sink;

pub use boardfund_core::{constants, models, schedule};
