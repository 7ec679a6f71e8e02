// ABOUTME: Configuration module for seeding runs
// ABOUTME: Database connection target from the environment and generation parameters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration for the seeder binaries
//!
//! - **database**: connection target from `PG_*` or a connection URL
//! - **seed**: entity counts, plan sampling bounds, batch size, RNG seed

/// `PostgreSQL` connection configuration
pub mod database;
/// Generation parameters
pub mod seed;

pub use database::{DatabaseConfig, PgParameters};
pub use seed::{ensure_distinct_funds, parse_fund_ids, PlanSpec, SeedConfig};
