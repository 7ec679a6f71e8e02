// ABOUTME: Data sink abstraction receiving generated rows in batches
// ABOUTME: PostgreSQL implementation for real runs, in-memory implementation for dry runs and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Sink
//!
//! The seeder never talks to the database directly. It hands rows to a
//! [`SeedSink`], which stages them until [`SeedSink::commit`] or discards
//! them on [`SeedSink::rollback`].
//!
//! - [`PostgresSink`]: one transaction per run, multi-row inserts chunked by
//!   batch size
//! - [`MemorySink`]: vectors of rows with the same commit/rollback semantics

/// In-memory sink
pub mod memory;
/// `PostgreSQL` sink
pub mod postgres;
/// RAII transaction guard
pub mod transactions;

pub use memory::MemorySink;
pub use postgres::PostgresSink;
pub use transactions::{PgTransactionGuard, TransactionGuard};

use async_trait::async_trait;
use boardfund_core::models::{Donation, DonationPayment, DonationPlan, Fund, Member};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppResult;

/// Row counts of the seeded tables
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableCounts {
    /// `member` rows
    pub members: u64,
    /// `fund` rows
    pub funds: u64,
    /// `donation_plan` rows
    pub plans: u64,
    /// `donation` rows
    pub donations: u64,
    /// `donation_payment` rows
    pub payments: u64,
}

/// Destination of generated rows
///
/// Writes are staged until `commit`. Any error leaves the sink in a state
/// where `rollback` discards everything written so far.
#[async_trait]
pub trait SeedSink: Send {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Insert members
    async fn insert_members(&mut self, rows: &[Member]) -> AppResult<()>;

    /// Insert funds
    async fn insert_funds(&mut self, rows: &[Fund]) -> AppResult<()>;

    /// Insert donation plans
    async fn insert_plans(&mut self, rows: &[DonationPlan]) -> AppResult<()>;

    /// Insert donations
    async fn insert_donations(&mut self, rows: &[Donation]) -> AppResult<()>;

    /// Insert payments
    async fn insert_payments(&mut self, rows: &[DonationPayment]) -> AppResult<()>;

    /// Ids of every member visible to the run
    async fn member_ids(&mut self) -> AppResult<Vec<Uuid>>;

    /// Look up a fund by id
    async fn find_fund(&mut self, id: Uuid) -> AppResult<Option<Fund>>;

    /// Plans attached to a fund
    async fn plans_for_fund(&mut self, fund_id: Uuid) -> AppResult<Vec<DonationPlan>>;

    /// Delete all seeded rows, children first
    async fn reset(&mut self) -> AppResult<()>;

    /// Row counts as seen from inside the run
    async fn table_counts(&mut self) -> AppResult<TableCounts>;

    /// Make every staged write durable
    async fn commit(&mut self) -> AppResult<()>;

    /// Discard every staged write
    async fn rollback(&mut self) -> AppResult<()>;
}
