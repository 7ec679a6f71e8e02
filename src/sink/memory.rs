// ABOUTME: In-memory sink with transactional staging for dry runs and tests
// ABOUTME: Staged rows become visible as committed only after commit; rollback restores the snapshot
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use boardfund_core::constants::tables;
use boardfund_core::models::{Donation, DonationPayment, DonationPlan, Fund, Member};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::{SeedSink, TableCounts};
use crate::errors::{AppError, AppResult};
use crate::logging::SeedLogger;

/// Contents of the five seeded tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryTables {
    /// `member`
    pub members: Vec<Member>,
    /// `fund`
    pub funds: Vec<Fund>,
    /// `donation_plan`
    pub plans: Vec<DonationPlan>,
    /// `donation`
    pub donations: Vec<Donation>,
    /// `donation_payment`
    pub payments: Vec<DonationPayment>,
}

impl MemoryTables {
    /// Row counts
    #[must_use]
    pub fn counts(&self) -> TableCounts {
        TableCounts {
            members: self.members.len() as u64,
            funds: self.funds.len() as u64,
            plans: self.plans.len() as u64,
            donations: self.donations.len() as u64,
            payments: self.payments.len() as u64,
        }
    }
}

/// One insert statement the sink would have issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRecord {
    /// Target table
    pub table: &'static str,
    /// Rows in the statement
    pub rows: usize,
}

/// Sink holding rows in memory
///
/// Writes go to a staging copy of the committed tables. `commit` publishes the
/// staging copy; `rollback` throws it away. Inserts are split into batches the
/// same way the `PostgreSQL` sink splits them and each batch is recorded.
#[derive(Debug)]
pub struct MemorySink {
    committed: MemoryTables,
    staged: MemoryTables,
    batch_size: usize,
    batches: Vec<BatchRecord>,
    fail_on: Option<&'static str>,
    open: bool,
}

impl MemorySink {
    /// Empty sink
    #[must_use]
    pub fn new(batch_size: usize) -> Self {
        Self::with_committed(MemoryTables::default(), batch_size)
    }

    /// Sink pre-populated with already committed rows
    #[must_use]
    pub fn with_committed(tables: MemoryTables, batch_size: usize) -> Self {
        Self {
            staged: tables.clone(),
            committed: tables,
            batch_size: batch_size.max(1),
            batches: Vec::new(),
            fail_on: None,
            open: true,
        }
    }

    /// Make every insert into `table` fail with a database error
    #[must_use]
    pub fn failing_on(mut self, table: &'static str) -> Self {
        self.fail_on = Some(table);
        self
    }

    /// Rows made durable by `commit`
    #[must_use]
    pub const fn committed(&self) -> &MemoryTables {
        &self.committed
    }

    /// Rows visible inside the open run
    #[must_use]
    pub const fn staged(&self) -> &MemoryTables {
        &self.staged
    }

    /// Insert statements issued so far
    #[must_use]
    pub fn batches(&self) -> &[BatchRecord] {
        &self.batches
    }

    fn ensure_open(&self) -> AppResult<()> {
        if self.open {
            Ok(())
        } else {
            Err(AppError::internal("Sink used after commit or rollback"))
        }
    }

    fn stage<T: Clone>(
        &mut self,
        table: &'static str,
        rows: &[T],
        target: fn(&mut MemoryTables) -> &mut Vec<T>,
    ) -> AppResult<()> {
        self.ensure_open()?;
        if self.fail_on == Some(table) {
            return Err(AppError::database(format!(
                "Insert into {table} failed: simulated failure"
            )));
        }
        for chunk in rows.chunks(self.batch_size) {
            target(&mut self.staged).extend_from_slice(chunk);
            self.batches.push(BatchRecord {
                table,
                rows: chunk.len(),
            });
            SeedLogger::log_batch_insert(table, chunk.len(), 0);
        }
        Ok(())
    }
}

#[async_trait]
impl SeedSink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn insert_members(&mut self, rows: &[Member]) -> AppResult<()> {
        self.stage(tables::MEMBER, rows, |t| &mut t.members)
    }

    async fn insert_funds(&mut self, rows: &[Fund]) -> AppResult<()> {
        self.stage(tables::FUND, rows, |t| &mut t.funds)
    }

    async fn insert_plans(&mut self, rows: &[DonationPlan]) -> AppResult<()> {
        self.stage(tables::DONATION_PLAN, rows, |t| &mut t.plans)
    }

    async fn insert_donations(&mut self, rows: &[Donation]) -> AppResult<()> {
        self.stage(tables::DONATION, rows, |t| &mut t.donations)
    }

    async fn insert_payments(&mut self, rows: &[DonationPayment]) -> AppResult<()> {
        self.stage(tables::DONATION_PAYMENT, rows, |t| &mut t.payments)
    }

    async fn member_ids(&mut self) -> AppResult<Vec<Uuid>> {
        self.ensure_open()?;
        Ok(self.staged.members.iter().map(|m| m.id).collect())
    }

    async fn find_fund(&mut self, id: Uuid) -> AppResult<Option<Fund>> {
        self.ensure_open()?;
        Ok(self.staged.funds.iter().find(|f| f.id == id).cloned())
    }

    async fn plans_for_fund(&mut self, fund_id: Uuid) -> AppResult<Vec<DonationPlan>> {
        self.ensure_open()?;
        Ok(self
            .staged
            .plans
            .iter()
            .filter(|p| p.fund_id == fund_id)
            .cloned()
            .collect())
    }

    async fn reset(&mut self) -> AppResult<()> {
        self.ensure_open()?;
        self.staged = MemoryTables::default();
        info!("Existing seeded rows deleted");
        Ok(())
    }

    async fn table_counts(&mut self) -> AppResult<TableCounts> {
        self.ensure_open()?;
        Ok(self.staged.counts())
    }

    async fn commit(&mut self) -> AppResult<()> {
        self.ensure_open()?;
        self.committed = self.staged.clone();
        self.open = false;
        debug!("In-memory run committed");
        Ok(())
    }

    async fn rollback(&mut self) -> AppResult<()> {
        self.staged = self.committed.clone();
        self.open = false;
        debug!("In-memory run rolled back");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn member(n: u32) -> Member {
        Member {
            id: Uuid::new_v4(),
            bco_name: format!("member {n}"),
            email: format!("member{n}@example.org"),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            created: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_inserts_are_batched() {
        let mut sink = MemorySink::new(2);
        let members: Vec<Member> = (0..5).map(member).collect();

        sink.insert_members(&members).await.unwrap();

        let sizes: Vec<usize> = sink.batches().iter().map(|b| b.rows).collect();
        assert_eq!(sizes, [2, 2, 1]);
        assert_eq!(sink.table_counts().await.unwrap().members, 5);
    }

    #[tokio::test]
    async fn test_rollback_discards_staged_rows() {
        let mut sink = MemorySink::with_committed(
            MemoryTables {
                members: vec![member(0)],
                ..MemoryTables::default()
            },
            10,
        );

        sink.insert_members(&[member(1), member(2)]).await.unwrap();
        assert_eq!(sink.member_ids().await.unwrap().len(), 3);

        sink.rollback().await.unwrap();
        assert_eq!(sink.committed().members.len(), 1);
        assert!(sink.member_ids().await.is_err());
    }

    #[tokio::test]
    async fn test_reset_then_commit_replaces_rows() {
        let mut sink = MemorySink::with_committed(
            MemoryTables {
                members: vec![member(0), member(1)],
                ..MemoryTables::default()
            },
            10,
        );

        sink.reset().await.unwrap();
        sink.insert_members(&[member(2)]).await.unwrap();
        sink.commit().await.unwrap();

        assert_eq!(sink.committed().members.len(), 1);
        assert_eq!(sink.committed().members[0].bco_name, "member 2");
    }

    #[tokio::test]
    async fn test_simulated_failure_reports_database_error() {
        let mut sink = MemorySink::new(10).failing_on(tables::MEMBER);

        let err = sink.insert_members(&[member(0)]).await.unwrap_err();

        assert_eq!(err.exit_code(), 1);
        assert!(err.message.contains("member"));
    }
}
