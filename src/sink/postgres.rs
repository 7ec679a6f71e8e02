// ABOUTME: PostgreSQL sink writing all seeded tables inside one guarded transaction
// ABOUTME: Multi-row INSERT statements built with QueryBuilder and chunked by batch size
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::time::Instant;

use async_trait::async_trait;
use boardfund_core::constants::tables;
use boardfund_core::models::{Donation, DonationPayment, DonationPlan, Fund, Member};
use sqlx::postgres::PgRow;
use sqlx::query_builder::Separated;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::{debug, info};
use uuid::Uuid;

use super::{PgTransactionGuard, SeedSink, TableCounts, TransactionGuard};
use crate::errors::{AppError, AppResult};
use crate::logging::SeedLogger;

/// A row that can be appended to a multi-row `INSERT`
trait InsertRow {
    /// Target table
    const TABLE: &'static str;
    /// Column list in bind order
    const COLUMNS: &'static str;

    /// Bind this row's values in `COLUMNS` order
    fn bind_row(&self, row: &mut Separated<'_, '_, Postgres, &'static str>);
}

impl InsertRow for Member {
    const TABLE: &'static str = tables::MEMBER;
    const COLUMNS: &'static str = "id, bco_name, email, first_name, last_name, created";

    fn bind_row(&self, row: &mut Separated<'_, '_, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.bco_name.clone())
            .push_bind(self.email.clone())
            .push_bind(self.first_name.clone())
            .push_bind(self.last_name.clone())
            .push_bind(self.created);
    }
}

impl InsertRow for Fund {
    const TABLE: &'static str = tables::FUND;
    const COLUMNS: &'static str = "id, name, description, provider_id, provider_name, \
                                   payout_frequency, created, next_payment, expires";

    fn bind_row(&self, row: &mut Separated<'_, '_, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.name.clone())
            .push_bind(self.description.clone())
            .push_bind(self.provider_id.clone())
            .push_bind(self.provider_name.clone())
            .push_bind(self.payout_frequency)
            .push_bind(self.created)
            .push_bind(self.next_payment)
            .push_bind(self.expires);
    }
}

impl InsertRow for DonationPlan {
    const TABLE: &'static str = tables::DONATION_PLAN;
    const COLUMNS: &'static str = "id, name, paypal_plan_id, amount_cents, interval_unit, \
                                   interval_count, active, created, updated, fund_id";

    fn bind_row(&self, row: &mut Separated<'_, '_, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.name.clone())
            .push_bind(self.paypal_plan_id.clone())
            .push_bind(self.amount_cents)
            .push_bind(self.interval_unit)
            .push_bind(self.interval_count)
            .push_bind(self.active)
            .push_bind(self.created)
            .push_bind(self.updated)
            .push_bind(self.fund_id);
    }
}

impl InsertRow for Donation {
    const TABLE: &'static str = tables::DONATION;
    const COLUMNS: &'static str = "id, donor_id, fund_id, provider_order_id, active, created, \
                                   donation_plan_id, recurring";

    fn bind_row(&self, row: &mut Separated<'_, '_, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.donor_id)
            .push_bind(self.fund_id)
            .push_bind(self.provider_order_id.clone())
            .push_bind(self.active)
            .push_bind(self.created)
            .push_bind(self.donation_plan_id)
            .push_bind(self.recurring);
    }
}

impl InsertRow for DonationPayment {
    const TABLE: &'static str = tables::DONATION_PAYMENT;
    const COLUMNS: &'static str = "id, donation_id, amount_cents, paypal_payment_id, created";

    fn bind_row(&self, row: &mut Separated<'_, '_, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.donation_id)
            .push_bind(self.amount_cents)
            .push_bind(self.paypal_payment_id.clone())
            .push_bind(self.created);
    }
}

/// Sink writing to `PostgreSQL` inside a single transaction
pub struct PostgresSink {
    guard: Option<PgTransactionGuard<'static>>,
    batch_size: usize,
}

impl PostgresSink {
    /// Open the run's transaction on `pool`
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started
    pub async fn begin(pool: &PgPool, batch_size: usize) -> AppResult<Self> {
        let tx = pool.begin().await?;
        Ok(Self {
            guard: Some(TransactionGuard::new(tx)),
            batch_size: batch_size.max(1),
        })
    }

    fn guard(&mut self) -> AppResult<&mut PgTransactionGuard<'static>> {
        self.guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Sink used after commit or rollback"))
    }

    async fn insert_rows<T: InsertRow + Sync>(&mut self, rows: &[T]) -> AppResult<()> {
        for chunk in rows.chunks(self.batch_size) {
            let started = Instant::now();
            let mut builder: QueryBuilder<'_, Postgres> =
                QueryBuilder::new(format!("INSERT INTO {} ({}) ", T::TABLE, T::COLUMNS));
            builder.push_values(chunk, |mut row, value| value.bind_row(&mut row));

            builder
                .build()
                .execute(self.guard()?.executor()?)
                .await
                .map_err(|e| {
                    AppError::database(format!("Insert into {} failed: {e}", T::TABLE))
                        .with_source(e)
                })?;

            SeedLogger::log_batch_insert(T::TABLE, chunk.len(), elapsed_ms(started));
        }
        Ok(())
    }

    async fn count(&mut self, table: &str) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(self.guard()?.executor()?)
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}

#[async_trait]
impl SeedSink for PostgresSink {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn insert_members(&mut self, rows: &[Member]) -> AppResult<()> {
        self.insert_rows(rows).await
    }

    async fn insert_funds(&mut self, rows: &[Fund]) -> AppResult<()> {
        self.insert_rows(rows).await
    }

    async fn insert_plans(&mut self, rows: &[DonationPlan]) -> AppResult<()> {
        self.insert_rows(rows).await
    }

    async fn insert_donations(&mut self, rows: &[Donation]) -> AppResult<()> {
        self.insert_rows(rows).await
    }

    async fn insert_payments(&mut self, rows: &[DonationPayment]) -> AppResult<()> {
        self.insert_rows(rows).await
    }

    async fn member_ids(&mut self) -> AppResult<Vec<Uuid>> {
        let ids = sqlx::query_scalar("SELECT id FROM member")
            .fetch_all(self.guard()?.executor()?)
            .await?;
        Ok(ids)
    }

    async fn find_fund(&mut self, id: Uuid) -> AppResult<Option<Fund>> {
        let row = sqlx::query(
            r"
            SELECT id, name, description, provider_id, provider_name,
                   payout_frequency, created, next_payment, expires
            FROM fund
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.guard()?.executor()?)
        .await?;

        row.as_ref().map(fund_from_row).transpose()
    }

    async fn plans_for_fund(&mut self, fund_id: Uuid) -> AppResult<Vec<DonationPlan>> {
        let rows = sqlx::query(
            r"
            SELECT id, name, paypal_plan_id, amount_cents, interval_unit,
                   interval_count, active, created, updated, fund_id
            FROM donation_plan
            WHERE fund_id = $1
            ORDER BY created, id
            ",
        )
        .bind(fund_id)
        .fetch_all(self.guard()?.executor()?)
        .await?;

        rows.iter().map(plan_from_row).collect()
    }

    async fn reset(&mut self) -> AppResult<()> {
        for table in tables::INSERT_ORDER.iter().rev() {
            let result = sqlx::query(&format!("DELETE FROM {table}"))
                .execute(self.guard()?.executor()?)
                .await?;
            debug!(
                table = %table,
                rows = result.rows_affected(),
                "Cleared seeded table"
            );
        }
        info!("Existing seeded rows deleted");
        Ok(())
    }

    async fn table_counts(&mut self) -> AppResult<TableCounts> {
        Ok(TableCounts {
            members: self.count(tables::MEMBER).await?,
            funds: self.count(tables::FUND).await?,
            plans: self.count(tables::DONATION_PLAN).await?,
            donations: self.count(tables::DONATION).await?,
            payments: self.count(tables::DONATION_PAYMENT).await?,
        })
    }

    async fn commit(&mut self) -> AppResult<()> {
        let guard = self
            .guard
            .take()
            .ok_or_else(|| AppError::internal("Sink already committed or rolled back"))?;
        guard.commit().await
    }

    async fn rollback(&mut self) -> AppResult<()> {
        match self.guard.take() {
            Some(guard) => guard.rollback().await,
            None => Ok(()),
        }
    }
}

fn fund_from_row(row: &PgRow) -> AppResult<Fund> {
    Ok(Fund {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        provider_id: row.try_get("provider_id")?,
        provider_name: row.try_get("provider_name")?,
        payout_frequency: row.try_get("payout_frequency")?,
        created: row.try_get("created")?,
        next_payment: row.try_get("next_payment")?,
        expires: row.try_get("expires")?,
    })
}

fn plan_from_row(row: &PgRow) -> AppResult<DonationPlan> {
    Ok(DonationPlan {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        paypal_plan_id: row.try_get("paypal_plan_id")?,
        amount_cents: row.try_get("amount_cents")?,
        interval_unit: row.try_get("interval_unit")?,
        interval_count: row.try_get("interval_count")?,
        active: row.try_get("active")?,
        created: row.try_get("created")?,
        updated: row.try_get("updated")?,
        fund_id: row.try_get("fund_id")?,
    })
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
