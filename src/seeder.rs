// ABOUTME: Orchestrates a seeding run: generate, verify, and hand rows to the sink in FK order
// ABOUTME: Simple variant builds everything from scratch; fund-history variant extends existing funds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Seeding Runs
//!
//! Both variants follow the same shape:
//!
//! 1. Generate rows in memory with a [`Generator`]
//! 2. Check them against the data-model invariants
//! 3. Insert members, funds, plans, donations, then payments in batches
//!
//! Nothing is committed here. The caller passes the outcome to
//! [`finish_run`], which commits on success and rolls back on any error.

use std::collections::HashMap;
use std::slice;
use std::time::Instant;

use boardfund_core::models::{Donation, DonationPlan, Fund};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::config::{ensure_distinct_funds, SeedConfig};
use crate::errors::{AppError, AppResult};
use crate::generator::invariants::{check_donations, check_funds, check_payments, check_plans};
use crate::generator::{Generator, PaymentBuffer, PlanShortfall};
use crate::logging::SeedLogger;
use crate::sink::{SeedSink, TableCounts};

/// Which seeding variant produced a report
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeedVariant {
    /// Members, funds, plans, donations, and payments from scratch
    Simple,
    /// Donations spread over the lifetime of existing funds
    FundHistory,
}

/// Summary of one seeding run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedReport {
    /// Variant that ran
    pub variant: SeedVariant,
    /// RNG seed, for reproducing the run
    pub seed: u64,
    /// Members inserted
    pub members: usize,
    /// Funds inserted
    pub funds: usize,
    /// Plans inserted
    pub plans: usize,
    /// Donations inserted
    pub donations: usize,
    /// Payments inserted
    pub payments: usize,
    /// Donation draws with no eligible target
    pub skipped_donations: usize,
    /// Set when fewer unique plans were generated than requested
    pub plan_shortfall: Option<PlanShortfall>,
    /// Table sizes seen from inside the transaction after the inserts
    pub table_counts: TableCounts,
    /// Wall time spent generating and inserting
    pub duration_ms: u64,
}

impl SeedReport {
    /// Log the run summary
    pub fn log_summary(&self) {
        info!(
            variant = ?self.variant,
            seed = self.seed,
            duration_ms = self.duration_ms,
            "Seeding complete"
        );
        info!("   Members: {}", self.members);
        info!("   Funds: {}", self.funds);
        info!("   Donation plans: {}", self.plans);
        info!("   Donations: {}", self.donations);
        info!("   Payments: {}", self.payments);
        if self.skipped_donations > 0 {
            info!("   Skipped donation draws: {}", self.skipped_donations);
        }
        if let Some(shortfall) = &self.plan_shortfall {
            info!(
                "   Plan shortfall: {} of {} after {} attempts",
                shortfall.generated, shortfall.requested, shortfall.attempts
            );
        }
        info!(
            "   Tables now hold {} members, {} funds, {} plans, {} donations, {} payments",
            self.table_counts.members,
            self.table_counts.funds,
            self.table_counts.plans,
            self.table_counts.donations,
            self.table_counts.payments
        );
    }
}

/// Seed members, funds, plans, donations, and payments from scratch
///
/// # Errors
///
/// Returns `InvalidInput` for an unusable configuration, `InvariantViolation`
/// if generated rows are inconsistent, or the sink's error if an insert fails
pub async fn seed_simple<S: SeedSink + ?Sized>(
    generator: &mut Generator,
    sink: &mut S,
    config: &SeedConfig,
) -> AppResult<SeedReport> {
    config.validate()?;
    let started = Instant::now();
    let now = generator.now();
    let window = config.history_window();

    if config.reset {
        info!("Resetting seeded tables");
        sink.reset().await?;
    }

    info!(
        members = config.member_count,
        funds = config.fund_names.len(),
        plans = config.plan_count,
        donations = config.donation_count,
        "Generating donation platform data"
    );
    let members = generator.members(config.member_count, window);
    let funds = generator.funds(config.fund_names.as_slice(), window);
    check_funds(&funds, now)?;

    let batch = generator.plans(config.plan_count, &funds, &config.plan_spec, &[]);
    check_plans(&batch.plans, &funds)?;

    let member_ids: Vec<Uuid> = members.iter().map(|m| m.id).collect();
    let draws = generator.donations_simple(
        config.donation_count,
        config.recurring_ratio,
        &member_ids,
        &funds,
        &batch.plans,
        window,
    );
    check_donations(&draws.donations, &funds, &batch.plans, now)?;

    sink.insert_members(&members).await?;
    sink.insert_funds(&funds).await?;
    sink.insert_plans(&batch.plans).await?;
    sink.insert_donations(&draws.donations).await?;
    let payments = write_payments(
        generator,
        sink,
        &draws.donations,
        &batch.plans,
        config.batch_size,
    )
    .await?;

    Ok(SeedReport {
        variant: SeedVariant::Simple,
        seed: generator.seed(),
        members: members.len(),
        funds: funds.len(),
        plans: batch.plans.len(),
        donations: draws.donations.len(),
        payments,
        skipped_donations: draws.skipped,
        plan_shortfall: batch.shortfall,
        table_counts: sink.table_counts().await?,
        duration_ms: elapsed_ms(started),
    })
}

/// Spread donations over the lifetime of existing funds
///
/// Every id must be distinct and resolve to a fund before anything is written.
/// Members are generated only when the member table is empty; monthly funds
/// without plans get plans generated for them.
///
/// # Errors
///
/// Returns `InvalidInput` for a repeated fund id, `ResourceNotFound` for an
/// unknown fund id, `InvariantViolation` if generated rows are inconsistent,
/// or the sink's error if a query fails
pub async fn seed_fund_history<S: SeedSink + ?Sized>(
    generator: &mut Generator,
    sink: &mut S,
    config: &SeedConfig,
    fund_ids: &[Uuid],
) -> AppResult<SeedReport> {
    config.validate()?;
    let started = Instant::now();
    let now = generator.now();

    let funds = resolve_funds(sink, fund_ids).await?;
    for fund in &funds {
        info!(
            fund.id = %fund.id,
            fund.name = %fund.name,
            fund.payout_frequency = %fund.payout_frequency,
            "Distributing donations over fund lifetime"
        );
    }

    let mut member_ids = sink.member_ids().await?;
    let mut members_inserted = 0;
    if member_ids.is_empty() {
        info!("No members found; generating {}", config.member_count);
        let members = generator.members(config.member_count, config.history_window());
        sink.insert_members(&members).await?;
        members_inserted = members.len();
        member_ids = members.iter().map(|m| m.id).collect();
    }

    let mut plans_by_fund: HashMap<Uuid, Vec<DonationPlan>> = HashMap::new();
    let mut new_plans = Vec::new();
    let mut plan_shortfall: Option<PlanShortfall> = None;
    for fund in funds.iter().filter(|fund| fund.accepts_plans()) {
        let mut plans = sink.plans_for_fund(fund.id).await?;
        if plans.is_empty() {
            info!(fund.id = %fund.id, "Monthly fund has no plans; generating them");
            let batch =
                generator.plans(config.plan_count, slice::from_ref(fund), &config.plan_spec, &[]);
            if let Some(shortfall) = batch.shortfall {
                plan_shortfall = Some(merge_shortfall(plan_shortfall, shortfall));
            }
            new_plans.extend(batch.plans.iter().cloned());
            plans = batch.plans;
        }
        plans_by_fund.insert(fund.id, plans);
    }
    check_plans(&new_plans, &funds)?;
    sink.insert_plans(&new_plans).await?;

    let all_plans: Vec<DonationPlan> = plans_by_fund.values().flatten().cloned().collect();
    let draws =
        generator.donations_lifetime(config.donation_count, &member_ids, &funds, &plans_by_fund);
    check_donations(&draws.donations, &funds, &all_plans, now)?;

    sink.insert_donations(&draws.donations).await?;
    let payments = write_payments(
        generator,
        sink,
        &draws.donations,
        &all_plans,
        config.batch_size,
    )
    .await?;

    Ok(SeedReport {
        variant: SeedVariant::FundHistory,
        seed: generator.seed(),
        members: members_inserted,
        funds: 0,
        plans: new_plans.len(),
        donations: draws.donations.len(),
        payments,
        skipped_donations: draws.skipped,
        plan_shortfall,
        table_counts: sink.table_counts().await?,
        duration_ms: elapsed_ms(started),
    })
}

/// Commit on success, roll back on failure, and pass the outcome through
///
/// # Errors
///
/// Returns the run's own error, or the commit error if committing fails
pub async fn finish_run<S: SeedSink + ?Sized>(
    sink: &mut S,
    outcome: AppResult<SeedReport>,
) -> AppResult<SeedReport> {
    let started = Instant::now();
    match outcome {
        Ok(report) => {
            if let Err(e) = sink.commit().await {
                error!(sink = sink.name(), error = %e, "Commit failed");
                return Err(e);
            }
            SeedLogger::log_transaction("committed", elapsed_ms(started));
            Ok(report)
        }
        Err(e) => {
            if e.code.is_pre_write() {
                error!(
                    sink = sink.name(),
                    error = %e,
                    "Seeding aborted before any write; closing the run"
                );
            } else {
                error!(
                    sink = sink.name(),
                    error = %e,
                    "Seeding failed; rolling back all staged rows"
                );
            }
            if let Err(rollback) = sink.rollback().await {
                error!(error = %rollback, "Rollback failed");
            }
            SeedLogger::log_transaction("rolled_back", elapsed_ms(started));
            Err(e)
        }
    }
}

async fn resolve_funds<S: SeedSink + ?Sized>(
    sink: &mut S,
    fund_ids: &[Uuid],
) -> AppResult<Vec<Fund>> {
    ensure_distinct_funds(fund_ids)?;
    let mut funds = Vec::with_capacity(fund_ids.len());
    for id in fund_ids {
        let fund = sink
            .find_fund(*id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("fund {id}")))?;
        funds.push(fund);
    }
    Ok(funds)
}

/// Generate, verify, and insert payments one donation at a time
async fn write_payments<S: SeedSink + ?Sized>(
    generator: &mut Generator,
    sink: &mut S,
    donations: &[Donation],
    plans: &[DonationPlan],
    batch_size: usize,
) -> AppResult<usize> {
    let plans_by_id: HashMap<Uuid, &DonationPlan> = plans.iter().map(|p| (p.id, p)).collect();
    let now = generator.now();
    let mut buffer = PaymentBuffer::new(batch_size);

    for donation in donations {
        let plan = donation
            .donation_plan_id
            .and_then(|id| plans_by_id.get(&id).copied());
        let payments = generator.payments_for(donation, plan);
        check_payments(donation, plan, &payments, now)?;
        buffer.extend(payments);

        while let Some(batch) = buffer.take_batch() {
            sink.insert_payments(&batch).await?;
        }
    }

    let rest = buffer.drain();
    if !rest.is_empty() {
        sink.insert_payments(&rest).await?;
    }
    Ok(buffer.total())
}

fn merge_shortfall(total: Option<PlanShortfall>, next: PlanShortfall) -> PlanShortfall {
    total.map_or(next, |total| PlanShortfall {
        requested: total.requested + next.requested,
        generated: total.generated + next.generated,
        attempts: total.attempts + next.attempts,
    })
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
