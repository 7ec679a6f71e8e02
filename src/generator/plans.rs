// ABOUTME: Donation plan generation over monthly funds with bounded uniqueness retries
// ABOUTME: Reports a shortfall instead of failing when the sampling space runs dry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashSet;

use boardfund_core::constants::{amounts, plans as plan_bounds};
use boardfund_core::models::{DonationPlan, Fund, IntervalUnit};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use super::Generator;
use crate::config::PlanSpec;

/// Fewer unique plans were generated than requested
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanShortfall {
    /// Plans asked for
    pub requested: usize,
    /// Plans produced
    pub generated: usize,
    /// Draws spent
    pub attempts: usize,
}

/// Result of plan generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanBatch {
    /// Unique plans, all on monthly funds
    pub plans: Vec<DonationPlan>,
    /// Set when the attempt budget ran out before the target
    pub shortfall: Option<PlanShortfall>,
}

impl Generator {
    /// Generate up to `target` plans with distinct (amount, interval, fund) keys
    ///
    /// Only `monthly` funds are sampled. Keys already used by `existing` plans are
    /// treated as taken. The loop stops after `spec.max_attempts` draws; falling
    /// short is logged and reported, not an error.
    pub fn plans(
        &mut self,
        target: usize,
        funds: &[Fund],
        spec: &PlanSpec,
        existing: &[DonationPlan],
    ) -> PlanBatch {
        let eligible: Vec<&Fund> = funds.iter().filter(|fund| fund.accepts_plans()).collect();
        let mut taken: HashSet<(i32, IntervalUnit, Uuid)> =
            existing.iter().map(DonationPlan::key).collect();
        let mut plans = Vec::with_capacity(target);
        let mut attempts = 0;

        let sampleable = !eligible.is_empty()
            && !spec.amount_dollars.is_empty()
            && !spec.interval_units.is_empty();

        while sampleable && plans.len() < target && attempts < spec.max_attempts {
            attempts += 1;

            let amount_cents =
                self.rng.gen_range(spec.amount_dollars.clone()) * amounts::CENTS_PER_DOLLAR;
            let (Some(unit), Some(fund)) = (
                spec.interval_units.choose(&mut self.rng).copied(),
                eligible.choose(&mut self.rng).copied(),
            ) else {
                break;
            };

            if !taken.insert((amount_cents, unit, fund.id)) {
                continue;
            }

            let number = existing.len() + plans.len() + 1;
            plans.push(self.plan(number, amount_cents, unit, fund));
        }

        let shortfall = (plans.len() < target).then(|| PlanShortfall {
            requested: target,
            generated: plans.len(),
            attempts,
        });
        if let Some(shortfall) = &shortfall {
            warn!(
                plans.requested = shortfall.requested,
                plans.generated = shortfall.generated,
                plans.attempts = shortfall.attempts,
                plans.eligible_funds = eligible.len(),
                "Could not generate the requested number of unique donation plans"
            );
        }

        PlanBatch { plans, shortfall }
    }

    /// Build a single plan on `fund`
    fn plan(
        &mut self,
        number: usize,
        amount_cents: i32,
        interval_unit: IntervalUnit,
        fund: &Fund,
    ) -> DonationPlan {
        DonationPlan {
            id: Uuid::new_v4(),
            name: format!("Plan {number}"),
            paypal_plan_id: self.provider_reference("P"),
            amount_cents,
            interval_unit,
            interval_count: self
                .rng
                .gen_range(plan_bounds::MIN_INTERVAL_COUNT..=plan_bounds::MAX_INTERVAL_COUNT),
            active: self.rng.gen_bool(0.5),
            created: fund.created,
            updated: fund.created,
            fund_id: fund.id,
        }
    }
}
