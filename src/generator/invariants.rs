// ABOUTME: Consistency checks over generated funds, plans, donations, and payments
// ABOUTME: A violation aborts the run before the transaction commits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;

use boardfund_core::models::{Donation, DonationPayment, DonationPlan, Fund, PayoutFrequency};
use boardfund_core::schedule::payment_dates;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::errors::AppError;

/// A broken relationship between generated rows
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Violation {
    /// Monthly fund whose next payment is not in the future
    #[error("monthly fund {fund} pays next at {next_payment}, not after {now}")]
    StaleNextPayment {
        /// Fund id
        fund: Uuid,
        /// Recorded next payment
        next_payment: DateTime<Utc>,
        /// Run clock
        now: DateTime<Utc>,
    },
    /// Once fund whose expiry differs from its payout date
    #[error("once fund {fund} expires at {expires:?} but pays out at {next_payment}")]
    OnceFundExpiry {
        /// Fund id
        fund: Uuid,
        /// Recorded expiry
        expires: Option<DateTime<Utc>>,
        /// Recorded next payment
        next_payment: DateTime<Utc>,
    },
    /// Monthly fund carrying an expiry
    #[error("monthly fund {fund} has an expiry")]
    MonthlyFundExpires {
        /// Fund id
        fund: Uuid,
    },
    /// Plan on a fund that does not exist
    #[error("plan {plan} references unknown fund {fund}")]
    UnknownPlanFund {
        /// Plan id
        plan: Uuid,
        /// Fund id
        fund: Uuid,
    },
    /// Plan on a once fund
    #[error("plan {plan} references once fund {fund}")]
    PlanOnOnceFund {
        /// Plan id
        plan: Uuid,
        /// Fund id
        fund: Uuid,
    },
    /// Donation to a fund that does not exist
    #[error("donation {donation} references unknown fund {fund}")]
    UnknownDonationFund {
        /// Donation id
        donation: Uuid,
        /// Fund id
        fund: Uuid,
    },
    /// Recurring donation without a plan, or with a plan on another fund
    #[error("recurring donation {donation} has no plan on fund {fund}")]
    RecurringWithoutPlan {
        /// Donation id
        donation: Uuid,
        /// Fund id
        fund: Uuid,
    },
    /// One-time donation that carries a plan or targets a monthly fund
    #[error("one-time donation {donation} must target a once fund without a plan")]
    MisplacedOneTime {
        /// Donation id
        donation: Uuid,
    },
    /// Donation created outside its fund's lifetime
    #[error("donation {donation} created at {created} outside the lifetime of fund {fund}")]
    OutsideFundLifetime {
        /// Donation id
        donation: Uuid,
        /// Fund id
        fund: Uuid,
        /// Donation creation time
        created: DateTime<Utc>,
    },
    /// Payments that do not match the donation's schedule
    #[error("donation {donation} has {actual} payments, expected {expected}")]
    PaymentSchedule {
        /// Donation id
        donation: Uuid,
        /// Payments the schedule calls for
        expected: usize,
        /// Payments generated
        actual: usize,
    },
}

impl From<Violation> for AppError {
    fn from(violation: Violation) -> Self {
        Self::invariant(violation.to_string())
    }
}

/// Fund payout dates relative to `now`
///
/// # Errors
///
/// Returns the first fund whose next payment or expiry is inconsistent
pub fn check_funds(funds: &[Fund], now: DateTime<Utc>) -> Result<(), Violation> {
    for fund in funds {
        match fund.payout_frequency {
            PayoutFrequency::Monthly => {
                if fund.expires.is_some() {
                    return Err(Violation::MonthlyFundExpires { fund: fund.id });
                }
                if fund.next_payment <= now {
                    return Err(Violation::StaleNextPayment {
                        fund: fund.id,
                        next_payment: fund.next_payment,
                        now,
                    });
                }
            }
            PayoutFrequency::Once => {
                if fund.expires != Some(fund.next_payment) {
                    return Err(Violation::OnceFundExpiry {
                        fund: fund.id,
                        expires: fund.expires,
                        next_payment: fund.next_payment,
                    });
                }
            }
        }
    }
    Ok(())
}

/// Every plan sits on a known monthly fund
///
/// # Errors
///
/// Returns the first plan on a missing or `once` fund
pub fn check_plans(plans: &[DonationPlan], funds: &[Fund]) -> Result<(), Violation> {
    let funds_by_id = index_funds(funds);
    for plan in plans {
        let fund = funds_by_id.get(&plan.fund_id).ok_or(Violation::UnknownPlanFund {
            plan: plan.id,
            fund: plan.fund_id,
        })?;
        if !fund.accepts_plans() {
            return Err(Violation::PlanOnOnceFund {
                plan: plan.id,
                fund: fund.id,
            });
        }
    }
    Ok(())
}

/// Donation targets and creation times
///
/// # Errors
///
/// Returns the first donation with a mismatched plan, a misplaced one-time
/// donation, or a creation time outside its fund's lifetime
pub fn check_donations(
    donations: &[Donation],
    funds: &[Fund],
    plans: &[DonationPlan],
    now: DateTime<Utc>,
) -> Result<(), Violation> {
    let funds_by_id = index_funds(funds);
    let plans_by_id: HashMap<Uuid, &DonationPlan> = plans.iter().map(|p| (p.id, p)).collect();

    for donation in donations {
        let fund = funds_by_id
            .get(&donation.fund_id)
            .ok_or(Violation::UnknownDonationFund {
                donation: donation.id,
                fund: donation.fund_id,
            })?;

        if donation.recurring {
            let plan_fund = donation
                .donation_plan_id
                .and_then(|id| plans_by_id.get(&id))
                .map(|plan| plan.fund_id);
            if plan_fund != Some(fund.id) {
                return Err(Violation::RecurringWithoutPlan {
                    donation: donation.id,
                    fund: fund.id,
                });
            }
        } else if donation.donation_plan_id.is_some()
            || fund.payout_frequency != PayoutFrequency::Once
        {
            return Err(Violation::MisplacedOneTime {
                donation: donation.id,
            });
        }

        if !fund.is_open_at(donation.created, now) {
            return Err(Violation::OutsideFundLifetime {
                donation: donation.id,
                fund: fund.id,
                created: donation.created,
            });
        }
    }
    Ok(())
}

/// Payments generated for one donation match its schedule
///
/// # Errors
///
/// Returns a violation when the count or dates differ from the schedule, or a
/// one-time payment is not dated at the donation's creation
pub fn check_payments(
    donation: &Donation,
    plan: Option<&DonationPlan>,
    payments: &[DonationPayment],
    now: DateTime<Utc>,
) -> Result<(), Violation> {
    let expected: Vec<DateTime<Utc>> = match (donation.recurring, plan) {
        (true, Some(plan)) => payment_dates(donation.created, plan.interval_unit, now).collect(),
        (true, None) => Vec::new(),
        (false, _) => vec![donation.created],
    };

    let matches = expected.len() == payments.len()
        && payments
            .iter()
            .zip(&expected)
            .all(|(payment, at)| payment.created == *at && payment.donation_id == donation.id);
    if matches {
        Ok(())
    } else {
        Err(Violation::PaymentSchedule {
            donation: donation.id,
            expected: expected.len(),
            actual: payments.len(),
        })
    }
}

fn index_funds(funds: &[Fund]) -> HashMap<Uuid, &Fund> {
    funds.iter().map(|fund| (fund.id, fund)).collect()
}
