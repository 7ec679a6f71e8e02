// ABOUTME: Payment generation for recurring schedules and one-time donations
// ABOUTME: PaymentBuffer hands payments to the sink in fixed-size batches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::mem;

use boardfund_core::models::{Donation, DonationPayment, DonationPlan};
use boardfund_core::schedule::payment_dates;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Generator;

impl Generator {
    /// Payments for one donation
    ///
    /// A recurring donation gets one payment of the plan amount per schedule
    /// occurrence from its creation up to now inclusive. A one-time donation gets
    /// a single payment at its creation with an independent random amount. A
    /// recurring donation without its plan yields nothing.
    pub fn payments_for(
        &mut self,
        donation: &Donation,
        plan: Option<&DonationPlan>,
    ) -> Vec<DonationPayment> {
        if !donation.recurring {
            let amount_cents = self.amount_cents();
            return vec![self.payment(donation.id, amount_cents, donation.created)];
        }

        let Some(plan) = plan else {
            return Vec::new();
        };
        payment_dates(donation.created, plan.interval_unit, self.now)
            .map(|at| self.payment(donation.id, plan.amount_cents, at))
            .collect()
    }

    fn payment(
        &mut self,
        donation_id: Uuid,
        amount_cents: i32,
        created: DateTime<Utc>,
    ) -> DonationPayment {
        DonationPayment {
            id: Uuid::new_v4(),
            donation_id,
            amount_cents,
            paypal_payment_id: self.provider_reference("PAYID"),
            created,
        }
    }
}

/// Accumulates payments until a full batch is ready for the sink
#[derive(Debug, Clone)]
pub struct PaymentBuffer {
    rows: Vec<DonationPayment>,
    batch_size: usize,
    total: usize,
}

impl PaymentBuffer {
    /// Buffer releasing batches of `batch_size` rows (at least one)
    #[must_use]
    pub fn new(batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            rows: Vec::with_capacity(batch_size),
            batch_size,
            total: 0,
        }
    }

    /// Queue payments
    pub fn extend(&mut self, payments: impl IntoIterator<Item = DonationPayment>) {
        let before = self.rows.len();
        self.rows.extend(payments);
        self.total += self.rows.len() - before;
    }

    /// Whether a full batch is waiting
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.rows.len() >= self.batch_size
    }

    /// Remove and return the next full batch, if any
    pub fn take_batch(&mut self) -> Option<Vec<DonationPayment>> {
        if !self.is_full() {
            return None;
        }
        let rest = self.rows.split_off(self.batch_size);
        Some(mem::replace(&mut self.rows, rest))
    }

    /// Remove and return whatever is left
    pub fn drain(&mut self) -> Vec<DonationPayment> {
        mem::take(&mut self.rows)
    }

    /// Rows currently queued
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether nothing is queued
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Payments ever queued
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }
}
