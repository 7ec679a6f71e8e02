// ABOUTME: Donation payment entity, one row per captured payment
// ABOUTME: Recurring donations produce one per interval; one-time donations exactly one
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single captured payment against a donation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DonationPayment {
    /// Primary key
    pub id: Uuid,
    /// Parent donation
    pub donation_id: Uuid,
    /// Captured amount in cents
    pub amount_cents: i32,
    /// Payment identifier at the payment provider
    pub paypal_payment_id: String,
    /// Capture time
    pub created: DateTime<Utc>,
}
