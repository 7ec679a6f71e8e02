// ABOUTME: Donation entity linking a member to a fund, optionally through a plan
// ABOUTME: Recurring donations reference a plan; one-time donations target once-funds directly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A member's donation to a fund
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Donation {
    /// Primary key
    pub id: Uuid,
    /// Donating member
    pub donor_id: Uuid,
    /// Receiving fund
    pub fund_id: Uuid,
    /// Order identifier at the payment provider
    pub provider_order_id: String,
    /// Whether the donation is still live
    pub active: bool,
    /// Creation time
    pub created: DateTime<Utc>,
    /// Plan for recurring donations
    pub donation_plan_id: Option<Uuid>,
    /// Recurring flag; `true` exactly when `donation_plan_id` is set
    pub recurring: bool,
}
