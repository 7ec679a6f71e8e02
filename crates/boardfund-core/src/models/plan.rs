// ABOUTME: Donation plan entity and billing interval enumeration
// ABOUTME: A recurring-pledge template (amount, interval) tied to one monthly fund
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ParseEnumError;

/// Billing interval of a recurring plan
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "sqlx-postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx-postgres",
    sqlx(type_name = "interval_unit", rename_all = "UPPERCASE")
)]
pub enum IntervalUnit {
    /// Every 7 days
    Week,
    /// Every calendar month
    Month,
}

impl IntervalUnit {
    /// Both variants, in a stable order for random selection
    pub const ALL: [Self; 2] = [Self::Week, Self::Month];

    /// Database representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Week => "WEEK",
            Self::Month => "MONTH",
        }
    }
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntervalUnit {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "WEEK" => Ok(Self::Week),
            "MONTH" => Ok(Self::Month),
            _ => Err(ParseEnumError {
                kind: "interval_unit",
                value: s.to_owned(),
            }),
        }
    }
}

/// A recurring-pledge template attached to a monthly fund
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DonationPlan {
    /// Primary key
    pub id: Uuid,
    /// Display name ("Plan 3")
    pub name: String,
    /// Plan identifier at the payment provider
    pub paypal_plan_id: String,
    /// Amount charged per interval, in cents
    pub amount_cents: i32,
    /// Billing interval
    pub interval_unit: IntervalUnit,
    /// Interval multiplier as stored by the provider
    pub interval_count: i32,
    /// Whether new donors may subscribe
    pub active: bool,
    /// Creation time
    pub created: DateTime<Utc>,
    /// Last update time
    pub updated: DateTime<Utc>,
    /// Owning fund (always `monthly`)
    pub fund_id: Uuid,
}

impl DonationPlan {
    /// Uniqueness key used when generating plans
    #[must_use]
    pub const fn key(&self) -> (i32, IntervalUnit, Uuid) {
        (self.amount_cents, self.interval_unit, self.fund_id)
    }
}
