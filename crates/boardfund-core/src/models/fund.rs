// ABOUTME: Fund entity and payout frequency enumeration
// ABOUTME: Tracks fund lifetime (creation to expiry) used to bound donation timestamps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ParseEnumError;

/// How often a fund pays out to its recipient
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx-postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx-postgres",
    sqlx(type_name = "payout_frequency", rename_all = "lowercase")
)]
pub enum PayoutFrequency {
    /// Single disbursement; the fund expires and never has recurring plans
    Once,
    /// Recurring monthly disbursement; the fund supports donation plans
    Monthly,
}

impl PayoutFrequency {
    /// Both variants, in a stable order for random selection
    pub const ALL: [Self; 2] = [Self::Once, Self::Monthly];

    /// Database representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Once => "once",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for PayoutFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayoutFrequency {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "once" => Ok(Self::Once),
            "monthly" => Ok(Self::Monthly),
            other => Err(ParseEnumError {
                kind: "payout_frequency",
                value: other.to_owned(),
            }),
        }
    }
}

/// A donation target with a payout schedule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Fund {
    /// Primary key
    pub id: Uuid,
    /// Human-readable fund name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Identifier of the fund at the payment provider
    pub provider_id: String,
    /// Payment provider name
    pub provider_name: String,
    /// Payout schedule
    pub payout_frequency: PayoutFrequency,
    /// Creation time
    pub created: DateTime<Utc>,
    /// Next scheduled payout
    pub next_payment: DateTime<Utc>,
    /// Expiry, set only for `once` funds
    pub expires: Option<DateTime<Utc>>,
}

impl Fund {
    /// Whether donation plans may reference this fund
    #[must_use]
    pub fn accepts_plans(&self) -> bool {
        self.payout_frequency == PayoutFrequency::Monthly
    }

    /// Last instant at which a donation to this fund may be created
    ///
    /// `once` funds stop at their expiry (never later than `now`);
    /// `monthly` funds stay open until `now`.
    #[must_use]
    pub fn lifetime_end(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.expires.map_or(now, |expires| expires.min(now))
    }

    /// Whether `at` lies inside `[created, lifetime_end(now)]`
    #[must_use]
    pub fn is_open_at(&self, at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        at >= self.created && at <= self.lifetime_end(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn fund(frequency: PayoutFrequency, expires: Option<DateTime<Utc>>) -> Fund {
        let created = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        Fund {
            id: Uuid::new_v4(),
            name: "server costs".into(),
            description: String::new(),
            provider_id: "P-1".into(),
            provider_name: "paypal".into(),
            payout_frequency: frequency,
            created,
            next_payment: created + Duration::days(31),
            expires,
        }
    }

    #[test]
    fn test_payout_frequency_round_trips_through_str() {
        for frequency in PayoutFrequency::ALL {
            assert_eq!(frequency.as_str().parse::<PayoutFrequency>(), Ok(frequency));
        }
        assert!("yearly".parse::<PayoutFrequency>().is_err());
    }

    #[test]
    fn test_payout_frequency_serializes_lowercase() {
        let json = serde_json::to_string(&PayoutFrequency::Monthly).unwrap();
        assert_eq!(json, "\"monthly\"");
    }

    #[test]
    fn test_lifetime_end_caps_expiry_at_now() {
        let expires = Utc.with_ymd_and_hms(2024, 2, 15, 12, 0, 0).unwrap();
        let once = fund(PayoutFrequency::Once, Some(expires));

        let before_expiry = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        assert_eq!(once.lifetime_end(before_expiry), before_expiry);

        let after_expiry = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(once.lifetime_end(after_expiry), expires);
    }

    #[test]
    fn test_monthly_fund_is_open_until_now() {
        let monthly = fund(PayoutFrequency::Monthly, None);
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        assert!(monthly.accepts_plans());
        assert!(monthly.is_open_at(now, now));
        assert!(!monthly.is_open_at(monthly.created - Duration::seconds(1), now));
    }
}
