// ABOUTME: Entity models for the donation-platform schema
// ABOUTME: Re-exports Member, Fund, DonationPlan, Donation, DonationPayment and their enums
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! One struct per seeded table. Field names follow the column names so the
//! sink can bind them in declaration order. All models are plain data:
//! the only behavior they carry is what the generator needs to keep rows
//! referentially and temporally consistent (fund lifetimes, plan eligibility).

mod donation;
mod fund;
mod member;
mod payment;
mod plan;

pub use donation::Donation;
pub use fund::{Fund, PayoutFrequency};
pub use member::Member;
pub use payment::DonationPayment;
pub use plan::{DonationPlan, IntervalUnit};

use thiserror::Error;

/// Error returned when parsing an enum from its database representation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} value: {value}")]
pub struct ParseEnumError {
    /// Enum being parsed
    pub kind: &'static str,
    /// Rejected input
    pub value: String,
}
