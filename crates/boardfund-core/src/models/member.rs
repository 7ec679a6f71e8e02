// ABOUTME: Member entity (donor) for the donation-platform schema
// ABOUTME: Independent entity with no lifecycle beyond creation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered member who can donate to funds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    /// Primary key
    pub id: Uuid,
    /// Display name on the board (`bco_name` column)
    pub bco_name: String,
    /// Login email
    pub email: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Registration time
    pub created: DateTime<Utc>,
}
