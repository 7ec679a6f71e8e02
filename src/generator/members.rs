// ABOUTME: Member generation with faker names and emails
// ABOUTME: Creation timestamps are uniform within a configurable window before now
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use boardfund_core::models::Member;
use chrono::Duration;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::Fake;
use uuid::Uuid;

use super::Generator;

impl Generator {
    /// Generate `count` members created within `window` before now
    pub fn members(&mut self, count: usize, window: Duration) -> Vec<Member> {
        (0..count)
            .map(|_| Member {
                id: Uuid::new_v4(),
                bco_name: Name().fake_with_rng(&mut self.rng),
                email: SafeEmail().fake_with_rng(&mut self.rng),
                first_name: FirstName().fake_with_rng(&mut self.rng),
                last_name: LastName().fake_with_rng(&mut self.rng),
                created: self.instant_within(window),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_members_fall_inside_window() {
        let now = Utc.with_ymd_and_hms(2024, 6, 22, 12, 0, 0).unwrap();
        let mut generator = Generator::new(11, now);
        let window = Duration::days(30);

        let members = generator.members(25, window);

        assert_eq!(members.len(), 25);
        for member in &members {
            assert!(member.created >= now - window && member.created <= now);
            assert!(member.email.contains('@'));
            assert!(!member.bco_name.is_empty());
        }
    }
}
