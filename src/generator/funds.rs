// ABOUTME: Fund generation with random payout frequency
// ABOUTME: Computes next-payment and expiry dates from the fund's creation time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use boardfund_core::constants::PROVIDER_NAME;
use boardfund_core::models::{Fund, PayoutFrequency};
use boardfund_core::schedule::fund_next_payment;
use chrono::{DateTime, Duration, Utc};
use fake::faker::company::en::Bs;
use fake::faker::lorem::en::Sentences;
use fake::Fake;
use rand::seq::SliceRandom;
use uuid::Uuid;

use super::Generator;

/// Sentences in a generated fund description
const DESCRIPTION_SENTENCES: usize = 5;

impl Generator {
    /// Generate one fund per name, each created within `window` before now
    pub fn funds<S: AsRef<str>>(&mut self, names: &[S], window: Duration) -> Vec<Fund> {
        names
            .iter()
            .map(|name| {
                let frequency = *PayoutFrequency::ALL
                    .choose(&mut self.rng)
                    .unwrap_or(&PayoutFrequency::Monthly);
                let created = self.instant_within(window);
                self.fund(name.as_ref(), frequency, created)
            })
            .collect()
    }

    /// Build a fund with a fixed frequency and creation time
    ///
    /// `once` funds expire on their single payout date; `monthly` funds never expire
    /// and pay out on the first anniversary after now.
    pub fn fund(&mut self, name: &str, frequency: PayoutFrequency, created: DateTime<Utc>) -> Fund {
        let next_payment = fund_next_payment(frequency, created, self.now);
        let expires = match frequency {
            PayoutFrequency::Once => Some(next_payment),
            PayoutFrequency::Monthly => None,
        };
        let sentences: Vec<String> =
            Sentences(DESCRIPTION_SENTENCES..DESCRIPTION_SENTENCES + 1).fake_with_rng(&mut self.rng);

        Fund {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            description: sentences.join(" "),
            provider_id: Bs().fake_with_rng(&mut self.rng),
            provider_name: PROVIDER_NAME.to_owned(),
            payout_frequency: frequency,
            created,
            next_payment,
            expires,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardfund_core::constants::FUND_NAMES;
    use boardfund_core::schedule::add_months;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 22, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_one_fund_per_name() {
        let mut generator = Generator::new(5, now());
        let funds = generator.funds(FUND_NAMES, Duration::days(365));

        assert_eq!(funds.len(), FUND_NAMES.len());
        for (fund, name) in funds.iter().zip(FUND_NAMES) {
            assert_eq!(fund.name, *name);
            assert_eq!(fund.provider_name, "paypal");
            assert!(!fund.description.is_empty());
        }
    }

    #[test]
    fn test_monthly_funds_pay_out_after_now() {
        let mut generator = Generator::new(9, now());
        let funds = generator.funds(FUND_NAMES, Duration::days(365));

        for fund in funds.iter().filter(|f| f.payout_frequency == PayoutFrequency::Monthly) {
            assert!(fund.next_payment > now());
            assert_eq!(fund.expires, None);
        }
    }

    #[test]
    fn test_once_fund_expires_one_month_after_creation() {
        let mut generator = Generator::new(9, now());
        let created = Utc.with_ymd_and_hms(2024, 1, 31, 8, 0, 0).unwrap();

        let fund = generator.fund("gaza relief fund", PayoutFrequency::Once, created);

        assert_eq!(fund.next_payment, add_months(created, 1));
        assert_eq!(fund.expires, Some(fund.next_payment));
        assert_eq!(
            fund.next_payment,
            Utc.with_ymd_and_hms(2024, 2, 29, 8, 0, 0).unwrap()
        );
    }
}
