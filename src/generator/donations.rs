// ABOUTME: Donation generation in two variants: random sampling and fund-lifetime distribution
// ABOUTME: Keeps every donation inside its fund's lifetime and ties recurring ones to a plan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;

use boardfund_core::constants::defaults;
use boardfund_core::models::{Donation, DonationPlan, Fund, PayoutFrequency};
use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;
use uuid::Uuid;

use super::Generator;

/// Generated donations plus the number of draws that could not be placed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DonationDraws {
    /// Donations, in draw order (simple) or sorted by creation (lifetime)
    pub donations: Vec<Donation>,
    /// Draws dropped for lack of an eligible fund, plan, or donor
    pub skipped: usize,
}

impl Generator {
    /// Random-sampling variant
    ///
    /// Each of `count` draws picks a plan with probability `recurring_ratio` and
    /// inherits its fund; otherwise it targets a random `once` fund without a plan.
    /// With no plans every draw is one-time. With no `once` fund a one-time draw is
    /// skipped. Creation time is uniform in `window` before now, moved to 1 to 30
    /// days after the fund's creation when it would precede it.
    pub fn donations_simple(
        &mut self,
        count: usize,
        recurring_ratio: f64,
        member_ids: &[Uuid],
        funds: &[Fund],
        plans: &[DonationPlan],
        window: Duration,
    ) -> DonationDraws {
        let funds_by_id: HashMap<Uuid, &Fund> = funds.iter().map(|f| (f.id, f)).collect();
        let once_funds: Vec<&Fund> = funds
            .iter()
            .filter(|f| f.payout_frequency == PayoutFrequency::Once)
            .collect();
        let ratio = recurring_ratio.clamp(0.0, 1.0);

        let mut draws = DonationDraws {
            donations: Vec::with_capacity(count),
            skipped: 0,
        };

        for _ in 0..count {
            let Some(donor_id) = member_ids.choose(&mut self.rng).copied() else {
                draws.skipped += 1;
                continue;
            };

            let recurring = !plans.is_empty() && self.rng.gen_bool(ratio);
            let target = if recurring {
                plans.choose(&mut self.rng).and_then(|plan| {
                    funds_by_id
                        .get(&plan.fund_id)
                        .map(|fund| (*fund, Some(plan.id)))
                })
            } else {
                once_funds.choose(&mut self.rng).map(|fund| (*fund, None))
            };

            let Some((fund, plan_id)) = target else {
                draws.skipped += 1;
                continue;
            };

            let created = self.sampled_donation_time(fund, window);
            let donation = self.donation(donor_id, fund, plan_id, created);
            draws.donations.push(donation);
        }

        if draws.skipped > 0 {
            debug!(
                donations.skipped = draws.skipped,
                donations.once_funds = once_funds.len(),
                "Some donation draws had no eligible target"
            );
        }
        draws
    }

    /// Lifetime-distributed variant
    ///
    /// Splits `budget` evenly over `funds`, the remainder going to the first
    /// funds. Each fund's share is spread over evenly sized slots across its
    /// lifetime with a random offset inside each slot. `monthly` funds draw a plan
    /// from `plans_by_fund`; `once` funds get one-time donations. A share is
    /// skipped when the fund's lifetime is empty or a monthly fund has no plans.
    /// The result is sorted by creation time.
    pub fn donations_lifetime(
        &mut self,
        budget: usize,
        member_ids: &[Uuid],
        funds: &[Fund],
        plans_by_fund: &HashMap<Uuid, Vec<DonationPlan>>,
    ) -> DonationDraws {
        let mut draws = DonationDraws {
            donations: Vec::with_capacity(budget),
            skipped: 0,
        };
        if funds.is_empty() {
            draws.skipped = budget;
            return draws;
        }

        let per_fund = budget / funds.len();
        let remainder = budget % funds.len();

        for (position, fund) in funds.iter().enumerate() {
            let share = per_fund + usize::from(position < remainder);
            if share == 0 {
                continue;
            }

            let plans: &[DonationPlan] = match fund.payout_frequency {
                PayoutFrequency::Monthly => plans_by_fund
                    .get(&fund.id)
                    .map(Vec::as_slice)
                    .unwrap_or_default(),
                PayoutFrequency::Once => &[],
            };
            let start = fund.created;
            let end = fund.lifetime_end(self.now);

            if end <= start || member_ids.is_empty() || (fund.accepts_plans() && plans.is_empty()) {
                debug!(
                    fund.id = %fund.id,
                    fund.name = %fund.name,
                    donations.skipped = share,
                    "Fund has no room for donations"
                );
                draws.skipped += share;
                continue;
            }

            let slot_secs = (end - start).num_seconds() / i64::try_from(share).unwrap_or(i64::MAX);
            let mut slot_start = start;
            for _ in 0..share {
                let slot_end = slot_start + Duration::seconds((slot_secs - 1).max(0));
                let created = self.instant_between(slot_start, slot_end);
                slot_start += Duration::seconds(slot_secs);

                let plan_id = plans.choose(&mut self.rng).map(|plan| plan.id);
                let Some(donor_id) = member_ids.choose(&mut self.rng).copied() else {
                    draws.skipped += 1;
                    continue;
                };
                let donation = self.donation(donor_id, fund, plan_id, created);
                draws.donations.push(donation);
            }
        }

        draws.donations.sort_by_key(|donation| donation.created);
        draws
    }

    /// Creation time for a sampled donation, kept inside the fund's lifetime
    ///
    /// A draw that still falls outside `[fund.created, lifetime end]` after the
    /// jitter is redrawn uniformly inside the lifetime.
    fn sampled_donation_time(&mut self, fund: &Fund, window: Duration) -> DateTime<Utc> {
        let end = fund.lifetime_end(self.now);
        let mut created = self.instant_within(window);
        if created < fund.created {
            let jitter = self
                .rng
                .gen_range(1..=defaults::DONATION_JITTER_MAX_DAYS);
            created = fund.created + Duration::days(jitter);
        }
        if created < fund.created || created > end {
            created = self.instant_between(fund.created, end);
        }
        created
    }

    fn donation(
        &mut self,
        donor_id: Uuid,
        fund: &Fund,
        donation_plan_id: Option<Uuid>,
        created: DateTime<Utc>,
    ) -> Donation {
        Donation {
            id: Uuid::new_v4(),
            donor_id,
            fund_id: fund.id,
            provider_order_id: self.provider_reference("ORDER"),
            active: true,
            created,
            donation_plan_id,
            recurring: donation_plan_id.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlanSpec;
    use chrono::TimeZone;
    use std::slice;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 22, 12, 0, 0).unwrap()
    }

    fn dataset(generator: &mut Generator) -> (Vec<Uuid>, Vec<Fund>, Vec<DonationPlan>) {
        let members: Vec<Uuid> = generator
            .members(5, Duration::days(365))
            .into_iter()
            .map(|m| m.id)
            .collect();
        let funds = vec![
            generator.fund("once early", PayoutFrequency::Once, now() - Duration::days(300)),
            generator.fund("once late", PayoutFrequency::Once, now() - Duration::days(10)),
            generator.fund("monthly", PayoutFrequency::Monthly, now() - Duration::days(200)),
        ];
        let plans = generator.plans(3, &funds, &PlanSpec::default(), &[]).plans;
        (members, funds, plans)
    }

    #[test]
    fn test_simple_donations_respect_fund_lifetime() {
        let mut generator = Generator::new(17, now());
        let (members, funds, plans) = dataset(&mut generator);

        let draws =
            generator.donations_simple(300, 0.8, &members, &funds, &plans, Duration::days(365));

        assert_eq!(draws.donations.len() + draws.skipped, 300);
        assert_eq!(draws.skipped, 0);
        for donation in &draws.donations {
            let fund = funds.iter().find(|f| f.id == donation.fund_id).unwrap();
            assert!(fund.is_open_at(donation.created, now()), "{donation:?}");
            assert!(members.contains(&donation.donor_id));
            match donation.donation_plan_id {
                Some(plan_id) => {
                    let plan = plans.iter().find(|p| p.id == plan_id).unwrap();
                    assert!(donation.recurring);
                    assert_eq!(plan.fund_id, donation.fund_id);
                }
                None => {
                    assert!(!donation.recurring);
                    assert_eq!(fund.payout_frequency, PayoutFrequency::Once);
                }
            }
        }
    }

    #[test]
    fn test_one_time_donations_spread_over_short_lifetime() {
        let mut generator = Generator::new(5, now());
        let members: Vec<Uuid> = generator
            .members(5, Duration::days(365))
            .into_iter()
            .map(|m| m.id)
            .collect();
        let fund = generator.fund("expired", PayoutFrequency::Once, now() - Duration::days(300));
        let expires = fund.lifetime_end(now());

        let draws = generator.donations_simple(
            500,
            0.0,
            &members,
            slice::from_ref(&fund),
            &[],
            Duration::days(365),
        );

        assert_eq!(draws.donations.len(), 500);
        let mut per_instant: HashMap<DateTime<Utc>, usize> = HashMap::new();
        for donation in &draws.donations {
            assert!(donation.created >= fund.created && donation.created <= expires);
            *per_instant.entry(donation.created).or_default() += 1;
        }
        let busiest = per_instant.values().copied().max().unwrap_or_default();
        assert!(busiest < 5, "{busiest} donations share one timestamp");
    }

    #[test]
    fn test_new_monthly_fund_donations_are_not_pinned_to_now() {
        let mut generator = Generator::new(6, now());
        let members: Vec<Uuid> = generator
            .members(5, Duration::days(365))
            .into_iter()
            .map(|m| m.id)
            .collect();
        let fund = generator.fund("new", PayoutFrequency::Monthly, now() - Duration::days(3));
        let plans = generator
            .plans(1, slice::from_ref(&fund), &PlanSpec::default(), &[])
            .plans;

        let draws = generator.donations_simple(
            200,
            1.0,
            &members,
            slice::from_ref(&fund),
            &plans,
            Duration::days(365),
        );

        let at_now = draws.donations.iter().filter(|d| d.created == now()).count();
        assert!(at_now < 5, "{at_now} donations pinned to now");
        assert!(draws
            .donations
            .iter()
            .all(|d| d.created >= fund.created && d.created <= now()));
    }

    #[test]
    fn test_simple_without_once_funds_skips_one_time_draws() {
        let mut generator = Generator::new(2, now());
        let (members, funds, plans) = dataset(&mut generator);
        let monthly_only: Vec<Fund> = funds
            .into_iter()
            .filter(Fund::accepts_plans)
            .collect();

        let draws =
            generator.donations_simple(100, 0.0, &members, &monthly_only, &plans, Duration::days(365));

        assert!(draws.donations.is_empty());
        assert_eq!(draws.skipped, 100);
    }

    #[test]
    fn test_simple_without_plans_is_all_one_time() {
        let mut generator = Generator::new(9, now());
        let (members, funds, _) = dataset(&mut generator);

        let draws = generator.donations_simple(50, 1.0, &members, &funds, &[], Duration::days(365));

        assert_eq!(draws.donations.len(), 50);
        assert!(draws.donations.iter().all(|d| !d.recurring));
    }

    #[test]
    fn test_lifetime_donations_are_sorted_and_split() {
        let mut generator = Generator::new(33, now());
        let (members, funds, plans) = dataset(&mut generator);
        let mut plans_by_fund: HashMap<Uuid, Vec<DonationPlan>> = HashMap::new();
        for plan in plans {
            plans_by_fund.entry(plan.fund_id).or_default().push(plan);
        }

        let draws = generator.donations_lifetime(100, &members, &funds, &plans_by_fund);

        assert_eq!(draws.donations.len(), 100);
        assert!(draws
            .donations
            .windows(2)
            .all(|pair| pair[0].created <= pair[1].created));

        let per_fund = |id: Uuid| draws.donations.iter().filter(|d| d.fund_id == id).count();
        assert_eq!(per_fund(funds[0].id), 34);
        assert_eq!(per_fund(funds[1].id), 33);
        assert_eq!(per_fund(funds[2].id), 33);

        for donation in &draws.donations {
            let fund = funds.iter().find(|f| f.id == donation.fund_id).unwrap();
            assert!(fund.is_open_at(donation.created, now()));
            assert_eq!(donation.recurring, fund.accepts_plans());
        }
    }

    #[test]
    fn test_lifetime_monthly_fund_without_plans_is_skipped() {
        let mut generator = Generator::new(33, now());
        let (members, funds, _) = dataset(&mut generator);

        let draws = generator.donations_lifetime(30, &members, &funds, &HashMap::new());

        assert_eq!(draws.skipped, 10);
        assert_eq!(draws.donations.len(), 20);
    }
}
