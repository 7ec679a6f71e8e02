// ABOUTME: Calendar arithmetic for fund payouts and recurring donation payments
// ABOUTME: Month addition with last-day clamping, next-payment dates, and payment schedules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Payout and payment schedules
//!
//! Month addition clamps to the last day of the target month, so
//! `Jan 31 + 1 month` is the last day of February. Recurring schedules are
//! anchored on their start: occurrence `k` is always `start + k intervals`
//! computed from the start, never from the previous occurrence. A schedule
//! starting on Jan 31 therefore runs Feb 28/29, Mar 31, Apr 30 rather than
//! drifting to the 28th.
//!
//! Schedules include their start and every later occurrence that is not
//! after the cutoff (`occurrence <= cutoff`).

use std::iter::FusedIterator;

use chrono::{DateTime, Datelike, Duration, Months, Utc};

use crate::constants::plans::DAYS_PER_WEEK;
use crate::models::{IntervalUnit, PayoutFrequency};

/// Add calendar months, clamping the day to the end of the target month
///
/// Saturates at the maximum representable instant instead of overflowing.
#[must_use]
pub fn add_months(date: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    date.checked_add_months(Months::new(months))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// The `index`-th occurrence of an interval anchored on `start`
#[must_use]
pub fn occurrence(start: DateTime<Utc>, unit: IntervalUnit, index: u32) -> DateTime<Utc> {
    match unit {
        IntervalUnit::Week => start
            .checked_add_signed(Duration::days(DAYS_PER_WEEK * i64::from(index)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC),
        IntervalUnit::Month => add_months(start, index),
    }
}

/// Whole calendar months from `from` to `to`, ignoring the day of month
fn calendar_months_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u32 {
    let months = (i64::from(to.year()) - i64::from(from.year())) * 12 + i64::from(to.month())
        - i64::from(from.month());
    u32::try_from(months).unwrap_or(0)
}

/// First monthly anniversary of `created` strictly after `now`
///
/// Always at least one month after `created`.
#[must_use]
pub fn next_monthly_payment(created: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    // Start one month short of the calendar distance; that anniversary is never after `now`.
    let mut months = calendar_months_between(created, now).saturating_sub(1).max(1);
    loop {
        let candidate = add_months(created, months);
        if candidate > now || candidate == DateTime::<Utc>::MAX_UTC {
            return candidate;
        }
        months += 1;
    }
}

/// Next payout date of a fund created at `created`
///
/// `once` funds pay out one month after creation, whether or not that date
/// has passed; the same instant is their expiry. `monthly` funds pay out on
/// the first anniversary after `now`.
#[must_use]
pub fn fund_next_payment(
    frequency: PayoutFrequency,
    created: DateTime<Utc>,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    match frequency {
        PayoutFrequency::Once => add_months(created, 1),
        PayoutFrequency::Monthly => next_monthly_payment(created, now),
    }
}

/// Iterator over recurring payment dates from `start` up to `cutoff` inclusive
#[derive(Debug, Clone)]
pub struct PaymentSchedule {
    start: DateTime<Utc>,
    unit: IntervalUnit,
    cutoff: DateTime<Utc>,
    index: Option<u32>,
}

impl PaymentSchedule {
    /// Schedule for a plan interval starting at `start`
    #[must_use]
    pub const fn new(start: DateTime<Utc>, unit: IntervalUnit, cutoff: DateTime<Utc>) -> Self {
        Self {
            start,
            unit,
            cutoff,
            index: Some(0),
        }
    }
}

impl Iterator for PaymentSchedule {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.index?;
        let at = occurrence(self.start, self.unit, index);
        if at > self.cutoff {
            self.index = None;
            return None;
        }
        self.index = index.checked_add(1);
        Some(at)
    }
}

impl FusedIterator for PaymentSchedule {}

/// Payment dates of a recurring donation created at `start`, up to `cutoff`
#[must_use]
pub const fn payment_dates(
    start: DateTime<Utc>,
    unit: IntervalUnit,
    cutoff: DateTime<Utc>,
) -> PaymentSchedule {
    PaymentSchedule::new(start, unit, cutoff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_add_months_clamps_to_end_of_month() {
        assert_eq!(add_months(at(2024, 1, 31), 1), at(2024, 2, 29));
        assert_eq!(add_months(at(2023, 1, 31), 1), at(2023, 2, 28));
        assert_eq!(add_months(at(2024, 3, 31), 1), at(2024, 4, 30));
        assert_eq!(add_months(at(2024, 12, 15), 1), at(2025, 1, 15));
    }

    #[test]
    fn test_monthly_schedule_is_anchored_on_start() {
        let dates: Vec<_> = payment_dates(at(2024, 1, 31), IntervalUnit::Month, at(2024, 5, 1))
            .collect();
        assert_eq!(
            dates,
            vec![at(2024, 1, 31), at(2024, 2, 29), at(2024, 3, 31), at(2024, 4, 30)]
        );
    }

    #[test]
    fn test_weekly_schedule_includes_start_and_cutoff() {
        let now = at(2024, 6, 22);
        let start = now - Duration::days(21);

        let dates: Vec<_> = payment_dates(start, IntervalUnit::Week, now).collect();

        assert_eq!(dates.len(), 4);
        assert_eq!(dates.first(), Some(&start));
        assert_eq!(dates.last(), Some(&now));
        assert!(dates.iter().all(|date| *date <= now));
    }

    #[test]
    fn test_weekly_schedule_stops_before_future_dates() {
        let now = at(2024, 6, 22);
        let start = now - Duration::days(21) + Duration::seconds(1);

        assert_eq!(payment_dates(start, IntervalUnit::Week, now).count(), 3);
    }

    #[test]
    fn test_schedule_starting_after_cutoff_is_empty() {
        let now = at(2024, 6, 22);
        let mut schedule = payment_dates(now + Duration::hours(1), IntervalUnit::Month, now);

        assert_eq!(schedule.next(), None);
        assert_eq!(schedule.next(), None);
    }

    #[test]
    fn test_once_fund_pays_one_month_after_creation() {
        let created = at(2023, 8, 31);
        let now = at(2024, 6, 22);

        assert_eq!(
            fund_next_payment(PayoutFrequency::Once, created, now),
            at(2023, 9, 30)
        );
    }

    #[test]
    fn test_monthly_fund_next_payment_is_after_now() {
        let now = at(2024, 6, 22);
        for created in [at(2023, 6, 23), at(2023, 7, 31), at(2024, 5, 22), at(2024, 6, 21)] {
            let next = fund_next_payment(PayoutFrequency::Monthly, created, now);
            assert!(next > now, "{next} should be after {now}");
            assert!(next <= add_months(now, 1));
        }
    }

    #[test]
    fn test_monthly_fund_created_on_anniversary_skips_now() {
        let now = at(2024, 6, 22);
        let created = at(2024, 5, 22);

        assert_eq!(next_monthly_payment(created, now), at(2024, 7, 22));
    }

    #[test]
    fn test_monthly_fund_created_recently_pays_next_month() {
        let now = at(2024, 6, 22);
        let created = now - Duration::days(2);

        assert_eq!(next_monthly_payment(created, now), add_months(created, 1));
    }
}
