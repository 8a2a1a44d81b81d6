//! Property-based tests for the period tracker.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use fans_tracker::fetcher::FetchResult;
use fans_tracker::metric::MetricSnapshot;
use fans_tracker::tracker::{BoundaryMode, TrackedEntity};
use proptest::prelude::*;

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Replays `(minutes since start, follower)` pairs through a fresh entity.
fn replay(steps: &[(i64, u64)], mode: BoundaryMode) -> Vec<MetricSnapshot> {
    let mut entity = TrackedEntity::new("2", &start());
    steps
        .iter()
        .map(|&(minutes, follower)| {
            let now = start() + chrono::Duration::minutes(minutes);
            let increase = entity.update(follower, &now, mode);
            let stat = FetchResult {
                mid: 2,
                follower,
                following: 0,
            };
            MetricSnapshot::new("2", &stat, &increase, now)
        })
        .collect()
}

/// Sorted offsets (in minutes, up to three years) paired with counters.
fn timeline() -> impl Strategy<Value = Vec<(i64, u64)>> {
    prop::collection::vec((0i64..3 * 366 * 24 * 60, 0u64..1_000_000), 1..40).prop_map(
        |mut steps| {
            steps.sort_by_key(|&(minutes, _)| minutes);
            steps
        },
    )
}

proptest! {
    /// Replaying the same sequence twice yields identical snapshots.
    #[test]
    fn test_replay_is_deterministic(steps in timeline(), strict in any::<bool>()) {
        let mode = if strict { BoundaryMode::Strict } else { BoundaryMode::Legacy };
        prop_assert_eq!(replay(&steps, mode), replay(&steps, mode));
    }

    /// Within one calendar month the increases move exactly as the follower
    /// count does.
    #[test]
    fn test_increases_track_follower_within_month(
        seed in 0u64..1_000_000,
        counters in prop::collection::vec(0u64..1_000_000, 2..30),
        day_offsets in prop::collection::vec(0u32..28, 2..30),
    ) {
        let mut entity = TrackedEntity::from_parts("2", seed, seed / 2, seed / 3, 5, 2024);
        let mut previous: Option<(u64, i64, i64)> = None;

        for (follower, day) in counters.iter().zip(day_offsets.iter()) {
            let now = NaiveDate::from_ymd_opt(2024, 5, day + 1).unwrap();
            let increase = entity.update(*follower, &now, BoundaryMode::Legacy);

            prop_assert_eq!(increase.month_start_counter, seed / 2);
            prop_assert_eq!(increase.year_start_counter, seed / 3);

            if let Some((last_follower, last_monthly, last_yearly)) = previous {
                let follower_rose = *follower >= last_follower;
                prop_assert_eq!(increase.monthly_increase >= last_monthly, follower_rose);
                prop_assert_eq!(increase.yearly_increase >= last_yearly, follower_rose);
            }
            previous = Some((*follower, increase.monthly_increase, increase.yearly_increase));
        }
    }

    /// A month crossing moves the month baseline to the counter recorded by
    /// the previous poll.
    #[test]
    fn test_month_crossing_baseline(
        before in 0u64..1_000_000,
        after in 0u64..1_000_000,
        month in 1u32..12,
    ) {
        let mut entity = TrackedEntity::new("2", &NaiveDate::from_ymd_opt(2024, month, 10).unwrap());
        entity.update(before, &NaiveDate::from_ymd_opt(2024, month, 20).unwrap(), BoundaryMode::Legacy);

        let next = NaiveDate::from_ymd_opt(2024, month + 1, 1).unwrap();
        let increase = entity.update(after, &next, BoundaryMode::Legacy);

        prop_assert_eq!(increase.month_start_counter, before);
        prop_assert_eq!(increase.monthly_increase, after as i64 - before as i64);
        prop_assert_eq!(increase.year_start_counter, 0);
        if after == before {
            prop_assert_eq!(increase.monthly_increase, 0);
        }
    }

    /// Strict mode always re-anchors when the (year, month) key changes;
    /// legacy mode misses the crossing when the gap is a whole number of
    /// years.
    #[test]
    fn test_whole_year_gap(
        before in 0u64..1_000_000,
        after in 0u64..1_000_000,
        years in 1u32..4,
        month in 1u32..=12,
    ) {
        let first = NaiveDate::from_ymd_opt(2024, month, 15).unwrap();
        let later = first.checked_add_months(Months::new(12 * years)).unwrap();
        prop_assert_eq!(later.month(), first.month());

        let mut legacy = TrackedEntity::from_parts("2", 0, 0, 0, month, 2024);
        let mut strict = legacy.clone();
        legacy.update(before, &first, BoundaryMode::Legacy);
        strict.update(before, &first, BoundaryMode::Strict);

        let legacy_increase = legacy.update(after, &later, BoundaryMode::Legacy);
        let strict_increase = strict.update(after, &later, BoundaryMode::Strict);

        prop_assert_eq!(legacy_increase.month_start_counter, 0);
        prop_assert_eq!(strict_increase.month_start_counter, before);
        prop_assert_eq!(legacy_increase.year_start_counter, before);
        prop_assert_eq!(strict_increase.year_start_counter, before);
    }

    /// The entity always remembers the last counter and the calendar period
    /// of the last poll.
    #[test]
    fn test_last_counter_and_period_follow_polls(steps in timeline()) {
        let mut entity = TrackedEntity::new("2", &start());
        for &(minutes, follower) in &steps {
            let now = start() + chrono::Duration::minutes(minutes);
            entity.update(follower, &now, BoundaryMode::Legacy);
            prop_assert_eq!(entity.last_counter(), follower);
            prop_assert_eq!(entity.last_seen_month(), now.month());
            prop_assert_eq!(entity.last_seen_year(), now.year());
        }
    }
}
