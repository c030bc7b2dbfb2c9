//! Missed-day computation
//!
//! Walks backwards from today, skipping runs of completed days, and collects
//! the most recent days that have no completion.

use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Return the `n` most recent dates on or before `today` that are not in
/// `completed`, newest first.
///
/// After each recorded miss the cursor always steps back one more day, so
/// the result is strictly decreasing and never repeats a date. The walk
/// stops early only if it runs off the start of the calendar.
pub fn missed_days(completed: &BTreeSet<NaiveDate>, today: NaiveDate, n: usize) -> Vec<NaiveDate> {
    let mut missed = Vec::with_capacity(n);
    let mut date = Some(today);

    while missed.len() < n {
        let Some(mut candidate) = date else {
            break;
        };
        while completed.contains(&candidate) {
            match candidate.pred_opt() {
                Some(prev) => candidate = prev,
                None => return missed,
            }
        }
        missed.push(candidate);
        date = candidate.pred_opt();
    }

    missed
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_skips_completed_run() {
        let completed: BTreeSet<_> = [d(2018, 1, 2), d(2018, 1, 3)].into_iter().collect();
        assert_eq!(missed_days(&completed, d(2018, 1, 3), 1), vec![d(2018, 1, 1)]);
    }

    #[test]
    fn test_today_counts_when_not_completed() {
        let completed = BTreeSet::new();
        assert_eq!(
            missed_days(&completed, d(2018, 1, 3), 3),
            vec![d(2018, 1, 3), d(2018, 1, 2), d(2018, 1, 1)]
        );
    }

    #[test]
    fn test_extra_decrement_does_not_skip_adjacent_miss() {
        // Jan 3 completed, Jan 2 and Jan 1 missed: both must be reported,
        // the step after recording Jan 2 lands exactly on Jan 1.
        let completed: BTreeSet<_> = [d(2018, 1, 3)].into_iter().collect();
        assert_eq!(
            missed_days(&completed, d(2018, 1, 3), 2),
            vec![d(2018, 1, 2), d(2018, 1, 1)]
        );
    }

    #[test]
    fn test_all_recent_days_completed() {
        let completed: BTreeSet<_> = (1..=31).map(|day| d(2018, 1, day)).collect();
        assert_eq!(
            missed_days(&completed, d(2018, 1, 31), 2),
            vec![d(2017, 12, 31), d(2017, 12, 30)]
        );
    }

    #[test]
    fn test_gaps_between_completed_runs() {
        let completed: BTreeSet<_> = [d(2018, 1, 5), d(2018, 1, 4), d(2018, 1, 2)]
            .into_iter()
            .collect();
        assert_eq!(
            missed_days(&completed, d(2018, 1, 5), 3),
            vec![d(2018, 1, 3), d(2018, 1, 1), d(2017, 12, 31)]
        );
    }

    #[test]
    fn test_zero_requested() {
        assert!(missed_days(&BTreeSet::new(), d(2018, 1, 3), 0).is_empty());
    }

    #[test]
    fn test_stops_at_calendar_start() {
        let completed: BTreeSet<_> = [NaiveDate::MIN].into_iter().collect();
        assert!(missed_days(&completed, NaiveDate::MIN, 1).is_empty());
    }

    proptest! {
        #[test]
        fn prop_missed_days_are_distinct_decreasing_and_uncompleted(
            offsets in proptest::collection::btree_set(0i64..120, 0..100),
            n in 1usize..40,
        ) {
            let today = d(2018, 6, 30);
            let completed: BTreeSet<NaiveDate> = offsets
                .iter()
                .map(|o| today - chrono::Duration::days(*o))
                .collect();

            let missed = missed_days(&completed, today, n);

            prop_assert_eq!(missed.len(), n);
            prop_assert!(missed.iter().all(|m| !completed.contains(m)));
            prop_assert!(missed.iter().all(|m| *m <= today));
            prop_assert!(missed.windows(2).all(|w| w[0] > w[1]));
        }
    }
}
