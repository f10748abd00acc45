use chrono::Weekday;
use std::collections::{HashMap, HashSet};

/// Narrows a candidate pool to the users free on `reference_day`.
///
/// `records` holds the weekly availability rows that exist, keyed by user id
/// and already parsed to weekday numbers (0=Monday .. 6=Sunday). A user with
/// no row has expressed no preference and is included unconditionally; a user
/// with a row is included only if the row names the reference day, so an
/// empty set means "never available".
///
/// Order-preserving relative to `candidates`.
pub fn filter_available(
    candidates: &[i64],
    records: &HashMap<i64, HashSet<u32>>,
    reference_day: Weekday,
) -> Vec<i64> {
    let day = reference_day.num_days_from_monday();

    candidates
        .iter()
        .copied()
        .filter(|user_id| match records.get(user_id) {
            None => true,
            Some(days) => days.contains(&day),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(entries: &[(i64, &[u32])]) -> HashMap<i64, HashSet<u32>> {
        entries
            .iter()
            .map(|(user_id, days)| (*user_id, days.iter().copied().collect()))
            .collect()
    }

    #[test]
    fn user_without_a_record_is_included() {
        let filtered = filter_available(&[1, 2], &records(&[]), Weekday::Tue);
        assert_eq!(filtered, vec![1, 2]);
    }

    #[test]
    fn user_free_on_the_reference_day_is_included() {
        let filtered = filter_available(&[1], &records(&[(1, &[0, 1, 2])]), Weekday::Tue);
        assert_eq!(filtered, vec![1]);
    }

    #[test]
    fn user_busy_on_the_reference_day_is_excluded() {
        // Mon/Wed/Fri pattern, asked on a Tuesday
        let filtered = filter_available(&[1], &records(&[(1, &[0, 2, 4])]), Weekday::Tue);
        assert!(filtered.is_empty());
    }

    #[test]
    fn empty_day_set_means_never_available() {
        let filtered = filter_available(&[1], &records(&[(1, &[])]), Weekday::Sat);
        assert!(filtered.is_empty());
    }

    #[test]
    fn input_order_is_preserved() {
        let recs = records(&[(2, &[0, 2, 4])]);
        let filtered = filter_available(&[3, 2, 1], &recs, Weekday::Wed);
        assert_eq!(filtered, vec![3, 2, 1]);
    }

    #[test]
    fn empty_candidate_list_yields_empty_result() {
        let filtered = filter_available(&[], &records(&[(1, &[0])]), Weekday::Mon);
        assert!(filtered.is_empty());
    }
}
