//! Persistence round-trip checkers
//!
//! Re-read stored puzzles and run the same rules the generator used, in
//! collect-all mode. Absence and corruption are reported as issues.

pub mod miscast;
pub mod podium;

use chrono::{Days, NaiveDate};

pub use miscast::MiscastChecker;
pub use podium::PodiumChecker;

/// `days` consecutive dates starting at `start`
pub fn date_range(start: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..u64::from(days))
        .filter_map(|offset| start.checked_add_days(Days::new(offset)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_range_crosses_month() {
        let start = NaiveDate::from_ymd_opt(2026, 2, 27).unwrap();
        let dates = date_range(start, 3);
        assert_eq!(
            dates,
            vec![
                start,
                NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
                NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            ]
        );
    }

    #[test]
    fn test_date_range_zero_days() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert!(date_range(start, 0).is_empty());
    }
}
