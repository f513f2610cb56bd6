//! Pure time arithmetic shared by the clock engine: elapsed minutes/hours
//! between timestamps, break deduction, overtime threshold.

use chrono::NaiveDateTime;

use crate::error::{EngineError, Result};

/// Whole minutes between `start` and `end`.
pub fn break_minutes(start: NaiveDateTime, end: NaiveDateTime) -> Result<i64> {
    if end < start {
        return Err(EngineError::InvalidInterval { start, end });
    }
    Ok((end - start).num_minutes())
}

/// Hours worked between `start` and `end` after deducting `break_minutes`,
/// clamped at zero (a break longer than the window yields 0, not negative).
pub fn elapsed_hours(
    start: NaiveDateTime,
    end: NaiveDateTime,
    break_minutes: i64,
) -> Result<f64> {
    if end < start {
        return Err(EngineError::InvalidInterval { start, end });
    }
    let worked = (end - start).num_minutes() - break_minutes;
    Ok(worked.max(0) as f64 / 60.0)
}

/// Hours beyond the standard day, never negative.
pub fn overtime_hours(hours_worked: f64, standard_day_hours: f64) -> f64 {
    (hours_worked - standard_day_hours).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn break_minutes_of_half_hour() {
        assert_eq!(break_minutes(at(12, 0), at(12, 30)).unwrap(), 30);
    }

    #[test]
    fn break_minutes_rejects_inverted_interval() {
        let err = break_minutes(at(12, 30), at(12, 0)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInterval { .. }));
    }

    #[test]
    fn elapsed_hours_deducts_break() {
        // 09:15 -> 17:45 is 8h30m; minus a 30 minute break = 8.0h.
        assert_eq!(elapsed_hours(at(9, 15), at(17, 45), 30).unwrap(), 8.0);
    }

    #[test]
    fn elapsed_hours_never_negative() {
        // Break longer than the whole window clamps to zero.
        assert_eq!(elapsed_hours(at(9, 0), at(9, 10), 600).unwrap(), 0.0);
    }

    #[test]
    fn elapsed_hours_rejects_inverted_interval() {
        let err = elapsed_hours(at(17, 0), at(9, 0), 0).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidInterval {
                start: at(17, 0),
                end: at(9, 0),
            }
        );
    }

    #[test]
    fn overtime_at_and_over_threshold() {
        assert_eq!(overtime_hours(8.0, 8.0), 0.0);
        assert_eq!(overtime_hours(9.5, 8.0), 1.5);
        assert_eq!(overtime_hours(3.0, 8.0), 0.0);
    }

    proptest! {
        #[test]
        fn elapsed_hours_matches_formula(
            start_min in 0i64..720,
            span_min in 0i64..720,
            break_min in 0i64..240,
        ) {
            let start = at(0, 0) + chrono::Duration::minutes(start_min);
            let end = start + chrono::Duration::minutes(span_min);
            let hours = elapsed_hours(start, end, break_min).unwrap();
            let expected = ((span_min - break_min).max(0)) as f64 / 60.0;
            prop_assert!((hours - expected).abs() < 1e-9);
            prop_assert!(hours >= 0.0);
        }

        #[test]
        fn overtime_never_negative(h in 0.0f64..24.0) {
            prop_assert!(overtime_hours(h, 8.0) >= 0.0);
        }
    }
}
