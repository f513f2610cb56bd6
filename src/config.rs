use chrono::NaiveTime;
use dotenvy::dotenv;
use std::env;

/// Work-day thresholds the attendance clock judges a record against.
///
/// Defaults mirror the common 09:00–17:00 / 8-hour day; every threshold can
/// be overridden through the environment so late-arrival and overtime policy
/// is configuration, not a literal in the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkSchedule {
    /// Nominal start of the work day; checking in later flags the record LATE.
    pub work_start: NaiveTime,
    /// Nominal end of the work day; checking out earlier flags EARLY_DEPARTURE.
    pub work_end: NaiveTime,
    /// Hours beyond which worked time counts as overtime.
    pub standard_day_hours: f64,
    /// Worked-hours threshold below which a completed day is a HALF_DAY.
    pub half_day_hours: f64,
    /// Minutes of slack after `work_start` before a check-in counts as late.
    pub late_grace_minutes: i64,
}

impl Default for WorkSchedule {
    fn default() -> Self {
        Self {
            work_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            work_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            standard_day_hours: 8.0,
            half_day_hours: 4.0,
            late_grace_minutes: 0,
        }
    }
}

impl WorkSchedule {
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Self::default();
        Self {
            work_start: env::var("HRM_WORK_START")
                .ok()
                .and_then(|v| NaiveTime::parse_from_str(&v, "%H:%M").ok())
                .unwrap_or(defaults.work_start),
            work_end: env::var("HRM_WORK_END")
                .ok()
                .and_then(|v| NaiveTime::parse_from_str(&v, "%H:%M").ok())
                .unwrap_or(defaults.work_end),
            standard_day_hours: env::var("HRM_STANDARD_DAY_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.standard_day_hours),
            half_day_hours: env::var("HRM_HALF_DAY_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.half_day_hours),
            late_grace_minutes: env::var("HRM_LATE_GRACE_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.late_grace_minutes),
        }
    }

    /// Latest check-in time that still counts as on time.
    pub fn latest_on_time(&self) -> NaiveTime {
        self.work_start + chrono::Duration::minutes(self.late_grace_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_standard_day() {
        let schedule = WorkSchedule::default();
        assert_eq!(
            schedule.work_start,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
        assert_eq!(schedule.work_end, NaiveTime::from_hms_opt(17, 0, 0).unwrap());
        assert_eq!(schedule.standard_day_hours, 8.0);
    }

    #[test]
    fn grace_extends_on_time_window() {
        let schedule = WorkSchedule {
            late_grace_minutes: 15,
            ..WorkSchedule::default()
        };
        assert_eq!(
            schedule.latest_on_time(),
            NaiveTime::from_hms_opt(9, 15, 0).unwrap()
        );
    }
}
