use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use super::{EmployeeId, RecordHeader};

/// One employee's check-in/break/check-out data for a single calendar date.
///
/// At most one record exists per (employee, date); the clock engine enforces
/// this independently of the store's uniqueness. Derived fields
/// (`break_duration_minutes`, `hours_worked`, `overtime_hours`) are
/// recomputed by the engine on every completing transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    #[serde(flatten)]
    pub header: RecordHeader,
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub check_in_time: Option<NaiveDateTime>,
    pub check_out_time: Option<NaiveDateTime>,
    pub break_start_time: Option<NaiveDateTime>,
    pub break_end_time: Option<NaiveDateTime>,
    pub break_duration_minutes: Option<i64>,
    pub hours_worked: Option<f64>,
    pub overtime_hours: Option<f64>,
    pub status: AttendanceStatus,
    pub location: Option<String>,
    pub ip_address: Option<String>,
    pub is_remote: bool,
    pub notes: Option<String>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    #[default]
    Absent,
    HalfDay,
    OnLeave,
    Late,
    EarlyDeparture,
    Overtime,
    Sick,
    Holiday,
    Weekend,
}

/// Position of a record in the daily clock state machine.
///
/// `NoCheckIn` only arises for records created or corrected administratively;
/// the normal path starts at `CheckedIn`. `CheckedOut` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    NoCheckIn,
    CheckedIn,
    OnBreak,
    CheckedOut,
}

impl Attendance {
    pub fn new(employee_id: EmployeeId, date: NaiveDate) -> Self {
        Self {
            header: RecordHeader::new(),
            employee_id,
            date,
            check_in_time: None,
            check_out_time: None,
            break_start_time: None,
            break_end_time: None,
            break_duration_minutes: None,
            hours_worked: None,
            overtime_hours: None,
            status: AttendanceStatus::default(),
            location: None,
            ip_address: None,
            is_remote: false,
            notes: None,
        }
    }

    pub fn has_checked_in(&self) -> bool {
        self.check_in_time.is_some()
    }

    pub fn has_checked_out(&self) -> bool {
        self.check_out_time.is_some()
    }

    pub fn is_on_break(&self) -> bool {
        self.break_start_time.is_some() && self.break_end_time.is_none()
    }

    pub fn has_completed_break(&self) -> bool {
        self.break_start_time.is_some() && self.break_end_time.is_some()
    }

    pub fn clock_state(&self) -> ClockState {
        if self.has_checked_out() {
            ClockState::CheckedOut
        } else if self.is_on_break() {
            ClockState::OnBreak
        } else if self.has_checked_in() {
            ClockState::CheckedIn
        } else {
            ClockState::NoCheckIn
        }
    }
}
