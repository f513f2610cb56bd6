//! The attendance clock: a per-employee-per-day state machine over
//! [`Attendance`] snapshots.
//!
//! `NoRecord → CheckedIn → OnBreak → CheckedIn → CheckedOut`, with
//! `CheckedOut` terminal. Every operation takes the current snapshot and
//! returns a new one or a typed failure; the caller persists the result.

use chrono::NaiveDateTime;

use crate::config::WorkSchedule;
use crate::engine::time;
use crate::error::{EngineError, Result};
use crate::model::EmployeeId;
use crate::model::attendance::{Attendance, AttendanceStatus, ClockState};

/// Optional context captured at check-in time.
#[derive(Debug, Clone, Default)]
pub struct CheckInParams {
    pub ip_address: Option<String>,
    pub location: Option<String>,
    pub is_remote: bool,
}

/// Administrative correction to an existing record. Timestamp fields replace
/// the stored ones wholesale, so a correction can also clear a checkpoint.
#[derive(Debug, Clone, Default)]
pub struct AttendanceUpdate {
    pub check_in_time: Option<NaiveDateTime>,
    pub check_out_time: Option<NaiveDateTime>,
    pub break_start_time: Option<NaiveDateTime>,
    pub break_end_time: Option<NaiveDateTime>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

pub struct AttendanceClock {
    schedule: WorkSchedule,
}

impl AttendanceClock {
    pub fn new(schedule: WorkSchedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &WorkSchedule {
        &self.schedule
    }

    /// Record a check-in at `now`. Creates the daily record when none exists,
    /// fills an empty check-in otherwise. A second check-in on the same day
    /// fails and leaves the existing timestamp untouched, as does a check-in
    /// on a record that already carries a check-out.
    pub fn check_in(
        &self,
        existing: Option<Attendance>,
        employee_id: EmployeeId,
        now: NaiveDateTime,
        params: CheckInParams,
    ) -> Result<Attendance> {
        let mut record = match existing {
            Some(record) if record.has_checked_in() => {
                return Err(EngineError::AlreadyCheckedIn);
            }
            Some(record) if record.has_checked_out() => {
                return Err(EngineError::AlreadyCheckedOut);
            }
            Some(record) => record,
            None => Attendance::new(employee_id, now.date()),
        };

        record.check_in_time = Some(now);
        record.ip_address = params.ip_address;
        record.location = params.location;
        record.is_remote = params.is_remote;
        record.status = if now.time() > self.schedule.latest_on_time() {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::Present
        };
        record.header.touch();
        Ok(record)
    }

    /// Open the day's break. Only valid while checked in and not yet checked
    /// out; the day models a single break, so a second start is refused even
    /// after the first break ended.
    pub fn start_break(&self, record: &Attendance, now: NaiveDateTime) -> Result<Attendance> {
        match record.clock_state() {
            ClockState::NoCheckIn | ClockState::CheckedOut => {
                return Err(EngineError::NotCheckedIn);
            }
            ClockState::OnBreak => return Err(EngineError::BreakAlreadyStarted),
            ClockState::CheckedIn => {}
        }
        if record.break_start_time.is_some() {
            return Err(EngineError::BreakAlreadyStarted);
        }

        let mut record = record.clone();
        record.break_start_time = Some(now);
        record.header.touch();
        Ok(record)
    }

    /// Close the open break and store its duration in minutes. Refused once
    /// the day is checked out: the break window must sit inside the work
    /// window, and worked hours are already final (corrections go through
    /// [`Self::update`]).
    pub fn end_break(&self, record: &Attendance, now: NaiveDateTime) -> Result<Attendance> {
        if record.has_checked_out() {
            return Err(EngineError::AlreadyCheckedOut);
        }
        let Some(break_start) = record.break_start_time else {
            return Err(EngineError::NoBreakInProgress);
        };
        if record.break_end_time.is_some() {
            return Err(EngineError::BreakAlreadyEnded);
        }

        let minutes = time::break_minutes(break_start, now)?;
        let mut record = record.clone();
        record.break_end_time = Some(now);
        record.break_duration_minutes = Some(minutes);
        record.header.touch();
        Ok(record)
    }

    /// Record the check-out, compute worked and overtime hours from the
    /// stored break deduction, and derive the day's final status.
    pub fn check_out(&self, record: &Attendance, now: NaiveDateTime) -> Result<Attendance> {
        let Some(check_in) = record.check_in_time else {
            return Err(EngineError::NotCheckedIn);
        };
        if record.has_checked_out() {
            return Err(EngineError::AlreadyCheckedOut);
        }

        let break_minutes = record.break_duration_minutes.unwrap_or(0);
        let hours = time::elapsed_hours(check_in, now, break_minutes)?;
        let overtime = time::overtime_hours(hours, self.schedule.standard_day_hours);

        let mut record = record.clone();
        record.check_out_time = Some(now);
        record.hours_worked = Some(hours);
        record.overtime_hours = Some(overtime);
        record.status = self.day_status(&record);
        record.header.touch();
        Ok(record)
    }

    /// Apply an administrative correction, re-validate every temporal
    /// invariant, and recompute whatever derived fields have both checkpoints
    /// of their pair present after the update.
    pub fn update(&self, record: &Attendance, update: AttendanceUpdate) -> Result<Attendance> {
        let mut record = record.clone();
        record.check_in_time = update.check_in_time;
        record.check_out_time = update.check_out_time;
        record.break_start_time = update.break_start_time;
        record.break_end_time = update.break_end_time;
        if update.location.is_some() {
            record.location = update.location;
        }
        if update.notes.is_some() {
            record.notes = update.notes;
        }

        validate(&record)?;

        record.break_duration_minutes = match (record.break_start_time, record.break_end_time) {
            (Some(start), Some(end)) => Some(time::break_minutes(start, end)?),
            _ => None,
        };
        if let (Some(check_in), Some(check_out)) = (record.check_in_time, record.check_out_time) {
            let break_minutes = record.break_duration_minutes.unwrap_or(0);
            let hours = time::elapsed_hours(check_in, check_out, break_minutes)?;
            record.hours_worked = Some(hours);
            record.overtime_hours =
                Some(time::overtime_hours(hours, self.schedule.standard_day_hours));
            record.status = self.day_status(&record);
        } else {
            record.hours_worked = None;
            record.overtime_hours = None;
        }
        record.header.touch();
        Ok(record)
    }

    /// Final status of a completed day. Precedence: half day, then overtime,
    /// then late arrival, then early departure.
    fn day_status(&self, record: &Attendance) -> AttendanceStatus {
        let hours = record.hours_worked.unwrap_or(0.0);
        let late = record
            .check_in_time
            .is_some_and(|t| t.time() > self.schedule.latest_on_time());
        let early = record
            .check_out_time
            .is_some_and(|t| t.time() < self.schedule.work_end);

        if hours < self.schedule.half_day_hours {
            AttendanceStatus::HalfDay
        } else if record.overtime_hours.unwrap_or(0.0) > 0.0 {
            AttendanceStatus::Overtime
        } else if late {
            AttendanceStatus::Late
        } else if early {
            AttendanceStatus::EarlyDeparture
        } else {
            AttendanceStatus::Present
        }
    }
}

/// Check the temporal invariants: check-in ≤ check-out, break-start ≤
/// break-end, and the break window inside the work window when all four
/// checkpoints are present.
fn validate(record: &Attendance) -> Result<()> {
    if let (Some(check_in), Some(check_out)) = (record.check_in_time, record.check_out_time) {
        if check_in > check_out {
            return Err(EngineError::InvalidInterval {
                start: check_in,
                end: check_out,
            });
        }
    }
    if let (Some(break_start), Some(break_end)) = (record.break_start_time, record.break_end_time)
    {
        if break_start > break_end {
            return Err(EngineError::InvalidInterval {
                start: break_start,
                end: break_end,
            });
        }
        if let (Some(check_in), Some(check_out)) = (record.check_in_time, record.check_out_time) {
            if break_start < check_in || break_end > check_out {
                return Err(EngineError::InvalidInterval {
                    start: break_start,
                    end: break_end,
                });
            }
        }
    }
    Ok(())
}
