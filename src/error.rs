//! Typed failures surfaced by the attendance and leave engines.
//!
//! Every guard violation maps to a distinct variant; the caller decides how
//! to present it. The engines never log, never retry, and never coerce an
//! invalid request into a valid one.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::model::leave::{LeaveStatus, LeaveType};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("interval start {start} is after its end {end}")]
    InvalidInterval {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("cannot {action} a leave request in status {from}")]
    InvalidTransition {
        from: LeaveStatus,
        action: &'static str,
    },

    #[error("employee has already checked in today")]
    AlreadyCheckedIn,

    #[error("employee has already checked out today")]
    AlreadyCheckedOut,

    #[error("employee has not checked in today")]
    NotCheckedIn,

    #[error("a break has already been started today")]
    BreakAlreadyStarted,

    #[error("the break has already ended")]
    BreakAlreadyEnded,

    #[error("no break is in progress")]
    NoBreakInProgress,

    #[error("requested range overlaps an existing pending or approved leave")]
    OverlappingRequest,

    #[error("insufficient {leave_type} balance: requested {requested}, available {available}")]
    InsufficientBalance {
        leave_type: LeaveType,
        requested: f64,
        available: f64,
    },

    #[error("leave start date {0} is in the past")]
    PastStartDate(NaiveDate),

    #[error("leave end date {end} is before start date {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

pub type Result<T> = std::result::Result<T, EngineError>;
