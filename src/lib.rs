//! # hrm-core
//!
//! Storage-agnostic engines for the two time-bound HR workflows:
//!
//! - the **attendance clock**: a per-employee-per-day state machine driving
//!   check-in → break → check-out and deriving worked/overtime hours, and
//! - the **leave accounting engine**: the leave-request lifecycle
//!   (draft/submit/approve/reject/cancel) composed with inclusive date-range
//!   overlap detection and a per-employee leave-balance ledger.
//!
//! Engines operate on in-memory entity snapshots and return either a new
//! snapshot or a typed [`EngineError`]; persistence and outbound notification
//! belong to the calling layer. [`store`] ships an in-memory store with
//! optimistic version checking and [`service`] a thin unit-of-work layer on
//! top of it, usable directly or as a reference for a real backing store.

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod notify;
pub mod service;
pub mod store;

pub use config::WorkSchedule;
pub use engine::attendance::{AttendanceClock, AttendanceUpdate, CheckInParams};
pub use engine::leave::{LeaveLifecycle, NewLeaveRequest};
pub use engine::overlap::{DateRange, blocking_ranges, has_overlap};
pub use error::{EngineError, Result};
pub use model::attendance::{Attendance, AttendanceStatus, ClockState};
pub use model::employee::{Employee, LeaveBalances};
pub use model::leave::{LeaveRequest, LeaveStatus, LeaveType};
pub use model::{AttendanceId, EmployeeId, LeaveRequestId, RecordHeader};
pub use notify::{LeaveTransitionEvent, NoopNotifier, WorkflowNotifier};
pub use service::{AttendanceService, LeaveService, ServiceError};
pub use store::{AttendanceStore, EmployeeStore, LeaveStore, MemoryStore, StoreError};
