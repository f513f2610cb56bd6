//! Unit-of-work layer composing the stores, the engines, and the workflow
//! notifier.
//!
//! Each operation is read → guard → write against a single key (employee+date
//! for attendance, request id for leave). Writes carry the snapshot's version
//! and are retried a bounded number of times when a concurrent writer got
//! there first; a surviving conflict is surfaced to the caller.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::config::WorkSchedule;
use crate::engine::attendance::{AttendanceClock, AttendanceUpdate, CheckInParams};
use crate::engine::leave::{LeaveLifecycle, NewLeaveRequest};
use crate::engine::ledger;
use crate::error::EngineError;
use crate::model::attendance::Attendance;
use crate::model::employee::Employee;
use crate::model::leave::{LeaveRequest, LeaveType};
use crate::model::{AttendanceId, EmployeeId, LeaveRequestId};
use crate::notify::WorkflowNotifier;
use crate::store::{AttendanceStore, EmployeeStore, LeaveStore, StoreError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("employee {0} not found")]
    EmployeeNotFound(EmployeeId),

    #[error("leave request {0} not found")]
    LeaveRequestNotFound(LeaveRequestId),

    #[error("attendance record {0} not found")]
    AttendanceNotFound(AttendanceId),
}

/// Attempts per operation before a version conflict is surfaced.
const MAX_CONFLICT_RETRIES: usize = 3;

fn retry_on_conflict<T>(
    mut attempt: impl FnMut() -> Result<T, ServiceError>,
) -> Result<T, ServiceError> {
    let mut attempts = 0;
    loop {
        match attempt() {
            Err(err @ ServiceError::Store(StoreError::VersionConflict { .. })) => {
                attempts += 1;
                if attempts == MAX_CONFLICT_RETRIES {
                    return Err(err);
                }
            }
            other => return other,
        }
    }
}

// ── attendance ──────────────────────────────────────────────────────────

pub struct AttendanceService<S: AttendanceStore> {
    clock: AttendanceClock,
    store: Arc<S>,
}

impl<S: AttendanceStore> AttendanceService<S> {
    pub fn new(schedule: WorkSchedule, store: Arc<S>) -> Self {
        Self {
            clock: AttendanceClock::new(schedule),
            store,
        }
    }

    pub fn today_record(
        &self,
        employee_id: EmployeeId,
        date: NaiveDate,
    ) -> Option<Attendance> {
        self.store.find_for_day(employee_id, date)
    }

    pub fn check_in(
        &self,
        employee_id: EmployeeId,
        now: NaiveDateTime,
        params: CheckInParams,
    ) -> Result<Attendance, ServiceError> {
        retry_on_conflict(|| {
            let existing = self.store.find_for_day(employee_id, now.date());
            let record = self
                .clock
                .check_in(existing, employee_id, now, params.clone())?;
            Ok(self.store.save(record)?)
        })
    }

    pub fn start_break(
        &self,
        employee_id: EmployeeId,
        now: NaiveDateTime,
    ) -> Result<Attendance, ServiceError> {
        self.with_today(employee_id, now, |clock, record| {
            clock.start_break(record, now)
        })
    }

    pub fn end_break(
        &self,
        employee_id: EmployeeId,
        now: NaiveDateTime,
    ) -> Result<Attendance, ServiceError> {
        self.with_today(employee_id, now, |clock, record| clock.end_break(record, now))
    }

    pub fn check_out(
        &self,
        employee_id: EmployeeId,
        now: NaiveDateTime,
    ) -> Result<Attendance, ServiceError> {
        self.with_today(employee_id, now, |clock, record| clock.check_out(record, now))
    }

    /// Administrative correction of an arbitrary record by id.
    pub fn update_record(
        &self,
        id: AttendanceId,
        update: AttendanceUpdate,
    ) -> Result<Attendance, ServiceError> {
        retry_on_conflict(|| {
            let record = self
                .store
                .find_by_id(id)
                .ok_or(ServiceError::AttendanceNotFound(id))?;
            let record = self.clock.update(&record, update.clone())?;
            Ok(self.store.save(record)?)
        })
    }

    fn with_today(
        &self,
        employee_id: EmployeeId,
        now: NaiveDateTime,
        op: impl Fn(&AttendanceClock, &Attendance) -> crate::error::Result<Attendance>,
    ) -> Result<Attendance, ServiceError> {
        retry_on_conflict(|| {
            let record = self
                .store
                .find_for_day(employee_id, now.date())
                .ok_or(ServiceError::Engine(EngineError::NotCheckedIn))?;
            let record = op(&self.clock, &record)?;
            Ok(self.store.save(record)?)
        })
    }
}

// ── leave ───────────────────────────────────────────────────────────────

pub struct LeaveService<S: LeaveStore + EmployeeStore> {
    lifecycle: LeaveLifecycle,
    store: Arc<S>,
}

impl<S: LeaveStore + EmployeeStore> LeaveService<S> {
    pub fn new(notifier: Arc<dyn WorkflowNotifier>, store: Arc<S>) -> Self {
        Self {
            lifecycle: LeaveLifecycle::new(notifier),
            store,
        }
    }

    fn employee(&self, id: EmployeeId) -> Result<Employee, ServiceError> {
        EmployeeStore::find_by_id(&*self.store, id).ok_or(ServiceError::EmployeeNotFound(id))
    }

    fn request(&self, id: LeaveRequestId) -> Result<LeaveRequest, ServiceError> {
        LeaveStore::find_by_id(&*self.store, id).ok_or(ServiceError::LeaveRequestNotFound(id))
    }

    pub fn create(
        &self,
        new: NewLeaveRequest,
        today: NaiveDate,
    ) -> Result<LeaveRequest, ServiceError> {
        let saved = retry_on_conflict(|| {
            let employee = self.employee(new.employee_id)?;
            let existing = self.store.find_for_employee(new.employee_id);
            let request = self.lifecycle.create(new.clone(), &employee, &existing, today)?;
            Ok(LeaveStore::save(&*self.store, request)?)
        })?;
        self.announce(saved)
    }

    pub fn draft(
        &self,
        new: NewLeaveRequest,
        today: NaiveDate,
    ) -> Result<LeaveRequest, ServiceError> {
        let request = self.lifecycle.draft(new, today)?;
        Ok(LeaveStore::save(&*self.store, request)?)
    }

    pub fn submit(&self, id: LeaveRequestId) -> Result<LeaveRequest, ServiceError> {
        let saved = retry_on_conflict(|| {
            let request = self.request(id)?;
            let request = self.lifecycle.submit(&request)?;
            Ok(LeaveStore::save(&*self.store, request)?)
        })?;
        self.announce(saved)
    }

    /// Notify the workflow collaborator about a committed transition, once,
    /// outside the retry loop, and persist the run id it hands back. The
    /// transition itself is already durable at this point, so the run-id save
    /// re-reads the latest snapshot and retries on conflict; a conflict that
    /// still survives costs only the stored run id, which is logged, never
    /// the transition.
    fn announce(&self, mut request: LeaveRequest) -> Result<LeaveRequest, ServiceError> {
        let employee = self.employee(request.employee_id)?;
        self.lifecycle.notify_transition(&mut request, &employee);
        let Some(run_id) = request.workflow_run_id else {
            return Ok(request);
        };
        let stamped = retry_on_conflict(|| {
            let mut latest = self.request(request.header.id)?;
            latest.workflow_run_id = Some(run_id);
            Ok(LeaveStore::save(&*self.store, latest)?)
        });
        match stamped {
            Err(ServiceError::Store(StoreError::VersionConflict { .. })) => {
                tracing::warn!(
                    leave_request_id = request.header.id,
                    run_id = %run_id,
                    "workflow run id not persisted after version conflict"
                );
                Ok(request)
            }
            other => other,
        }
    }

    /// Approve and debit as one unit. With this in-memory store the two
    /// saves are sequential; a transactional backend commits them together.
    pub fn approve(
        &self,
        id: LeaveRequestId,
        approver_id: EmployeeId,
        comments: Option<String>,
        today: NaiveDate,
    ) -> Result<LeaveRequest, ServiceError> {
        retry_on_conflict(|| {
            let request = self.request(id)?;
            let employee = self.employee(request.employee_id)?;
            let (request, employee) =
                self.lifecycle
                    .approve(&request, &employee, approver_id, comments.clone(), today)?;
            EmployeeStore::save(&*self.store, employee)?;
            Ok(LeaveStore::save(&*self.store, request)?)
        })
    }

    pub fn reject(
        &self,
        id: LeaveRequestId,
        approver_id: EmployeeId,
        comments: Option<String>,
    ) -> Result<LeaveRequest, ServiceError> {
        retry_on_conflict(|| {
            let request = self.request(id)?;
            let request = self.lifecycle.reject(&request, approver_id, comments.clone())?;
            Ok(LeaveStore::save(&*self.store, request)?)
        })
    }

    pub fn cancel(&self, id: LeaveRequestId) -> Result<LeaveRequest, ServiceError> {
        retry_on_conflict(|| {
            let request = self.request(id)?;
            let employee = self.employee(request.employee_id)?;
            let (request, employee) = self.lifecycle.cancel(&request, &employee)?;
            EmployeeStore::save(&*self.store, employee)?;
            Ok(LeaveStore::save(&*self.store, request)?)
        })
    }

    /// Read-path balance: tracked balance minus APPROVED days of that type
    /// starting in `year`.
    pub fn available_balance(
        &self,
        employee_id: EmployeeId,
        leave_type: LeaveType,
        year: i32,
    ) -> Result<f64, ServiceError> {
        let employee = self.employee(employee_id)?;
        let requests = self.store.find_for_employee(employee_id);
        Ok(ledger::available_balance(
            &employee, leave_type, &requests, year,
        ))
    }
}
