//! The leave-request lifecycle: `DRAFT → PENDING → {APPROVED, REJECTED}`,
//! `PENDING/APPROVED → CANCELLED`, `APPROVED → COMPLETED` (time-driven).
//!
//! Every operation takes the current snapshots, re-checks the transition
//! table, and returns new snapshots or a typed failure. Approval debits the
//! balance ledger and cancellation of an approved request credits it back;
//! because the engine works on clones, a failed debit aborts the whole
//! transition with no partial state.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::engine::{ledger, overlap};
use crate::error::{EngineError, Result};
use crate::model::employee::Employee;
use crate::model::leave::{LeaveRequest, LeaveStatus, LeaveType};
use crate::model::{EmployeeId, RecordHeader};
use crate::notify::{LeaveTransitionEvent, WorkflowNotifier};

/// Parameters for a new leave request.
#[derive(Debug, Clone)]
pub struct NewLeaveRequest {
    pub employee_id: EmployeeId,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub is_half_day: bool,
}

pub struct LeaveLifecycle {
    notifier: Arc<dyn WorkflowNotifier>,
}

impl LeaveLifecycle {
    pub fn new(notifier: Arc<dyn WorkflowNotifier>) -> Self {
        Self { notifier }
    }

    /// Validate the date range against `today` and derive the requested day
    /// count: inclusive span, halved for a half-day request.
    fn validated_days(new: &NewLeaveRequest, today: NaiveDate) -> Result<f64> {
        if new.end_date < new.start_date {
            return Err(EngineError::InvalidDateRange {
                start: new.start_date,
                end: new.end_date,
            });
        }
        if new.start_date < today {
            return Err(EngineError::PastStartDate(new.start_date));
        }
        let days = overlap::DateRange::new(new.start_date, new.end_date).days() as f64;
        Ok(if new.is_half_day { days / 2.0 } else { days })
    }

    fn build(new: NewLeaveRequest, days: f64, status: LeaveStatus, today: NaiveDate) -> LeaveRequest {
        LeaveRequest {
            header: RecordHeader::new(),
            employee_id: new.employee_id,
            leave_type: new.leave_type,
            start_date: new.start_date,
            end_date: new.end_date,
            days_requested: days,
            reason: new.reason,
            status,
            is_half_day: new.is_half_day,
            approver_id: None,
            approver_comments: None,
            applied_date: today,
            approved_date: None,
            workflow_run_id: None,
        }
    }

    /// Create a request directly in PENDING. `existing` is the employee's
    /// other leave requests, used for the overlap check and the balance read
    /// path. The caller notifies the workflow collaborator once the new
    /// request is committed ([`Self::notify_transition`]).
    pub fn create(
        &self,
        new: NewLeaveRequest,
        employee: &Employee,
        existing: &[LeaveRequest],
        today: NaiveDate,
    ) -> Result<LeaveRequest> {
        let days = Self::validated_days(&new, today)?;

        let candidate = overlap::DateRange::new(new.start_date, new.end_date);
        if overlap::has_overlap(candidate, &overlap::blocking_ranges(existing)) {
            return Err(EngineError::OverlappingRequest);
        }

        if new.leave_type.tracks_balance() {
            let available = ledger::available_balance(
                employee,
                new.leave_type,
                existing,
                new.start_date.year(),
            );
            if available < days {
                return Err(EngineError::InsufficientBalance {
                    leave_type: new.leave_type,
                    requested: days,
                    available,
                });
            }
        }

        Ok(Self::build(new, days, LeaveStatus::Pending, today))
    }

    /// Draft-first entry point: validates the dates and derives the day
    /// count, but defers overlap/balance checks to submission and approval.
    pub fn draft(&self, new: NewLeaveRequest, today: NaiveDate) -> Result<LeaveRequest> {
        let days = Self::validated_days(&new, today)?;
        Ok(Self::build(new, days, LeaveStatus::Draft, today))
    }

    /// DRAFT → PENDING. The workflow collaborator is notified by the caller
    /// after the transition is committed.
    pub fn submit(&self, request: &LeaveRequest) -> Result<LeaveRequest> {
        self.transition(request, LeaveStatus::Pending, "submit")
    }

    /// PENDING → APPROVED. Debits the ledger first; a failed debit aborts
    /// the approval entirely. Returns the updated request and employee.
    pub fn approve(
        &self,
        request: &LeaveRequest,
        employee: &Employee,
        approver_id: EmployeeId,
        comments: Option<String>,
        today: NaiveDate,
    ) -> Result<(LeaveRequest, Employee)> {
        let mut request = self.transition(request, LeaveStatus::Approved, "approve")?;

        let mut employee = employee.clone();
        ledger::debit(&mut employee, request.leave_type, request.days_requested)?;
        employee.header.touch();

        request.approver_id = Some(approver_id);
        request.approver_comments = comments;
        request.approved_date = Some(today);
        Ok((request, employee))
    }

    /// PENDING → REJECTED. No ledger effect.
    pub fn reject(
        &self,
        request: &LeaveRequest,
        approver_id: EmployeeId,
        comments: Option<String>,
    ) -> Result<LeaveRequest> {
        let mut request = self.transition(request, LeaveStatus::Rejected, "reject")?;
        request.approver_id = Some(approver_id);
        request.approver_comments = comments;
        Ok(request)
    }

    /// PENDING or APPROVED → CANCELLED. A previously approved request has
    /// its debited days credited back before the status change is final.
    pub fn cancel(
        &self,
        request: &LeaveRequest,
        employee: &Employee,
    ) -> Result<(LeaveRequest, Employee)> {
        let was_approved = request.status == LeaveStatus::Approved;
        let request = self.transition(request, LeaveStatus::Cancelled, "cancel")?;

        let mut employee = employee.clone();
        if was_approved {
            ledger::credit(&mut employee, request.leave_type, request.days_requested);
            employee.header.touch();
        }
        Ok((request, employee))
    }

    fn transition(
        &self,
        request: &LeaveRequest,
        next: LeaveStatus,
        action: &'static str,
    ) -> Result<LeaveRequest> {
        if !request.status.can_transition_to(next) {
            return Err(EngineError::InvalidTransition {
                from: request.status,
                action,
            });
        }
        let mut request = request.clone();
        request.status = next;
        request.header.touch();
        Ok(request)
    }

    /// Best-effort dispatch to the workflow collaborator, invoked by the
    /// caller at most once per committed transition (create-as-pending and
    /// submit). On success the request records the run id; on failure we log
    /// and move on; the transition is already committed and stays committed.
    pub fn notify_transition(&self, request: &mut LeaveRequest, employee: &Employee) {
        let event = LeaveTransitionEvent {
            run_id: Uuid::new_v4(),
            leave_request_id: request.header.id,
            employee_id: request.employee_id,
            manager_id: employee.manager_id,
            leave_type: request.leave_type,
            days_requested: request.days_requested,
        };
        match self.notifier.notify(&event) {
            Ok(()) => request.workflow_run_id = Some(event.run_id),
            Err(err) => tracing::warn!(
                error = %err,
                leave_request_id = event.leave_request_id,
                employee_id = event.employee_id,
                "workflow notification failed"
            ),
        }
    }
}
