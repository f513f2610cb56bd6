//! Fire-and-forget workflow notification collaborator.
//!
//! After a committed leave transition the lifecycle hands an event to a
//! [`WorkflowNotifier`] at most once. Delivery failures are logged and
//! swallowed: the transition's correctness does not depend on the
//! notification succeeding, so a failure never rolls it back.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::leave::LeaveType;
use crate::model::{EmployeeId, LeaveRequestId};

/// Payload describing a committed leave-request transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveTransitionEvent {
    /// Fresh correlation id for this dispatch; the request records it on
    /// successful delivery.
    pub run_id: Uuid,
    pub leave_request_id: LeaveRequestId,
    pub employee_id: EmployeeId,
    pub manager_id: Option<EmployeeId>,
    pub leave_type: LeaveType,
    pub days_requested: f64,
}

pub trait WorkflowNotifier: Send + Sync {
    /// Deliver the event. Implementations may do network I/O; errors are
    /// logged by the caller and never propagated as an engine failure.
    fn notify(&self, event: &LeaveTransitionEvent) -> anyhow::Result<()>;
}

/// Notifier that drops every event; for callers without a workflow backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl WorkflowNotifier for NoopNotifier {
    fn notify(&self, _event: &LeaveTransitionEvent) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serializes_with_snake_case_type() {
        let event = LeaveTransitionEvent {
            run_id: Uuid::nil(),
            leave_request_id: 42,
            employee_id: 7,
            manager_id: Some(2),
            leave_type: LeaveType::JuryDuty,
            days_requested: 2.5,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["leave_type"], "jury_duty");
        assert_eq!(json["days_requested"], 2.5);
        assert_eq!(json["manager_id"], 2);
    }
}
