use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

use super::{EmployeeId, RecordHeader};
use crate::engine::overlap::DateRange;

/// An employee's request for a contiguous, inclusive date range of absence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    #[serde(flatten)]
    pub header: RecordHeader,
    pub employee_id: EmployeeId,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Inclusive day count of the range, halved when `is_half_day`.
    pub days_requested: f64,
    pub reason: String,
    pub status: LeaveStatus,
    pub is_half_day: bool,
    pub approver_id: Option<EmployeeId>,
    pub approver_comments: Option<String>,
    pub applied_date: NaiveDate,
    pub approved_date: Option<NaiveDate>,
    /// Correlation id of the external workflow run triggered for this request.
    pub workflow_run_id: Option<Uuid>,
}

impl LeaveRequest {
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LeaveType {
    Annual,
    Sick,
    Maternity,
    Paternity,
    Personal,
    Emergency,
    Bereavement,
    Unpaid,
    Sabbatical,
    Training,
    JuryDuty,
    Military,
}

impl LeaveType {
    /// Whether this type draws on a tracked balance. Untracked types pass
    /// through the ledger without debit or credit.
    pub fn tracks_balance(self) -> bool {
        matches!(self, LeaveType::Annual | LeaveType::Sick)
    }
}

/// Lifecycle status of a leave request.
///
/// `Completed` is reached time-driven once an approved range lies in the
/// past; there is no explicit transition operation for it in the engine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LeaveStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
    Cancelled,
    Completed,
}

impl LeaveStatus {
    /// The exhaustive transition table of the lifecycle state machine. Every
    /// mutation goes through this check rather than scattered predicates.
    pub fn can_transition_to(self, next: LeaveStatus) -> bool {
        use LeaveStatus::*;
        matches!(
            (self, next),
            (Draft, Pending)
                | (Pending, Approved)
                | (Pending, Rejected)
                | (Pending, Cancelled)
                | (Approved, Cancelled)
                | (Approved, Completed)
        )
    }

    /// Statuses whose date ranges block a new request for the same employee.
    pub fn blocks_overlap(self) -> bool {
        matches!(self, LeaveStatus::Pending | LeaveStatus::Approved)
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            LeaveStatus::Rejected | LeaveStatus::Cancelled | LeaveStatus::Completed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table_is_exact() {
        use LeaveStatus::*;
        let all = [Draft, Pending, Approved, Rejected, Cancelled, Completed];
        let allowed = [
            (Draft, Pending),
            (Pending, Approved),
            (Pending, Rejected),
            (Pending, Cancelled),
            (Approved, Cancelled),
            (Approved, Completed),
        ];
        for from in all {
            for to in all {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn only_pending_and_approved_block_overlap() {
        assert!(LeaveStatus::Pending.blocks_overlap());
        assert!(LeaveStatus::Approved.blocks_overlap());
        assert!(!LeaveStatus::Draft.blocks_overlap());
        assert!(!LeaveStatus::Rejected.blocks_overlap());
        assert!(!LeaveStatus::Cancelled.blocks_overlap());
        assert!(!LeaveStatus::Completed.blocks_overlap());
    }

    #[test]
    fn only_annual_and_sick_track_balance() {
        assert!(LeaveType::Annual.tracks_balance());
        assert!(LeaveType::Sick.tracks_balance());
        assert!(!LeaveType::Unpaid.tracks_balance());
        assert!(!LeaveType::Maternity.tracks_balance());
        assert!(!LeaveType::JuryDuty.tracks_balance());
    }
}
