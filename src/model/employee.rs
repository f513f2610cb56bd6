use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{EmployeeId, RecordHeader};

/// Remaining entitled leave days per tracked leave type.
///
/// Mutated only through the ledger (`engine::ledger`), never directly.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LeaveBalances {
    pub annual: f64,
    pub sick: f64,
}

/// Employee snapshot as consumed by the engines.
///
/// Associations are one-directional foreign keys (`manager_id`,
/// `department_id`); back-references live behind store queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(flatten)]
    pub header: RecordHeader,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub manager_id: Option<EmployeeId>,
    pub department_id: Option<u64>,
    pub hire_date: NaiveDate,
    pub leave_balances: LeaveBalances,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
