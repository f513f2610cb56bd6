//! Per-employee, per-leave-type balance accounting.
//!
//! Only ANNUAL and SICK leave draw on a tracked balance; every other type
//! passes through untouched. Debit and credit are exact inverses, so an
//! approve followed by a cancel restores the balance it started from.

use chrono::Datelike;

use crate::error::{EngineError, Result};
use crate::model::employee::Employee;
use crate::model::leave::{LeaveRequest, LeaveStatus, LeaveType};

fn tracked_balance_mut(employee: &mut Employee, leave_type: LeaveType) -> Option<&mut f64> {
    match leave_type {
        LeaveType::Annual => Some(&mut employee.leave_balances.annual),
        LeaveType::Sick => Some(&mut employee.leave_balances.sick),
        _ => None,
    }
}

fn tracked_balance(employee: &Employee, leave_type: LeaveType) -> Option<f64> {
    match leave_type {
        LeaveType::Annual => Some(employee.leave_balances.annual),
        LeaveType::Sick => Some(employee.leave_balances.sick),
        _ => None,
    }
}

/// Decrement the tracked balance by `days` on approval. Fails without
/// mutating anything when the balance would go negative; no-op for untracked
/// types.
pub fn debit(employee: &mut Employee, leave_type: LeaveType, days: f64) -> Result<()> {
    let Some(balance) = tracked_balance_mut(employee, leave_type) else {
        return Ok(());
    };
    if *balance < days {
        return Err(EngineError::InsufficientBalance {
            leave_type,
            requested: days,
            available: *balance,
        });
    }
    *balance -= days;
    Ok(())
}

/// Restore `days` to the tracked balance on cancellation of a previously
/// approved request. No upper cap; no-op for untracked types.
pub fn credit(employee: &mut Employee, leave_type: LeaveType, days: f64) {
    if let Some(balance) = tracked_balance_mut(employee, leave_type) {
        *balance += days;
    }
}

/// Read-path view of the remaining balance: the tracked balance minus the
/// days of all APPROVED requests of that type starting in `year`. Untracked
/// types report 0.0.
pub fn available_balance(
    employee: &Employee,
    leave_type: LeaveType,
    requests: &[LeaveRequest],
    year: i32,
) -> f64 {
    let Some(balance) = tracked_balance(employee, leave_type) else {
        return 0.0;
    };
    let approved: f64 = requests
        .iter()
        .filter(|req| {
            req.status == LeaveStatus::Approved
                && req.leave_type == leave_type
                && req.start_date.year() == year
        })
        .map(|req| req.days_requested)
        .sum();
    balance - approved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordHeader;
    use chrono::NaiveDate;

    fn employee(annual: f64, sick: f64) -> Employee {
        Employee {
            header: RecordHeader::new(),
            employee_code: "EMP-001".into(),
            first_name: "Ada".into(),
            last_name: "Kamal".into(),
            email: "ada.kamal@company.com".into(),
            manager_id: Some(2),
            department_id: Some(10),
            hire_date: NaiveDate::from_ymd_opt(2022, 6, 1).unwrap(),
            leave_balances: crate::model::employee::LeaveBalances { annual, sick },
        }
    }

    fn approved(leave_type: LeaveType, start: NaiveDate, days: f64) -> LeaveRequest {
        LeaveRequest {
            header: RecordHeader::new(),
            employee_id: 1,
            leave_type,
            start_date: start,
            end_date: start,
            days_requested: days,
            reason: "trip".into(),
            status: LeaveStatus::Approved,
            is_half_day: false,
            approver_id: Some(2),
            approver_comments: None,
            applied_date: start,
            approved_date: Some(start),
            workflow_run_id: None,
        }
    }

    #[test]
    fn debit_then_credit_round_trips() {
        let mut emp = employee(20.0, 10.0);
        debit(&mut emp, LeaveType::Annual, 5.0).unwrap();
        assert_eq!(emp.leave_balances.annual, 15.0);
        credit(&mut emp, LeaveType::Annual, 5.0);
        assert_eq!(emp.leave_balances.annual, 20.0);
    }

    #[test]
    fn debit_rejects_overdraw_without_mutation() {
        let mut emp = employee(3.0, 10.0);
        let err = debit(&mut emp, LeaveType::Annual, 5.0).unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientBalance {
                leave_type: LeaveType::Annual,
                requested: 5.0,
                available: 3.0,
            }
        );
        assert_eq!(emp.leave_balances.annual, 3.0);
    }

    #[test]
    fn untracked_types_pass_through() {
        let mut emp = employee(20.0, 10.0);
        debit(&mut emp, LeaveType::Unpaid, 30.0).unwrap();
        credit(&mut emp, LeaveType::Maternity, 90.0);
        assert_eq!(emp.leave_balances.annual, 20.0);
        assert_eq!(emp.leave_balances.sick, 10.0);
    }

    #[test]
    fn sick_and_annual_balances_are_independent() {
        let mut emp = employee(20.0, 10.0);
        debit(&mut emp, LeaveType::Sick, 4.0).unwrap();
        assert_eq!(emp.leave_balances.sick, 6.0);
        assert_eq!(emp.leave_balances.annual, 20.0);
    }

    #[test]
    fn available_balance_subtracts_approved_in_year() {
        let emp = employee(20.0, 10.0);
        let requests = vec![
            approved(
                LeaveType::Annual,
                NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
                5.0,
            ),
            // Different year: not counted.
            approved(
                LeaveType::Annual,
                NaiveDate::from_ymd_opt(2025, 11, 3).unwrap(),
                3.0,
            ),
            // Different type: not counted.
            approved(
                LeaveType::Sick,
                NaiveDate::from_ymd_opt(2026, 4, 6).unwrap(),
                2.0,
            ),
        ];
        assert_eq!(
            available_balance(&emp, LeaveType::Annual, &requests, 2026),
            15.0
        );
        assert_eq!(
            available_balance(&emp, LeaveType::Sick, &requests, 2026),
            8.0
        );
    }

    #[test]
    fn available_balance_ignores_non_approved() {
        let emp = employee(20.0, 10.0);
        let mut pending = approved(
            LeaveType::Annual,
            NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
            5.0,
        );
        pending.status = LeaveStatus::Pending;
        assert_eq!(
            available_balance(&emp, LeaveType::Annual, &[pending], 2026),
            20.0
        );
    }

    #[test]
    fn untracked_type_reads_zero() {
        let emp = employee(20.0, 10.0);
        assert_eq!(available_balance(&emp, LeaveType::Unpaid, &[], 2026), 0.0);
    }
}
