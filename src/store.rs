//! Collaborator lookups the engines' callers depend on, plus an in-memory
//! implementation with optimistic version checking.
//!
//! The traits mirror the queries the service layer needs: attendance by
//! (employee, date), an employee's blocking leave requests, and save-by-id
//! with a version check so concurrent writers on the same key cannot lose
//! updates. A real deployment puts a database behind these traits.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::attendance::Attendance;
use crate::model::employee::Employee;
use crate::model::leave::LeaveRequest;
use crate::model::{AttendanceId, EmployeeId, LeaveRequestId, RecordHeader};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The saved snapshot's version no longer matches the stored row;
    /// re-read and retry.
    #[error("stale write: stored version {stored}, snapshot version {snapshot}")]
    VersionConflict { stored: u64, snapshot: u64 },
}

pub trait AttendanceStore: Send + Sync {
    fn find_by_id(&self, id: AttendanceId) -> Option<Attendance>;
    fn find_for_day(&self, employee_id: EmployeeId, date: NaiveDate) -> Option<Attendance>;
    /// Persist the snapshot, assigning an id on first save. Returns the
    /// stored row (id assigned, version bumped).
    fn save(&self, record: Attendance) -> Result<Attendance, StoreError>;
}

pub trait LeaveStore: Send + Sync {
    fn find_by_id(&self, id: LeaveRequestId) -> Option<LeaveRequest>;
    /// All of an employee's requests; the caller filters by status.
    fn find_for_employee(&self, employee_id: EmployeeId) -> Vec<LeaveRequest>;
    fn save(&self, request: LeaveRequest) -> Result<LeaveRequest, StoreError>;
}

pub trait EmployeeStore: Send + Sync {
    fn find_by_id(&self, id: EmployeeId) -> Option<Employee>;
    fn save(&self, employee: Employee) -> Result<Employee, StoreError>;
}

// ── in-memory implementation ────────────────────────────────────────────

trait HasHeader {
    fn header(&self) -> &RecordHeader;
    fn header_mut(&mut self) -> &mut RecordHeader;
}

impl HasHeader for Attendance {
    fn header(&self) -> &RecordHeader {
        &self.header
    }
    fn header_mut(&mut self) -> &mut RecordHeader {
        &mut self.header
    }
}

impl HasHeader for LeaveRequest {
    fn header(&self) -> &RecordHeader {
        &self.header
    }
    fn header_mut(&mut self) -> &mut RecordHeader {
        &mut self.header
    }
}

impl HasHeader for Employee {
    fn header(&self) -> &RecordHeader {
        &self.header
    }
    fn header_mut(&mut self) -> &mut RecordHeader {
        &mut self.header
    }
}

struct Table<T> {
    next_id: u64,
    rows: HashMap<u64, T>,
}

impl<T: HasHeader + Clone> Table<T> {
    fn new() -> Self {
        Self {
            next_id: 1,
            rows: HashMap::new(),
        }
    }

    fn save(&mut self, mut row: T) -> Result<T, StoreError> {
        if !row.header().is_persisted() {
            row.header_mut().id = self.next_id;
            self.next_id += 1;
        } else if let Some(stored) = self.rows.get(&row.header().id) {
            let stored_version = stored.header().version;
            if stored_version != row.header().version {
                return Err(StoreError::VersionConflict {
                    stored: stored_version,
                    snapshot: row.header().version,
                });
            }
        }
        row.header_mut().version += 1;
        self.rows.insert(row.header().id, row.clone());
        Ok(row)
    }
}

/// Single-process store backing the service layer and the test suites.
/// Each entity map sits behind its own mutex, so operations on different
/// entities never contend.
pub struct MemoryStore {
    attendance: Mutex<Table<Attendance>>,
    leaves: Mutex<Table<LeaveRequest>>,
    employees: Mutex<Table<Employee>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            attendance: Mutex::new(Table::new()),
            leaves: Mutex::new(Table::new()),
            employees: Mutex::new(Table::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AttendanceStore for MemoryStore {
    fn find_by_id(&self, id: AttendanceId) -> Option<Attendance> {
        self.attendance.lock().unwrap().rows.get(&id).cloned()
    }

    fn find_for_day(&self, employee_id: EmployeeId, date: NaiveDate) -> Option<Attendance> {
        self.attendance
            .lock()
            .unwrap()
            .rows
            .values()
            .find(|rec| rec.employee_id == employee_id && rec.date == date)
            .cloned()
    }

    fn save(&self, record: Attendance) -> Result<Attendance, StoreError> {
        self.attendance.lock().unwrap().save(record)
    }
}

impl LeaveStore for MemoryStore {
    fn find_by_id(&self, id: LeaveRequestId) -> Option<LeaveRequest> {
        self.leaves.lock().unwrap().rows.get(&id).cloned()
    }

    fn find_for_employee(&self, employee_id: EmployeeId) -> Vec<LeaveRequest> {
        self.leaves
            .lock()
            .unwrap()
            .rows
            .values()
            .filter(|req| req.employee_id == employee_id)
            .cloned()
            .collect()
    }

    fn save(&self, request: LeaveRequest) -> Result<LeaveRequest, StoreError> {
        self.leaves.lock().unwrap().save(request)
    }
}

impl EmployeeStore for MemoryStore {
    fn find_by_id(&self, id: EmployeeId) -> Option<Employee> {
        self.employees.lock().unwrap().rows.get(&id).cloned()
    }

    fn save(&self, employee: Employee) -> Result<Employee, StoreError> {
        self.employees.lock().unwrap().save(employee)
    }
}
