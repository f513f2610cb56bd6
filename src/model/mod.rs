pub mod attendance;
pub mod employee;
pub mod leave;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type EmployeeId = u64;
pub type AttendanceId = u64;
pub type LeaveRequestId = u64;

/// Identity and audit fields shared by every entity.
///
/// Composed into each entity rather than inherited. `version` is the
/// optimistic-concurrency token: the store rejects a save whose version does
/// not match the stored row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordHeader {
    pub id: u64,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecordHeader {
    /// Header for a not-yet-persisted entity; the store assigns the id.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for RecordHeader {
    fn default() -> Self {
        Self::new()
    }
}
