//! The core engines: pure functions and snapshot-in/snapshot-out state
//! machines. Nothing in this module performs I/O or logs.

pub mod attendance;
pub mod leave;
pub mod ledger;
pub mod overlap;
pub mod time;
