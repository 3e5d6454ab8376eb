//! SQLite persistence for Shiftboard scheduling state.
//!
//! Exposes a [`Database`] handle with typed select/insert/delete operations
//! over the scheduling tables. All lookups are by primary key or unique
//! email; there are no multi-table transactions. The handle is meant to be
//! shared behind an `Arc` and passed explicitly to whatever layer needs it,
//! never held as a process-wide singleton.

pub mod database;
pub mod error;
pub mod records;

pub use database::Database;
pub use error::{Error, Result};
pub use records::{
    ApprovedEmailRecord, EventRecord, NewEvent, NewSchedule, NewShift, NewUser, ScheduleRecord,
    ShiftRecord, TimeLogRecord, UserRecord,
};
