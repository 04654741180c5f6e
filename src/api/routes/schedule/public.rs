//! Public types for the schedule-meeting API
pub use crate::schedule::ScheduleResponse;
