//! Recurrence conversion and occurrence resolution for schema.org
//! `Event`/`Schedule` JSON-LD.
//!
//! The pipeline: [`schedule::unfurl`] walks a loosely typed JSON-LD graph
//! and finds events with schedules, [`schedule::convert`] turns each
//! schedule into a canonical [`schedule::rule::RecurrenceRule`], and
//! [`schedule::resolve`] expands those rules into concrete zoned
//! occurrences grouped by day of week. [`schedule::build`] is the inverse
//! direction, rule back to a JSON-LD schedule node.

pub mod error;
pub mod schedule;

pub use error::{ScheduleError, ScheduleResult};
