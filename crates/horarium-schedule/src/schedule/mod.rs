//! The recurrence engine: vocabulary extraction, converters, graph
//! traversal, and occurrence resolution.

pub mod build;
pub mod convert;
pub mod resolve;
pub mod rule;
pub mod schema;
pub mod unfurl;

#[cfg(test)]
mod tests;

pub use build::{LdSchedule, rule_text_to_schedule, rule_to_schedule};
pub use convert::schedule_to_rule;
pub use resolve::{
    Occurrence, ResolverOptions, WeeklySchedule, Window, resolve_weekly, weekly_schedule_for_graph,
};
pub use rule::RecurrenceRule;
pub use unfurl::{RuleWithData, ScheduleData, unfurl_events};
