//! Tolerant readers for the loosely typed schema.org vocabulary shapes.

pub mod day;
pub mod duration;
pub mod json;
pub mod node;
pub mod value;

pub use day::{day_code_from_designator, designator_from_day_code, map_by_day};
pub use duration::IsoDuration;
pub use json::parse_json_safely;
pub use node::{NodeKind, classify, is_event_node, is_id_reference, is_schedule_node, node_type};
pub use value::{extract_number, extract_text, field_number, field_text};
