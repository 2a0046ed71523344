/// Vocabulary constants shared across crates
pub const SCHEMA_ORG_CONTEXT: &str = "https://schema.org";
pub const SCHEMA_ORG_PREFIX: &str = const_str::concat!(SCHEMA_ORG_CONTEXT, "/");

/// JSON-LD keywords
pub const KEY_TYPE: &str = "@type";
pub const KEY_ID: &str = "@id";
pub const KEY_VALUE: &str = "@value";

/// Type discriminator values we act on
pub const TYPE_EVENT: &str = "Event";
pub const TYPE_SCHEDULE: &str = "Schedule";

/// Day-of-week designator excluded from weekday mapping
pub const DAY_PUBLIC_HOLIDAYS: &str = "PublicHolidays";

/// Fallback occurrence length when neither `endTime` nor `duration` is given
pub const DEFAULT_EVENT_DURATION: &str = "PT1H";
