use thiserror::Error;

/// Schedule conversion and expansion errors
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type ScheduleResult<T> = std::result::Result<T, ScheduleError>;
