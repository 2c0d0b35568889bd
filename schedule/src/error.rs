use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("could not parse date: {0}")]
    InvalidDate(String),
    #[error("could not format timestamp: {0}")]
    InvalidTimestamp(String),
}
