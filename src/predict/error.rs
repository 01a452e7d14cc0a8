use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("propagation out of range: {time} is outside the validity window of the elements (epoch {epoch})")]
    PropagationOutOfRange {
        time: DateTime<Utc>,
        epoch: DateTime<Utc>,
    },
    #[error("Propagation error: {0}")]
    Propagation(String),
    #[error("no pass found: {found} of {requested} passes within {} hours", .span.num_hours())]
    NoPassFound {
        found: usize,
        requested: usize,
        span: Duration,
    },
    #[error("invalid event order: {0}")]
    InvalidEventOrder(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
