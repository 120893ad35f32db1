use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("trip duration must be 3, 5 or 7 days, got {0}")]
    InvalidDuration(u8),
    #[error("unknown destination `{0}`")]
    UnknownDestination(String),
    #[error("invalid quiz answer sheet: {0}")]
    InvalidQuizAnswer(String),
}
