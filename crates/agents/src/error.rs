use chronos_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyUtterance,
    #[error("a reply is still pending for conversation {0}")]
    TurnInFlight(String),
    #[error("unknown conversation {0}")]
    UnknownSession(String),
    #[error("unknown booking {0}")]
    UnknownBooking(String),
    #[error(transparent)]
    Invalid(#[from] CoreError),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
