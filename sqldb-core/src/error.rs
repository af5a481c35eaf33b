use crate::Error;
use thiserror::Error as ThisError;

/// Failures raised by the access layer itself, before or after the driver.
///
/// They travel inside [`crate::Error`] and can be recovered with
/// `downcast_ref::<AccessError>()`.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("invalid entity: {0}")]
    InvalidEntity(String),
    #[error("entity `{0}` has no primary key")]
    NoPrimaryKey(String),
    #[error("no rows in result set")]
    NoRows,
}

/// True when the error, or any error in its chain, is [`AccessError::NoRows`].
pub fn is_no_rows(error: &Error) -> bool {
    error
        .chain()
        .any(|e| matches!(e.downcast_ref::<AccessError>(), Some(AccessError::NoRows)))
}
