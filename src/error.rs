//! Error types shared by the services and the screen controller.

use crate::models::BoardId;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("password already set")]
    AlreadySet,
    #[error("password not set yet")]
    NotSet,
    #[error("incorrect password")]
    IncorrectPassword,
    #[error("auth storage error: {0}")]
    Storage(#[source] anyhow::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("board not found: {0}")]
    NotFound(BoardId),
    #[error("board name is empty")]
    EmptyName,
    #[error("board storage error: {0}")]
    Storage(#[source] anyhow::Error),
}

/// Local checks on a new password before any service is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("passwords do not match")]
    Mismatch,
    #[error("password too short")]
    TooShort,
}
