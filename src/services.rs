//! Collaborator seams consumed by the screen controller.

use crate::error::{AuthError, BoardError};
use crate::models::{Board, BoardId};

/// Owns password storage and verification.
pub trait AuthService {
    fn is_password_set(&self) -> Result<bool, AuthError>;

    /// Fails with [`AuthError::AlreadySet`] when a password exists.
    fn set_password(&mut self, password: &str) -> Result<(), AuthError>;

    /// `Ok(false)` for a wrong password or when none is set.
    fn check_password(&self, password: &str) -> Result<bool, AuthError>;

    /// Fails with [`AuthError::NotSet`] or [`AuthError::IncorrectPassword`].
    fn change_password(&mut self, old: &str, new: &str) -> Result<(), AuthError>;
}

/// Owns board persistence. `list_boards` returns boards in display order.
pub trait BoardService {
    fn list_boards(&self) -> Result<Vec<Board>, BoardError>;
    fn create_board(&mut self, name: &str) -> Result<Board, BoardError>;
    fn delete_board(&mut self, id: BoardId) -> Result<(), BoardError>;
    fn rename_board(&mut self, id: BoardId, name: &str) -> Result<(), BoardError>;
}
