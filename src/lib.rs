//! Desks - a local-first terminal organizer for named boards.
//!
//! The [`controller::ScreenController`] drives every screen; the terminal
//! front end in [`app`] and [`ui`] only renders it and feeds it keys.

pub mod app;
pub mod auth;
pub mod boards;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod ui;

pub use controller::{Notice, PromptResponse, Screen, ScreenController};
pub use error::{AuthError, BoardError, ValidationError};
pub use models::{Board, BoardId};
pub use services::{AuthService, BoardService};
