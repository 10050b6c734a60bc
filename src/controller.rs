//! Screen navigation and validation state machine.
//!
//! The controller owns the active [`Screen`], the password forms, the
//! board snapshot and the active selection. Front ends feed it typed
//! triggers and render whatever it exposes; it never touches the terminal.
//!
//! Password triggers only fire from their own screen. A trigger sent from
//! any other screen is logged and ignored, so the machine never leaves the
//! six defined states.

use std::fmt;

use tracing::{debug, error, info, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{AuthError, BoardError, ValidationError};
use crate::models::{Board, BoardId};
use crate::services::{AuthService, BoardService};

/// New passwords need at least this many characters.
pub const MIN_PASSWORD_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    NewUser,
    Auth,
    SetPassword,
    ChangePassword,
    Desks,
    Card,
}

impl Screen {
    pub const ALL: [Screen; 6] = [
        Screen::NewUser,
        Screen::Auth,
        Screen::SetPassword,
        Screen::ChangePassword,
        Screen::Desks,
        Screen::Card,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Screen::NewUser => "Welcome",
            Screen::Auth => "Unlock",
            Screen::SetPassword => "Set password",
            Screen::ChangePassword => "Change password",
            Screen::Desks => "Desks",
            Screen::Card => "Desk",
        }
    }
}

/// User-visible validation message for the current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    PasswordsDoNotMatch,
    PasswordTooShort,
    PasswordAlreadySet,
    PasswordNotSet,
    IncorrectPassword,
    ServiceUnavailable,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Notice::PasswordsDoNotMatch => "Passwords do not match!",
            Notice::PasswordTooShort => "Password is too short!",
            Notice::PasswordAlreadySet => "Password is already set!",
            Notice::PasswordNotSet => "Password is not set yet!",
            Notice::IncorrectPassword => "Incorrect password!",
            Notice::ServiceUnavailable => "Password storage is unavailable, see the log.",
        };
        f.write_str(text)
    }
}

impl From<ValidationError> for Notice {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Mismatch => Notice::PasswordsDoNotMatch,
            ValidationError::TooShort => Notice::PasswordTooShort,
        }
    }
}

fn auth_notice(err: AuthError) -> Notice {
    match err {
        AuthError::AlreadySet => Notice::PasswordAlreadySet,
        AuthError::NotSet => Notice::PasswordNotSet,
        AuthError::IncorrectPassword => Notice::IncorrectPassword,
        AuthError::Storage(e) => {
            error!(error = %e, "auth service failed");
            Notice::ServiceUnavailable
        }
    }
}

/// Mismatch is reported ahead of length when both apply.
pub fn validate_new_password(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if password != confirm {
        return Err(ValidationError::Mismatch);
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ValidationError::TooShort);
    }
    Ok(())
}

/// Field access shared by the password forms so a front end can edit any
/// of them the same way.
pub trait FormFields {
    const FIELD_COUNT: usize;

    fn focus(&self) -> usize;
    fn set_focus(&mut self, idx: usize);
    fn field(&self, idx: usize) -> &str;
    fn field_mut(&mut self, idx: usize) -> &mut String;
    fn label(idx: usize) -> &'static str;

    fn focused_mut(&mut self) -> &mut String {
        let idx = self.focus();
        self.field_mut(idx)
    }

    fn focus_next(&mut self) {
        let next = (self.focus() + 1).min(Self::FIELD_COUNT - 1);
        self.set_focus(next);
    }

    fn focus_prev(&mut self) {
        let prev = self.focus().saturating_sub(1);
        self.set_focus(prev);
    }

    fn on_last_field(&self) -> bool {
        self.focus() + 1 >= Self::FIELD_COUNT
    }
}

#[derive(Default, Zeroize, ZeroizeOnDrop)]
pub struct LoginForm {
    pub password: String,
}

impl LoginForm {
    pub fn clear(&mut self) {
        self.zeroize();
    }
}

#[derive(Default, Zeroize, ZeroizeOnDrop)]
pub struct SetPasswordForm {
    pub password: String,
    pub confirm: String,
    focus: usize,
}

impl SetPasswordForm {
    pub fn clear(&mut self) {
        self.zeroize();
    }

    pub fn is_empty(&self) -> bool {
        self.password.is_empty() && self.confirm.is_empty()
    }
}

impl FormFields for SetPasswordForm {
    const FIELD_COUNT: usize = 2;

    fn focus(&self) -> usize {
        self.focus
    }

    fn set_focus(&mut self, idx: usize) {
        self.focus = idx.min(Self::FIELD_COUNT - 1);
    }

    fn field(&self, idx: usize) -> &str {
        match idx {
            0 => &self.password,
            _ => &self.confirm,
        }
    }

    fn field_mut(&mut self, idx: usize) -> &mut String {
        match idx {
            0 => &mut self.password,
            _ => &mut self.confirm,
        }
    }

    fn label(idx: usize) -> &'static str {
        match idx {
            0 => "New password",
            _ => "Confirm password",
        }
    }
}

#[derive(Default, Zeroize, ZeroizeOnDrop)]
pub struct ChangePasswordForm {
    pub old: String,
    pub new: String,
    pub confirm: String,
    focus: usize,
}

impl ChangePasswordForm {
    pub fn clear(&mut self) {
        self.zeroize();
    }

    pub fn is_empty(&self) -> bool {
        self.old.is_empty() && self.new.is_empty() && self.confirm.is_empty()
    }
}

impl FormFields for ChangePasswordForm {
    const FIELD_COUNT: usize = 3;

    fn focus(&self) -> usize {
        self.focus
    }

    fn set_focus(&mut self, idx: usize) {
        self.focus = idx.min(Self::FIELD_COUNT - 1);
    }

    fn field(&self, idx: usize) -> &str {
        match idx {
            0 => &self.old,
            1 => &self.new,
            _ => &self.confirm,
        }
    }

    fn field_mut(&mut self, idx: usize) -> &mut String {
        match idx {
            0 => &mut self.old,
            1 => &mut self.new,
            _ => &mut self.confirm,
        }
    }

    fn label(idx: usize) -> &'static str {
        match idx {
            0 => "Current password",
            1 => "New password",
            _ => "Confirm password",
        }
    }
}

/// Answer from the single-line name prompt used for new and renamed desks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptResponse {
    pub accepted: bool,
    pub text: String,
}

impl PromptResponse {
    pub fn accepted(text: impl Into<String>) -> Self {
        Self {
            accepted: true,
            text: text.into(),
        }
    }

    pub fn cancelled() -> Self {
        Self {
            accepted: false,
            text: String::new(),
        }
    }

    /// The trimmed name, if the prompt was accepted with something in it.
    pub fn name(&self) -> Option<&str> {
        let name = self.text.trim();
        (self.accepted && !name.is_empty()).then_some(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardOp {
    List,
    Create,
    Rename,
    Delete,
}

/// Last board service failure. Kept for inspection, never shown as a notice.
#[derive(Debug)]
pub struct BoardFailure {
    pub op: BoardOp,
    pub error: BoardError,
}

pub struct ScreenController<A, B> {
    auth: A,
    boards: B,
    screen: Screen,
    notice: Option<Notice>,
    login: LoginForm,
    set_form: SetPasswordForm,
    change_form: ChangePasswordForm,
    desks: Vec<Board>,
    active_board: Option<BoardId>,
    board_failure: Option<BoardFailure>,
}

impl<A: AuthService, B: BoardService> ScreenController<A, B> {
    /// Starts on `Auth` when a password exists, otherwise on `NewUser`.
    pub fn new(auth: A, boards: B) -> Result<Self, AuthError> {
        let screen = if auth.is_password_set()? {
            Screen::Auth
        } else {
            Screen::NewUser
        };
        info!(?screen, "controller started");
        Ok(Self {
            auth,
            boards,
            screen,
            notice: None,
            login: LoginForm::default(),
            set_form: SetPasswordForm::default(),
            change_form: ChangePasswordForm::default(),
            desks: Vec::new(),
            active_board: None,
            board_failure: None,
        })
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn desks(&self) -> &[Board] {
        &self.desks
    }

    pub fn active_board(&self) -> Option<BoardId> {
        self.active_board
    }

    pub fn active_desk(&self) -> Option<&Board> {
        let id = self.active_board?;
        self.desks.iter().find(|b| b.id == id)
    }

    pub fn board_failure(&self) -> Option<&BoardFailure> {
        self.board_failure.as_ref()
    }

    pub fn login_form(&self) -> &LoginForm {
        &self.login
    }

    pub fn login_form_mut(&mut self) -> &mut LoginForm {
        &mut self.login
    }

    pub fn set_form(&self) -> &SetPasswordForm {
        &self.set_form
    }

    pub fn set_form_mut(&mut self) -> &mut SetPasswordForm {
        &mut self.set_form
    }

    pub fn change_form(&self) -> &ChangePasswordForm {
        &self.change_form
    }

    pub fn change_form_mut(&mut self) -> &mut ChangePasswordForm {
        &mut self.change_form
    }

    pub fn auth(&self) -> &A {
        &self.auth
    }

    pub fn boards(&self) -> &B {
        &self.boards
    }

    fn on(&self, expected: Screen, trigger: &'static str) -> bool {
        if self.screen == expected {
            true
        } else {
            debug!(?expected, current = ?self.screen, trigger, "trigger ignored");
            false
        }
    }

    fn go(&mut self, to: Screen) {
        debug!(from = ?self.screen, ?to, "screen change");
        self.screen = to;
    }

    // --- password flows -------------------------------------------------

    pub fn start_set_password(&mut self) -> Screen {
        if self.on(Screen::NewUser, "start_set_password") {
            self.go(Screen::SetPassword);
        }
        self.screen
    }

    pub fn confirm_set_password(&mut self) -> Screen {
        if !self.on(Screen::SetPassword, "confirm_set_password") {
            return self.screen;
        }
        self.notice = None;
        let outcome = match validate_new_password(&self.set_form.password, &self.set_form.confirm) {
            Err(invalid) => Err(Notice::from(invalid)),
            Ok(()) => self
                .auth
                .set_password(&self.set_form.password)
                .map_err(auth_notice),
        };
        self.set_form.clear();
        match outcome {
            Ok(()) => {
                info!("password set, moving to unlock");
                self.go(Screen::Auth);
            }
            Err(notice) => self.notice = Some(notice),
        }
        self.screen
    }

    pub fn cancel_set_password(&mut self) -> Screen {
        if self.on(Screen::SetPassword, "cancel_set_password") {
            self.notice = None;
            self.set_form.clear();
            self.go(Screen::NewUser);
        }
        self.screen
    }

    pub fn skip_set_password(&mut self) -> Screen {
        if self.on(Screen::NewUser, "skip_set_password") {
            info!("password setup skipped");
            self.go(Screen::Desks);
            self.load_boards(None);
        }
        self.screen
    }

    pub fn start_change_password(&mut self) -> Screen {
        if self.on(Screen::Auth, "start_change_password") {
            self.notice = None;
            self.login.clear();
            self.change_form.clear();
            self.go(Screen::ChangePassword);
        }
        self.screen
    }

    pub fn confirm_change_password(&mut self) -> Screen {
        if !self.on(Screen::ChangePassword, "confirm_change_password") {
            return self.screen;
        }
        self.notice = None;
        let form = &self.change_form;
        let outcome = match validate_new_password(&form.new, &form.confirm) {
            Err(invalid) => Err(Notice::from(invalid)),
            Ok(()) => self
                .auth
                .change_password(&form.old, &form.new)
                .map_err(auth_notice),
        };
        self.change_form.clear();
        match outcome {
            Ok(()) => {
                info!("password changed, back to unlock");
                self.go(Screen::Auth);
            }
            Err(notice) => self.notice = Some(notice),
        }
        self.screen
    }

    pub fn cancel_change_password(&mut self) -> Screen {
        if self.on(Screen::ChangePassword, "cancel_change_password") {
            self.notice = None;
            self.change_form.clear();
            self.go(Screen::Auth);
        }
        self.screen
    }

    pub fn login(&mut self) -> Screen {
        if !self.on(Screen::Auth, "login") {
            return self.screen;
        }
        self.notice = None;
        let verdict = self.auth.check_password(&self.login.password);
        self.login.clear();
        match verdict {
            Ok(true) => {
                info!("unlocked");
                self.go(Screen::Desks);
                self.load_boards(None);
            }
            Ok(false) => {
                warn!("unlock rejected");
                self.notice = Some(Notice::IncorrectPassword);
            }
            Err(err) => self.notice = Some(auth_notice(err)),
        }
        self.screen
    }

    // --- card view ------------------------------------------------------

    pub fn open_card(&mut self) -> Screen {
        if self.on(Screen::Desks, "open_card") && self.active_desk().is_some() {
            self.go(Screen::Card);
        }
        self.screen
    }

    pub fn close_card(&mut self) -> Screen {
        if self.on(Screen::Card, "close_card") {
            self.go(Screen::Desks);
        }
        self.screen
    }

    // --- desks ----------------------------------------------------------

    /// Refreshes the snapshot and selects `preferred` if it still exists,
    /// else the first desk. An empty list leaves nothing selected.
    pub fn load_boards(&mut self, preferred: Option<BoardId>) {
        self.board_failure = None;
        self.reload(preferred);
    }

    fn reload(&mut self, preferred: Option<BoardId>) {
        match self.boards.list_boards() {
            Ok(list) => self.desks = list,
            Err(err) => self.record(BoardOp::List, err),
        }
        let desks = &self.desks;
        self.active_board = preferred
            .filter(|id| desks.iter().any(|b| b.id == *id))
            .or_else(|| desks.first().map(|b| b.id));
        debug!(count = self.desks.len(), active = ?self.active_board, "desks loaded");
    }

    fn record(&mut self, op: BoardOp, error: BoardError) {
        warn!(?op, error = %error, "board operation failed");
        self.board_failure = Some(BoardFailure { op, error });
    }

    /// Makes `id` the single highlighted desk. Unknown ids are ignored.
    pub fn open_board(&mut self, id: BoardId) {
        if !self.on(Screen::Desks, "open_board") {
            return;
        }
        if self.desks.iter().any(|b| b.id == id) {
            self.active_board = Some(id);
        } else {
            debug!(board_id = id, "open ignored for unknown desk");
        }
    }

    pub fn is_active(&self, id: BoardId) -> bool {
        self.active_board == Some(id)
    }

    pub fn create_board(&mut self, prompt: &PromptResponse) {
        if !self.on(Screen::Desks, "create_board") {
            return;
        }
        self.board_failure = None;
        if let Some(name) = prompt.name() {
            if let Err(err) = self.boards.create_board(name) {
                self.record(BoardOp::Create, err);
            }
        }
        self.reload(self.active_board);
    }

    /// Renames the active desk locally first, then through the service.
    pub fn rename_board(&mut self, prompt: &PromptResponse) {
        if !self.on(Screen::Desks, "rename_board") {
            return;
        }
        self.board_failure = None;
        let (Some(name), Some(id)) = (prompt.name(), self.active_board) else {
            return;
        };
        if let Some(desk) = self.desks.iter_mut().find(|b| b.id == id) {
            desk.name = name.to_string();
        }
        if let Err(err) = self.boards.rename_board(id, name) {
            self.record(BoardOp::Rename, err);
        }
        self.reload(Some(id));
    }

    pub fn delete_board(&mut self) {
        if !self.on(Screen::Desks, "delete_board") {
            return;
        }
        self.board_failure = None;
        let Some(id) = self.active_board else {
            debug!("delete with no active desk");
            return;
        };
        match self.boards.delete_board(id) {
            Ok(()) => self.reload(None),
            Err(err) => {
                self.record(BoardOp::Delete, err);
                self.reload(Some(id));
            }
        }
    }
}
