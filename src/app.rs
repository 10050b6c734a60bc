use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use crate::auth::LocalAuth;
use crate::boards::BoardStore;
use crate::config::Config;
use crate::controller::{FormFields, PromptResponse, Screen, ScreenController};
use crate::services::{AuthService, BoardService};
use crate::ui::{classify_password_strength, draw, mask, FieldView, Overlay, View};

const STATUS_MESSAGE_SECS: u64 = 2;
const POLL_MILLIS: u64 = 200;

const NEW_USER_HINT: &str = "s set password | k skip | Esc quit";
const AUTH_HINT: &str = "Enter unlock | Ctrl+p change password | Ctrl+h show/hide | Esc quit";
const FORM_HINT: &str = "↑/↓ move | Enter next/confirm | Ctrl+h show/hide | Esc cancel";
const DESKS_HINT: &str = "↑/↓ select | Enter open | n new | r rename | d delete | Esc quit";
const CARD_HINT: &str = "Esc back to desks";

type Tui = Terminal<CrosstermBackend<std::io::Stdout>>;

pub fn run(config: &Config) -> Result<()> {
    let auth = LocalAuth::new(config.auth_path());
    let boards = BoardStore::new(config.boards_path());
    let mut controller =
        ScreenController::new(auth, boards).context("Failed to read password state")?;

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, crossterm::cursor::Hide)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let idle_timeout =
        (config.idle_timeout_secs > 0).then(|| Duration::from_secs(config.idle_timeout_secs));
    let result = event_loop(&mut terminal, &mut controller, idle_timeout);

    teardown_terminal(&mut terminal);
    result
}

fn teardown_terminal(terminal: &mut Tui) {
    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        crossterm::cursor::Show
    )
    .ok();
    terminal.show_cursor().ok();
}

fn event_loop<A: AuthService, B: BoardService>(
    terminal: &mut Tui,
    controller: &mut ScreenController<A, B>,
    idle_timeout: Option<Duration>,
) -> Result<()> {
    let mut ui = UiState::default();
    let mut last_activity = Instant::now();

    loop {
        ui.expire_status();

        if idle_timeout.is_some_and(|limit| last_activity.elapsed() >= limit) {
            info!("idle timeout reached, exiting");
            break;
        }

        terminal.draw(|f| draw(f, &build_view(controller, &ui)))?;

        if event::poll(Duration::from_millis(POLL_MILLIS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                last_activity = Instant::now();
                if handle_key(key, controller, &mut ui) == Flow::Quit {
                    break;
                }
            }
        }
    }
    info!("session closed");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPurpose {
    NewDesk,
    RenameDesk,
}

impl PromptPurpose {
    fn title(self) -> &'static str {
        match self {
            PromptPurpose::NewDesk => "Enter a name for the new desk",
            PromptPurpose::RenameDesk => "Enter a new name for the desk",
        }
    }
}

#[derive(Debug)]
pub struct NamePrompt {
    pub purpose: PromptPurpose,
    pub input: String,
}

/// Front-end state that never reaches the controller.
#[derive(Default)]
pub struct UiState {
    pub prompt: Option<NamePrompt>,
    pub confirm_delete: bool,
    pub quit_overlay: bool,
    pub show_password: bool,
    status: Option<(String, Instant)>,
}

impl UiState {
    pub fn flash(&mut self, text: impl Into<String>) {
        let until = Instant::now() + Duration::from_secs(STATUS_MESSAGE_SECS);
        self.status = Some((text.into(), until));
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().map(|(text, _)| text.as_str())
    }

    fn expire_status(&mut self) {
        if self
            .status
            .as_ref()
            .is_some_and(|(_, until)| Instant::now() >= *until)
        {
            self.status = None;
        }
    }
}

fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char(k) if k.eq_ignore_ascii_case(&c))
}

enum FormInput {
    Edited,
    Submit,
    Cancel,
}

fn edit_form<F: FormFields>(form: &mut F, key: &KeyEvent) -> FormInput {
    match key.code {
        KeyCode::Esc => return FormInput::Cancel,
        KeyCode::Up | KeyCode::BackTab => form.focus_prev(),
        KeyCode::Down | KeyCode::Tab => form.focus_next(),
        KeyCode::Enter => {
            if form.on_last_field() {
                return FormInput::Submit;
            }
            form.focus_next();
        }
        KeyCode::Backspace => {
            form.focused_mut().pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            form.focused_mut().push(c);
        }
        _ => {}
    }
    FormInput::Edited
}

/// Routes one key press to the overlay or screen that owns it.
pub fn handle_key<A: AuthService, B: BoardService>(
    key: KeyEvent,
    controller: &mut ScreenController<A, B>,
    ui: &mut UiState,
) -> Flow {
    if ui.quit_overlay {
        match key.code {
            KeyCode::Char('y') => return Flow::Quit,
            KeyCode::Char('n') | KeyCode::Esc => ui.quit_overlay = false,
            _ => {}
        }
        return Flow::Continue;
    }

    if ui.prompt.is_some() {
        handle_prompt(&key, controller, ui);
        return Flow::Continue;
    }

    if ui.confirm_delete {
        match key.code {
            KeyCode::Char('y') => {
                ui.confirm_delete = false;
                controller.delete_board();
                if controller.board_failure().is_none() {
                    ui.flash("Desk deleted");
                }
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                ui.confirm_delete = false;
                ui.flash("Delete cancelled");
            }
            _ => {}
        }
        return Flow::Continue;
    }

    if is_ctrl(&key, 'h') {
        ui.show_password = !ui.show_password;
        return Flow::Continue;
    }

    match controller.screen() {
        Screen::NewUser => match key.code {
            KeyCode::Char('s') | KeyCode::Enter => {
                controller.start_set_password();
            }
            KeyCode::Char('k') => {
                controller.skip_set_password();
            }
            KeyCode::Esc => ui.quit_overlay = true,
            _ => {}
        },
        Screen::SetPassword => match edit_form(controller.set_form_mut(), &key) {
            FormInput::Submit => {
                if controller.confirm_set_password() == Screen::Auth {
                    ui.flash("Password saved. Unlock to continue.");
                }
            }
            FormInput::Cancel => {
                controller.cancel_set_password();
            }
            FormInput::Edited => {}
        },
        Screen::Auth => {
            if is_ctrl(&key, 'p') {
                controller.start_change_password();
                return Flow::Continue;
            }
            match key.code {
                KeyCode::Enter => {
                    controller.login();
                }
                KeyCode::Esc => ui.quit_overlay = true,
                KeyCode::Backspace => {
                    controller.login_form_mut().password.pop();
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    controller.login_form_mut().password.push(c);
                }
                _ => {}
            }
        }
        Screen::ChangePassword => match edit_form(controller.change_form_mut(), &key) {
            FormInput::Submit => {
                if controller.confirm_change_password() == Screen::Auth {
                    ui.flash("Password changed");
                }
            }
            FormInput::Cancel => {
                controller.cancel_change_password();
            }
            FormInput::Edited => {}
        },
        Screen::Desks => match key.code {
            KeyCode::Up => step_selection(controller, -1),
            KeyCode::Down => step_selection(controller, 1),
            KeyCode::Char('n') => {
                ui.prompt = Some(NamePrompt {
                    purpose: PromptPurpose::NewDesk,
                    input: String::new(),
                });
            }
            KeyCode::Char('r') => {
                if let Some(desk) = controller.active_desk() {
                    ui.prompt = Some(NamePrompt {
                        purpose: PromptPurpose::RenameDesk,
                        input: desk.name.clone(),
                    });
                }
            }
            KeyCode::Char('d') => {
                if controller.active_desk().is_some() {
                    ui.confirm_delete = true;
                }
            }
            KeyCode::Enter => {
                controller.open_card();
            }
            KeyCode::Esc => ui.quit_overlay = true,
            _ => {}
        },
        Screen::Card => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Left | KeyCode::Backspace) {
                controller.close_card();
            }
        }
    }
    Flow::Continue
}

fn handle_prompt<A: AuthService, B: BoardService>(
    key: &KeyEvent,
    controller: &mut ScreenController<A, B>,
    ui: &mut UiState,
) {
    let Some(prompt) = ui.prompt.as_mut() else {
        return;
    };
    let response = match key.code {
        KeyCode::Enter => PromptResponse::accepted(std::mem::take(&mut prompt.input)),
        KeyCode::Esc => PromptResponse::cancelled(),
        KeyCode::Backspace => {
            prompt.input.pop();
            return;
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            prompt.input.push(c);
            return;
        }
        _ => return,
    };
    let purpose = prompt.purpose;
    ui.prompt = None;
    match purpose {
        PromptPurpose::NewDesk => controller.create_board(&response),
        PromptPurpose::RenameDesk => controller.rename_board(&response),
    }
}

fn step_selection<A: AuthService, B: BoardService>(
    controller: &mut ScreenController<A, B>,
    delta: isize,
) {
    let next = {
        let desks = controller.desks();
        if desks.is_empty() {
            return;
        }
        let current = controller
            .active_board()
            .and_then(|id| desks.iter().position(|d| d.id == id))
            .unwrap_or(0);
        let idx = current
            .saturating_add_signed(delta)
            .min(desks.len() - 1);
        desks[idx].id
    };
    controller.open_board(next);
}

fn form_fields<F: FormFields>(form: &F, visible: bool) -> Vec<FieldView> {
    (0..F::FIELD_COUNT)
        .map(|idx| FieldView {
            label: F::label(idx),
            display: mask(form.field(idx), visible),
            focused: idx == form.focus(),
        })
        .collect()
}

fn screen_hint(screen: Screen) -> &'static str {
    match screen {
        Screen::NewUser => NEW_USER_HINT,
        Screen::Auth => AUTH_HINT,
        Screen::SetPassword | Screen::ChangePassword => FORM_HINT,
        Screen::Desks => DESKS_HINT,
        Screen::Card => CARD_HINT,
    }
}

pub fn build_view<'a, A: AuthService, B: BoardService>(
    controller: &'a ScreenController<A, B>,
    ui: &UiState,
) -> View<'a> {
    let screen = controller.screen();
    let visible = ui.show_password;
    let (fields, candidate) = match screen {
        Screen::Auth => (
            vec![FieldView {
                label: "Password",
                display: mask(&controller.login_form().password, visible),
                focused: true,
            }],
            None,
        ),
        Screen::SetPassword => (
            form_fields(controller.set_form(), visible),
            Some(controller.set_form().password.as_str()),
        ),
        Screen::ChangePassword => (
            form_fields(controller.change_form(), visible),
            Some(controller.change_form().new.as_str()),
        ),
        _ => (Vec::new(), None),
    };

    let overlay = if ui.quit_overlay {
        Some(Overlay::ConfirmQuit)
    } else if let Some(prompt) = &ui.prompt {
        Some(Overlay::Prompt {
            title: prompt.purpose.title(),
            input: prompt.input.clone(),
        })
    } else if ui.confirm_delete {
        controller
            .active_desk()
            .map(|d| Overlay::ConfirmDelete(d.name.clone()))
    } else {
        None
    };

    View {
        screen,
        notice: controller.notice(),
        fields,
        fields_visible: visible,
        desks: controller.desks(),
        active: controller.active_board(),
        status: ui.status().unwrap_or(screen_hint(screen)).to_string(),
        strength: candidate
            .filter(|text| !text.is_empty())
            .map(classify_password_strength),
        overlay,
    }
}
