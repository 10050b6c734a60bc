//! Key routing from the terminal front end into the controller.

mod common;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use desks::app::{build_view, handle_key, Flow, PromptPurpose, UiState};
use desks::ui::Overlay;
use desks::{Notice, Screen};

use common::{active_name, controller, on_desks, MemoryAuth, MemoryBoards, TestController};

fn press(c: &mut TestController, ui: &mut UiState, code: KeyCode) -> Flow {
    handle_key(KeyEvent::new(code, KeyModifiers::NONE), c, ui)
}

fn ctrl(c: &mut TestController, ui: &mut UiState, ch: char) -> Flow {
    handle_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL), c, ui)
}

fn type_text(c: &mut TestController, ui: &mut UiState, text: &str) {
    for ch in text.chars() {
        press(c, ui, KeyCode::Char(ch));
    }
}

#[test]
fn new_user_sets_password_from_keyboard() {
    let auth = MemoryAuth::default();
    let mut c = controller(&auth, &MemoryBoards::default());
    let mut ui = UiState::default();

    press(&mut c, &mut ui, KeyCode::Char('s'));
    assert_eq!(c.screen(), Screen::SetPassword);

    type_text(&mut c, &mut ui, "hunter2");
    press(&mut c, &mut ui, KeyCode::Tab);
    type_text(&mut c, &mut ui, "hunter2");
    press(&mut c, &mut ui, KeyCode::Enter);

    assert_eq!(c.screen(), Screen::Auth);
    assert_eq!(auth.password().as_deref(), Some("hunter2"));
    assert_eq!(ui.status(), Some("Password saved. Unlock to continue."));
}

#[test]
fn enter_on_first_field_moves_focus_instead_of_submitting() {
    let auth = MemoryAuth::default();
    let mut c = controller(&auth, &MemoryBoards::default());
    let mut ui = UiState::default();
    press(&mut c, &mut ui, KeyCode::Char('s'));

    type_text(&mut c, &mut ui, "ab");
    press(&mut c, &mut ui, KeyCode::Enter);
    assert_eq!(c.screen(), Screen::SetPassword);
    assert_eq!(c.notice(), None);
    type_text(&mut c, &mut ui, "ax");
    press(&mut c, &mut ui, KeyCode::Backspace);
    press(&mut c, &mut ui, KeyCode::Char('b'));
    press(&mut c, &mut ui, KeyCode::Enter);
    assert_eq!(c.screen(), Screen::Auth);
}

#[test]
fn mismatched_form_shows_notice_in_view() {
    let mut c = controller(&MemoryAuth::default(), &MemoryBoards::default());
    let mut ui = UiState::default();
    press(&mut c, &mut ui, KeyCode::Char('s'));
    type_text(&mut c, &mut ui, "abc");
    press(&mut c, &mut ui, KeyCode::Down);
    type_text(&mut c, &mut ui, "abd");
    press(&mut c, &mut ui, KeyCode::Enter);

    let view = build_view(&c, &ui);
    assert_eq!(view.screen, Screen::SetPassword);
    assert_eq!(view.notice, Some(Notice::PasswordsDoNotMatch));
    assert!(view.fields.iter().all(|f| f.display.is_empty()));
}

#[test]
fn escape_cancels_set_password() {
    let mut c = controller(&MemoryAuth::default(), &MemoryBoards::default());
    let mut ui = UiState::default();
    press(&mut c, &mut ui, KeyCode::Enter);
    type_text(&mut c, &mut ui, "abc");
    press(&mut c, &mut ui, KeyCode::Esc);
    assert_eq!(c.screen(), Screen::NewUser);
    assert!(c.set_form().is_empty());
}

#[test]
fn password_is_masked_until_toggled() {
    let mut c = controller(&MemoryAuth::with_password("pw"), &MemoryBoards::default());
    let mut ui = UiState::default();
    type_text(&mut c, &mut ui, "abc");

    let view = build_view(&c, &ui);
    assert_eq!(view.fields[0].display, "•••");

    ctrl(&mut c, &mut ui, 'h');
    let view = build_view(&c, &ui);
    assert_eq!(view.fields[0].display, "abc");
}

#[test]
fn login_from_keyboard_lands_on_desks() {
    let boards = MemoryBoards::with_names(&["Inbox"]);
    let mut c = controller(&MemoryAuth::with_password("pw"), &boards);
    let mut ui = UiState::default();

    type_text(&mut c, &mut ui, "nope");
    press(&mut c, &mut ui, KeyCode::Enter);
    assert_eq!(c.notice(), Some(Notice::IncorrectPassword));

    type_text(&mut c, &mut ui, "pw");
    press(&mut c, &mut ui, KeyCode::Enter);
    assert_eq!(c.screen(), Screen::Desks);
    assert_eq!(active_name(&c).as_deref(), Some("Inbox"));
}

#[test]
fn ctrl_p_opens_change_password() {
    let auth = MemoryAuth::with_password("pw");
    let mut c = controller(&auth, &MemoryBoards::default());
    let mut ui = UiState::default();

    ctrl(&mut c, &mut ui, 'p');
    assert_eq!(c.screen(), Screen::ChangePassword);

    type_text(&mut c, &mut ui, "pw");
    press(&mut c, &mut ui, KeyCode::Enter);
    type_text(&mut c, &mut ui, "fresh");
    press(&mut c, &mut ui, KeyCode::Enter);
    type_text(&mut c, &mut ui, "fresh");
    press(&mut c, &mut ui, KeyCode::Enter);

    assert_eq!(c.screen(), Screen::Auth);
    assert_eq!(auth.password().as_deref(), Some("fresh"));
    assert_eq!(ui.status(), Some("Password changed"));
}

#[test]
fn new_desk_prompt_creates_desk() {
    let boards = MemoryBoards::with_names(&["Inbox"]);
    let mut c = on_desks(&boards);
    let mut ui = UiState::default();

    press(&mut c, &mut ui, KeyCode::Char('n'));
    assert_eq!(
        ui.prompt.as_ref().map(|p| p.purpose),
        Some(PromptPurpose::NewDesk)
    );
    // keys go to the prompt, not the desk list
    type_text(&mut c, &mut ui, "Work");
    assert!(matches!(
        build_view(&c, &ui).overlay,
        Some(Overlay::Prompt { ref input, .. }) if input == "Work"
    ));
    press(&mut c, &mut ui, KeyCode::Enter);

    assert!(ui.prompt.is_none());
    assert_eq!(boards.names(), vec!["Inbox", "Work"]);
    assert_eq!(c.desks().len(), 2);
}

#[test]
fn escaped_prompt_creates_nothing() {
    let boards = MemoryBoards::with_names(&["Inbox"]);
    let mut c = on_desks(&boards);
    let mut ui = UiState::default();

    press(&mut c, &mut ui, KeyCode::Char('n'));
    type_text(&mut c, &mut ui, "Work");
    press(&mut c, &mut ui, KeyCode::Esc);
    assert!(ui.prompt.is_none());
    assert_eq!(boards.names(), vec!["Inbox"]);
}

#[test]
fn rename_prompt_is_prefilled() {
    let boards = MemoryBoards::with_names(&["Inbox"]);
    let mut c = on_desks(&boards);
    let mut ui = UiState::default();

    press(&mut c, &mut ui, KeyCode::Char('r'));
    assert_eq!(ui.prompt.as_ref().map(|p| p.input.as_str()), Some("Inbox"));
    type_text(&mut c, &mut ui, " 2");
    press(&mut c, &mut ui, KeyCode::Enter);
    assert_eq!(active_name(&c).as_deref(), Some("Inbox 2"));
}

#[test]
fn arrows_move_selection_within_bounds() {
    let boards = MemoryBoards::with_names(&["Inbox", "Work", "Home"]);
    let mut c = on_desks(&boards);
    let mut ui = UiState::default();

    press(&mut c, &mut ui, KeyCode::Up);
    assert_eq!(active_name(&c).as_deref(), Some("Inbox"));
    for _ in 0..5 {
        press(&mut c, &mut ui, KeyCode::Down);
    }
    assert_eq!(active_name(&c).as_deref(), Some("Home"));
    press(&mut c, &mut ui, KeyCode::Up);
    assert_eq!(active_name(&c).as_deref(), Some("Work"));
}

#[test]
fn delete_asks_first() {
    let boards = MemoryBoards::with_names(&["Inbox", "Work"]);
    let mut c = on_desks(&boards);
    let mut ui = UiState::default();

    press(&mut c, &mut ui, KeyCode::Char('d'));
    assert!(ui.confirm_delete);
    assert!(matches!(
        build_view(&c, &ui).overlay,
        Some(Overlay::ConfirmDelete(ref name)) if name == "Inbox"
    ));
    press(&mut c, &mut ui, KeyCode::Char('n'));
    assert_eq!(boards.names(), vec!["Inbox", "Work"]);
    assert_eq!(ui.status(), Some("Delete cancelled"));

    press(&mut c, &mut ui, KeyCode::Char('d'));
    press(&mut c, &mut ui, KeyCode::Char('y'));
    assert!(!ui.confirm_delete);
    assert_eq!(boards.names(), vec!["Work"]);
    assert_eq!(ui.status(), Some("Desk deleted"));
}

#[test]
fn delete_without_desks_opens_nothing() {
    let mut c = on_desks(&MemoryBoards::default());
    let mut ui = UiState::default();
    press(&mut c, &mut ui, KeyCode::Char('d'));
    assert!(!ui.confirm_delete);
}

#[test]
fn card_opens_and_closes() {
    let boards = MemoryBoards::with_names(&["Inbox"]);
    let mut c = on_desks(&boards);
    let mut ui = UiState::default();

    press(&mut c, &mut ui, KeyCode::Enter);
    assert_eq!(c.screen(), Screen::Card);
    press(&mut c, &mut ui, KeyCode::Esc);
    assert_eq!(c.screen(), Screen::Desks);
}

#[test]
fn quit_needs_confirmation() {
    let mut c = on_desks(&MemoryBoards::default());
    let mut ui = UiState::default();

    assert_eq!(press(&mut c, &mut ui, KeyCode::Esc), Flow::Continue);
    assert!(ui.quit_overlay);
    assert!(matches!(build_view(&c, &ui).overlay, Some(Overlay::ConfirmQuit)));

    assert_eq!(press(&mut c, &mut ui, KeyCode::Char('n')), Flow::Continue);
    assert!(!ui.quit_overlay);

    press(&mut c, &mut ui, KeyCode::Esc);
    assert_eq!(press(&mut c, &mut ui, KeyCode::Char('y')), Flow::Quit);
}

#[test]
fn hint_shows_when_no_status() {
    let c = on_desks(&MemoryBoards::default());
    let ui = UiState::default();
    let view = build_view(&c, &ui);
    assert!(view.status.contains("n new"));
    assert!(view.overlay.is_none());
}
