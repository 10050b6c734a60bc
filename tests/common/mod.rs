//! Shared test doubles for controller and front-end tests.
//!
//! `MemoryAuth` and `MemoryBoards` keep their state behind `Rc<RefCell<..>>`
//! so a test can hold a handle, hand a clone to the controller, and then
//! inspect calls or inject failures while the controller owns the service.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::anyhow;
use desks::{AuthError, AuthService, Board, BoardError, BoardId, BoardService, ScreenController};

#[derive(Default)]
struct AuthState {
    password: Option<String>,
    storage_broken: bool,
}

#[derive(Clone, Default)]
pub struct MemoryAuth {
    state: Rc<RefCell<AuthState>>,
}

#[allow(dead_code)]
impl MemoryAuth {
    pub fn with_password(password: &str) -> Self {
        let auth = Self::default();
        auth.state.borrow_mut().password = Some(password.to_string());
        auth
    }

    pub fn password(&self) -> Option<String> {
        self.state.borrow().password.clone()
    }

    pub fn clear_password(&self) {
        self.state.borrow_mut().password = None;
    }

    pub fn break_storage(&self) {
        self.state.borrow_mut().storage_broken = true;
    }

    fn guard(&self) -> Result<(), AuthError> {
        if self.state.borrow().storage_broken {
            Err(AuthError::Storage(anyhow!("disk unavailable")))
        } else {
            Ok(())
        }
    }
}

impl AuthService for MemoryAuth {
    fn is_password_set(&self) -> Result<bool, AuthError> {
        self.guard()?;
        Ok(self.state.borrow().password.is_some())
    }

    fn set_password(&mut self, password: &str) -> Result<(), AuthError> {
        self.guard()?;
        let mut state = self.state.borrow_mut();
        if state.password.is_some() {
            return Err(AuthError::AlreadySet);
        }
        state.password = Some(password.to_string());
        Ok(())
    }

    fn check_password(&self, password: &str) -> Result<bool, AuthError> {
        self.guard()?;
        Ok(self.state.borrow().password.as_deref() == Some(password))
    }

    fn change_password(&mut self, old: &str, new: &str) -> Result<(), AuthError> {
        self.guard()?;
        let mut state = self.state.borrow_mut();
        let current = state.password.clone();
        match current.as_deref() {
            None => Err(AuthError::NotSet),
            Some(stored) if stored != old => Err(AuthError::IncorrectPassword),
            Some(_) => {
                state.password = Some(new.to_string());
                Ok(())
            }
        }
    }
}

#[derive(Default)]
struct BoardsState {
    boards: Vec<Board>,
    next_id: BoardId,
    list_calls: usize,
    renames: Vec<(BoardId, String)>,
    fail_list: bool,
    fail_create: bool,
    fail_delete: bool,
    fail_rename: bool,
    order_by_name: bool,
}

#[derive(Clone, Default)]
pub struct MemoryBoards {
    state: Rc<RefCell<BoardsState>>,
}

#[allow(dead_code)]
impl MemoryBoards {
    pub fn with_names(names: &[&str]) -> Self {
        let boards = Self::default();
        {
            let mut state = boards.state.borrow_mut();
            for name in names {
                state.next_id += 1;
                let id = state.next_id;
                state.boards.push(Board::new(id, *name));
            }
        }
        boards
    }

    pub fn names(&self) -> Vec<String> {
        self.state.borrow().boards.iter().map(|b| b.name.clone()).collect()
    }

    pub fn list_calls(&self) -> usize {
        self.state.borrow().list_calls
    }

    pub fn renames(&self) -> Vec<(BoardId, String)> {
        self.state.borrow().renames.clone()
    }

    pub fn fail_list(&self, fail: bool) {
        self.state.borrow_mut().fail_list = fail;
    }

    pub fn fail_create(&self, fail: bool) {
        self.state.borrow_mut().fail_create = fail;
    }

    pub fn fail_delete(&self, fail: bool) {
        self.state.borrow_mut().fail_delete = fail;
    }

    pub fn fail_rename(&self, fail: bool) {
        self.state.borrow_mut().fail_rename = fail;
    }

    /// Make `list_boards` return boards sorted by name instead of id.
    pub fn order_by_name(&self, enabled: bool) {
        self.state.borrow_mut().order_by_name = enabled;
    }

    /// Remove a board behind the controller's back.
    pub fn remove_externally(&self, id: BoardId) {
        self.state.borrow_mut().boards.retain(|b| b.id != id);
    }
}

fn storage_failure(op: &str) -> BoardError {
    BoardError::Storage(anyhow!("{op} failed"))
}

impl BoardService for MemoryBoards {
    fn list_boards(&self) -> Result<Vec<Board>, BoardError> {
        let mut state = self.state.borrow_mut();
        state.list_calls += 1;
        if state.fail_list {
            return Err(storage_failure("list"));
        }
        let mut boards = state.boards.clone();
        if state.order_by_name {
            boards.sort_by(|a, b| a.name.cmp(&b.name));
        }
        Ok(boards)
    }

    fn create_board(&mut self, name: &str) -> Result<Board, BoardError> {
        let mut state = self.state.borrow_mut();
        if state.fail_create {
            return Err(storage_failure("create"));
        }
        state.next_id += 1;
        let board = Board::new(state.next_id, name);
        state.boards.push(board.clone());
        Ok(board)
    }

    fn delete_board(&mut self, id: BoardId) -> Result<(), BoardError> {
        let mut state = self.state.borrow_mut();
        if state.fail_delete {
            return Err(storage_failure("delete"));
        }
        let before = state.boards.len();
        state.boards.retain(|b| b.id != id);
        if state.boards.len() == before {
            return Err(BoardError::NotFound(id));
        }
        Ok(())
    }

    fn rename_board(&mut self, id: BoardId, name: &str) -> Result<(), BoardError> {
        let mut state = self.state.borrow_mut();
        state.renames.push((id, name.to_string()));
        if state.fail_rename {
            return Err(storage_failure("rename"));
        }
        let board = state
            .boards
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(BoardError::NotFound(id))?;
        board.name = name.to_string();
        Ok(())
    }
}

pub type TestController = ScreenController<MemoryAuth, MemoryBoards>;

#[allow(dead_code)]
pub fn controller(auth: &MemoryAuth, boards: &MemoryBoards) -> TestController {
    ScreenController::new(auth.clone(), boards.clone()).expect("controller starts")
}

/// Controller already sitting on the desks screen with no password.
#[allow(dead_code)]
pub fn on_desks(boards: &MemoryBoards) -> TestController {
    let mut c = controller(&MemoryAuth::default(), boards);
    c.skip_set_password();
    c
}

#[allow(dead_code)]
pub fn active_name(c: &TestController) -> Option<String> {
    c.active_desk().map(|d| d.name.clone())
}
