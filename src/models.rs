use serde::{Deserialize, Serialize};

/// Board identifier handed out by the board store. Never 0.
pub type BoardId = u64;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
}

impl Board {
    pub fn new(id: BoardId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct BoardsFile {
    #[serde(default = "first_board_id")]
    pub next_id: BoardId,
    #[serde(default)]
    pub boards: Vec<Board>,
}

impl Default for BoardsFile {
    fn default() -> Self {
        Self {
            next_id: first_board_id(),
            boards: Vec::new(),
        }
    }
}

fn first_board_id() -> BoardId {
    1
}

#[derive(Serialize, Deserialize)]
pub struct AuthRecord {
    pub password_hash: String,
}
