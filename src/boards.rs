use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::BoardError;
use crate::models::{Board, BoardId, BoardsFile};
use crate::services::BoardService;
use crate::storage::{read_json, write_json};

/// Boards kept in creation order in a JSON file, with a monotonic id counter.
pub struct BoardStore {
    path: PathBuf,
}

impl BoardStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BoardsFile, BoardError> {
        Ok(read_json(&self.path)
            .map_err(BoardError::Storage)?
            .unwrap_or_default())
    }

    fn save(&self, file: &BoardsFile) -> Result<(), BoardError> {
        write_json(&self.path, file).map_err(BoardError::Storage)
    }
}

fn clean_name(name: &str) -> Result<&str, BoardError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(BoardError::EmptyName)
    } else {
        Ok(trimmed)
    }
}

impl BoardService for BoardStore {
    fn list_boards(&self) -> Result<Vec<Board>, BoardError> {
        Ok(self.load()?.boards)
    }

    fn create_board(&mut self, name: &str) -> Result<Board, BoardError> {
        let name = clean_name(name)?;
        let mut file = self.load()?;
        // counter stays ahead of every stored id
        let highest = file.boards.iter().map(|b| b.id).max().unwrap_or(0);
        let id = file.next_id.max(highest + 1).max(1);
        file.next_id = id + 1;
        let board = Board::new(id, name);
        file.boards.push(board.clone());
        self.save(&file)?;
        info!(board_id = id, "board created");
        Ok(board)
    }

    fn delete_board(&mut self, id: BoardId) -> Result<(), BoardError> {
        let mut file = self.load()?;
        let before = file.boards.len();
        file.boards.retain(|b| b.id != id);
        if file.boards.len() == before {
            return Err(BoardError::NotFound(id));
        }
        self.save(&file)?;
        info!(board_id = id, "board deleted");
        Ok(())
    }

    fn rename_board(&mut self, id: BoardId, name: &str) -> Result<(), BoardError> {
        let name = clean_name(name)?;
        let mut file = self.load()?;
        let board = file
            .boards
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(BoardError::NotFound(id))?;
        board.name = name.to_string();
        self.save(&file)?;
        info!(board_id = id, "board renamed");
        Ok(())
    }
}
