//! The owner of a collection of boards.

use serde::Deserialize;

use crate::models::board::Board;

/// The user payload of the boards-by-username endpoint.
///
/// Each paged reply repeats the authoritative `board_count` and carries a
/// page-sized slice of boards.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// Total number of boards the user owns.
    board_count: usize,

    /// Boards carried by this reply; a page-sized slice.
    #[serde(default)]
    boards: Vec<Board>,
}

impl User {
    /// Returns the total number of boards the user owns.
    pub fn board_count(&self) -> usize {
        self.board_count
    }

    /// Returns the boards carried by this reply.
    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub(crate) fn into_boards(self) -> Vec<Board> {
        self.boards
    }
}
