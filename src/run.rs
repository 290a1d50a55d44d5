//! Sequences board resolution, pin resolution and downloads into one run.
//!
//! Boards are processed strictly one after another; only the images inside
//! a board download concurrently. That bounds peak resource usage and keeps
//! the progress log readable.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::{
    client::Client,
    download,
    models::{board::Board, pin::Pin},
    result::Result,
};

/// Which collection a run downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Every board owned by a user.
    UserBoards,
    /// One board, by its id.
    SingleBoard,
}

/// Resolved parameters of one run, as collected by the CLI layer.
#[derive(Debug, Clone)]
pub struct Config {
    /// Flow selection.
    pub mode: Mode,
    /// Username or board id, depending on `mode`.
    pub identifier: String,
    /// Directory receiving one subdirectory per board.
    pub root: PathBuf,
}

/// Outcome of a single board's download pass.
#[derive(Debug)]
pub struct BoardReport {
    /// Id of the board.
    pub board_id: String,
    /// Title of the board.
    pub title: String,
    /// Images written, including retry successes.
    pub downloaded: usize,
    /// Downloads that failed twice and stayed failed.
    pub failed: usize,
    /// Pins the server claimed but never delivered during pagination.
    pub missing: usize,
}

/// Aggregated outcome of a whole run.
#[derive(Debug)]
pub struct Summary {
    /// Per-board outcomes, in download order.
    pub boards: Vec<BoardReport>,
    /// Images written across all boards.
    pub total_downloaded: usize,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

/// Resolves the requested boards and downloads them one after another.
///
/// Resolver failures ([`Error::UserNotFound`], [`Error::BoardNotFound`],
/// [`Error::NoBoards`]) abort the run immediately; per-image failures only
/// lower the reported counts.
///
/// # Errors
///
/// Any resolver or filesystem error ends the run; partially downloaded
/// boards stay on disk.
///
/// [`Error::UserNotFound`]: crate::error::Error::UserNotFound
/// [`Error::BoardNotFound`]: crate::error::Error::BoardNotFound
/// [`Error::NoBoards`]: crate::error::Error::NoBoards
pub async fn run(client: &Client, config: &Config) -> Result<Summary> {
    let started = Instant::now();

    let boards = match config.mode {
        Mode::UserBoards => {
            let boards = Board::all_of_user(client, &config.identifier).await?;
            log::info!(
                "user [{}] owns {} boards",
                config.identifier,
                boards.len()
            );
            boards
        }
        Mode::SingleBoard => vec![Board::fetch(client, &config.identifier).await?],
    };

    let mut reports = Vec::with_capacity(boards.len());
    let mut total_downloaded = 0;

    for board in boards {
        let report = download_board(client, &board, &config.root).await?;
        total_downloaded += report.downloaded;
        reports.push(report);
    }

    Ok(Summary {
        boards: reports,
        total_downloaded,
        elapsed: started.elapsed(),
    })
}

/// Downloads one board into its own subdirectory of `root`.
async fn download_board(client: &Client, board: &Board, root: &Path) -> Result<BoardReport> {
    log::info!(
        "downloading board [{} - {}], {} pins",
        board.id(),
        board.title(),
        board.pin_count()
    );

    let pins = Pin::all_in_board(client, board.id()).await?;
    // known upstream inconsistency: some boards page out fewer pins than
    // pin_count claims
    let missing = board.pin_count().saturating_sub(pins.len());
    if missing > 0 {
        log::warn!(
            "board [{}] delivered {} of {} pins",
            board.id(),
            pins.len(),
            board.pin_count()
        );
    }

    let board_dir = root.join(format!("{} - {}", board.id(), board.title()));
    reset_dir(&board_dir).await?;

    let downloaded = download::download_all(client, &pins, &board_dir).await;
    let failed = board.pin_count().saturating_sub(missing + downloaded);

    log::info!(
        "board [{}] done: {} downloaded, {} failed, {} missing",
        board.id(),
        downloaded,
        failed,
        missing
    );

    Ok(BoardReport {
        board_id: board.id().to_string(),
        title: board.title().to_string(),
        downloaded,
        failed,
        missing,
    })
}

/// Empties and recreates a board's target directory.
async fn reset_dir(path: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }
    tokio::fs::create_dir_all(path).await.map_err(Into::into)
}
