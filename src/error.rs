use reqwest::StatusCode;
use thiserror::Error;

/// Errors produced while resolving boards or downloading pins.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport, timeout or body-decoding failure from [`reqwest`].
    #[error("{0}")]
    Reqwest(#[from] reqwest::Error),

    /// The service reported that the user does not exist.
    #[error("user [{0}] does not exist")]
    UserNotFound(String),

    /// The service reported that the board does not exist.
    #[error("board [{0}] does not exist")]
    BoardNotFound(String),

    /// The user exists but owns no boards.
    #[error("user [{0}] has no boards")]
    NoBoards(String),

    /// A request came back with a status other than `200 OK`.
    #[error("unexpected status code: {0}")]
    UnexpectedStatus(StatusCode),

    /// The reply was well-formed JSON but missing the expected payload.
    #[error("malformed reply: missing {0}")]
    Reply(&'static str),

    /// Filesystem failure while preparing a board directory.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}
