//! A board is a user-curated collection of pins.
//!
//! Two lookups exist: a single board by its id, and the complete board
//! list of a user. The user listing is paged, so boards fetched through
//! [`Board::all_of_user`] carry summary fields only; their pins come from
//! [`Pin::all_in_board`] afterwards.
//!
//! [`Pin::all_in_board`]: crate::models::pin::Pin::all_in_board

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    client::Client,
    error::Error,
    models::{de_id, pin::Pin, user::User},
    paginate::{self, Page, PageFetcher, PageItem},
    result::Result,
};

/// Boards are requested in pages of up to 100, the server maximum.
const PAGE_LIMIT: &str = "100";

/// A named collection of pins owned by a user.
#[derive(Debug, Clone, Deserialize)]
pub struct Board {
    /// The board ID; serves as the pagination cursor and the directory name.
    #[serde(deserialize_with = "de_id")]
    board_id: String,

    /// Human-readable board title.
    title: String,

    /// Pins carried by this reply; a page-sized slice, never the full board.
    #[serde(default)]
    pins: Vec<Pin>,

    /// Total number of pins the server claims the board has. Fixed at
    /// fetch time and authoritative for failure accounting.
    pin_count: usize,
}

impl Board {
    /// Returns the board ID.
    pub fn id(&self) -> &str {
        &self.board_id
    }

    /// Returns the board title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the total number of pins the server claims the board has.
    pub fn pin_count(&self) -> usize {
        self.pin_count
    }

    /// Returns the pins carried by the reply this board came from.
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub(crate) fn into_pins(self) -> Vec<Pin> {
        self.pins
    }

    /// Fetches a single board's metadata by id.
    ///
    /// Asks for one pin only; the full pin list is resolved separately.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BoardNotFound`] if the service reports the board
    /// does not exist, or any transport error from the request.
    pub async fn fetch(client: &Client, board_id: &str) -> Result<Board> {
        let url = format!("{}/boards/{}/", client.api_base(), board_id);
        let reply: BoardReply = client.fetch_json(&url, &[("limit", "1")]).await?;

        if reply.err == Some(404) {
            return Err(Error::BoardNotFound(board_id.to_string()));
        }
        reply.board.ok_or(Error::Reply("board"))
    }

    /// Fetches the complete board list of a user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UserNotFound`] if the service reports the user
    /// does not exist, [`Error::NoBoards`] if the user owns zero boards,
    /// or any transport error from the page requests.
    pub async fn all_of_user(client: &Client, username: &str) -> Result<Vec<Board>> {
        paginate::fetch_all(&UserBoards { client, username }).await
    }
}

impl PageItem for Board {
    fn cursor(&self) -> &str {
        &self.board_id
    }
}

/// Reply envelope of the single-board endpoint.
#[derive(Debug, Deserialize)]
struct BoardReply {
    #[serde(default)]
    err: Option<u32>,
    #[serde(default)]
    board: Option<Board>,
}

/// Paged view of a user's boards endpoint.
struct UserBoards<'a> {
    client: &'a Client,
    username: &'a str,
}

/// Reply envelope of the boards-by-username endpoint.
#[derive(Debug, Deserialize)]
struct UserReply {
    #[serde(default)]
    err: Option<u32>,
    #[serde(default)]
    user: Option<User>,
}

#[async_trait(?Send)]
impl PageFetcher for UserBoards<'_> {
    type Item = Board;

    async fn page(&self, cursor: Option<&str>) -> Result<Page<Board>> {
        let url = format!("{}/{}/", self.client.api_base(), self.username);
        let mut query = vec![("limit", PAGE_LIMIT)];
        if let Some(max) = cursor {
            query.push(("max", max));
        }

        let reply: UserReply = self.client.fetch_json(&url, &query).await?;
        if reply.err == Some(404) {
            return Err(Error::UserNotFound(self.username.to_string()));
        }

        let user = reply.user.ok_or(Error::Reply("user"))?;
        if user.board_count() == 0 {
            return Err(Error::NoBoards(self.username.to_string()));
        }

        Ok(Page {
            total: user.board_count(),
            items: user.into_boards(),
        })
    }
}
