//! A pin is a single image reference inside a board.

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    client::Client,
    error::Error,
    models::{board::Board, de_id, macros::str_opt_ref},
    paginate::{self, Page, PageFetcher, PageItem},
    result::Result,
};

/// Pins are requested in pages of up to 100, the server maximum.
const PAGE_LIMIT: &str = "100";

/// A single image reference within a board.
#[derive(Debug, Clone, Deserialize)]
pub struct Pin {
    /// The pin ID; serves as the pagination cursor and the file stem.
    #[serde(deserialize_with = "de_id")]
    pin_id: String,

    /// The stored file backing this pin.
    file: PinFile,
}

/// Storage descriptor of a pin's image file.
#[derive(Debug, Clone, Deserialize)]
pub struct PinFile {
    /// Opaque key on the image asset host.
    key: String,

    /// MIME type recorded at upload time; absent on some legacy pins.
    #[serde(rename = "type", default)]
    mime: Option<String>,
}

impl Pin {
    /// Returns the pin ID.
    pub fn id(&self) -> &str {
        &self.pin_id
    }

    /// Returns the stored file behind this pin.
    pub fn file(&self) -> &PinFile {
        &self.file
    }

    /// Returns the full, ordered pin list of a board.
    ///
    /// The server may deliver fewer pins than the board's `pin_count`
    /// claims; callers report that gap, it is not an error here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BoardNotFound`] if the service reports the board
    /// does not exist, or any transport error from the page requests.
    pub async fn all_in_board(client: &Client, board_id: &str) -> Result<Vec<Pin>> {
        paginate::fetch_all(&BoardPins { client, board_id }).await
    }
}

impl PinFile {
    /// Returns the storage key of the file.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the MIME type of the file, if the service recorded one.
    pub fn mime(&self) -> Option<&str> {
        str_opt_ref!(self.mime)
    }
}

impl PageItem for Pin {
    fn cursor(&self) -> &str {
        &self.pin_id
    }
}

/// Paged view of a board's detail endpoint.
struct BoardPins<'a> {
    client: &'a Client,
    board_id: &'a str,
}

/// Every page of the detail endpoint wraps a full board object.
#[derive(Debug, Deserialize)]
struct PinsReply {
    #[serde(default)]
    err: Option<u32>,
    #[serde(default)]
    board: Option<Board>,
}

#[async_trait(?Send)]
impl PageFetcher for BoardPins<'_> {
    type Item = Pin;

    async fn page(&self, cursor: Option<&str>) -> Result<Page<Pin>> {
        let url = format!("{}/boards/{}/", self.client.api_base(), self.board_id);
        let mut query = vec![("limit", PAGE_LIMIT)];
        if let Some(max) = cursor {
            query.push(("max", max));
        }

        let reply: PinsReply = self.client.fetch_json(&url, &query).await?;
        if reply.err == Some(404) {
            return Err(Error::BoardNotFound(self.board_id.to_string()));
        }

        let board = reply.board.ok_or(Error::Reply("board"))?;
        Ok(Page {
            total: board.pin_count(),
            items: board.into_pins(),
        })
    }
}
