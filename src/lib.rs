#![deny(clippy::all, clippy::pedantic)]
#![deny(missing_docs)]
#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]
//! # huaban-dl
//!
//! huaban-dl crawls the huaban.com image board and downloads every pin of
//! a single board, or of all boards a user owns.
//!
//! Pagination is cursor-chained and strictly sequential; image downloads
//! run under a fixed cap of 10 in-flight requests, and failures get exactly
//! one retry pass before they count as lost.
//!
//! ## Example: downloading a single board
//!
//! ```no_run
//! # type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
//! use std::path::PathBuf;
//!
//! use huaban_dl::run::{self, Config, Mode};
//! use huaban_dl::Client;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<()> {
//!     let client = Client::new();
//!     let config = Config {
//!         mode: Mode::SingleBoard,
//!         identifier: "30634722".to_string(),
//!         root: PathBuf::from("images"),
//!     };
//!
//!     let summary = run::run(&client, &config).await?;
//!     println!("downloaded {} images", summary.total_downloaded);
//!     Ok(())
//! }
//! ```

/// Client module contains [`Client`] for requesting boards and images.
pub mod client;

/// Download engine: bounded-concurrency image fetching with one retry pass.
pub mod download;

/// Contains [`Error`]s that can be thrown by the library.
///
/// [`Error`]: crate::error::Error
pub mod error;

/// Cursor-chained pagination loop shared by the resolvers.
pub mod paginate;

/// Orchestrates resolvers and downloads into a full run.
pub mod run;

pub(crate) mod models;

pub(crate) mod result;

pub use client::Client;
pub use models::*;
