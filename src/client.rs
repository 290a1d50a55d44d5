use std::time::Duration;

use crate::{error::Error, result::Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    Client as ReqwestClient, StatusCode,
};
use serde::de::DeserializeOwned;

/// Default API host of the board service.
const API_BASE: &str = "https://huaban.com";

/// Default host serving the static image assets.
const IMAGE_BASE: &str = "http://img.hb.aicdn.com";

/// Applied uniformly to every request, primary and retry alike.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// HTTP adapter shared by the resolvers and the download engine.
///
/// Wraps a single [`reqwest::Client`] so connections are pooled across
/// pagination and image requests.
#[derive(Debug, Clone)]
pub struct Client {
    http: ReqwestClient,
    api_base: String,
    image_base: String,
}

impl Client {
    /// Builds a client against the production hosts.
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialized.
    pub fn new() -> Client {
        Self::with_endpoints(API_BASE, IMAGE_BASE)
    }

    /// Builds a client against explicit hosts.
    ///
    /// Integration tests point this at a local mock server; everything
    /// else goes through [`Client::new`].
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialized.
    pub fn with_endpoints(api_base: &str, image_base: &str) -> Client {
        let http = ReqwestClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("could not start up the client");

        Client {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            image_base: image_base.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL of the JSON API host.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Base URL of the image asset host.
    pub fn image_base(&self) -> &str {
        &self.image_base
    }

    /// GETs `url` and deserializes the JSON body.
    ///
    /// The `Accept`/`X-Requested-With` pair makes the service answer with
    /// plain JSON instead of an HTML page with embedded JSON. An HTML body
    /// slipping through anyway fails deserialization and surfaces as
    /// [`Error::Reqwest`].
    pub(crate) async fn fetch_json<T>(&self, url: &str, query: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .http
            .get(url)
            .query(query)
            .headers(json_headers())
            .send()
            .await?;

        log::debug!("GET {} -> {}", response.url(), response.status());

        match response.status() {
            StatusCode::OK => response.json::<T>().await.map_err(Into::into),
            code => Err(Error::UnexpectedStatus(code)),
        }
    }

    /// GETs `url` and returns the raw body bytes.
    pub(crate) async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.http.get(url).send().await?;

        match response.status() {
            StatusCode::OK => Ok(response.bytes().await?.to_vec()),
            code => Err(Error::UnexpectedStatus(code)),
        }
    }
}

/// The header pair that switches the service into JSON-only replies.
fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        "X-Requested-With",
        HeaderValue::from_static("XMLHttpRequest"),
    );
    headers
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}
