//! External service integrations

pub mod movielink;
pub mod streaming;

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, header};

pub use movielink::{MediaSource, MovieLinkError, MovieLinkScraper};
pub use streaming::{Availability, StreamingClient};

/// Browser-like user agent; the hosting sites refuse obvious bots
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Build the HTTP client shared by the outbound services
pub fn http_client(timeout: Duration) -> Result<Client> {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::USER_AGENT, header::HeaderValue::from_static(USER_AGENT));

    Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .gzip(true)
        .build()
        .context("Failed to create HTTP client")
}
