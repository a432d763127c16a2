//! Playable media links scraped from a video-hosting site
//!
//! Resolving a title takes two page loads:
//!
//! 1. the title's lookup page, whose `doit(...)` token decodes to the
//!    player iframe markup ([`doit`]),
//! 2. the player page named by that iframe, whose `sources: [...]` literal
//!    lists the media files by resolution ([`sources`]).
//!
//! Everything here depends on third-party markup that changes without
//! notice. Every failure is reported as a [`MovieLinkError`] and the route
//! turns all of them into the same `error` body.

pub mod doit;
pub mod sources;
pub mod title;

use reqwest::{Client, StatusCode};
use tracing::{debug, info};
use url::Url;

pub use sources::MediaSource;

/// Body the player host returns in place of a removed video
const FILE_DELETED: &str = "File was deleted";

#[derive(Debug, thiserror::Error)]
pub enum MovieLinkError {
    #[error("no movie title in request")]
    EmptyTitle,

    #[error("invalid page url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered {status}")]
    Status { url: String, status: StatusCode },

    #[error("lookup page has no doit token")]
    MissingToken,

    #[error("doit token could not be decoded: {0}")]
    Decode(String),

    #[error("decoded token has no player url")]
    MissingPlayerUrl,

    #[error("video was deleted from the player host")]
    FileDeleted,

    #[error("player page has no sources list")]
    MissingSources,

    #[error("no source in a supported resolution (found {0:?})")]
    NoPreferredSource(Vec<String>),
}

/// Scraper for the video-hosting site
pub struct MovieLinkScraper {
    client: Client,
    base_url: String,
    page_suffix: String,
}

impl MovieLinkScraper {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        page_suffix: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            page_suffix: page_suffix.into(),
        }
    }

    /// Lookup page URL for a movie title
    pub fn lookup_page_url(&self, movie_title: &str) -> Result<Url, MovieLinkError> {
        let slug = title::slugify(movie_title);
        if slug.is_empty() {
            return Err(MovieLinkError::EmptyTitle);
        }

        let url = format!("{}/{}{}", self.base_url, slug, self.page_suffix);
        Url::parse(&url).map_err(|source| MovieLinkError::InvalidUrl { url, source })
    }

    /// Direct media file URL for a movie title, at the best available resolution
    pub async fn media_url(&self, movie_title: &str) -> Result<String, MovieLinkError> {
        let page_url = self.lookup_page_url(movie_title)?;
        info!(title = %movie_title, url = %page_url, "Resolving movie link");

        let lookup_page = self.fetch(page_url.as_str()).await?;
        let token = doit::extract_token(&lookup_page).ok_or(MovieLinkError::MissingToken)?;
        let decoded = doit::decode_token(token)?;

        let player_src = doit::player_url(&decoded).ok_or(MovieLinkError::MissingPlayerUrl)?;
        let player_url = page_url
            .join(player_src)
            .map_err(|source| MovieLinkError::InvalidUrl {
                url: player_src.to_string(),
                source,
            })?;
        debug!(url = %player_url, "Found player page");

        let player_page = self.fetch(player_url.as_str()).await?;
        if player_page.trim() == FILE_DELETED {
            return Err(MovieLinkError::FileDeleted);
        }

        let literal =
            sources::extract_sources_literal(&player_page).ok_or(MovieLinkError::MissingSources)?;
        let media = sources::parse_sources(literal);
        if media.is_empty() {
            return Err(MovieLinkError::MissingSources);
        }

        let chosen = sources::select_preferred(&media).ok_or_else(|| {
            MovieLinkError::NoPreferredSource(
                media.iter().filter_map(|s| s.label.clone()).collect(),
            )
        })?;

        info!(
            title = %movie_title,
            label = chosen.label.as_deref().unwrap_or_default(),
            "Resolved movie link"
        );
        Ok(chosen.file.clone())
    }

    async fn fetch(&self, url: &str) -> Result<String, MovieLinkError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| MovieLinkError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(MovieLinkError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.text().await.map_err(|source| MovieLinkError::Request {
            url: url.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scraper() -> MovieLinkScraper {
        MovieLinkScraper::new(Client::new(), "http://putlockers.example/watch/", "-online.html")
    }

    #[test]
    fn test_lookup_page_url() {
        let url = scraper().lookup_page_url("The Dark Knight").unwrap();
        assert_eq!(url.as_str(), "http://putlockers.example/watch/the-dark-knight-online.html");
    }

    #[test]
    fn test_lookup_page_url_needs_a_title() {
        assert!(matches!(
            scraper().lookup_page_url(" ?! "),
            Err(MovieLinkError::EmptyTitle)
        ));
    }

    #[test]
    fn test_player_url_resolution_against_page() {
        let page = scraper().lookup_page_url("Up").unwrap();
        assert_eq!(
            page.join("//player.example/embed-1.html").unwrap().as_str(),
            "http://player.example/embed-1.html"
        );
        assert_eq!(
            page.join("/embed/2").unwrap().as_str(),
            "http://putlockers.example/embed/2"
        );
    }
}
