//! Streaming availability lookup
//!
//! Asks the availability service whether a movie can be streamed on Netflix.
//! Two calls: a title search, then a streaming query for the first hit.
//! Base URL: http://www.canistream.it/services

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

/// Availability service client
pub struct StreamingClient {
    client: Client,
    base_url: String,
}

/// Movie search result from the availability service
#[derive(Debug, Clone, Deserialize)]
pub struct StreamingMovie {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: Option<String>,
    pub year: Option<i32>,
}

/// What the `/{movie}` route answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Availability {
    pub title: String,
    pub available: bool,
    #[serde(rename = "netflixId", skip_serializing_if = "Option::is_none")]
    pub netflix_id: Option<String>,
}

impl Availability {
    /// Not available (or unknown)
    pub fn unavailable(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            available: false,
            netflix_id: None,
        }
    }

    pub fn from_netflix_id(title: impl Into<String>, netflix_id: String) -> Self {
        Self {
            title: title.into(),
            available: !netflix_id.is_empty(),
            netflix_id: Some(netflix_id),
        }
    }
}

impl StreamingClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Search movies by title
    pub async fn search(&self, title: &str) -> Result<Vec<StreamingMovie>> {
        debug!(title = %title, "Searching availability service");

        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("movieName", title)])
            .send()
            .await
            .context("Failed to search availability service")?;

        if !response.status().is_success() {
            anyhow::bail!("Availability search failed with status: {}", response.status());
        }

        let movies: Vec<StreamingMovie> = response
            .json()
            .await
            .context("Failed to parse availability search results")?;

        debug!(count = movies.len(), "Availability search returned results");
        Ok(movies)
    }

    /// Streaming services offering a movie, keyed by service name
    ///
    /// The service answers `[]` instead of `{}` when nothing streams the
    /// movie, so the raw JSON is returned.
    pub async fn streaming_services(&self, movie_id: &str) -> Result<Value> {
        let url = format!("{}/query", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("movieId", movie_id),
                ("attributes", "1"),
                ("mediaType", "streaming"),
            ])
            .send()
            .await
            .context("Failed to query streaming services")?;

        if !response.status().is_success() {
            anyhow::bail!("Streaming query failed with status: {}", response.status());
        }

        response
            .json()
            .await
            .context("Failed to parse streaming services")
    }

    /// Netflix id of the best match for `title`
    pub async fn netflix_id(&self, title: &str) -> Result<String> {
        let movie = self
            .search(title)
            .await?
            .into_iter()
            .next()
            .with_context(|| format!("No availability results for '{}'", title))?;

        let services = self.streaming_services(&movie.id).await?;
        let netflix_id = netflix_external_id(&services)
            .with_context(|| format!("'{}' is not on Netflix", title))?;

        info!(title = %title, netflix_id = %netflix_id, "Found movie on Netflix");
        Ok(netflix_id)
    }

    /// Availability of `title`; lookup failures count as unavailable
    pub async fn availability(&self, title: &str) -> Availability {
        match self.netflix_id(title).await {
            Ok(netflix_id) => Availability::from_netflix_id(title, netflix_id),
            Err(e) => {
                info!(title = %title, reason = %e, "Movie not available");
                Availability::unavailable(title)
            }
        }
    }
}

/// `netflix_instant.external_id`, accepting numeric ids too
fn netflix_external_id(services: &Value) -> Option<String> {
    match services.get("netflix_instant")?.get("external_id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_netflix_external_id() {
        let services = json!({
            "netflix_instant": {"external_id": "70021647", "price": 0},
            "amazon_prime_instant_video": {"external_id": "B00X"}
        });
        assert_eq!(netflix_external_id(&services), Some("70021647".to_string()));

        let numeric = json!({"netflix_instant": {"external_id": 70021647}});
        assert_eq!(netflix_external_id(&numeric), Some("70021647".to_string()));

        assert_eq!(netflix_external_id(&json!([])), None);
        assert_eq!(netflix_external_id(&json!({"hulu": {}})), None);
    }

    #[test]
    fn test_availability_serialization() {
        let found =
            serde_json::to_value(Availability::from_netflix_id("Up", "123".into())).unwrap();
        assert_eq!(found, json!({"title": "Up", "available": true, "netflixId": "123"}));

        let empty = Availability::from_netflix_id("Up", String::new());
        assert!(!empty.available);

        let missing = serde_json::to_value(Availability::unavailable("Up")).unwrap();
        assert_eq!(missing, json!({"title": "Up", "available": false}));
    }
}
