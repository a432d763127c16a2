//! Application configuration management

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host (bind address, defaults to all interfaces)
    pub host: Option<String>,

    /// Server port
    pub port: u16,

    /// SQLite database path or `sqlite://` URL
    pub database_url: String,

    /// Maximum pooled database connections
    pub database_max_connections: u32,

    /// Movie-database API token handed to the browser client
    pub tmdb_api_token: Option<String>,

    /// Directory holding the browser client
    pub client_dir: PathBuf,

    /// Directory holding the client's bower packages
    pub bower_dir: PathBuf,

    /// Base URL of the streaming availability service
    pub streaming_api_url: String,

    /// Base URL of the video-hosting site's lookup pages
    pub movielink_base_url: String,

    /// Suffix appended to the title slug to form a lookup page path
    pub movielink_page_suffix: String,

    /// Timeout applied to every outbound request
    pub http_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let database_url = env::var("DATABASE_PATH")
            .or_else(|_| env::var("DATABASE_URL"))
            .unwrap_or(defaults.database_url);

        // `API` is the name deployments already export; TMDB_API_KEY is accepted as an alias
        let tmdb_api_token = env::var("API")
            .or_else(|_| env::var("TMDB_API_KEY"))
            .ok()
            .filter(|token| !token.trim().is_empty());

        let http_timeout = match env::var("HTTP_TIMEOUT_SECS") {
            Ok(secs) => Duration::from_secs(secs.parse().context("Invalid HTTP_TIMEOUT_SECS")?),
            Err(_) => defaults.http_timeout,
        };

        Ok(Self {
            host: env::var("HOST").ok(),

            port: match env::var("PORT") {
                Ok(port) => port.parse().context("Invalid PORT")?,
                Err(_) => defaults.port,
            },

            database_url,

            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.database_max_connections),

            tmdb_api_token,

            client_dir: env::var("CLIENT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.client_dir),

            bower_dir: env::var("BOWER_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.bower_dir),

            streaming_api_url: env::var("STREAMING_API_URL").unwrap_or(defaults.streaming_api_url),

            movielink_base_url: env::var("MOVIELINK_BASE_URL")
                .unwrap_or(defaults.movielink_base_url),

            movielink_page_suffix: env::var("MOVIELINK_PAGE_SUFFIX")
                .unwrap_or(defaults.movielink_page_suffix),

            http_timeout,
        })
    }

    /// Address the HTTP listener binds to
    pub fn bind_address(&self) -> String {
        let host = self.host.as_deref().unwrap_or("0.0.0.0");
        format!("{}:{}", host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: None,
            port: 3000,
            database_url: "./data/thespians.db".to_string(),
            database_max_connections: 5,
            tmdb_api_token: None,
            client_dir: PathBuf::from("../client"),
            bower_dir: PathBuf::from("../bower_components"),
            streaming_api_url: "http://www.canistream.it/services".to_string(),
            movielink_base_url: "http://putlockers.ch/watch".to_string(),
            movielink_page_suffix: "-online-free-putlocker.html".to_string(),
            http_timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        let config = Config::default();
        assert_eq!(config.bind_address(), "0.0.0.0:3000");

        let config = Config {
            host: Some("127.0.0.1".to_string()),
            port: 8080,
            ..Config::default()
        };
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.database_url, "./data/thespians.db");
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert!(config.tmdb_api_token.is_none());
    }
}
