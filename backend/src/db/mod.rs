//! Database connection and operations
//!
//! Everything lives in a single SQLite file. Thespians keep their free-form
//! actor metadata in a JSON document column next to the typed columns the
//! routes query on.

pub mod highscores;
pub mod schema_sync;
pub mod sqlite_helpers;
pub mod thespians;

use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub use highscores::{CreateHighscore, HighscoreRecord, HighscoreRepository, LEADERBOARD_SIZE};
pub use thespians::{CreateThespian, ThespianRecord, ThespianRepository};

/// Database wrapper providing connection pool access
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database wrapper from an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database and make sure the tables exist
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database location '{}'", url))?
            .create_if_missing(true);

        if let Some(parent) = options.get_filename().parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory {}", parent.display())
            })?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .context("Failed to open SQLite database")?;

        let db = Self { pool };
        db.sync_schema().await?;
        Ok(db)
    }

    /// Open a private in-memory database
    ///
    /// Every SQLite `:memory:` connection is its own database, so the pool is
    /// pinned to a single connection that never idles out.
    pub async fn connect_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory SQLite database")?;

        let db = Self { pool };
        db.sync_schema().await?;
        Ok(db)
    }

    async fn sync_schema(&self) -> Result<()> {
        let result = schema_sync::sync_schema(&self.pool).await?;
        if !result.tables_created.is_empty() {
            tracing::info!(tables = ?result.tables_created, "Created database tables");
        }
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get a thespian repository
    pub fn thespians(&self) -> ThespianRepository {
        ThespianRepository::new(self.pool.clone())
    }

    /// Get a highscore repository
    pub fn highscores(&self) -> HighscoreRepository {
        HighscoreRepository::new(self.pool.clone())
    }
}
