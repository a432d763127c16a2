//! Thespian database operations
//!
//! A thespian is an actor document. `name`, the movie-database ids and
//! `profile_path` are real columns; whatever else the client sends along
//! (biography, popularity, known_for, ...) is kept in the `document` column
//! and merged back in when the record is serialized.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::sqlite_helpers::{
    decode_err, document_to_json, json_to_document, now_iso8601, str_to_uuid, uuid_to_str,
};

/// Keys that belong to typed columns and never live in the document
const RESERVED_KEYS: &[&str] = &["_id", "id", "name", "imdb_id", "profile_path"];

/// A stored thespian
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThespianRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    /// Movie-database person id
    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    pub profile_path: Option<String>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl sqlx::FromRow<'_, sqlx::sqlite::SqliteRow> for ThespianRecord {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> sqlx::Result<Self> {
        use sqlx::Row;

        let id_str: String = row.try_get("id")?;
        let document: String = row.try_get("document")?;

        Ok(Self {
            id: str_to_uuid(&id_str).map_err(decode_err)?,
            name: row.try_get("name")?,
            tmdb_id: row.try_get("tmdb_id")?,
            imdb_id: row.try_get("imdb_id")?,
            profile_path: row.try_get("profile_path")?,
            metadata: json_to_document(&document).map_err(decode_err)?,
        })
    }
}

/// Input for creating a thespian, as posted by the client
#[derive(Debug, Clone, Deserialize)]
pub struct CreateThespian {
    pub name: String,
    #[serde(rename = "id", default)]
    pub tmdb_id: Option<i64>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl CreateThespian {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tmdb_id: None,
            imdb_id: None,
            profile_path: None,
            metadata: Map::new(),
        }
    }

    pub fn with_profile_path(mut self, path: impl Into<String>) -> Self {
        self.profile_path = Some(path.into());
        self
    }
}

const SELECT_COLUMNS: &str = "SELECT id, name, tmdb_id, imdb_id, profile_path, document FROM thespians";

/// Thespian repository for database operations
pub struct ThespianRepository {
    pool: SqlitePool,
}

impl ThespianRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All thespians whose name matches exactly
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<ThespianRecord>> {
        let records = sqlx::query_as::<_, ThespianRecord>(&format!(
            "{SELECT_COLUMNS} WHERE name = ?1 ORDER BY created_at, rowid"
        ))
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .context("Failed to query thespians by name")?;

        Ok(records)
    }

    /// One thespian picked uniformly at random, if there are any
    pub async fn find_random(&self) -> Result<Option<ThespianRecord>> {
        let record = sqlx::query_as::<_, ThespianRecord>(&format!(
            "{SELECT_COLUMNS} ORDER BY RANDOM() LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await
        .context("Failed to pick a random thespian")?;

        Ok(record)
    }

    /// Every stored thespian in insertion order
    pub async fn list_all(&self) -> Result<Vec<ThespianRecord>> {
        let records = sqlx::query_as::<_, ThespianRecord>(&format!(
            "{SELECT_COLUMNS} ORDER BY created_at, rowid"
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list thespians")?;

        Ok(records)
    }

    /// Store a new thespian and return it with its assigned id
    pub async fn create(&self, input: CreateThespian) -> Result<ThespianRecord> {
        let mut metadata = input.metadata;
        for key in RESERVED_KEYS {
            metadata.remove(*key);
        }

        let record = ThespianRecord {
            id: Uuid::new_v4(),
            name: input.name,
            tmdb_id: input.tmdb_id,
            imdb_id: input.imdb_id,
            profile_path: input.profile_path,
            metadata,
        };

        sqlx::query(
            r#"
            INSERT INTO thespians (id, name, tmdb_id, imdb_id, profile_path, document, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(uuid_to_str(record.id))
        .bind(&record.name)
        .bind(record.tmdb_id)
        .bind(&record.imdb_id)
        .bind(&record.profile_path)
        .bind(document_to_json(&record.metadata))
        .bind(now_iso8601())
        .execute(&self.pool)
        .await
        .context("Failed to insert thespian")?;

        Ok(record)
    }

    /// Delete every thespian without a profile image, returning how many went
    pub async fn delete_without_profile(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM thespians WHERE profile_path IS NULL")
            .execute(&self.pool)
            .await
            .context("Failed to delete thespians without a profile image")?;

        Ok(result.rows_affected())
    }
}
