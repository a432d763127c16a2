//! Leaderboard database operations
//!
//! The table only ever holds the scores that can show up on the
//! leaderboard: every insert is followed by a prune of everything scoring
//! below the tenth-best entry.

use std::fmt;

use anyhow::{Context, Result};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::sqlite_helpers::{decode_err, now_iso8601, str_to_uuid, uuid_to_str};

/// Number of entries shown on (and retained for) the leaderboard
pub const LEADERBOARD_SIZE: i64 = 10;

/// A leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighscoreRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub score: i64,
}

impl sqlx::FromRow<'_, sqlx::sqlite::SqliteRow> for HighscoreRecord {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> sqlx::Result<Self> {
        use sqlx::Row;

        let id_str: String = row.try_get("id")?;
        Ok(Self {
            id: str_to_uuid(&id_str).map_err(decode_err)?,
            name: row.try_get("name")?,
            score: row.try_get("score")?,
        })
    }
}

/// Input for posting a new score
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHighscore {
    pub name: String,
    #[serde(deserialize_with = "score_from_number_or_string")]
    pub score: i64,
}

/// Scores arrive as JSON numbers, numeric strings, or form values
fn score_from_number_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct ScoreVisitor;

    impl Visitor<'_> for ScoreVisitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an integer score or a string holding one")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            i64::try_from(v).map_err(|_| E::custom(format!("score {} is too large", v)))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
                Ok(v as i64)
            } else {
                Err(E::custom(format!("score {} is not a whole number", v)))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
            v.trim()
                .parse()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(ScoreVisitor)
}

/// Outcome of recording a score
#[derive(Debug, Clone)]
pub struct RecordedHighscore {
    pub record: HighscoreRecord,
    /// Entries removed by the prune that followed the insert
    pub pruned: u64,
}

/// Highscore repository for database operations
pub struct HighscoreRepository {
    pool: SqlitePool,
}

impl HighscoreRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The best `limit` scores, highest first
    pub async fn top(&self, limit: i64) -> Result<Vec<HighscoreRecord>> {
        let records = sqlx::query_as::<_, HighscoreRecord>(
            "SELECT id, name, score FROM highscores \
             ORDER BY score DESC, created_at, rowid LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to load highscores")?;

        Ok(records)
    }

    /// Insert a score, then drop everything below the tenth-best score
    ///
    /// Entries tied with the tenth-best score survive, so the table can hold
    /// more than [`LEADERBOARD_SIZE`] rows.
    pub async fn record(&self, input: CreateHighscore) -> Result<RecordedHighscore> {
        let record = HighscoreRecord {
            id: Uuid::new_v4(),
            name: input.name,
            score: input.score,
        };

        let mut tx = self.pool.begin().await.context("Failed to start transaction")?;

        sqlx::query(
            "INSERT INTO highscores (id, name, score, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(uuid_to_str(record.id))
        .bind(&record.name)
        .bind(record.score)
        .bind(now_iso8601())
        .execute(&mut *tx)
        .await
        .context("Failed to insert highscore")?;

        let top: Vec<(i64,)> =
            sqlx::query_as("SELECT score FROM highscores ORDER BY score DESC LIMIT ?1")
                .bind(LEADERBOARD_SIZE)
                .fetch_all(&mut *tx)
                .await
                .context("Failed to read leaderboard threshold")?;

        let pruned = match top.last() {
            Some((tenth,)) => sqlx::query("DELETE FROM highscores WHERE score < ?1")
                .bind(*tenth)
                .execute(&mut *tx)
                .await
                .context("Failed to prune highscores")?
                .rows_affected(),
            None => 0,
        };

        tx.commit().await.context("Failed to commit highscore")?;

        tracing::debug!(score = record.score, pruned, "Recorded highscore");
        Ok(RecordedHighscore { record, pruned })
    }

    /// Number of stored entries
    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM highscores")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count highscores")?;

        Ok(count)
    }
}
