//! Schema creation at startup
//!
//! Tables are created when missing and left alone otherwise. There are no
//! migrations: changing a column means wiping the database file.

use sqlx::SqlitePool;
use tracing::debug;

/// Result of a schema sync operation
#[derive(Debug, Default)]
pub struct SchemaSyncResult {
    pub tables_created: Vec<String>,
}

struct TableDef {
    name: &'static str,
    create_sql: &'static str,
    indexes: &'static [&'static str],
}

const TABLES: &[TableDef] = &[
    TableDef {
        name: "thespians",
        create_sql: r#"
            CREATE TABLE thespians (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                tmdb_id INTEGER,
                imdb_id TEXT,
                profile_path TEXT,
                document TEXT NOT NULL DEFAULT '{}',
                created_at TEXT NOT NULL
            )
        "#,
        indexes: &["CREATE INDEX IF NOT EXISTS idx_thespians_name ON thespians (name)"],
    },
    TableDef {
        name: "highscores",
        create_sql: r#"
            CREATE TABLE highscores (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                score INTEGER NOT NULL,
                created_at TEXT NOT NULL
            )
        "#,
        indexes: &["CREATE INDEX IF NOT EXISTS idx_highscores_score ON highscores (score DESC)"],
    },
];

/// Check if a table exists in the database
async fn table_exists(pool: &SqlitePool, table_name: &str) -> Result<bool, sqlx::Error> {
    let result: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name = ?")
            .bind(table_name)
            .fetch_optional(pool)
            .await?;

    Ok(result.is_some())
}

/// Create every missing table and its indexes
pub async fn sync_schema(pool: &SqlitePool) -> Result<SchemaSyncResult, sqlx::Error> {
    let mut result = SchemaSyncResult::default();

    for table in TABLES {
        if !table_exists(pool, table.name).await? {
            debug!(table = table.name, "Creating table");
            sqlx::query(table.create_sql).execute(pool).await?;
            result.tables_created.push(table.name.to_string());
        }

        for index in table.indexes {
            sqlx::query(*index).execute(pool).await?;
        }
    }

    Ok(result)
}
