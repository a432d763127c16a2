//! SQLite helper utilities for type conversion
//!
//! SQLite has no UUID or JSON column types. UUIDs are stored as their
//! hyphenated string form and documents as JSON text.

use anyhow::{Result, anyhow};
use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Convert a UUID to a SQLite-compatible string
#[inline]
pub fn uuid_to_str(id: Uuid) -> String {
    id.to_string()
}

/// Parse a SQLite string back to a UUID
#[inline]
pub fn str_to_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| anyhow!("Invalid UUID '{}': {}", s, e))
}

/// Serialize a JSON object for storage in a TEXT column
#[inline]
pub fn document_to_json(document: &Map<String, Value>) -> String {
    serde_json::to_string(document).unwrap_or_else(|_| "{}".to_string())
}

/// Parse a stored document, treating empty text as an empty object
pub fn json_to_document(s: &str) -> Result<Map<String, Value>> {
    if s.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str(s).map_err(|e| anyhow!("JSON parse error: {}", e))? {
        Value::Object(map) => Ok(map),
        other => Err(anyhow!("Stored document is not an object: {}", other)),
    }
}

/// Get current UTC timestamp as ISO8601 string for SQLite
#[inline]
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339()
}

/// Map a conversion failure onto the error type `FromRow` expects
pub fn decode_err(e: anyhow::Error) -> sqlx::Error {
    sqlx::Error::Decode(e.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_round_trip() {
        let mut doc = Map::new();
        doc.insert("popularity".to_string(), Value::from(12.5));
        doc.insert("known_for".to_string(), serde_json::json!([{"title": "Big"}]));

        let stored = document_to_json(&doc);
        assert_eq!(json_to_document(&stored).unwrap(), doc);
    }

    #[test]
    fn test_empty_document() {
        assert!(json_to_document("").unwrap().is_empty());
        assert!(json_to_document("[1, 2]").is_err());
    }

    #[test]
    fn test_uuid_round_trip() {
        let id = Uuid::new_v4();
        assert_eq!(str_to_uuid(&uuid_to_str(id)).unwrap(), id);
        assert!(str_to_uuid("not-a-uuid").is_err());
    }
}
