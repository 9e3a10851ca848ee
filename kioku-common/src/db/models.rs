//! Database models

use crate::types::RecordType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account partitioning all records, tags and queries.
///
/// `default_record_type` and the auto-tag fields are read by the command
/// layer as query/ingestion defaults; the engine itself only stores them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: Uuid,
    pub username: String,
    pub default_record_type: RecordType,
    pub auto_tag: Option<String>,
    pub auto_tag_valid_from: Option<DateTime<Utc>>,
    pub auto_tag_validity_minutes: i64,
    pub created_at: DateTime<Utc>,
}

/// One logged piece of text, unique per (user, content, type).
///
/// `updated_at >= created_at` always; timestamps never move backward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub record_id: i64,
    pub user_id: Uuid,
    pub content: String,
    pub record_type: RecordType,
    pub score: i64,
    pub ignored: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Append-only audit snapshot of a record's score/ignored state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordHit {
    pub record_hit_id: i64,
    pub record_id: i64,
    pub created_at: DateTime<Utc>,
    pub hit_score: i64,
    pub ignored: bool,
}

/// User-scoped tag, many-to-many with records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub tag_id: i64,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
