//! Create-or-update merge for one record key
//!
//! The merge key is (user, content, type). Score only ever grows through
//! merging, and `updated_at` never moves backward regardless of the order
//! imported dates arrive in.

use crate::db::records;
use chrono::{DateTime, Utc};
use kioku_common::db::Record;
use kioku_common::{Error, RecordType, Result};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

/// Outcome of merging one key, carrying the record as persisted
#[derive(Debug, Clone)]
pub enum MergeOutcome {
    Created(Record),
    Updated(Record),
    Unchanged(Record),
}

impl MergeOutcome {
    pub fn record(&self) -> &Record {
        match self {
            MergeOutcome::Created(r) | MergeOutcome::Updated(r) | MergeOutcome::Unchanged(r) => r,
        }
    }

    pub fn into_record(self) -> Record {
        match self {
            MergeOutcome::Created(r) | MergeOutcome::Updated(r) | MergeOutcome::Unchanged(r) => r,
        }
    }
}

/// Merge one (content, type) observation into the user's records.
///
/// - no existing record: insert with score 1 and both timestamps set to
///   `supplied_date` -> `Created`
/// - existing record that is ignored, or `add_score` false: no mutation
///   -> `Unchanged`
/// - otherwise: score += 1, `updated_at = max(supplied_date, existing)`,
///   ignored flag untouched; optional audit hit of the new state
///   -> `Updated`
pub async fn merge_record(
    conn: &mut SqliteConnection,
    user_id: Uuid,
    content: &str,
    record_type: RecordType,
    supplied_date: DateTime<Utc>,
    add_score: bool,
    append_hit: bool,
) -> Result<MergeOutcome> {
    if record_type == RecordType::Any {
        return Err(Error::InvalidInput(
            "the Any wildcard cannot be stored as a record type".to_string(),
        ));
    }

    match records::find_by_key(conn, user_id, content, record_type).await? {
        Some(existing) => {
            if existing.ignored || !add_score {
                return Ok(MergeOutcome::Unchanged(existing));
            }

            let updated = Record {
                score: existing.score + 1,
                updated_at: existing.updated_at.max(supplied_date),
                ..existing
            };
            records::apply_update(conn, updated.record_id, updated.score, updated.ignored, updated.updated_at)
                .await?;
            if append_hit {
                records::insert_hit(conn, updated.record_id, updated.updated_at, updated.score, updated.ignored)
                    .await?;
            }
            tracing::debug!(
                content = %updated.content,
                record_type = %updated.record_type,
                score = updated.score,
                "merged into existing record"
            );
            Ok(MergeOutcome::Updated(updated))
        }
        None => {
            let record = records::insert(conn, user_id, content, record_type, supplied_date).await?;
            tracing::debug!(
                content = %record.content,
                record_type = %record.record_type,
                "created record"
            );
            Ok(MergeOutcome::Created(record))
        }
    }
}

/// Explicit field overrides for one existing record
#[derive(Debug, Clone, Default)]
pub struct RecordOverride {
    /// Explicit score, bypassing the increment rule
    pub score: Option<i64>,
    /// Ignore (true) or include (false) the record
    pub ignored: Option<bool>,
    /// Still subject to the non-decreasing timestamp discipline
    pub timestamp: Option<DateTime<Utc>>,
    /// Append an audit hit of the resulting state
    pub append_hit: bool,
}

/// Apply direct overrides to one record, outside any batch.
///
/// The record must exist; a supplied timestamp never moves `updated_at`
/// backward.
pub async fn override_record(
    pool: &SqlitePool,
    user_id: Uuid,
    content: &str,
    record_type: RecordType,
    changes: &RecordOverride,
) -> Result<Record> {
    let mut tx = pool.begin().await?;

    let existing = records::find_by_key(&mut tx, user_id, content, record_type)
        .await?
        .ok_or_else(|| {
            Error::NotFound(format!("record ({user_id}, {content}, {record_type}) not found"))
        })?;

    let updated = Record {
        score: changes.score.unwrap_or(existing.score),
        ignored: changes.ignored.unwrap_or(existing.ignored),
        updated_at: match changes.timestamp {
            Some(supplied) => existing.updated_at.max(supplied),
            None => existing.updated_at,
        },
        ..existing
    };

    records::apply_update(&mut tx, updated.record_id, updated.score, updated.ignored, updated.updated_at)
        .await?;
    if changes.append_hit {
        records::insert_hit(&mut tx, updated.record_id, updated.updated_at, updated.score, updated.ignored)
            .await?;
    }

    tx.commit().await?;
    Ok(updated)
}
