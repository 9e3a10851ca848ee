//! Record persistence
//!
//! The merge-path functions take a `SqliteConnection` so they run on the
//! batch pipeline's open transaction; read helpers take the pool.

use chrono::{DateTime, Utc};
use kioku_common::db::{Record, RecordHit};
use kioku_common::{Error, RecordType, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use uuid::Uuid;

/// Map a row with the full records column set
pub fn record_from_row(row: &SqliteRow) -> Result<Record> {
    let user_id: String = row.get("user_id");
    let type_code: i64 = row.get("record_type");

    Ok(Record {
        record_id: row.get("record_id"),
        user_id: Uuid::parse_str(&user_id)
            .map_err(|e| Error::Internal(format!("malformed user id '{user_id}': {e}")))?,
        content: row.get("content"),
        record_type: RecordType::from_code(type_code)
            .ok_or_else(|| Error::Internal(format!("unknown record type code {type_code}")))?,
        score: row.get("score"),
        ignored: row.get("ignored"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// Look up a record by its exact merge key. Content comparison is
/// case-sensitive with no normalization (SQLite TEXT equality).
pub async fn find_by_key(
    conn: &mut SqliteConnection,
    user_id: Uuid,
    content: &str,
    record_type: RecordType,
) -> Result<Option<Record>> {
    let row = sqlx::query(
        r#"
        SELECT record_id, user_id, content, record_type, score, ignored, created_at, updated_at
        FROM records
        WHERE user_id = ? AND content = ? AND record_type = ?
        "#,
    )
    .bind(user_id.to_string())
    .bind(content)
    .bind(record_type.code())
    .fetch_optional(&mut *conn)
    .await?;

    row.as_ref().map(record_from_row).transpose()
}

/// Insert a brand-new record: score 1, created = updated = supplied date.
///
/// A unique-index violation means a concurrent writer inserted the same
/// merge key first; surfaced as `Error::Conflict` so the batch aborts.
pub async fn insert(
    conn: &mut SqliteConnection,
    user_id: Uuid,
    content: &str,
    record_type: RecordType,
    date: DateTime<Utc>,
) -> Result<Record> {
    let result = sqlx::query(
        r#"
        INSERT INTO records (user_id, content, record_type, score, ignored, created_at, updated_at)
        VALUES (?, ?, ?, 1, 0, ?, ?)
        "#,
    )
    .bind(user_id.to_string())
    .bind(content)
    .bind(record_type.code())
    .bind(date)
    .bind(date)
    .execute(&mut *conn)
    .await;

    match result {
        Ok(done) => Ok(Record {
            record_id: done.last_insert_rowid(),
            user_id,
            content: content.to_string(),
            record_type,
            score: 1,
            ignored: false,
            created_at: date,
            updated_at: date,
        }),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            Err(Error::Conflict(format!(
                "record ({user_id}, {content}, {record_type}) already exists"
            )))
        }
        Err(e) => Err(e.into()),
    }
}

/// Write back score/ignored/updated_at for an existing record
pub async fn apply_update(
    conn: &mut SqliteConnection,
    record_id: i64,
    score: i64,
    ignored: bool,
    updated_at: DateTime<Utc>,
) -> Result<()> {
    let done = sqlx::query(
        "UPDATE records SET score = ?, ignored = ?, updated_at = ? WHERE record_id = ?",
    )
    .bind(score)
    .bind(ignored)
    .bind(updated_at)
    .bind(record_id)
    .execute(&mut *conn)
    .await?;

    if done.rows_affected() == 0 {
        return Err(Error::NotFound(format!("record {record_id} not found")));
    }
    Ok(())
}

/// Append an audit snapshot of the record's state
pub async fn insert_hit(
    conn: &mut SqliteConnection,
    record_id: i64,
    created_at: DateTime<Utc>,
    hit_score: i64,
    ignored: bool,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO record_hits (record_id, created_at, hit_score, ignored) VALUES (?, ?, ?, ?)",
    )
    .bind(record_id)
    .bind(created_at)
    .bind(hit_score)
    .bind(ignored)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Load the audit trail of a record, oldest first
pub async fn hits_for_record(pool: &SqlitePool, record_id: i64) -> Result<Vec<RecordHit>> {
    let rows = sqlx::query(
        r#"
        SELECT record_hit_id, record_id, created_at, hit_score, ignored
        FROM record_hits
        WHERE record_id = ?
        ORDER BY record_hit_id
        "#,
    )
    .bind(record_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| RecordHit {
            record_hit_id: row.get("record_hit_id"),
            record_id: row.get("record_id"),
            created_at: row.get("created_at"),
            hit_score: row.get("hit_score"),
            ignored: row.get("ignored"),
        })
        .collect())
}

/// Delete a record; hits and tag links cascade. Returns whether a row
/// was actually removed.
pub async fn remove(pool: &SqlitePool, record_id: i64) -> Result<bool> {
    let done = sqlx::query("DELETE FROM records WHERE record_id = ?")
        .bind(record_id)
        .execute(pool)
        .await?;
    Ok(done.rows_affected() > 0)
}
