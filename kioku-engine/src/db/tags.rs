//! Tag persistence
//!
//! Tags are user-scoped and many-to-many with records; their names are the
//! tag filter dimension of the query engine.

use kioku_common::db::Tag;
use kioku_common::{time, Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

fn tag_from_row(row: &SqliteRow) -> Result<Tag> {
    let user_id: String = row.get("user_id");

    Ok(Tag {
        tag_id: row.get("tag_id"),
        user_id: Uuid::parse_str(&user_id)
            .map_err(|e| Error::Internal(format!("malformed user id '{user_id}': {e}")))?,
        name: row.get("name"),
        description: row.get("description"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// Find an existing tag by name or create it with the name as description
pub async fn get_or_create(pool: &SqlitePool, user_id: Uuid, name: &str) -> Result<Tag> {
    let existing = sqlx::query(
        "SELECT tag_id, user_id, name, description, created_at, updated_at \
         FROM tags WHERE user_id = ? AND name = ?",
    )
    .bind(user_id.to_string())
    .bind(name)
    .fetch_optional(pool)
    .await?;

    if let Some(row) = existing {
        return tag_from_row(&row);
    }

    let now = time::now();
    let done = sqlx::query(
        "INSERT INTO tags (user_id, name, description, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(user_id.to_string())
    .bind(name)
    .bind(name)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Tag {
        tag_id: done.last_insert_rowid(),
        user_id,
        name: name.to_string(),
        description: name.to_string(),
        created_at: now,
        updated_at: now,
    })
}

/// Link records to a tag, skipping links that already exist
pub async fn tag_records(pool: &SqlitePool, tag_id: i64, record_ids: &[i64]) -> Result<()> {
    for record_id in record_ids {
        sqlx::query("INSERT OR IGNORE INTO record_tags (record_id, tag_id) VALUES (?, ?)")
            .bind(record_id)
            .bind(tag_id)
            .execute(pool)
            .await?;
    }

    sqlx::query("UPDATE tags SET updated_at = ? WHERE tag_id = ?")
        .bind(time::now())
        .bind(tag_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// All tags of a user
pub async fn list_for_user(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<Tag>> {
    let rows = sqlx::query(
        "SELECT tag_id, user_id, name, description, created_at, updated_at \
         FROM tags WHERE user_id = ? ORDER BY name",
    )
    .bind(user_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(tag_from_row).collect()
}

/// Tag names carried by one record
pub async fn names_for_record(pool: &SqlitePool, record_id: i64) -> Result<Vec<String>> {
    let rows = sqlx::query(
        "SELECT t.name FROM tags t \
         JOIN record_tags rt ON rt.tag_id = t.tag_id \
         WHERE rt.record_id = ? ORDER BY t.name",
    )
    .bind(record_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(|row| row.get("name")).collect())
}
