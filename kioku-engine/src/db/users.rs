//! User persistence

use kioku_common::db::User;
use kioku_common::{time, Error, RecordType, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

fn user_from_row(row: &SqliteRow) -> Result<User> {
    let user_id: String = row.get("user_id");
    let type_code: i64 = row.get("default_record_type");

    Ok(User {
        user_id: Uuid::parse_str(&user_id)
            .map_err(|e| Error::Internal(format!("malformed user id '{user_id}': {e}")))?,
        username: row.get("username"),
        default_record_type: RecordType::from_code(type_code)
            .ok_or_else(|| Error::Internal(format!("unknown record type code {type_code}")))?,
        auto_tag: row.get("auto_tag"),
        auto_tag_valid_from: row.get("auto_tag_valid_from"),
        auto_tag_validity_minutes: row.get("auto_tag_validity_minutes"),
        created_at: row.get("created_at"),
    })
}

const USER_COLUMNS: &str = "user_id, username, default_record_type, auto_tag, \
                            auto_tag_valid_from, auto_tag_validity_minutes, created_at";

pub async fn find_by_id(pool: &SqlitePool, user_id: Uuid) -> Result<Option<User>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?"))
        .bind(user_id.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(user_from_row).transpose()
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?"))
        .bind(username)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(user_from_row).transpose()
}

/// Create a user with a fresh id and the Any default record type
pub async fn create(pool: &SqlitePool, username: &str) -> Result<User> {
    let user = User {
        user_id: Uuid::new_v4(),
        username: username.to_string(),
        default_record_type: RecordType::Any,
        auto_tag: None,
        auto_tag_valid_from: None,
        auto_tag_validity_minutes: 0,
        created_at: time::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO users (user_id, username, default_record_type, auto_tag_validity_minutes, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(user.user_id.to_string())
    .bind(&user.username)
    .bind(user.default_record_type.code())
    .bind(user.auto_tag_validity_minutes)
    .bind(user.created_at)
    .execute(pool)
    .await?;

    Ok(user)
}

/// Update the per-user ingestion/query defaults
pub async fn update_defaults(
    pool: &SqlitePool,
    user_id: Uuid,
    default_record_type: RecordType,
    auto_tag_validity_minutes: i64,
) -> Result<()> {
    let done = sqlx::query(
        "UPDATE users SET default_record_type = ?, auto_tag_validity_minutes = ? WHERE user_id = ?",
    )
    .bind(default_record_type.code())
    .bind(auto_tag_validity_minutes)
    .bind(user_id.to_string())
    .execute(pool)
    .await?;

    if done.rows_affected() == 0 {
        return Err(Error::NotFound(format!("user {user_id} not found")));
    }
    Ok(())
}

/// Arm the auto-tag: new records get this tag while the validity window
/// (counted from now) lasts
pub async fn update_auto_tag(pool: &SqlitePool, user_id: Uuid, tag: &str) -> Result<()> {
    let done = sqlx::query(
        "UPDATE users SET auto_tag = ?, auto_tag_valid_from = ? WHERE user_id = ?",
    )
    .bind(tag)
    .bind(time::now())
    .bind(user_id.to_string())
    .execute(pool)
    .await?;

    if done.rows_affected() == 0 {
        return Err(Error::NotFound(format!("user {user_id} not found")));
    }
    Ok(())
}
