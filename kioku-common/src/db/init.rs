//! Database initialization
//!
//! Creates the SQLite database on first run and brings the schema up
//! idempotently (`CREATE TABLE IF NOT EXISTS`). The unique index on
//! `records(user_id, content, record_type)` is the constraint the merge
//! engine leans on against concurrent duplicate inserts.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use sqlite options to create database if it doesn't exist
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys (needed for the record_hits / record_tags cascades)
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL mode allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    // Idempotent schema creation
    create_users_table(&pool).await?;
    create_records_table(&pool).await?;
    create_record_hits_table(&pool).await?;
    create_tags_table(&pool).await?;
    create_record_tags_table(&pool).await?;

    Ok(pool)
}

/// Create the users table
async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            user_id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            default_record_type INTEGER NOT NULL DEFAULT 4,
            auto_tag TEXT,
            auto_tag_valid_from TIMESTAMP,
            auto_tag_validity_minutes INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the records table with the merge-key uniqueness constraint
async fn create_records_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS records (
            record_id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
            content TEXT NOT NULL,
            record_type INTEGER NOT NULL,
            score INTEGER NOT NULL DEFAULT 1,
            ignored INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL,
            CHECK (record_type >= 0 AND record_type <= 3),
            CHECK (updated_at >= created_at)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_records_merge_key \
         ON records(user_id, content, record_type)",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_records_user_updated \
         ON records(user_id, updated_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the append-only record_hits audit table
async fn create_record_hits_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS record_hits (
            record_hit_id INTEGER PRIMARY KEY AUTOINCREMENT,
            record_id INTEGER NOT NULL REFERENCES records(record_id) ON DELETE CASCADE,
            created_at TIMESTAMP NOT NULL,
            hit_score INTEGER NOT NULL,
            ignored INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_record_hits_record ON record_hits(record_id)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the tags table
async fn create_tags_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tags (
            tag_id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_tags_user_name ON tags(user_id, name)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the record/tag link table
async fn create_record_tags_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS record_tags (
            record_id INTEGER NOT NULL REFERENCES records(record_id) ON DELETE CASCADE,
            tag_id INTEGER NOT NULL REFERENCES tags(tag_id) ON DELETE CASCADE,
            PRIMARY KEY (record_id, tag_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
