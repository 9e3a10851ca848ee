//! Tests for database initialization and the schema constraints the
//! ingestion engine relies on.

use kioku_common::db::init_database;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("kioku.db");

    let result = init_database(&db_path).await;
    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("kioku.db");

    let pool1 = init_database(&db_path).await;
    assert!(pool1.is_ok());
    drop(pool1);

    // Open database second time (should succeed)
    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());
}

#[tokio::test]
async fn test_merge_key_uniqueness_enforced() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("kioku.db")).await.unwrap();

    sqlx::query(
        "INSERT INTO users (user_id, username, created_at) VALUES (?, ?, ?)",
    )
    .bind("00000000-0000-0000-0000-000000000001")
    .bind("tester")
    .bind(chrono::Utc::now())
    .execute(&pool)
    .await
    .unwrap();

    let insert = "INSERT INTO records (user_id, content, record_type, score, ignored, created_at, updated_at) \
                  VALUES (?, ?, ?, 1, 0, ?, ?)";
    let now = chrono::Utc::now();
    sqlx::query(insert)
        .bind("00000000-0000-0000-0000-000000000001")
        .bind("猫")
        .bind(0i64)
        .bind(now)
        .bind(now)
        .execute(&pool)
        .await
        .unwrap();

    // Same (user, content, type) again must be rejected by the unique index
    let duplicate = sqlx::query(insert)
        .bind("00000000-0000-0000-0000-000000000001")
        .bind("猫")
        .bind(0i64)
        .bind(now)
        .bind(now)
        .execute(&pool)
        .await;

    match duplicate {
        Err(sqlx::Error::Database(db_err)) => assert!(db_err.is_unique_violation()),
        other => panic!("expected unique violation, got {other:?}"),
    }

    // A different type for the same content is a different merge key
    sqlx::query(insert)
        .bind("00000000-0000-0000-0000-000000000001")
        .bind("猫")
        .bind(1i64)
        .bind(now)
        .bind(now)
        .execute(&pool)
        .await
        .unwrap();
}
