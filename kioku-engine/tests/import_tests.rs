//! Import parser behavior for both supported formats, plus end-to-end
//! imports through the batch pipeline.

use chrono::{NaiveDate, TimeZone, Utc};
use kioku_common::db::{init_database, User};
use kioku_common::time::start_of_day;
use kioku_common::{Error, ImportFormat, RecordType};
use kioku_engine::db::users;
use kioku_engine::import::{chat_history, delimited, ImportOptions};
use kioku_engine::IngestionPipeline;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

async fn setup() -> (TempDir, SqlitePool, User) {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("kioku.db")).await.unwrap();
    let user = users::create(&pool, "tester").await.unwrap();
    (dir, pool, user)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const HISTORY_EXPORT: &str = r#"{
  "messages": [
    { "date": "2023-01-05T10:00:00", "text": "猫 cat" },
    { "date": "2023-01-06T11:30:00", "text": [
        "食べる ",
        { "type": "link", "text": "犬", "href": "https://www.WaniKani.com/vocabulary/犬" },
        { "type": "bold", "text": "魚" },
        { "type": "link", "text": "鳥", "href": "https://example.com/鳥" }
    ] }
  ]
}"#;

#[test]
fn test_chat_history_parsing() {
    let items = chat_history::parse(HISTORY_EXPORT.as_bytes()).unwrap();

    let contents: Vec<(&str, RecordType)> = items
        .iter()
        .map(|i| (i.content.as_str(), i.record_type))
        .collect();
    // "cat" dropped; bold run and foreign link skipped; recognized link kept
    assert_eq!(
        contents,
        vec![
            ("猫", RecordType::Kanji),
            ("食べる", RecordType::Vocabulary),
            ("食", RecordType::Kanji),
            ("犬", RecordType::Kanji),
        ]
    );

    assert_eq!(items[0].date, Utc.with_ymd_and_hms(2023, 1, 5, 10, 0, 0).unwrap());
    assert_eq!(items[1].date, Utc.with_ymd_and_hms(2023, 1, 6, 11, 30, 0).unwrap());
}

#[test]
fn test_chat_history_malformed_document_fails() {
    assert!(matches!(
        chat_history::parse(b"{ not json"),
        Err(Error::InvalidInput(_))
    ));
    // A message without text is malformed
    assert!(matches!(
        chat_history::parse(br#"{ "messages": [ { "date": "2023-01-05T10:00:00" } ] }"#),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn test_chat_history_bad_date_fails_whole_import() {
    let payload = r#"{ "messages": [
        { "date": "2023-01-05T10:00:00", "text": "猫" },
        { "date": "05/01/2023", "text": "犬" }
    ] }"#;
    assert!(matches!(
        chat_history::parse(payload.as_bytes()),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn test_delimited_with_explicit_columns() {
    let payload = "食べる,v,2023-01-05\n猫,k,2023-01-06\n,v,2023-01-07\n";
    let options = ImportOptions {
        content_column: 0,
        record_type_column: 1,
        date_column: 2,
        ..ImportOptions::default()
    };

    let items = delimited::parse(payload.as_bytes(), &options).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].content, "食べる");
    assert_eq!(items[0].record_type, RecordType::Vocabulary);
    assert_eq!(items[0].date, start_of_day(date(2023, 1, 5)));
    assert_eq!(items[1].content, "猫");
    assert_eq!(items[1].record_type, RecordType::Kanji);
}

#[test]
fn test_delimited_auto_classifies_without_type_column() {
    let payload = "食べる\ncat\n";
    let options = ImportOptions {
        content_column: 0,
        assumed_date: Some(date(2023, 1, 5)),
        ..ImportOptions::default()
    };

    let items = delimited::parse(payload.as_bytes(), &options).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].content, "食べる");
    assert_eq!(items[0].record_type, RecordType::Vocabulary);
    assert_eq!(items[1].content, "食");
    assert_eq!(items[1].record_type, RecordType::Kanji);
    assert!(items.iter().all(|i| i.date == start_of_day(date(2023, 1, 5))));
}

#[test]
fn test_delimited_unknown_type_alias_falls_back_to_classification() {
    let payload = "猫,zzz\n";
    let options = ImportOptions {
        content_column: 0,
        record_type_column: 1,
        assumed_date: Some(date(2023, 1, 5)),
        ..ImportOptions::default()
    };

    let items = delimited::parse(payload.as_bytes(), &options).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].record_type, RecordType::Kanji);
}

#[test]
fn test_delimited_out_of_range_column_is_invalid() {
    let options = ImportOptions {
        content_column: 5,
        ..ImportOptions::default()
    };
    assert!(matches!(
        delimited::parse("猫,k\n".as_bytes(), &options),
        Err(Error::InvalidInput(_))
    ));

    let options = ImportOptions {
        content_column: 0,
        date_column: 9,
        ..ImportOptions::default()
    };
    assert!(matches!(
        delimited::parse("猫\n".as_bytes(), &options),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn test_delimited_bad_row_date_is_invalid() {
    let options = ImportOptions {
        content_column: 0,
        date_column: 1,
        ..ImportOptions::default()
    };
    assert!(matches!(
        delimited::parse("猫,garbage\n".as_bytes(), &options),
        Err(Error::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_end_to_end_chat_history_import() {
    let (_dir, pool, user) = setup().await;
    let pipeline = IngestionPipeline::new(pool.clone());

    let report = pipeline
        .import(
            user.user_id,
            ImportFormat::ChatHistory,
            HISTORY_EXPORT.as_bytes(),
            &ImportOptions::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(report.created.len(), 4);
    let cat = report.created.iter().find(|r| r.content == "猫").unwrap();
    assert_eq!(cat.created_at, Utc.with_ymd_and_hms(2023, 1, 5, 10, 0, 0).unwrap());
}

#[tokio::test]
async fn test_reimport_without_score_leaves_records_untouched() {
    let (_dir, pool, user) = setup().await;
    let pipeline = IngestionPipeline::new(pool.clone());
    let cancel = CancellationToken::new();

    pipeline
        .import(
            user.user_id,
            ImportFormat::ChatHistory,
            HISTORY_EXPORT.as_bytes(),
            &ImportOptions::default(),
            &cancel,
        )
        .await
        .unwrap();

    let options = ImportOptions {
        add_score: false,
        ..ImportOptions::default()
    };
    let report = pipeline
        .import(
            user.user_id,
            ImportFormat::ChatHistory,
            HISTORY_EXPORT.as_bytes(),
            &options,
            &cancel,
        )
        .await
        .unwrap();

    assert!(report.created.is_empty());
    assert!(report.updated.is_empty());
}
