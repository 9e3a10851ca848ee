//! Batch ingestion pipeline
//!
//! Executes an ordered sequence of merges inside one transaction. There is
//! no partial-commit state: the first per-item error (or an observed
//! cancellation) rolls back every merge performed so far, including records
//! that would otherwise have been newly created.

use crate::db::users;
use crate::extract;
use crate::import::{self, ImportOptions};
use crate::merge::{self, MergeOutcome};
use chrono::{DateTime, Utc};
use kioku_common::db::Record;
use kioku_common::{time, Error, ImportFormat, RecordType, Result};
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// One dated ingestion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestItem {
    pub date: DateTime<Utc>,
    pub content: String,
    pub record_type: RecordType,
}

/// Disjoint sets of records created and updated by a committed batch.
/// Unchanged merges are not reported.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub created: Vec<Record>,
    pub updated: Vec<Record>,
}

/// Ingestion pipeline over one database pool.
///
/// Holds exactly one open transaction per `run`; running two pipelines
/// concurrently for the same user relies on the storage uniqueness
/// constraint to reject the losing duplicate insert.
pub struct IngestionPipeline {
    db: SqlitePool,
}

impl IngestionPipeline {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Merge `items` in order inside a single transaction.
    ///
    /// The cancellation token is observed between items; cancellation is
    /// treated like a fatal per-item error (full rollback).
    pub async fn run(
        &self,
        user_id: Uuid,
        items: Vec<IngestItem>,
        add_score: bool,
        append_hit: bool,
        cancel: &CancellationToken,
    ) -> Result<IngestReport> {
        let user = users::find_by_id(&self.db, user_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("user {user_id} not found")))?;

        let mut tx = self.db.begin().await?;
        let mut report = IngestReport::default();

        for item in &items {
            if cancel.is_cancelled() {
                tracing::warn!(user = %user.username, "ingestion cancelled, rolling back batch");
                tx.rollback().await?;
                return Err(Error::Cancelled);
            }

            let outcome = merge::merge_record(
                &mut tx,
                user.user_id,
                &item.content,
                item.record_type,
                item.date,
                add_score,
                append_hit,
            )
            .await;

            match outcome {
                Ok(MergeOutcome::Created(record)) => report.created.push(record),
                Ok(MergeOutcome::Updated(record)) => report.updated.push(record),
                Ok(MergeOutcome::Unchanged(_)) => {}
                Err(e) => {
                    tracing::error!(
                        content = %item.content,
                        record_type = %item.record_type,
                        error = %e,
                        "failed to merge record, rolling back batch"
                    );
                    tx.rollback().await?;
                    return Err(e);
                }
            }
        }

        tx.commit().await?;
        tracing::info!(
            user = %user.username,
            created = report.created.len(),
            updated = report.updated.len(),
            "batch committed"
        );
        Ok(report)
    }

    /// Ingest a single free-form message: extract, then merge with score
    /// accumulation, stamped now. No audit hits.
    pub async fn ingest_message(
        &self,
        user_id: Uuid,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<IngestReport> {
        let now = time::now();
        let items = extract::extract(text)
            .into_iter()
            .map(|e| IngestItem {
                date: now,
                content: e.content,
                record_type: e.record_type,
            })
            .collect();

        self.run(user_id, items, true, false, cancel).await
    }

    /// Ingest a bulk history file. Parsing is all-or-nothing and happens
    /// before the transaction opens; hits are never created during import.
    pub async fn import(
        &self,
        user_id: Uuid,
        format: ImportFormat,
        payload: &[u8],
        options: &ImportOptions,
        cancel: &CancellationToken,
    ) -> Result<IngestReport> {
        let items = match format {
            ImportFormat::ChatHistory => import::chat_history::parse(payload)?,
            ImportFormat::Delimited => import::delimited::parse(payload, options)?,
        };

        tracing::info!(format = ?format, items = items.len(), "parsed import payload");
        self.run(user_id, items, options.add_score, false, cancel).await
    }
}
