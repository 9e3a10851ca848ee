//! Bulk import parsers
//!
//! Both formats parse fully into a list of dated ingestion items before
//! any record is touched, so a malformed payload fails the import without
//! producing anything.

pub mod chat_history;
pub mod delimited;

use chrono::NaiveDate;

/// Caller-supplied import parameters.
///
/// Column indices address comma-separated cells directly; an index of 0 or
/// below for the type column means "auto-classify the content cell", and
/// for the date column "use the assumed date".
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Whether merging an existing key bumps its score
    pub add_score: bool,
    pub content_column: i32,
    pub record_type_column: i32,
    pub date_column: i32,
    /// Date applied when no date column is configured; defaults to today
    pub assumed_date: Option<NaiveDate>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            add_score: true,
            content_column: 1,
            record_type_column: 0,
            date_column: 0,
            assumed_date: None,
        }
    }
}
