//! Domain enums and their command alias tables
//!
//! Short command strings ("k", "vocab", "rw", ...) resolve to enum variants
//! through static tables built once at first use. Table construction panics
//! on a duplicate alias, which is a programming error, not user input.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Classification of a logged piece of text.
///
/// `Any` is a filter wildcard only and is never stored on a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    Kanji,
    Vocabulary,
    Grammar,
    Sentence,
    Any,
}

impl RecordType {
    /// Integer storage code. Ordinal order is also the `Type` sort order.
    pub fn code(self) -> i64 {
        match self {
            RecordType::Kanji => 0,
            RecordType::Vocabulary => 1,
            RecordType::Grammar => 2,
            RecordType::Sentence => 3,
            RecordType::Any => 4,
        }
    }

    /// Decode a storage code. `Any` (4) is accepted here because filters
    /// round-trip through the same codes; the record services reject it.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(RecordType::Kanji),
            1 => Some(RecordType::Vocabulary),
            2 => Some(RecordType::Grammar),
            3 => Some(RecordType::Sentence),
            4 => Some(RecordType::Any),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::Kanji => "kanji",
            RecordType::Vocabulary => "vocabulary",
            RecordType::Grammar => "grammar",
            RecordType::Sentence => "sentence",
            RecordType::Any => "any",
        }
    }

    /// Case-insensitive alias lookup
    pub fn from_alias(alias: &str) -> Option<Self> {
        RECORD_TYPE_ALIASES.get(alias.to_ascii_lowercase().as_str()).copied()
    }

    /// Alias lookup with a fallback default for unrecognized input
    pub fn from_alias_or(alias: &str, default: Self) -> Self {
        Self::from_alias(alias).unwrap_or(default)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single-key sort field for record queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordSortField {
    /// No explicit ordering; storage-defined order
    Default,
    Content,
    Type,
    Created,
    Updated,
    Score,
    /// Number of audit hits on the record
    Hits,
    /// Number of tags on the record
    Tags,
}

impl RecordSortField {
    pub fn from_alias(alias: &str) -> Option<Self> {
        SORT_FIELD_ALIASES.get(alias.to_ascii_lowercase().as_str()).copied()
    }

    pub fn from_alias_or(alias: &str, default: Self) -> Self {
        Self::from_alias(alias).unwrap_or(default)
    }
}

/// How a date filter specification maps onto a concrete UTC window.
///
/// An offset of 0 means "the current period"; larger offsets move further
/// into the past.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateFilterType {
    Absolute,
    RelativeDay,
    RelativeFullWeek,
    RelativeRollingWeek,
    RelativeFullMonth,
    RelativeRollingMonth,
    RelativeFullYear,
    RelativeRollingYear,
}

impl DateFilterType {
    pub fn from_alias(alias: &str) -> Option<Self> {
        DATE_FILTER_ALIASES.get(alias.to_ascii_lowercase().as_str()).copied()
    }

    pub fn from_alias_or(alias: &str, default: Self) -> Self {
        Self::from_alias(alias).unwrap_or(default)
    }
}

/// Recognized bulk import formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImportFormat {
    /// Chat history export document (JSON with dated messages)
    ChatHistory,
    /// Comma-delimited file with caller-supplied column indices
    Delimited,
}

impl ImportFormat {
    pub fn from_alias(alias: &str) -> Option<Self> {
        IMPORT_FORMAT_ALIASES.get(alias.to_ascii_lowercase().as_str()).copied()
    }
}

/// Build an alias table, panicking on duplicates
fn alias_table<T: Copy>(entries: &[(&'static str, T)]) -> HashMap<&'static str, T> {
    let mut table = HashMap::with_capacity(entries.len());
    for &(alias, value) in entries {
        let previous = table.insert(alias, value);
        assert!(previous.is_none(), "duplicate alias: {alias}");
    }
    table
}

static RECORD_TYPE_ALIASES: Lazy<HashMap<&'static str, RecordType>> = Lazy::new(|| {
    alias_table(&[
        ("kanji", RecordType::Kanji),
        ("k", RecordType::Kanji),
        ("vocabulary", RecordType::Vocabulary),
        ("vocab", RecordType::Vocabulary),
        ("word", RecordType::Vocabulary),
        ("v", RecordType::Vocabulary),
        ("w", RecordType::Vocabulary),
        ("grammar", RecordType::Grammar),
        ("g", RecordType::Grammar),
        ("sentence", RecordType::Sentence),
        ("s", RecordType::Sentence),
        ("any", RecordType::Any),
    ])
});

static SORT_FIELD_ALIASES: Lazy<HashMap<&'static str, RecordSortField>> = Lazy::new(|| {
    alias_table(&[
        ("default", RecordSortField::Default),
        ("content", RecordSortField::Content),
        ("c", RecordSortField::Content),
        ("type", RecordSortField::Type),
        ("kind", RecordSortField::Type),
        ("k", RecordSortField::Type),
        ("created", RecordSortField::Created),
        ("cr", RecordSortField::Created),
        ("updated", RecordSortField::Updated),
        ("u", RecordSortField::Updated),
        ("score", RecordSortField::Score),
        ("s", RecordSortField::Score),
        ("hits", RecordSortField::Hits),
        ("h", RecordSortField::Hits),
        ("tags", RecordSortField::Tags),
        ("t", RecordSortField::Tags),
    ])
});

static DATE_FILTER_ALIASES: Lazy<HashMap<&'static str, DateFilterType>> = Lazy::new(|| {
    alias_table(&[
        ("absolute", DateFilterType::Absolute),
        ("abs", DateFilterType::Absolute),
        ("relativeday", DateFilterType::RelativeDay),
        ("day", DateFilterType::RelativeDay),
        ("d", DateFilterType::RelativeDay),
        ("relativefullweek", DateFilterType::RelativeFullWeek),
        ("week", DateFilterType::RelativeFullWeek),
        ("fullweek", DateFilterType::RelativeFullWeek),
        ("w", DateFilterType::RelativeFullWeek),
        ("fw", DateFilterType::RelativeFullWeek),
        ("relativerollingweek", DateFilterType::RelativeRollingWeek),
        ("rollingweek", DateFilterType::RelativeRollingWeek),
        ("rw", DateFilterType::RelativeRollingWeek),
        ("relativefullmonth", DateFilterType::RelativeFullMonth),
        ("month", DateFilterType::RelativeFullMonth),
        ("fullmonth", DateFilterType::RelativeFullMonth),
        ("m", DateFilterType::RelativeFullMonth),
        ("fm", DateFilterType::RelativeFullMonth),
        ("relativerollingmonth", DateFilterType::RelativeRollingMonth),
        ("rollingmonth", DateFilterType::RelativeRollingMonth),
        ("rm", DateFilterType::RelativeRollingMonth),
        ("relativefullyear", DateFilterType::RelativeFullYear),
        ("year", DateFilterType::RelativeFullYear),
        ("fullyear", DateFilterType::RelativeFullYear),
        ("y", DateFilterType::RelativeFullYear),
        ("fy", DateFilterType::RelativeFullYear),
        ("relativerollingyear", DateFilterType::RelativeRollingYear),
        ("rollingyear", DateFilterType::RelativeRollingYear),
        ("ry", DateFilterType::RelativeRollingYear),
    ])
});

static IMPORT_FORMAT_ALIASES: Lazy<HashMap<&'static str, ImportFormat>> = Lazy::new(|| {
    alias_table(&[
        ("tg", ImportFormat::ChatHistory),
        ("chathistory", ImportFormat::ChatHistory),
        ("csv", ImportFormat::Delimited),
        ("delimited", ImportFormat::Delimited),
    ])
});
