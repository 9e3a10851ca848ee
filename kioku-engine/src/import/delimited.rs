//! Delimited-file import
//!
//! Lines are split on commas with no quoting or escaping support; a
//! literal comma inside a field is not supported. Rows become one item
//! with the configured type, or several auto-classified items when no
//! type column is configured (or the cell resolves to the Any wildcard).

use crate::extract;
use crate::import::ImportOptions;
use crate::pipeline::IngestItem;
use chrono::NaiveDate;
use kioku_common::{time, Error, RecordType, Result};

/// Per-row date pattern
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a delimited payload into dated ingestion items.
///
/// A blank content cell skips the line (blank lines are skipped the same
/// way); a positive column index pointing past the end of a row is a
/// validation error.
pub fn parse(payload: &[u8], options: &ImportOptions) -> Result<Vec<IngestItem>> {
    let text = std::str::from_utf8(payload)
        .map_err(|e| Error::InvalidInput(format!("delimited import is not valid UTF-8: {e}")))?;

    if options.content_column < 0 {
        return Err(Error::InvalidInput(format!(
            "content column index {} is negative",
            options.content_column
        )));
    }

    let assumed_date = options.assumed_date.unwrap_or_else(|| time::now().date_naive());

    let mut items = Vec::new();
    for (line_index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let cells: Vec<&str> = line.split(',').collect();

        let content = cell(&cells, options.content_column, line_index, "content")?;
        if content.trim().is_empty() {
            continue;
        }

        let date = if options.date_column > 0 {
            parse_row_date(cell(&cells, options.date_column, line_index, "date")?, line_index)?
        } else {
            assumed_date
        };
        let date = time::start_of_day(date);

        let record_type = if options.record_type_column > 0 {
            let raw = cell(&cells, options.record_type_column, line_index, "type")?;
            RecordType::from_alias_or(raw.trim(), RecordType::Any)
        } else {
            RecordType::Any
        };

        if record_type == RecordType::Any {
            for extracted in extract::extract(content) {
                items.push(IngestItem {
                    date,
                    content: extracted.content,
                    record_type: extracted.record_type,
                });
            }
        } else {
            items.push(IngestItem {
                date,
                content: content.to_string(),
                record_type,
            });
        }
    }

    Ok(items)
}

fn cell<'a>(cells: &[&'a str], index: i32, line_index: usize, what: &str) -> Result<&'a str> {
    cells.get(index as usize).copied().ok_or_else(|| {
        Error::InvalidInput(format!(
            "line {}: {what} column {index} out of range ({} columns)",
            line_index + 1,
            cells.len()
        ))
    })
}

fn parse_row_date(raw: &str, line_index: usize) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|e| {
        Error::InvalidInput(format!("line {}: invalid date '{raw}': {e}", line_index + 1))
    })
}
