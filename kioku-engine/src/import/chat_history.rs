//! Chat-history export import
//!
//! The export is a JSON document with an array of dated messages. A
//! message text is either a plain string or an array of runs; a run is a
//! plain string or an entity object. Only link entities pointing at the
//! recognized vocabulary site contribute their visible text; every other
//! entity kind is skipped.

use crate::extract;
use crate::pipeline::IngestItem;
use chrono::{DateTime, NaiveDateTime, Utc};
use kioku_common::{Error, Result};
use serde::Deserialize;

/// Link targets must contain this domain to be accepted
const LINK_DOMAIN: &str = "wanikani.com";

/// Fixed message date pattern, interpreted as UTC
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Deserialize)]
struct HistoryDocument {
    messages: Vec<HistoryMessage>,
}

#[derive(Debug, Deserialize)]
struct HistoryMessage {
    date: String,
    text: MessageText,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MessageText {
    Plain(String),
    Runs(Vec<TextRun>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextRun {
    Plain(String),
    Entity(TextEntity),
}

#[derive(Debug, Deserialize)]
struct TextEntity {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    href: Option<String>,
}

/// Parse a chat-history export into dated ingestion items.
///
/// Fails before producing anything if the document shape or any message
/// date is malformed.
pub fn parse(payload: &[u8]) -> Result<Vec<IngestItem>> {
    let document: HistoryDocument = serde_json::from_slice(payload)
        .map_err(|e| Error::InvalidInput(format!("malformed chat history export: {e}")))?;

    let mut items = Vec::new();
    for message in &document.messages {
        let date = parse_message_date(&message.date)?;
        match &message.text {
            MessageText::Plain(text) => extract_into(&mut items, date, text),
            MessageText::Runs(runs) => {
                for run in runs {
                    match run {
                        TextRun::Plain(text) => extract_into(&mut items, date, text),
                        TextRun::Entity(entity) => {
                            if entity.kind == "link" && is_recognized_link(entity.href.as_deref()) {
                                extract_into(&mut items, date, &entity.text);
                            }
                        }
                    }
                }
            }
        }
    }

    Ok(items)
}

fn parse_message_date(raw: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| Error::InvalidInput(format!("invalid message date '{raw}': {e}")))
}

fn is_recognized_link(href: Option<&str>) -> bool {
    href.map(|h| h.to_lowercase().contains(LINK_DOMAIN))
        .unwrap_or(false)
}

fn extract_into(items: &mut Vec<IngestItem>, date: DateTime<Utc>, text: &str) {
    for extracted in extract::extract(text) {
        items.push(IngestItem {
            date,
            content: extracted.content,
            record_type: extracted.record_type,
        });
    }
}
