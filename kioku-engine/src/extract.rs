//! Text extraction and classification
//!
//! Pure and stateless: a text message becomes an order-preserving list of
//! (content, type) pairs. A token is kept only if every character is
//! Japanese; partial extraction from mixed tokens is not performed.
//! Duplicate pairs across tokens are expected and resolved downstream by
//! the merge key.

use kioku_common::RecordType;

/// One extracted content/type pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub content: String,
    pub record_type: RecordType,
}

/// Hiragana, Katakana, or Kanji
pub fn is_japanese_char(c: char) -> bool {
    // Hiragana 3040-309F, Katakana 30A0-30FF
    matches!(c, '\u{3040}'..='\u{30FF}') || is_kanji(c)
}

/// CJK Unified Ideographs (incl. extension A and compatibility block)
pub fn is_kanji(c: char) -> bool {
    // 3400-4DBF, 4E00-9FFF, F900-FAFF
    matches!(c, '\u{3400}'..='\u{4DBF}' | '\u{4E00}'..='\u{9FFF}' | '\u{F900}'..='\u{FAFF}')
}

/// Classify whitespace-delimited tokens.
///
/// A single-kanji token yields (token, Kanji); any other surviving token
/// yields (token, Vocabulary) plus one (char, Kanji) pair per contained
/// kanji character.
pub fn extract(text: &str) -> Vec<Extracted> {
    let mut records = Vec::new();
    for token in text.split_whitespace() {
        if token.chars().any(|c| !is_japanese_char(c)) {
            continue;
        }

        let mut chars = token.chars();
        let first = match chars.next() {
            Some(c) => c,
            None => continue,
        };

        if chars.next().is_none() && is_kanji(first) {
            records.push(Extracted {
                content: token.to_string(),
                record_type: RecordType::Kanji,
            });
        } else {
            records.push(Extracted {
                content: token.to_string(),
                record_type: RecordType::Vocabulary,
            });
            for kanji in token.chars().filter(|&c| is_kanji(c)) {
                records.push(Extracted {
                    content: kanji.to_string(),
                    record_type: RecordType::Kanji,
                });
            }
        }
    }
    records
}
