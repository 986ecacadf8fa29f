//! Shared types passed between the index, the pipeline and the page templates.
//!
//! Everything here is derived read-only from the content store; templates
//! never mutate it.

use crate::markdown::Node;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Category assigned to articles whose front-matter has none.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Date format used in front-matter and on every page.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Metadata for one article, read from its front-matter.
///
/// `id` is the file name without `.md`; it doubles as the URL slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleMetadata {
    pub id: String,
    pub lang: String,
    pub title: String,
    /// Normalized `YYYY-MM-DD`.
    pub date: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation_id: Option<String>,
}

impl ArticleMetadata {
    /// Calendar date used for ordering. Dates are validated when the
    /// front-matter is parsed, so this only fails for hand-built values.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }
}

/// Language code → sibling article id for one translation group.
pub type TranslationMap = BTreeMap<String, String>;

/// A full article ready for the article page.
#[derive(Debug, Clone)]
pub struct ArticleContent {
    pub metadata: ArticleMetadata,
    pub body: Vec<Node>,
    pub footnotes: FootnoteTable,
    pub translations: TranslationMap,
}

/// Body of one footnote definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footnote {
    /// Plain text, whitespace-collapsed.
    pub text: String,
    /// Rendered HTML fragment shown inside the tooltip.
    pub html: String,
}

/// Footnote identifier → body, built fresh for every article render.
///
/// Identifiers are case-insensitive: they are lower-cased on insert and on
/// lookup, so `[^Note]` and `[^note]` refer to the same definition. A later
/// definition with the same identifier silently replaces an earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FootnoteTable {
    entries: BTreeMap<String, Footnote>,
}

impl FootnoteTable {
    pub fn normalize_id(id: &str) -> String {
        id.trim().to_lowercase()
    }

    pub fn insert(&mut self, id: &str, footnote: Footnote) {
        self.entries.insert(Self::normalize_id(id), footnote);
    }

    pub fn get(&self, id: &str) -> Option<&Footnote> {
        self.entries.get(&Self::normalize_id(id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Footnote)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Per-category summary for the home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStat {
    pub name: String,
    pub article_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(text: &str) -> Footnote {
        Footnote {
            text: text.to_string(),
            html: text.to_string(),
        }
    }

    #[test]
    fn footnote_lookup_is_case_insensitive() {
        let mut table = FootnoteTable::default();
        table.insert("Note", note("body"));
        assert_eq!(table.get("note").map(|f| f.text.as_str()), Some("body"));
        assert_eq!(table.get("NOTE").map(|f| f.text.as_str()), Some("body"));
    }

    #[test]
    fn footnote_last_write_wins() {
        let mut table = FootnoteTable::default();
        table.insert("1", note("first"));
        table.insert("1", note("second"));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("1").unwrap().text, "second");
    }

    #[test]
    fn footnote_missing_is_none() {
        let table = FootnoteTable::default();
        assert!(table.is_empty());
        assert!(table.get("1").is_none());
    }

    #[test]
    fn parsed_date_valid_and_invalid() {
        let mut meta = ArticleMetadata {
            id: "a".to_string(),
            lang: "en".to_string(),
            title: "A".to_string(),
            date: "2024-03-09".to_string(),
            category: UNCATEGORIZED.to_string(),
            translation_id: None,
        };
        assert_eq!(meta.parsed_date(), NaiveDate::from_ymd_opt(2024, 3, 9));
        meta.date = "yesterday".to_string();
        assert_eq!(meta.parsed_date(), None);
    }
}
