//! YAML front-matter extraction.
//!
//! Every article starts with a `---` fenced YAML block:
//!
//! ```text
//! ---
//! title: Hello
//! date: 2024-05-01
//! category: Essays          # optional, defaults to "Uncategorized"
//! translationId: hello      # optional, links translations across languages
//! ---
//! Markdown body...
//! ```
//!
//! `title` and `date` are required. Unknown keys are ignored so authors can
//! keep their own bookkeeping fields.

use crate::types::{ArticleMetadata, DATE_FORMAT, UNCATEGORIZED};
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("front-matter block is not closed by `---`")]
    Unterminated,
    #[error("YAML error: {0}")]
    Yaml(#[from] yaml_serde::Error),
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// A YAML scalar read as text. `translationId: 42` and `title: 1984` are
/// legitimate front-matter, so numbers and booleans are accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Str(s) => s,
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawFrontMatter {
    title: Option<Scalar>,
    date: Option<Scalar>,
    category: Option<Scalar>,
    #[serde(rename = "translationId")]
    translation_id: Option<Scalar>,
}

/// Validated front-matter fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
    pub date: String,
    pub category: String,
    pub translation_id: Option<String>,
}

impl FrontMatter {
    pub fn into_metadata(self, id: &str, lang: &str) -> ArticleMetadata {
        ArticleMetadata {
            id: id.to_string(),
            lang: lang.to_string(),
            title: self.title,
            date: self.date,
            category: self.category,
            translation_id: self.translation_id,
        }
    }
}

/// Split a document into its front-matter and Markdown body.
///
/// A document without a leading `---` line has empty front-matter (and so
/// fails on the missing `title`).
pub fn parse_document(source: &str) -> Result<(FrontMatter, &str), FrontMatterError> {
    let (yaml, body) = split_front_matter(source)?;
    let raw: RawFrontMatter = if yaml.trim().is_empty() {
        RawFrontMatter::default()
    } else {
        yaml_serde::from_str(yaml)?
    };
    Ok((validate(raw)?, body))
}

fn split_front_matter(source: &str) -> Result<(&str, &str), FrontMatterError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let Some(first_break) = source.find('\n') else {
        return Ok(("", source));
    };
    if source[..first_break].trim_end() != "---" {
        return Ok(("", source));
    }

    let rest = &source[first_break + 1..];
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((yaml, body));
        }
        offset += line.len();
    }
    Err(FrontMatterError::Unterminated)
}

fn validate(raw: RawFrontMatter) -> Result<FrontMatter, FrontMatterError> {
    let non_blank = |s: Option<Scalar>| {
        s.map(Scalar::into_text)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    };

    let title = non_blank(raw.title).ok_or(FrontMatterError::MissingField("title"))?;
    let date = non_blank(raw.date).ok_or(FrontMatterError::MissingField("date"))?;
    let date = normalize_date(&date)?;
    let category = non_blank(raw.category).unwrap_or_else(|| UNCATEGORIZED.to_string());
    let translation_id = non_blank(raw.translation_id);

    Ok(FrontMatter {
        title,
        date,
        category,
        translation_id,
    })
}

/// Accept `YYYY-MM-DD`, optionally followed by a time (`2024-05-01T10:00`),
/// and normalize to `YYYY-MM-DD`.
fn normalize_date(value: &str) -> Result<String, FrontMatterError> {
    let date_part = match value.char_indices().nth(10) {
        Some((idx, 'T' | ' ')) => &value[..idx],
        _ => value,
    };
    NaiveDate::parse_from_str(date_part, DATE_FORMAT)
        .map(|d| d.format(DATE_FORMAT).to_string())
        .map_err(|_| FrontMatterError::InvalidDate(value.to_string()))
}
