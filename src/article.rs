//! Loading one article for the article page.
//!
//! The body is read and rendered on every call; only the metadata index is
//! cached. Translation siblings come from the index.

use crate::frontmatter::{self, FrontMatterError};
use crate::index::{ArticleIndex, IndexError};
use crate::markdown;
use crate::translations::resolve_translations;
use crate::types::{ArticleContent, TranslationMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ArticleError {
    #[error("article {lang}/{slug} not found")]
    NotFound { lang: String, slug: String },
    #[error("invalid article metadata in {path}: {source}")]
    InvalidMetadata {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// `<articles_root>/<lang>/<slug>.md`, or `None` when the slug could escape
/// the language directory.
pub fn article_path(articles_root: &Path, lang: &str, slug: &str) -> Option<PathBuf> {
    if slug.is_empty()
        || slug.starts_with('.')
        || slug.contains(['/', '\\'])
        || slug.contains("..")
    {
        return None;
    }
    Some(articles_root.join(lang).join(format!("{slug}.md")))
}

/// Read, parse and render `<lang>/<slug>`.
pub fn load_article(
    index: &ArticleIndex,
    lang: &str,
    slug: &str,
) -> Result<ArticleContent, ArticleError> {
    let not_found = || ArticleError::NotFound {
        lang: lang.to_string(),
        slug: slug.to_string(),
    };
    let path = article_path(index.articles_root(), lang, slug).ok_or_else(not_found)?;

    let source = match fs::read_to_string(&path) {
        Ok(source) => source,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found()),
        Err(source) => return Err(ArticleError::Io { path, source }),
    };

    let (front_matter, body) = frontmatter::parse_document(&source)
        .map_err(|source| ArticleError::InvalidMetadata {
            path: path.clone(),
            source,
        })?;
    let metadata = front_matter.into_metadata(slug, lang);
    let rendered = markdown::render(body);

    let translations: TranslationMap = match metadata.translation_id.as_deref() {
        Some(group) => {
            let articles = index.articles()?;
            resolve_translations(&articles, Some(group), lang, slug)
        }
        None => resolve_translations(&[], None, lang, slug),
    };

    debug!(
        lang,
        slug,
        footnotes = rendered.footnotes.len(),
        translations = translations.len(),
        "article rendered"
    );

    Ok(ArticleContent {
        metadata,
        body: rendered.nodes,
        footnotes: rendered.footnotes,
        translations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::CachePolicy;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn index_for(root: &Path) -> ArticleIndex {
        ArticleIndex::new(
            root.to_path_buf(),
            vec!["en".to_string(), "zh".to_string(), "ja".to_string()],
            CachePolicy::Forever,
        )
    }

    #[test]
    fn loads_metadata_and_body() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("articles");
        write_article(&root, "en", "hello", "Hello", "2024-01-01", Some("Essays"), None);

        let article = load_article(&index_for(&root), "en", "hello").unwrap();
        assert_eq!(article.metadata.id, "hello");
        assert_eq!(article.metadata.lang, "en");
        assert_eq!(article.metadata.category, "Essays");
        assert_eq!(markdown::plain_text(&article.body), "Body of Hello.");
    }

    #[test]
    fn untranslated_article_maps_to_itself() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("articles");
        write_article(&root, "en", "solo", "Solo", "2024-01-01", None, None);

        let index = index_for(&root);
        let article = load_article(&index, "en", "solo").unwrap();
        assert_eq!(article.translations.len(), 1);
        assert_eq!(article.translations.get("en").map(String::as_str), Some("solo"));
        assert!(!index.is_cached(), "index should not be built for untranslated articles");
    }

    #[test]
    fn translations_resolved_through_index() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("articles");
        write_article(&root, "en", "hello", "Hello", "2024-01-01", None, Some("greeting"));
        write_article(&root, "zh", "ni-hao", "你好", "2024-01-01", None, Some("greeting"));

        let article = load_article(&index_for(&root), "en", "hello").unwrap();
        assert_eq!(article.translations.get("zh").map(String::as_str), Some("ni-hao"));
        assert!(article.translations.get("ja").is_none());
    }

    #[test]
    fn missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("articles");
        let result = load_article(&index_for(&root), "en", "nope");
        assert!(matches!(result, Err(ArticleError::NotFound { .. })));
    }

    #[test]
    fn traversal_slugs_are_not_found() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("articles");
        write_article(&root, "en", "hello", "Hello", "2024-01-01", None, None);
        let index = index_for(&root);

        for slug in ["../en/hello", "..", "a/b", "a\\b", ".hidden", ""] {
            assert!(
                matches!(load_article(&index, "en", slug), Err(ArticleError::NotFound { .. })),
                "slug {slug:?} should be rejected"
            );
        }
    }

    #[test]
    fn invalid_front_matter_fails_only_this_request() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("articles");
        write_article(&root, "en", "good", "Good", "2024-01-01", None, None);
        fs::write(root.join("en/bad.md"), "---\ntitle: No date\n---\nBody\n").unwrap();

        let index = index_for(&root);
        let err = load_article(&index, "en", "bad").unwrap_err();
        assert!(matches!(
            err,
            ArticleError::InvalidMetadata {
                source: FrontMatterError::MissingField("date"),
                ..
            }
        ));
        assert!(err.to_string().contains("invalid article metadata"));
        assert!(load_article(&index, "en", "good").is_ok());
    }

    #[test]
    fn footnotes_carried_into_content() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("articles");
        fs::create_dir_all(root.join("en")).unwrap();
        fs::write(
            root.join("en/noted.md"),
            "---\ntitle: Noted\ndate: 2024-01-01\n---\nClaim[^1].\n\n[^1]: Source.\n",
        )
        .unwrap();

        let article = load_article(&index_for(&root), "en", "noted").unwrap();
        assert_eq!(article.footnotes.get("1").map(|f| f.text.as_str()), Some("Source."));
    }
}
