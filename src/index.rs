//! Article index: front-matter of every article, across all languages.
//!
//! The content store is laid out one directory per language:
//!
//! ```text
//! articles/
//! ├── en/
//! │   ├── hello-world.md
//! │   └── on-reading.md
//! ├── zh/
//! │   └── hello-world.md
//! └── ja/                  # missing language directories are fine
//! ```
//!
//! [`scan_articles`] walks it once and returns a flat list of
//! [`ArticleMetadata`]. [`ArticleIndex`] caches that list for the lifetime of
//! the process under an explicit [`CachePolicy`]: load once and keep
//! ([`CachePolicy::Forever`]), or rebuild when the snapshot is older than a
//! fixed interval ([`CachePolicy::Refresh`]). [`ArticleIndex::invalidate`]
//! forces the next read to rebuild.
//!
//! Only metadata is cached. Article bodies are read and parsed per request.
//!
//! ## Ordering
//!
//! Files are visited in file-name order within each language directory, and
//! languages in config order. Everything downstream that says "scan order"
//! means this order.

use crate::frontmatter::{self, FrontMatterError};
use crate::types::ArticleMetadata;
use arc_swap::ArcSwapOption;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// An article file that was skipped because its front-matter is invalid.
#[derive(Debug)]
pub struct RejectedArticle {
    pub path: PathBuf,
    pub lang: String,
    pub error: FrontMatterError,
}

/// Result of one walk over the content store.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub articles: Vec<ArticleMetadata>,
    pub rejected: Vec<RejectedArticle>,
}

/// Walk `<articles_root>/<lang>/*.md` for every language.
///
/// A missing language directory contributes no articles. A file that
/// vanishes between listing and reading is an [`IndexError::Io`].
pub fn scan_articles(articles_root: &Path, languages: &[String]) -> Result<ScanReport, IndexError> {
    let mut report = ScanReport::default();

    for lang in languages {
        let lang_dir = articles_root.join(lang);
        if !lang_dir.is_dir() {
            debug!(lang = %lang, dir = %lang_dir.display(), "language directory missing, skipping");
            continue;
        }

        let walker = WalkDir::new(&lang_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|source| IndexError::Walk {
                path: lang_dir.clone(),
                source,
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_markdown(path) {
                continue;
            }
            let Some(id) = article_id(path) else {
                continue;
            };

            let source = fs::read_to_string(path).map_err(|source| IndexError::Io {
                path: path.to_path_buf(),
                source,
            })?;

            match frontmatter::parse_document(&source) {
                Ok((fm, _body)) => report.articles.push(fm.into_metadata(&id, lang)),
                Err(error) => {
                    warn!(path = %path.display(), %error, "skipping article with invalid metadata");
                    report.rejected.push(RejectedArticle {
                        path: path.to_path_buf(),
                        lang: lang.clone(),
                        error,
                    });
                }
            }
        }
    }

    Ok(report)
}

/// Only the exact `.md` extension: article pages load `<slug>.md`.
fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "md")
}

/// File name minus `.md`. Hidden files are not articles.
fn article_id(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_string_lossy();
    if stem.is_empty() || stem.starts_with('.') {
        return None;
    }
    Some(stem.into_owned())
}

/// When a cached snapshot stops being served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Build once, keep until [`ArticleIndex::invalidate`] or process exit.
    Forever,
    /// Rebuild on the first read after the snapshot is this old.
    Refresh(Duration),
}

impl CachePolicy {
    pub fn from_refresh(interval: Option<Duration>) -> Self {
        interval.map(CachePolicy::Refresh).unwrap_or(CachePolicy::Forever)
    }

    fn is_fresh(self, built_at: Instant) -> bool {
        match self {
            CachePolicy::Forever => true,
            CachePolicy::Refresh(max_age) => built_at.elapsed() < max_age,
        }
    }
}

struct Snapshot {
    built_at: Instant,
    articles: Arc<Vec<ArticleMetadata>>,
}

/// Process-wide cache of the article list.
///
/// Reads are lock-free. Two readers that both find the cache empty (or
/// stale) both rebuild it; the scan is pure, so whichever snapshot is
/// stored last is as good as the other.
pub struct ArticleIndex {
    articles_root: PathBuf,
    languages: Vec<String>,
    policy: CachePolicy,
    snapshot: ArcSwapOption<Snapshot>,
}

impl ArticleIndex {
    pub fn new(articles_root: PathBuf, languages: Vec<String>, policy: CachePolicy) -> Self {
        Self {
            articles_root,
            languages,
            policy,
            snapshot: ArcSwapOption::empty(),
        }
    }

    pub fn articles_root(&self) -> &Path {
        &self.articles_root
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// All articles across all languages, in scan order.
    pub fn articles(&self) -> Result<Arc<Vec<ArticleMetadata>>, IndexError> {
        if let Some(snapshot) = self.snapshot.load_full()
            && self.policy.is_fresh(snapshot.built_at)
        {
            return Ok(Arc::clone(&snapshot.articles));
        }
        self.rebuild()
    }

    /// Scan the content store now and replace the cached snapshot.
    pub fn rebuild(&self) -> Result<Arc<Vec<ArticleMetadata>>, IndexError> {
        let started = Instant::now();
        let report = scan_articles(&self.articles_root, &self.languages)?;
        let articles = Arc::new(report.articles);
        info!(
            articles = articles.len(),
            rejected = report.rejected.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "article index built"
        );
        self.snapshot.store(Some(Arc::new(Snapshot {
            built_at: Instant::now(),
            articles: Arc::clone(&articles),
        })));
        Ok(articles)
    }

    /// Drop the cached snapshot; the next read rebuilds it.
    pub fn invalidate(&self) {
        debug!("article index invalidated");
        self.snapshot.store(None);
    }

    pub fn is_cached(&self) -> bool {
        self.snapshot.load().is_some()
    }
}
