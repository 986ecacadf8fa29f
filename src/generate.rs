//! Static site generation.
//!
//! Renders every route of a [`Site`] to plain HTML files, so the output can be
//! dropped on any file server. Article pages are rendered in parallel with
//! rayon; each render reads its own file and shares nothing but the index
//! snapshot.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                       # Redirect to /<default_language>
//! ├── 404.html
//! ├── en/
//! │   ├── index.html                   # Home page
//! │   ├── hello-world/index.html       # Article page
//! │   └── category/
//! │       └── Essays/index.html        # Category page
//! └── zh/
//!     └── ...
//! ```
//!
//! Category directories use the decoded category name, which is what a static
//! file server looks up after percent-decoding `/en/category/Travel%20Notes`.

use crate::index::IndexError;
use crate::pages;
use crate::routes::Route;
use crate::site::{Rendered, Site, SiteError};
use crate::types::ArticleMetadata;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Site(#[from] SiteError),
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Pages written for one language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageSummary {
    pub lang: String,
    /// `(category name, article count)`, in home page order.
    pub categories: Vec<(String, usize)>,
    pub articles: usize,
}

/// An article page that could not be rendered. The rest of the build continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedPage {
    pub lang: String,
    pub slug: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct BuildSummary {
    pub output: PathBuf,
    pub languages: Vec<LanguageSummary>,
    pub pages_written: usize,
    pub failed: Vec<FailedPage>,
}

/// Render the whole site into `output_dir`.
pub fn generate(site: &Site, output_dir: &Path) -> Result<BuildSummary, GenerateError> {
    create_dir(output_dir)?;
    let config = site.config();
    let mut summary = BuildSummary {
        output: output_dir.to_path_buf(),
        ..BuildSummary::default()
    };

    // Root redirect and 404
    let target = match site.render(&Route::Root)? {
        Rendered::Redirect(target) => target,
        _ => format!("/{}", config.default_language),
    };
    write_page(&output_dir.join("index.html"), &pages::render_redirect(&target).into_string())?;
    write_page(&output_dir.join("404.html"), &site.not_found_page(None).into_string())?;
    summary.pages_written += 2;

    let articles = site.index().rebuild()?;

    for lang in &config.languages {
        let lang_dir = output_dir.join(lang);
        let mut lang_summary = LanguageSummary {
            lang: lang.clone(),
            ..LanguageSummary::default()
        };

        let home = site.render(&Route::Home { lang: lang.clone() })?;
        write_rendered(&lang_dir.join("index.html"), home)?;
        summary.pages_written += 1;

        for group in site.categories(lang)? {
            lang_summary
                .categories
                .push((group.name.clone(), group.articles.len()));
            let Some(dir) = category_dir(&lang_dir, &group.name) else {
                warn!(
                    lang = %lang,
                    category = %group.name,
                    "category name is not a valid directory name, skipping page"
                );
                continue;
            };
            let page = site.render(&Route::Category {
                lang: lang.clone(),
                name: group.name,
            })?;
            write_rendered(&dir.join("index.html"), page)?;
            summary.pages_written += 1;
        }

        let in_lang: Vec<&ArticleMetadata> = articles.iter().filter(|a| &a.lang == lang).collect();
        let results: Vec<Result<(), FailedPage>> = in_lang
            .par_iter()
            .map(|article| render_article(site, &lang_dir, article))
            .collect();
        for result in results {
            match result {
                Ok(()) => {
                    lang_summary.articles += 1;
                    summary.pages_written += 1;
                }
                Err(failed) => {
                    warn!(
                        lang = %failed.lang,
                        slug = %failed.slug,
                        reason = %failed.reason,
                        "article page not generated"
                    );
                    summary.failed.push(failed);
                }
            }
        }

        info!(
            lang = %lang,
            categories = lang_summary.categories.len(),
            articles = lang_summary.articles,
            "language generated"
        );
        summary.languages.push(lang_summary);
    }

    info!(
        pages = summary.pages_written,
        failed = summary.failed.len(),
        output = %output_dir.display(),
        "site generated"
    );
    Ok(summary)
}

fn render_article(
    site: &Site,
    lang_dir: &Path,
    article: &ArticleMetadata,
) -> Result<(), FailedPage> {
    let failed = |reason: String| FailedPage {
        lang: article.lang.clone(),
        slug: article.id.clone(),
        reason,
    };
    let route = Route::Article {
        lang: article.lang.clone(),
        slug: article.id.clone(),
    };
    match site.render(&route) {
        Ok(Rendered::Html(markup)) => {
            let path = lang_dir.join(&article.id).join("index.html");
            write_page(&path, &markup.into_string()).map_err(|e| failed(e.to_string()))?;
            debug!(path = %path.display(), "article page written");
            Ok(())
        }
        Ok(Rendered::NotFound(_)) => Err(failed("article file disappeared".to_string())),
        Ok(Rendered::Redirect(to)) => Err(failed(format!("unexpected redirect to {to}"))),
        Err(e) => Err(failed(e.to_string())),
    }
}

/// `<lang>/category/<name>`, or `None` when the name cannot be a single
/// path component.
fn category_dir(lang_dir: &Path, name: &str) -> Option<PathBuf> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return None;
    }
    Some(lang_dir.join("category").join(name))
}

fn write_rendered(path: &Path, rendered: Rendered) -> Result<(), GenerateError> {
    match rendered {
        Rendered::Html(markup) | Rendered::NotFound(markup) => {
            write_page(path, &markup.into_string())
        }
        Rendered::Redirect(to) => write_page(path, &pages::render_redirect(&to).into_string()),
    }
}

fn write_page(path: &Path, html: &str) -> Result<(), GenerateError> {
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }
    fs::write(path, html).map_err(|source| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn create_dir(path: &Path) -> Result<(), GenerateError> {
    fs::create_dir_all(path).map_err(|source| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    })
}
