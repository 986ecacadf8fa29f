//! A loaded site: config, article index and stylesheet, rendering routes.
//!
//! Both the static generator and the dev server go through [`Site::render`],
//! so a page looks the same whichever way it was produced.

use crate::article::{self, ArticleError};
use crate::categories::{self, CategoryGroup};
use crate::config::{self, ConfigError, SiteConfig};
use crate::index::{ArticleIndex, CachePolicy, IndexError};
use crate::pages::{self, PageContext};
use crate::routes::{self, Route};
use crate::types::CategoryStat;
use maud::Markup;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("article index error: {0}")]
    Index(#[from] IndexError),
    #[error(transparent)]
    Article(#[from] ArticleError),
}

/// Outcome of rendering one route.
#[derive(Debug)]
pub enum Rendered {
    Html(Markup),
    /// Temporary redirect to this path.
    Redirect(String),
    NotFound(Markup),
}

impl Rendered {
    pub fn status(&self) -> u16 {
        match self {
            Rendered::Html(_) => 200,
            Rendered::Redirect(_) => 307,
            Rendered::NotFound(_) => 404,
        }
    }
}

pub struct Site {
    root: PathBuf,
    config: SiteConfig,
    index: ArticleIndex,
    css: String,
}

impl Site {
    /// Load `<root>/config.toml` (or stock defaults) and set up the index.
    /// Nothing is scanned until the first page needs it.
    pub fn open(root: &Path) -> Result<Self, SiteError> {
        let config = config::load_config(root)?;
        Ok(Self::new(root, config))
    }

    pub fn new(root: &Path, config: SiteConfig) -> Self {
        let index = ArticleIndex::new(
            root.join(&config.articles_dir),
            config.languages.clone(),
            CachePolicy::from_refresh(config.index.refresh_interval()),
        );
        let css = pages::site_css(&config);
        Self {
            root: root.to_path_buf(),
            config,
            index,
            css,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn index(&self) -> &ArticleIndex {
        &self.index
    }

    /// Category groups of `lang`, newest article first.
    pub fn categories(&self, lang: &str) -> Result<Vec<CategoryGroup>, SiteError> {
        let articles = self.index.articles()?;
        Ok(categories::categorize(&articles, lang))
    }

    fn context<'a>(&'a self, lang: &'a str, stats: &'a [CategoryStat]) -> PageContext<'a> {
        PageContext {
            config: &self.config,
            lang,
            css: &self.css,
            categories: stats,
        }
    }

    fn stats(&self, groups: &[CategoryGroup]) -> Vec<CategoryStat> {
        categories::category_stats(groups, &self.config)
    }

    pub fn render(&self, route: &Route) -> Result<Rendered, SiteError> {
        match route {
            Route::Root => Ok(Rendered::Redirect(routes::home_path(
                &self.config.default_language,
            ))),
            Route::Home { lang } => {
                let stats = self.stats(&self.categories(lang)?);
                Ok(Rendered::Html(pages::render_home(&self.context(lang, &stats))))
            }
            Route::Category { lang, name } => {
                let all = self.index.articles()?;
                let groups = categories::categorize(&all, lang);
                let stats = self.stats(&groups);
                let articles = categories::find_category(&groups, name);
                let available =
                    categories::languages_with_category(&all, name, &self.config.languages);
                Ok(Rendered::Html(pages::render_category(
                    &self.context(lang, &stats),
                    name,
                    articles,
                    &available,
                )))
            }
            Route::Article { lang, slug } => match article::load_article(&self.index, lang, slug) {
                Ok(content) => {
                    let stats = self.stats(&self.categories(lang)?);
                    Ok(Rendered::Html(pages::render_article(
                        &self.context(lang, &stats),
                        &content,
                    )))
                }
                Err(ArticleError::NotFound { .. }) => {
                    Ok(Rendered::NotFound(self.not_found_page(Some(lang))))
                }
                Err(e) => Err(e.into()),
            },
            Route::NotFound => Ok(Rendered::NotFound(self.not_found_page(None))),
        }
    }

    /// 404 page in `lang` (default language when unknown). The menu is left
    /// empty if the index cannot be read.
    pub fn not_found_page(&self, lang: Option<&str>) -> Markup {
        let lang = lang
            .filter(|l| self.config.supports(l))
            .unwrap_or(&self.config.default_language);
        let stats = match self.categories(lang) {
            Ok(groups) => self.stats(&groups),
            Err(e) => {
                warn!(error = %e, "rendering 404 page without categories");
                Vec::new()
            }
        };
        pages::render_not_found(&self.context(lang, &stats))
    }

    /// Page shown when a request fails, e.g. an article with broken front-matter.
    pub fn error_page(&self, lang: Option<&str>, error: &SiteError) -> Markup {
        let lang = lang
            .filter(|l| self.config.supports(l))
            .unwrap_or(&self.config.default_language);
        let message = match error {
            SiteError::Article(ArticleError::InvalidMetadata { .. }) => "invalid article metadata",
            _ => "internal error",
        };
        pages::render_error(&self.context(lang, &[]), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::FrontMatterError;
    use crate::test_helpers::*;
    use std::fs;
    use tempfile::TempDir;

    fn html(rendered: Rendered) -> String {
        match rendered {
            Rendered::Html(m) | Rendered::NotFound(m) => m.into_string(),
            Rendered::Redirect(to) => panic!("unexpected redirect to {to}"),
        }
    }

    fn site_with(setup: impl FnOnce(&Path)) -> (TempDir, Site) {
        let tmp = TempDir::new().unwrap();
        setup(&tmp.path().join("articles"));
        let site = Site::open(tmp.path()).unwrap();
        (tmp, site)
    }

    #[test]
    fn root_redirects_to_default_language() {
        let (_tmp, site) = site_with(|_| {});
        match site.render(&Route::Root).unwrap() {
            Rendered::Redirect(to) => assert_eq!(to, "/zh"),
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[test]
    fn home_lists_categories_of_its_language_only() {
        let (_tmp, site) = site_with(|root| {
            write_article(root, "en", "a", "A", "2024-01-01", Some("Essays"), None);
            write_article(root, "zh", "b", "B", "2024-01-01", Some("随笔"), None);
        });
        let page = html(
            site.render(&Route::Home {
                lang: "en".to_string(),
            })
            .unwrap(),
        );
        assert!(page.contains("Essays"));
        assert!(!page.contains("随笔"));
    }

    #[test]
    fn unknown_category_renders_empty_listing() {
        let (_tmp, site) = site_with(|root| {
            write_article(root, "en", "a", "A", "2024-01-01", Some("Essays"), None);
        });
        let rendered = site
            .render(&Route::Category {
                lang: "en".to_string(),
                name: "Poetry".to_string(),
            })
            .unwrap();
        assert_eq!(rendered.status(), 200);
        assert!(html(rendered).contains("No articles found in this category."));
    }

    #[test]
    fn missing_article_is_not_found() {
        let (_tmp, site) = site_with(|_| {});
        let rendered = site
            .render(&Route::Article {
                lang: "en".to_string(),
                slug: "ghost".to_string(),
            })
            .unwrap();
        assert_eq!(rendered.status(), 404);
        assert!(html(rendered).contains("Page not found"));
    }

    #[test]
    fn invalid_metadata_fails_the_request() {
        let (tmp, site) = site_with(|root| {
            write_article(root, "en", "good", "Good", "2024-01-01", None, None);
        });
        fs::write(tmp.path().join("articles/en/bad.md"), "---\ndate: 2024-01-01\n---\n").unwrap();

        let err = site
            .render(&Route::Article {
                lang: "en".to_string(),
                slug: "bad".to_string(),
            })
            .unwrap_err();
        assert!(matches!(
            err,
            SiteError::Article(ArticleError::InvalidMetadata {
                source: FrontMatterError::MissingField("title"),
                ..
            })
        ));
        let page = site.error_page(Some("en"), &err).into_string();
        assert!(page.contains("invalid article metadata"));

        let ok = site
            .render(&Route::Article {
                lang: "en".to_string(),
                slug: "good".to_string(),
            })
            .unwrap();
        assert_eq!(ok.status(), 200);
    }

    #[test]
    fn article_switcher_links_translation() {
        let (_tmp, site) = site_with(|root| {
            write_article(root, "en", "hello", "Hello", "2024-01-01", None, Some("greet"));
            write_article(root, "zh", "ni-hao", "你好", "2024-01-01", None, Some("greet"));
        });
        let page = html(
            site.render(&Route::Article {
                lang: "en".to_string(),
                slug: "hello".to_string(),
            })
            .unwrap(),
        );
        assert!(page.contains(r#"href="/zh/ni-hao""#));
        assert!(page.contains(r#"class="disabled""#));
    }

    #[test]
    fn not_found_page_falls_back_to_default_language() {
        let (_tmp, site) = site_with(|_| {});
        let page = site.not_found_page(Some("fr")).into_string();
        assert!(page.contains(r#"<html lang="zh">"#));
        assert!(page.contains("页面不存在"));
    }

    #[test]
    fn fixture_site_renders_every_home_page() {
        let tmp = setup_fixtures();
        let site = Site::open(tmp.path()).unwrap();
        for lang in site.config().languages.clone() {
            let rendered = site.render(&Route::Home { lang }).unwrap();
            assert_eq!(rendered.status(), 200);
        }
    }
}
