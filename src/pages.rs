//! HTML page templates.
//!
//! Every page shares the same frame: a header with the navigation menu and
//! the language switcher, a fixed theme toggle, and the main column. Pages
//! are pure functions from data to [`Markup`]; nothing here touches the
//! filesystem.
//!
//! ## Pages
//!
//! - **Home** (`/<lang>`): site title and one card per category
//! - **Category** (`/<lang>/category/<name>`): article list, newest first
//! - **Article** (`/<lang>/<slug>`): date, title, body with footnote tooltips
//! - **Not found**: shown for unknown paths, languages and articles
//! - **Redirect**: the static build's `/index.html`, pointing at the default
//!   language
//!
//! ## CSS and JavaScript
//!
//! Embedded at compile time and inlined into every page:
//! - `static/style.css`: base styles (colors and fonts injected from config)
//! - `static/theme.js`: light/dark/system preference, runs before first paint
//! - `static/menu.js`: navigation menu open/close and the theme toggle button

use crate::config::{self, SiteConfig};
use crate::i18n::{self, Dictionary};
use crate::markdown;
use crate::routes;
use crate::types::{ArticleContent, ArticleMetadata, CategoryStat};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS_STATIC: &str = include_str!("../static/style.css");
const THEME_JS: &str = include_str!("../static/theme.js");
const MENU_JS: &str = include_str!("../static/menu.js");

/// Full stylesheet: config-driven custom properties, then the static rules.
pub fn site_css(config: &SiteConfig) -> String {
    format!(
        "{}\n{}\n\n{}",
        config::generate_color_css(&config.colors),
        config::generate_theme_css(&config.theme),
        CSS_STATIC
    )
}

/// Shared inputs for every page in one language.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub config: &'a SiteConfig,
    pub lang: &'a str,
    pub css: &'a str,
    /// Categories of `lang`, listed in the navigation menu.
    pub categories: &'a [CategoryStat],
}

impl PageContext<'_> {
    fn dict(&self) -> &'static Dictionary {
        i18n::dictionary(self.lang)
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(
    ctx: &PageContext<'_>,
    title: &str,
    body_class: Option<&str>,
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(ctx.lang) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="description" content=(ctx.config.description);
                title { (title) }
                script { (PreEscaped(THEME_JS)) }
                style { (PreEscaped(ctx.css)) }
            }
            body class=[body_class] {
                (theme_toggle(ctx.dict()))
                (content)
                script { (PreEscaped(MENU_JS)) }
            }
        }
    }
}

/// Renders the site header with the menu on the left and the switcher on the right
fn site_header(ctx: &PageContext<'_>, switcher: Markup) -> Markup {
    html! {
        header.site-header {
            (render_nav(ctx.lang, ctx.dict(), ctx.categories))
            (switcher)
        }
    }
}

/// Renders the navigation menu: a button toggling a panel with the home link
/// and one link per category.
pub fn render_nav(lang: &str, dict: &Dictionary, categories: &[CategoryStat]) -> Markup {
    html! {
        div.nav-menu data-nav-menu {
            button.nav-toggle type="button" aria-expanded="false" aria-controls="nav-panel" {
                span.nav-icon aria-hidden="true" { "☰" }
                span { (dict.menu) }
            }
            div.nav-panel id="nav-panel" hidden {
                a.nav-link href=(routes::home_path(lang)) { (dict.home) }
                @if !categories.is_empty() {
                    hr;
                    div.nav-heading { (dict.categories) }
                    @for (idx, category) in categories.iter().enumerate() {
                        a.nav-link
                            href=(routes::category_path(lang, &category.name))
                            style={ "--stagger: " (idx + 1) } {
                            (category.name)
                        }
                    }
                }
            }
        }
    }
}

/// Fixed theme button. `menu.js` swaps the label when the theme flips.
fn theme_toggle(dict: &Dictionary) -> Markup {
    html! {
        button.theme-toggle
            type="button"
            data-theme-toggle
            data-label-dark=(dict.toggle_dark)
            data-label-light=(dict.toggle_light)
            aria-label=(dict.toggle_dark)
            title=(dict.toggle_dark) {
            span.theme-icon-light aria-hidden="true" { "☀" }
            span.theme-icon-dark aria-hidden="true" { "☾" }
        }
    }
}

/// Renders the language switcher.
///
/// `link_for` returns the target path for a language, or `None` when that
/// language has no version of the current page. Those render as disabled
/// text instead of a link.
pub fn language_switcher(
    languages: &[String],
    current: &str,
    link_for: impl Fn(&str) -> Option<String>,
) -> Markup {
    html! {
        nav.language-switcher aria-label="Language" {
            @for (idx, lang) in languages.iter().enumerate() {
                @if idx > 0 {
                    span.separator aria-hidden="true" { "/" }
                }
                @let label = i18n::language_label(lang);
                @if lang == current {
                    span.current aria-current="true" lang=(lang) { (label) }
                } @else if let Some(href) = link_for(lang) {
                    a href=(href) lang=(lang) hreflang=(lang) { (label) }
                } @else {
                    span.disabled aria-disabled="true" lang=(lang) { (label) }
                }
            }
        }
    }
}

fn back_link(lang: &str, dict: &Dictionary) -> Markup {
    html! {
        a.back-link href=(routes::home_path(lang)) {
            span aria-hidden="true" { "←" }
            " "
            (dict.back_to_home)
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the home page with one card per category
pub fn render_home(ctx: &PageContext<'_>) -> Markup {
    let dict = ctx.dict();
    let switcher = language_switcher(&ctx.config.languages, ctx.lang, |l| {
        Some(routes::home_path(l))
    });

    let content = html! {
        (site_header(ctx, switcher))
        main.home-page {
            header.site-title {
                h1 { (ctx.config.title) }
            }
            @if ctx.categories.is_empty() {
                p.empty-state { (dict.no_categories) }
            } @else {
                div.category-grid {
                    @for category in ctx.categories {
                        a.category-card href=(routes::category_path(ctx.lang, &category.name)) {
                            h2 { (category.name) }
                            p.category-count {
                                (dict.article_count(category.article_count))
                                span.arrow aria-hidden="true" { "→" }
                            }
                            @if let Some(description) = &category.description {
                                p.category-description { (description) }
                            }
                        }
                    }
                }
            }
        }
    };

    base_document(ctx, &ctx.config.title, Some("home"), content)
}

/// Renders a category listing. An unknown category is just an empty listing.
///
/// `available` lists the languages that have at least one article in this
/// category; the switcher links only to those.
pub fn render_category(
    ctx: &PageContext<'_>,
    name: &str,
    articles: &[ArticleMetadata],
    available: &[String],
) -> Markup {
    let dict = ctx.dict();
    let switcher = language_switcher(&ctx.config.languages, ctx.lang, |l| {
        available
            .iter()
            .any(|a| a == l)
            .then(|| routes::category_path(l, name))
    });

    let content = html! {
        (site_header(ctx, switcher))
        main.category-page {
            (back_link(ctx.lang, dict))
            header.page-header {
                h1 { (name) }
                p.category-count {
                    (dict.category_count(articles.len()))
                }
            }
            @if articles.is_empty() {
                p.empty-state { (dict.no_articles_found) }
            } @else {
                ul.article-list {
                    @for article in articles {
                        li {
                            a.article-link href=(routes::article_path(ctx.lang, &article.id)) {
                                h2 { (article.title) }
                                time datetime=(article.date) { (article.date) }
                            }
                        }
                    }
                }
            }
        }
    };

    let title = format!("{name} · {}", ctx.config.title);
    base_document(ctx, &title, Some("category"), content)
}

/// Renders one article with its language switcher and footnote tooltips
pub fn render_article(ctx: &PageContext<'_>, article: &ArticleContent) -> Markup {
    let dict = ctx.dict();
    let meta = &article.metadata;
    let switcher = language_switcher(&ctx.config.languages, ctx.lang, |l| {
        article
            .translations
            .get(l)
            .map(|slug| routes::article_path(l, slug))
    });

    let content = html! {
        (site_header(ctx, switcher))
        main.article-page {
            (back_link(ctx.lang, dict))
            article {
                header.article-header {
                    time datetime=(meta.date) { (meta.date) }
                    h1 { (meta.title) }
                }
                div.prose {
                    (markdown::render_html(&article.body, &article.footnotes))
                }
            }
        }
    };

    let title = format!("{} · {}", meta.title, ctx.config.title);
    base_document(ctx, &title, Some("article"), content)
}

/// Renders the 404 page
pub fn render_not_found(ctx: &PageContext<'_>) -> Markup {
    let dict = ctx.dict();
    let switcher = language_switcher(&ctx.config.languages, ctx.lang, |l| {
        Some(routes::home_path(l))
    });

    let content = html! {
        (site_header(ctx, switcher))
        main.not-found-page {
            h1 { "404" }
            p { (dict.page_not_found) }
            (back_link(ctx.lang, dict))
        }
    };

    base_document(ctx, dict.page_not_found, Some("not-found"), content)
}

/// Renders a page for an article that exists but cannot be rendered
pub fn render_error(ctx: &PageContext<'_>, message: &str) -> Markup {
    let dict = ctx.dict();
    let content = html! {
        (site_header(ctx, html! {}))
        main.error-page {
            h1 { "500" }
            p { (message) }
            (back_link(ctx.lang, dict))
        }
    };
    base_document(ctx, message, Some("error"), content)
}

/// Static stand-in for the root redirect.
pub fn render_redirect(target: &str) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="UTF-8";
                meta http-equiv="refresh" content={ "0; url=" (target) };
                link rel="canonical" href=(target);
                title { "Redirecting…" }
            }
            body {
                a href=(target) { (target) }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
