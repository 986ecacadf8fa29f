//! URL routing.
//!
//! ```text
//! /                          → redirect to /<default_language>
//! /<lang>                    → home page
//! /<lang>/<slug>             → article page
//! /<lang>/category/<name>    → category page
//! ```
//!
//! Segments are percent-decoded one at a time, so an encoded `/` inside a
//! category name stays part of the name. Query strings and trailing slashes
//! are ignored. A language that is not configured is not found.

use crate::config::SiteConfig;
use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Root,
    Home { lang: String },
    Article { lang: String, slug: String },
    Category { lang: String, name: String },
    NotFound,
}

impl Route {
    /// Canonical path for this route. `NotFound` has none.
    pub fn path(&self) -> Option<String> {
        match self {
            Route::Root => Some("/".to_string()),
            Route::Home { lang } => Some(home_path(lang)),
            Route::Article { lang, slug } => Some(article_path(lang, slug)),
            Route::Category { lang, name } => Some(category_path(lang, name)),
            Route::NotFound => None,
        }
    }

    pub fn lang(&self) -> Option<&str> {
        match self {
            Route::Home { lang } | Route::Article { lang, .. } | Route::Category { lang, .. } => {
                Some(lang)
            }
            Route::Root | Route::NotFound => None,
        }
    }
}

/// Map a request URL (path plus optional query) to a route.
pub fn parse_route(url: &str, config: &SiteConfig) -> Route {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let segments: Option<Vec<String>> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::decode(s).ok().map(Cow::into_owned))
        .collect();
    let Some(segments) = segments else {
        return Route::NotFound;
    };

    match segments.as_slice() {
        [] => Route::Root,
        [lang, ..] if !config.supports(lang) => Route::NotFound,
        [lang] => Route::Home { lang: lang.clone() },
        [lang, slug] => Route::Article {
            lang: lang.clone(),
            slug: slug.clone(),
        },
        [lang, keyword, name] if keyword == "category" => Route::Category {
            lang: lang.clone(),
            name: name.clone(),
        },
        _ => Route::NotFound,
    }
}

pub fn home_path(lang: &str) -> String {
    format!("/{}", urlencoding::encode(lang))
}

pub fn article_path(lang: &str, slug: &str) -> String {
    format!("/{}/{}", urlencoding::encode(lang), urlencoding::encode(slug))
}

pub fn category_path(lang: &str, name: &str) -> String {
    format!(
        "/{}/category/{}",
        urlencoding::encode(lang),
        urlencoding::encode(name)
    )
}
