//! Category grouping for listing pages.
//!
//! [`categorize`] filters the index to one language, orders it newest first
//! and groups it by category. Groups come out in order of first appearance,
//! so the category holding the most recent article is listed first. Articles
//! with the same date keep their scan order (stable sort).

use crate::config::SiteConfig;
use crate::types::{ArticleMetadata, CategoryStat};
use chrono::NaiveDate;
use std::cmp::Reverse;

/// Articles of one category, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup {
    pub name: String,
    pub articles: Vec<ArticleMetadata>,
}

/// Group the articles of `lang` by category.
pub fn categorize(articles: &[ArticleMetadata], lang: &str) -> Vec<CategoryGroup> {
    let mut in_lang: Vec<&ArticleMetadata> = articles.iter().filter(|a| a.lang == lang).collect();
    in_lang.sort_by_key(|a| Reverse(a.parsed_date().unwrap_or(NaiveDate::MIN)));

    let mut groups: Vec<CategoryGroup> = Vec::new();
    for article in in_lang {
        match groups.iter_mut().find(|g| g.name == article.category) {
            Some(group) => group.articles.push(article.clone()),
            None => groups.push(CategoryGroup {
                name: article.category.clone(),
                articles: vec![article.clone()],
            }),
        }
    }
    groups
}

/// Articles of one category, or an empty slice when the language has no
/// such category.
pub fn find_category<'a>(groups: &'a [CategoryGroup], name: &str) -> &'a [ArticleMetadata] {
    groups
        .iter()
        .find(|g| g.name == name)
        .map(|g| g.articles.as_slice())
        .unwrap_or(&[])
}

/// Languages, in `languages` order, with at least one article in category
/// `name`.
pub fn languages_with_category(
    articles: &[ArticleMetadata],
    name: &str,
    languages: &[String],
) -> Vec<String> {
    languages
        .iter()
        .filter(|lang| {
            articles
                .iter()
                .any(|a| &a.lang == *lang && a.category == name)
        })
        .cloned()
        .collect()
}

/// Per-category counts, with descriptions from `[categories.<name>]`.
pub fn category_stats(groups: &[CategoryGroup], config: &SiteConfig) -> Vec<CategoryStat> {
    groups
        .iter()
        .map(|g| CategoryStat {
            name: g.name.clone(),
            article_count: g.articles.len(),
            description: config.category_description(&g.name).map(str::to_string),
        })
        .collect()
}
