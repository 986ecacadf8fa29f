//! Translation sibling lookup for the language switcher.

use crate::types::{ArticleMetadata, TranslationMap};

/// Map every language that has a version of this article to that version's id.
///
/// Without a translation id the article only knows itself: `{ lang: id }`.
/// With one, every article sharing it (in any language, the current article
/// included) contributes an entry. If two articles in the same language share
/// the id, the later one in scan order wins; that situation has no defined
/// priority and authors should avoid it.
pub fn resolve_translations(
    articles: &[ArticleMetadata],
    translation_id: Option<&str>,
    lang: &str,
    id: &str,
) -> TranslationMap {
    let mut map = TranslationMap::new();
    match translation_id {
        None => {
            map.insert(lang.to_string(), id.to_string());
        }
        Some(group) => {
            for article in articles
                .iter()
                .filter(|a| a.translation_id.as_deref() == Some(group))
            {
                map.insert(article.lang.clone(), article.id.clone());
            }
            // The current article may be missing from a stale index snapshot.
            map.entry(lang.to_string()).or_insert_with(|| id.to_string());
        }
    }
    map
}
