//! Shared test utilities for the quire test suite.
//!
//! Provides fixture setup, article writers, and lookup helpers that panic
//! with a clear message on a miss.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let site = Site::open(tmp.path()).unwrap();
//!
//! let articles = site.index().articles().unwrap();
//! let hello = find_article(&articles, "en", "hello-world");
//! assert_eq!(hello.category, "Essays");
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::categories::CategoryGroup;
use crate::types::ArticleMetadata;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write `<articles_root>/<lang>/<slug>.md` with front-matter and a short body.
pub fn write_article(
    articles_root: &Path,
    lang: &str,
    slug: &str,
    title: &str,
    date: &str,
    category: Option<&str>,
    translation_id: Option<&str>,
) {
    let dir = articles_root.join(lang);
    fs::create_dir_all(&dir).unwrap();

    let mut doc = format!("---\ntitle: \"{title}\"\ndate: {date}\n");
    if let Some(category) = category {
        doc.push_str(&format!("category: \"{category}\"\n"));
    }
    if let Some(id) = translation_id {
        doc.push_str(&format!("translationId: \"{id}\"\n"));
    }
    doc.push_str("---\n\nBody of ");
    doc.push_str(title);
    doc.push_str(".\n");

    fs::write(dir.join(format!("{slug}.md")), doc).unwrap();
}

/// In-memory metadata record, for tests that do not touch the filesystem.
pub fn meta(lang: &str, id: &str, date: &str, category: &str) -> ArticleMetadata {
    ArticleMetadata {
        id: id.to_string(),
        lang: lang.to_string(),
        title: id.replace('-', " "),
        date: date.to_string(),
        category: category.to_string(),
        translation_id: None,
    }
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find an article by language and id. Panics if not found.
pub fn find_article<'a>(
    articles: &'a [ArticleMetadata],
    lang: &str,
    id: &str,
) -> &'a ArticleMetadata {
    articles
        .iter()
        .find(|a| a.lang == lang && a.id == id)
        .unwrap_or_else(|| {
            let ids: Vec<String> = articles
                .iter()
                .map(|a| format!("{}/{}", a.lang, a.id))
                .collect();
            panic!("article '{lang}/{id}' not found. Available: {ids:?}")
        })
}

/// Find a category group by name. Panics if not found.
pub fn find_group<'a>(groups: &'a [CategoryGroup], name: &str) -> &'a CategoryGroup {
    groups.iter().find(|g| g.name == name).unwrap_or_else(|| {
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        panic!("category '{name}' not found. Available: {names:?}")
    })
}

/// Article ids of a group, in display order.
pub fn group_ids(group: &CategoryGroup) -> Vec<&str> {
    group.articles.iter().map(|a| a.id.as_str()).collect()
}
