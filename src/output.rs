//! CLI output formatting for `check` and `build`.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Each entity leads with
//! what a reader would recognize (language, category, article date and title);
//! source and output paths follow as secondary context.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! en (3 articles)
//!     Essays (2)
//!         001 2024-06-01 On Reading
//!             Source: en/on-reading.md
//!         002 2023-01-10 Hello World
//!             Source: en/hello-world.md
//!             Translations: zh
//!     Uncategorized (1)
//!         001 2022-02-02 Loose Note
//!             Source: en/loose-note.md
//! ja (0 articles)
//!
//! Rejected
//!     en/broken.md: missing required field `title`
//!
//! 3 articles in 3 languages, 1 rejected
//! ```
//!
//! ## Build
//!
//! ```text
//! Redirect → index.html
//! Not found → 404.html
//! en → en/index.html (3 articles)
//!     Essays (2) → en/category/Essays/index.html
//!
//! Generated 3 articles, 1 category in 3 languages (8 pages) → dist
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::categories;
use crate::config::SiteConfig;
use crate::generate::BuildSummary;
use crate::index::ScanReport;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// Path relative to `root` with forward slashes, for display.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

// ============================================================================
// check
// ============================================================================

/// Format the content inventory: every language, its categories and
/// articles, then every rejected file with its reason.
pub fn format_check_output(
    report: &ScanReport,
    config: &SiteConfig,
    articles_root: &Path,
) -> Vec<String> {
    let mut lines = Vec::new();

    for lang in &config.languages {
        let groups = categories::categorize(&report.articles, lang);
        let total: usize = groups.iter().map(|g| g.articles.len()).sum();
        lines.push(format!("{} ({})", lang, plural(total, "article", "articles")));

        for group in &groups {
            lines.push(format!("{}{} ({})", indent(1), group.name, group.articles.len()));
            for (i, article) in group.articles.iter().enumerate() {
                lines.push(format!(
                    "{}{} {} {}",
                    indent(2),
                    format_index(i + 1),
                    article.date,
                    article.title
                ));
                lines.push(format!("{}Source: {}/{}.md", indent(3), article.lang, article.id));
                if let Some(group_id) = article.translation_id.as_deref() {
                    let siblings: Vec<&str> = report
                        .articles
                        .iter()
                        .filter(|a| {
                            a.translation_id.as_deref() == Some(group_id) && a.lang != article.lang
                        })
                        .map(|a| a.lang.as_str())
                        .collect();
                    if !siblings.is_empty() {
                        lines.push(format!("{}Translations: {}", indent(3), siblings.join(", ")));
                    }
                }
            }
        }
    }

    if !report.rejected.is_empty() {
        lines.push(String::new());
        lines.push("Rejected".to_string());
        for rejected in &report.rejected {
            lines.push(format!(
                "{}{}: {}",
                indent(1),
                display_path(&rejected.path, articles_root),
                rejected.error
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "{} in {}, {} rejected",
        plural(report.articles.len(), "article", "articles"),
        plural(config.languages.len(), "language", "languages"),
        report.rejected.len()
    ));
    lines
}

/// Print check output to stdout.
pub fn print_check_output(report: &ScanReport, config: &SiteConfig, articles_root: &Path) {
    for line in format_check_output(report, config, articles_root) {
        println!("{}", line);
    }
}

// ============================================================================
// build
// ============================================================================

/// Format the list of generated pages.
pub fn format_build_output(summary: &BuildSummary) -> Vec<String> {
    let mut lines = vec![
        "Redirect \u{2192} index.html".to_string(),
        "Not found \u{2192} 404.html".to_string(),
    ];

    for lang in &summary.languages {
        lines.push(format!(
            "{} \u{2192} {}/index.html ({})",
            lang.lang,
            lang.lang,
            plural(lang.articles, "article", "articles")
        ));
        for (name, count) in &lang.categories {
            lines.push(format!(
                "{}{} ({}) \u{2192} {}/category/{}/index.html",
                indent(1),
                name,
                count,
                lang.lang,
                name
            ));
        }
    }

    if !summary.failed.is_empty() {
        lines.push(String::new());
        lines.push("Failed".to_string());
        for failed in &summary.failed {
            lines.push(format!(
                "{}{}/{}: {}",
                indent(1),
                failed.lang,
                failed.slug,
                failed.reason
            ));
        }
    }

    let articles: usize = summary.languages.iter().map(|l| l.articles).sum();
    let categories: usize = summary.languages.iter().map(|l| l.categories.len()).sum();
    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {} in {} ({}) \u{2192} {}",
        plural(articles, "article", "articles"),
        plural(categories, "category", "categories"),
        plural(summary.languages.len(), "language", "languages"),
        plural(summary.pages_written, "page", "pages"),
        summary.output.display()
    ));
    lines
}

/// Print build output to stdout.
pub fn print_build_output(summary: &BuildSummary) {
    for line in format_build_output(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
