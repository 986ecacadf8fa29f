//! # Quire
//!
//! A small multilingual blog engine. Articles are Markdown files with YAML
//! front-matter, one directory per language; pages are rendered on request by
//! the dev server or written out once as a static site.
//!
//! # Data Flow
//!
//! ```text
//! articles/<lang>/*.md ─┬─→ index ─┬─→ categories   ─┐
//!                       │          └─→ translations ─┼─→ pages ─→ HTML
//!                       └─→ markdown (per article) ──┘
//! ```
//!
//! The article index holds only front-matter and is cached for the life of
//! the process (or until it is older than `[index] refresh_secs`). Article
//! bodies are read and rendered fresh for every page.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading, validation, merging over stock defaults, CSS generation |
//! | [`frontmatter`] | Splits a document into YAML front-matter and Markdown body, validates fields |
//! | [`index`] | Walks the content store into a flat article list; cache policy |
//! | [`categories`] | Per-language grouping by category, newest first |
//! | [`translations`] | Sibling lookup across languages by `translationId` |
//! | [`markdown`] | pulldown-cmark to node tree, footnote extraction, HTML serialization |
//! | [`article`] | Loads one article: metadata, rendered body, footnotes, translations |
//! | [`i18n`] | Interface strings per language, English fallback |
//! | [`routes`] | URL paths to routes and back |
//! | [`pages`] | Maud templates for every page |
//! | [`site`] | Config + index + templates; renders a route |
//! | [`generate`] | Writes every route to a static output directory |
//! | [`serve`] | `tiny_http` dev server |
//! | [`output`] | CLI output formatting for `check` and `build` |
//! | [`types`] | Shared data types |
//!
//! # Design Decisions
//!
//! ## Footnotes as Tooltips
//!
//! Footnote definitions are lifted out of the document and shown inline, in a
//! tooltip on the reference marker, instead of as a list at the end. A
//! reference without a definition still renders, as a plain superscript.
//! Identifiers are compared case-insensitively.
//!
//! ## One Render Path
//!
//! The static build and the dev server both call [`site::Site::render`]. The
//! build is just "render every route and write it to disk", so there is no
//! second template set to drift out of sync.
//!
//! ## Failing One Page, Not the Site
//!
//! An article with broken front-matter is left out of the index with a
//! warning, and a direct request for it gets an error page. Every other page
//! keeps working. `quire check` lists such files with the reason.

pub mod article;
pub mod categories;
pub mod config;
pub mod frontmatter;
pub mod generate;
pub mod i18n;
pub mod index;
pub mod markdown;
pub mod output;
pub mod pages;
pub mod routes;
pub mod serve;
pub mod site;
pub mod translations;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
