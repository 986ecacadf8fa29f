//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! serialized to a TOML table and the user's file is deep-merged on top, so a
//! config file only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! ```text
//! my-blog/
//! ├── config.toml          # Site config (optional)
//! └── articles/
//!     ├── en/
//!     ├── zh/
//!     └── ja/
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! title = "Aki's Blog"
//! description = "A personal blog website"
//! articles_dir = "articles"
//! languages = ["en", "zh", "ja"]
//! default_language = "zh"
//!
//! [index]
//! # refresh_secs = 300       # Omit to load the article index once per process
//!
//! [serve]
//! host = "127.0.0.1"
//! port = 3000
//!
//! [theme]
//! content_width = "45rem"
//! heading_font = "'Cormorant Garamond', Georgia, serif"
//! body_font = "Poppins, 'Noto Sans SC', system-ui, sans-serif"
//!
//! [colors.light]
//! background = "#ffffff"
//! # ...
//!
//! [categories.Essays]
//! description = "Longer pieces"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site title shown on the home page and in `<title>`.
    pub title: String,
    /// Meta description.
    pub description: String,
    /// Directory (relative to the site root) holding one subdirectory per language.
    pub articles_dir: String,
    /// Supported language codes, in switcher order.
    pub languages: Vec<String>,
    /// Language the root path redirects to.
    pub default_language: String,
    /// Article index cache policy.
    pub index: IndexConfig,
    /// Dev server bind settings.
    pub serve: ServeConfig,
    /// Layout and typography.
    pub theme: ThemeConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Optional per-category settings, keyed by category name.
    pub categories: BTreeMap<String, CategoryConfig>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Aki's Blog".to_string(),
            description: "A personal blog website".to_string(),
            articles_dir: "articles".to_string(),
            languages: vec!["en".to_string(), "zh".to_string(), "ja".to_string()],
            default_language: "zh".to_string(),
            index: IndexConfig::default(),
            serve: ServeConfig::default(),
            theme: ThemeConfig::default(),
            colors: ColorConfig::default(),
            categories: BTreeMap::new(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.languages.is_empty() {
            return Err(ConfigError::Validation(
                "languages must not be empty".into(),
            ));
        }
        for lang in &self.languages {
            if lang.is_empty() || lang.contains(['/', '\\', '.']) {
                return Err(ConfigError::Validation(format!(
                    "invalid language code {lang:?}"
                )));
            }
        }
        if !self.supports(&self.default_language) {
            return Err(ConfigError::Validation(format!(
                "default_language {:?} is not listed in languages",
                self.default_language
            )));
        }
        if self.index.refresh_secs == Some(0) {
            return Err(ConfigError::Validation(
                "index.refresh_secs must be positive (omit it to never refresh)".into(),
            ));
        }
        if self.articles_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "articles_dir must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Whether `lang` is one of the configured languages.
    pub fn supports(&self, lang: &str) -> bool {
        self.languages.iter().any(|l| l == lang)
    }

    /// Description configured for a category, if any.
    pub fn category_description(&self, name: &str) -> Option<&str> {
        self.categories
            .get(name)
            .and_then(|c| c.description.as_deref())
            .filter(|d| !d.trim().is_empty())
    }
}

/// Article index cache settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Rebuild the index when the cached snapshot is older than this.
    /// When absent the index is built once and kept for the process lifetime.
    pub refresh_secs: Option<u64>,
}

impl IndexConfig {
    pub fn refresh_interval(&self) -> Option<Duration> {
        self.refresh_secs.map(Duration::from_secs)
    }
}

/// Dev server bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServeConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Layout and typography settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Maximum width of the reading column (CSS value).
    pub content_width: String,
    /// Font stack for titles and headings.
    pub heading_font: String,
    /// Font stack for body text.
    pub body_font: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            content_width: "45rem".to_string(),
            heading_font: "'Cormorant Garamond', Georgia, serif".to_string(),
            body_font: "Poppins, 'Noto Sans SC', system-ui, sans-serif".to_string(),
        }
    }
}

/// Per-category settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CategoryConfig {
    /// Shown under the category name on home page cards.
    pub description: Option<String>,
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Page background.
    pub background: String,
    /// Primary text color.
    pub text: String,
    /// Dates, counts, switcher and menu labels.
    pub text_muted: String,
    /// Card and divider borders.
    pub border: String,
    /// Link color.
    pub link: String,
    /// Link hover color.
    pub link_hover: String,
    /// Background of cards, menu panel and tooltips.
    pub surface: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#171717".to_string(),
            text_muted: "#6b7280".to_string(),
            border: "#e5e7eb".to_string(),
            link: "#111111".to_string(),
            link_hover: "#3d7fdc".to_string(),
            surface: "#ffffff".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#09090b".to_string(),
            text: "#f4f4f5".to_string(),
            text_muted: "#a1a1aa".to_string(),
            border: "#27272a".to_string(),
            link: "#e4e4e7".to_string(),
            link_hover: "#7aa7ea".to_string(),
            surface: "#18181b".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from the site root as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the site config from `<root>/config.toml`, falling back to stock defaults.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(root)?)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Quire Configuration
# ===================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Site title, shown on the home page and in the browser tab.
title = "Aki's Blog"

# Meta description for every page.
description = "A personal blog website"

# Directory holding one subdirectory per language:
#   articles/en/hello.md, articles/zh/hello.md, ...
articles_dir = "articles"

# Supported languages, in language-switcher order.
languages = ["en", "zh", "ja"]

# The root path "/" redirects here. Must be listed in `languages`.
default_language = "zh"

# ---------------------------------------------------------------------------
# Article index
# ---------------------------------------------------------------------------
[index]
# Rebuild the article index when it is older than this many seconds.
# Omit to build it once per process (edits need a restart).
# refresh_secs = 300

# ---------------------------------------------------------------------------
# Dev server (`quire serve`)
# ---------------------------------------------------------------------------
[serve]
host = "127.0.0.1"
port = 3000

# ---------------------------------------------------------------------------
# Theme / layout
# ---------------------------------------------------------------------------
[theme]
# Maximum width of the reading column (CSS value).
content_width = "45rem"

# Font stacks (CSS font-family values).
heading_font = "'Cormorant Garamond', Georgia, serif"
body_font = "Poppins, 'Noto Sans SC', system-ui, sans-serif"

# ---------------------------------------------------------------------------
# Colors - Light mode
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#171717"
text_muted = "#6b7280"    # Dates, counts, menu labels
border = "#e5e7eb"
link = "#111111"
link_hover = "#3d7fdc"
surface = "#ffffff"       # Cards, menu panel, footnote tooltips

# ---------------------------------------------------------------------------
# Colors - Dark mode (toggle button, or system preference)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#09090b"
text = "#f4f4f5"
text_muted = "#a1a1aa"
border = "#27272a"
link = "#e4e4e7"
link_hover = "#7aa7ea"
surface = "#18181b"

# ---------------------------------------------------------------------------
# Categories
# ---------------------------------------------------------------------------
# Optional descriptions shown on home page category cards.
# [categories.Essays]
# description = "Longer pieces, mostly about books."
"##
}

fn scheme_css(scheme: &ColorScheme) -> String {
    format!(
        "--color-bg: {}; --color-text: {}; --color-text-muted: {}; --color-border: {}; \
         --color-link: {}; --color-link-hover: {}; --color-surface: {};",
        scheme.background,
        scheme.text,
        scheme.text_muted,
        scheme.border,
        scheme.link,
        scheme.link_hover,
        scheme.surface,
    )
}

/// Generate CSS custom properties from color config.
///
/// Dark colors apply when `<html>` carries the `dark` class (explicit toggle)
/// or when the system prefers dark and the user has not forced `light`.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    let light = scheme_css(&colors.light);
    let dark = scheme_css(&colors.dark);
    format!(
        ":root {{ {light} }}\n\
         :root.dark {{ {dark} }}\n\
         @media (prefers-color-scheme: dark) {{\n    :root:not(.light) {{ {dark} }}\n}}"
    )
}

/// Generate CSS custom properties from theme config.
pub fn generate_theme_css(theme: &ThemeConfig) -> String {
    format!(
        ":root {{ --content-width: {}; --font-heading: {}; --font-body: {}; }}",
        theme.content_width, theme.heading_font, theme.body_font,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_languages() {
        let config = SiteConfig::default();
        assert_eq!(config.languages, vec!["en", "zh", "ja"]);
        assert_eq!(config.default_language, "zh");
        assert_eq!(config.articles_dir, "articles");
    }

    #[test]
    fn default_config_never_refreshes_index() {
        let config = SiteConfig::default();
        assert_eq!(config.index.refresh_interval(), None);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
default_language = "en"

[colors.light]
background = "#fafafa"
"##;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.default_language, "en");
        assert_eq!(config.colors.light.background, "#fafafa");
        assert_eq!(config.colors.light.text, "#171717");
        assert_eq!(config.colors.dark.background, "#09090b");
    }

    #[test]
    fn parse_category_descriptions() {
        let toml = r#"
[categories.Essays]
description = "Longer pieces"

[categories.Notes]
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.category_description("Essays"), Some("Longer pieces"));
        assert_eq!(config.category_description("Notes"), None);
        assert_eq!(config.category_description("Missing"), None);
    }

    #[test]
    fn blank_category_description_is_none() {
        let toml = r#"
[categories.Essays]
description = "   "
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.category_description("Essays"), None);
    }

    #[test]
    fn refresh_interval_from_secs() {
        let config: SiteConfig = toml::from_str("[index]\nrefresh_secs = 30\n").unwrap();
        assert_eq!(
            config.index.refresh_interval(),
            Some(Duration::from_secs(30))
        );
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.title, "Aki's Blog");
        assert_eq!(config.serve.port, 3000);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "title = \"Notes\"\n\n[serve]\nport = 8080\n",
        )
        .unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.title, "Notes");
        assert_eq!(config.serve.port, 8080);
        assert_eq!(config.serve.host, "127.0.0.1");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "title = [unclosed").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("titel = \"typo\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_nested_key_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[serve]\nbind = \"0.0.0.0\"\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_default_language_must_be_supported() {
        let config = SiteConfig {
            default_language: "fr".to_string(),
            ..SiteConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_empty_languages() {
        let config = SiteConfig {
            languages: vec![],
            ..SiteConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_language_code_with_separator() {
        let config = SiteConfig {
            languages: vec!["zh".to_string(), "../etc".to_string()],
            ..SiteConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_zero_refresh_rejected() {
        let mut config = SiteConfig::default();
        config.index.refresh_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "languages = [\"en\"]\n",
        )
        .unwrap();
        // default_language stays "zh", which is no longer supported
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // Merging
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 3\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"]["x"].as_integer(), Some(1));
        assert_eq!(merged["a"]["y"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_array_replaces() {
        let base: toml::Value = toml::from_str("languages = [\"en\", \"zh\"]\n").unwrap();
        let overlay: toml::Value = toml::from_str("languages = [\"ja\"]\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["languages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.title, defaults.title);
        assert_eq!(config.languages, defaults.languages);
        assert_eq!(config.colors.dark.surface, defaults.colors.dark.surface);
        assert_eq!(config.theme.body_font, defaults.theme.body_font);
    }

    // =========================================================================
    // CSS generation
    // =========================================================================

    #[test]
    fn generate_css_uses_config_colors() {
        let mut colors = ColorConfig::default();
        colors.light.background = "#f0f0f0".to_string();
        colors.dark.background = "#1a1a1a".to_string();

        let css = generate_color_css(&colors);
        assert!(css.contains("--color-bg: #f0f0f0"));
        assert!(css.contains("--color-bg: #1a1a1a"));
    }

    #[test]
    fn generate_css_supports_class_and_media_dark_mode() {
        let css = generate_color_css(&ColorConfig::default());
        assert!(css.contains(":root.dark"));
        assert!(css.contains("prefers-color-scheme: dark"));
        assert!(css.contains(":root:not(.light)"));
    }

    #[test]
    fn generate_theme_css_variables() {
        let css = generate_theme_css(&ThemeConfig::default());
        assert!(css.contains("--content-width: 45rem"));
        assert!(css.contains("--font-heading:"));
        assert!(css.contains("--font-body:"));
    }
}
