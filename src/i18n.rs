//! Localized interface strings.
//!
//! Article text is never translated here; this only covers the chrome around
//! it. Unknown languages get the English dictionary.

/// Interface strings for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dictionary {
    pub back_to_home: &'static str,
    pub article: &'static str,
    pub articles: &'static str,
    /// Whole sentence for a category page; `{count}` is replaced by
    /// [`Dictionary::article_count`].
    pub articles_in_category: &'static str,
    pub no_articles_found: &'static str,
    pub menu: &'static str,
    pub home: &'static str,
    pub categories: &'static str,
    pub toggle_dark: &'static str,
    pub toggle_light: &'static str,
    pub page_not_found: &'static str,
    pub no_categories: &'static str,
}

impl Dictionary {
    /// `"1 article"` / `"3 articles"`.
    pub fn article_count(&self, count: usize) -> String {
        let noun = if count == 1 { self.article } else { self.articles };
        format!("{count} {noun}")
    }

    /// `"3 articles in this category"`, phrased per language.
    pub fn category_count(&self, count: usize) -> String {
        self.articles_in_category
            .replace("{count}", &self.article_count(count))
    }
}

const EN: Dictionary = Dictionary {
    back_to_home: "back to home",
    article: "article",
    articles: "articles",
    articles_in_category: "{count} in this category",
    no_articles_found: "No articles found in this category.",
    menu: "Menu",
    home: "Home",
    categories: "Categories",
    toggle_dark: "Switch to dark mode",
    toggle_light: "Switch to light mode",
    page_not_found: "Page not found",
    no_categories: "No articles yet.",
};

const ZH: Dictionary = Dictionary {
    back_to_home: "返回主页",
    article: "篇文章",
    articles: "篇文章",
    articles_in_category: "此分类下共有 {count}",
    no_articles_found: "此分类下暂无文章。",
    menu: "菜单",
    home: "首页",
    categories: "分类",
    toggle_dark: "切换到深色模式",
    toggle_light: "切换到浅色模式",
    page_not_found: "页面不存在",
    no_categories: "暂无文章。",
};

const JA: Dictionary = Dictionary {
    back_to_home: "ホームページに戻る",
    article: "件の記事",
    articles: "件の記事",
    articles_in_category: "このカテゴリーには {count}があります",
    no_articles_found: "このカテゴリーには記事がありません。",
    menu: "メニュー",
    home: "ホーム",
    categories: "カテゴリー",
    toggle_dark: "ダークモードに切り替え",
    toggle_light: "ライトモードに切り替え",
    page_not_found: "ページが見つかりません",
    no_categories: "まだ記事がありません。",
};

/// Dictionary for `lang`, falling back to English.
pub fn dictionary(lang: &str) -> &'static Dictionary {
    match lang {
        "zh" => &ZH,
        "ja" => &JA,
        _ => &EN,
    }
}

/// Human-readable name of a language, in that language.
pub fn language_label(lang: &str) -> String {
    match lang {
        "en" => "English".to_string(),
        "zh" => "中文".to_string(),
        "ja" => "日本語".to_string(),
        other => other.to_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_languages() {
        assert_eq!(dictionary("en").back_to_home, "back to home");
        assert_eq!(dictionary("zh").back_to_home, "返回主页");
        assert_eq!(dictionary("ja").back_to_home, "ホームページに戻る");
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        assert_eq!(dictionary("fr"), dictionary("en"));
        assert_eq!(dictionary(""), dictionary("en"));
    }

    #[test]
    fn article_count_singular_and_plural() {
        let en = dictionary("en");
        assert_eq!(en.article_count(1), "1 article");
        assert_eq!(en.article_count(0), "0 articles");
        assert_eq!(en.article_count(3), "3 articles");
    }

    #[test]
    fn category_count_is_one_phrase() {
        assert_eq!(dictionary("en").category_count(1), "1 article in this category");
        assert_eq!(dictionary("en").category_count(2), "2 articles in this category");
        assert_eq!(dictionary("zh").category_count(3), "此分类下共有 3 篇文章");
        assert_eq!(dictionary("ja").category_count(1), "このカテゴリーには 1 件の記事があります");
    }

    #[test]
    fn labels() {
        assert_eq!(language_label("zh"), "中文");
        assert_eq!(language_label("fr"), "FR");
    }
}
