//! Keyword block-lists applied to whole articles.
//!
//! Matching is plain substring containment on lowercased text, not whole-word
//! matching, so a short keyword also matches inside longer words. An article is
//! rejected when any keyword of any category occurs anywhere in the combined
//! text of its paragraphs.

use once_cell::sync::Lazy;

/// Religious vocabulary.
pub const RELIGIOUS_KEYWORDS: &[&str] = &[
    "алла", "құдай", "дін", "намаз", "ораза", "мешіт", "имам", "құран", "хадис", "сауап",
    "кәпір", "тәубе", "дұға", "пайғамбар", "шариғат", "инша", "ислам",
];

/// Politics, crime, violence and other negative news.
pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "саясат", "үкімет", "партия", "сайлау", "митинг", "қамау", "тергеу", "полиция", "өлім",
    "зорлық", "қылмыс", "сот", "террор", "босқын", "төбелес", "аштық", "жемқорлық", "түрме",
    "қудалау", "радикал", "оппозиция", "революция",
];

/// Gender-role vocabulary.
pub const GENDER_KEYWORDS: &[&str] = &[
    "әйел", "аналар", "келін", "еркек", "ер адам", "күйеуі", "күйеу", "бағыну",
];

static BILIM_FILTER: Lazy<KeywordFilter> = Lazy::new(|| {
    KeywordFilter::new(vec![
        KeywordCategory::new("religion", RELIGIOUS_KEYWORDS),
        KeywordCategory::new("negative", NEGATIVE_KEYWORDS),
        KeywordCategory::new("gender", GENDER_KEYWORDS),
    ])
});

/// A named block-list.
#[derive(Debug, Clone)]
pub struct KeywordCategory {
    pub name: String,
    keywords: Vec<String>,
}

impl KeywordCategory {
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

/// A keyword found in an article, with the category it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordHit<'a> {
    pub category: &'a str,
    pub keyword: &'a str,
}

/// Category-tagged block-lists concatenated into one.
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    categories: Vec<KeywordCategory>,
}

impl KeywordFilter {
    pub fn new(categories: Vec<KeywordCategory>) -> Self {
        Self { categories }
    }

    /// The religious, negative and gender lists used for the bilim-all.kz corpus.
    pub fn bilim() -> &'static KeywordFilter {
        &BILIM_FILTER
    }

    /// Every configured keyword contained in `text`, in list order.
    ///
    /// `text` is expected to be lowercased already (see [`combined_text`]).
    /// An empty result means the text passes.
    pub fn matches<'a>(&'a self, text: &str) -> Vec<KeywordHit<'a>> {
        self.categories
            .iter()
            .flat_map(|category| {
                category.keywords.iter().map(move |keyword| KeywordHit {
                    category: category.name.as_str(),
                    keyword: keyword.as_str(),
                })
            })
            .filter(|hit| text.contains(hit.keyword))
            .collect()
    }

    pub fn keyword_count(&self) -> usize {
        self.categories.iter().map(|c| c.keywords.len()).sum()
    }
}

/// Lowercased concatenation of all paragraphs, joined by single spaces.
pub fn combined_text(paragraphs: &[String]) -> String {
    paragraphs.join(" ").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bilim_lists_are_complete() {
        assert_eq!(RELIGIOUS_KEYWORDS.len(), 17);
        assert_eq!(NEGATIVE_KEYWORDS.len(), 22);
        assert_eq!(GENDER_KEYWORDS.len(), 8);
        assert_eq!(KeywordFilter::bilim().keyword_count(), 47);
    }

    #[test]
    fn test_clean_text_passes() {
        let text = combined_text(&["Бала ойын арқылы үйренеді.".to_string()]);
        assert!(KeywordFilter::bilim().matches(&text).is_empty());
    }

    #[test]
    fn test_match_reports_keyword_and_category() {
        let text = combined_text(&["Ата-ана мен бала бірге НАМАЗ оқиды.".to_string()]);
        let hits = KeywordFilter::bilim().matches(&text);
        assert_eq!(
            hits,
            vec![KeywordHit {
                category: "religion",
                keyword: "намаз"
            }]
        );
    }

    #[test]
    fn test_substring_matches_inside_longer_words() {
        let filter = KeywordFilter::new(vec![KeywordCategory::new("negative", &["сот"])]);
        assert_eq!(filter.matches("іс сотқа жетті").len(), 1);
    }

    #[test]
    fn test_article_is_judged_on_all_paragraphs() {
        let paragraphs = vec![
            "Бірінші абзац таза.".to_string(),
            "Екінші абзацта күйеуі туралы айтылады.".to_string(),
        ];
        let text = combined_text(&paragraphs);
        let keywords: Vec<&str> = KeywordFilter::bilim()
            .matches(&text)
            .into_iter()
            .map(|hit| hit.keyword)
            .collect();
        assert_eq!(keywords, vec!["күйеуі", "күйеу"]);
    }

    #[test]
    fn test_multi_word_keyword() {
        let text = combined_text(&["Ер адам отбасының тірегі.".to_string()]);
        let hits = KeywordFilter::bilim().matches(&text);
        assert!(hits.iter().any(|hit| hit.keyword == "ер адам"));
    }

    #[test]
    fn test_keywords_are_lowercased_on_construction() {
        let filter = KeywordFilter::new(vec![KeywordCategory::new("custom", &["ҚАЗАҚ"])]);
        assert_eq!(filter.matches("қазақ тілі").len(), 1);
    }
}
