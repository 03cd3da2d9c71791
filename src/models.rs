//! Data models for scraped articles and the persisted dataset rows.
//!
//! This module defines the two shapes data takes on its way through the
//! harvester:
//! - [`ScrapedArticle`]: the fields pulled out of one article page
//! - [`ArticleRecord`]: one dataset row, i.e. one retained paragraph together
//!   with its translation and the metadata of its article
//!
//! Records are created once, appended to the dataset and never mutated.

use serde::{Deserialize, Serialize};

/// Column names of the persisted dataset, in order.
///
/// Both the spreadsheet and the comma-separated form use this header row, and
/// the field order of [`ArticleRecord`] matches it.
pub const DATASET_COLUMNS: [&str; 10] = [
    "text_id",
    "paragraph",
    "paragraph_translated",
    "title",
    "title_translated",
    "author",
    "url",
    "category",
    "subcategory",
    "subcategory_translated",
];

/// An article as extracted from its page, before any policy checks.
///
/// Missing fields have already been replaced with sentinel values, and
/// `paragraphs` holds only non-empty, trimmed paragraph texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedArticle {
    /// The page the article was read from.
    pub url: String,
    pub title: String,
    pub author: String,
    /// Secondary category label shown in the article metadata.
    pub subcategory: String,
    pub paragraphs: Vec<String>,
}

/// One row of the dataset: a single paragraph of an accepted article.
///
/// Every paragraph of the same article shares one `text_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub text_id: u64,
    pub paragraph: String,
    pub paragraph_translated: String,
    pub title: String,
    pub title_translated: String,
    pub author: String,
    pub url: String,
    pub category: String,
    pub subcategory: String,
    pub subcategory_translated: String,
}

impl ArticleRecord {
    /// Cell values in [`DATASET_COLUMNS`] order, `text_id` excluded.
    pub fn text_cells(&self) -> [&str; 9] {
        [
            self.paragraph.as_str(),
            self.paragraph_translated.as_str(),
            self.title.as_str(),
            self.title_translated.as_str(),
            self.author.as_str(),
            self.url.as_str(),
            self.category.as_str(),
            self.subcategory.as_str(),
            self.subcategory_translated.as_str(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ArticleRecord {
        ArticleRecord {
            text_id: 7,
            paragraph: "Бала – отбасының қуанышы.".to_string(),
            paragraph_translated: "Ребёнок – радость семьи.".to_string(),
            title: "Бала тәрбиесі".to_string(),
            title_translated: "Воспитание ребёнка".to_string(),
            author: "Айгүл".to_string(),
            url: "https://bilim-all.kz/article/7".to_string(),
            category: "Бала тәрбиесі".to_string(),
            subcategory: "Отбасы".to_string(),
            subcategory_translated: "Семья".to_string(),
        }
    }

    #[test]
    fn test_text_cells_follow_column_order() {
        let record = sample();
        let cells = record.text_cells();
        assert_eq!(cells.len() + 1, DATASET_COLUMNS.len());
        assert_eq!(cells[0], record.paragraph);
        assert_eq!(cells[5], record.url);
        assert_eq!(cells[8], record.subcategory_translated);
    }

    #[test]
    fn test_columns_start_with_text_id() {
        assert_eq!(DATASET_COLUMNS[0], "text_id");
        assert_eq!(DATASET_COLUMNS[9], "subcategory_translated");
    }
}
