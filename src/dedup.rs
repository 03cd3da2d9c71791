//! Duplicate detection by article fingerprint.
//!
//! A fingerprint is the lowercased title paired with the lowercased first 100
//! characters of the article's first paragraph. Fingerprints are only added,
//! never removed, and live for the whole run.

use crate::models::ArticleRecord;
use std::collections::HashSet;

/// Number of leading characters of the first paragraph that take part in the fingerprint.
pub const FINGERPRINT_PREFIX_CHARS: usize = 100;

/// `(lowercased title, lowercased paragraph prefix)`.
pub type Fingerprint = (String, String);

pub fn fingerprint(title: &str, first_paragraph: &str) -> Fingerprint {
    let prefix: String = first_paragraph
        .chars()
        .take(FINGERPRINT_PREFIX_CHARS)
        .collect();
    (title.to_lowercase(), prefix.to_lowercase())
}

/// Set of fingerprints of the articles already ingested.
#[derive(Debug, Default)]
pub struct DuplicateTracker {
    seen: HashSet<Fingerprint>,
}

impl DuplicateTracker {
    /// Seed the tracker from persisted rows.
    ///
    /// Every row contributes its `(title, paragraph)` fingerprint, which
    /// covers the first paragraph of each stored article.
    pub fn seeded_from(records: &[ArticleRecord]) -> Self {
        Self {
            seen: records
                .iter()
                .map(|r| fingerprint(&r.title, &r.paragraph))
                .collect(),
        }
    }

    pub fn is_duplicate(&self, title: &str, first_paragraph: &str) -> bool {
        self.seen.contains(&fingerprint(title, first_paragraph))
    }

    pub fn record(&mut self, title: &str, first_paragraph: &str) {
        self.seen.insert(fingerprint(title, first_paragraph));
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_case_insensitive() {
        assert_eq!(
            fingerprint("ҚАЗАҚ ТІЛІ", "Ана ТІЛІ"),
            fingerprint("қазақ тілі", "ана тілі")
        );
    }

    #[test]
    fn test_fingerprint_counts_chars_not_bytes() {
        let paragraph = "ә".repeat(150);
        let (_, prefix) = fingerprint("t", &paragraph);
        assert_eq!(prefix.chars().count(), FINGERPRINT_PREFIX_CHARS);
    }

    #[test]
    fn test_only_prefix_matters() {
        let shared = "а".repeat(FINGERPRINT_PREFIX_CHARS);
        let mut tracker = DuplicateTracker::default();
        tracker.record("Тақырып", &format!("{shared} бірінші жалғасы"));
        assert!(tracker.is_duplicate("тақырып", &format!("{shared} басқа жалғасы")));
    }

    #[test]
    fn test_lookup_does_not_record() {
        let mut tracker = DuplicateTracker::default();
        assert!(!tracker.is_duplicate("Тақырып", "Абзац"));
        assert!(!tracker.is_duplicate("Тақырып", "Абзац"));
        tracker.record("Тақырып", "Абзац");
        assert!(tracker.is_duplicate("Тақырып", "Абзац"));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_different_first_paragraph_is_not_duplicate() {
        let mut tracker = DuplicateTracker::default();
        tracker.record("Тақырып", "Бірінші мәтін");
        assert!(!tracker.is_duplicate("Тақырып", "Екінші мәтін"));
    }

    #[test]
    fn test_seeded_from_records() {
        let record = ArticleRecord {
            text_id: 1,
            paragraph: "Абзац".to_string(),
            paragraph_translated: "Абзац".to_string(),
            title: "Тақырып".to_string(),
            title_translated: "Заголовок".to_string(),
            author: "Автор".to_string(),
            url: "https://bilim-all.kz/article/1".to_string(),
            category: "Бала тәрбиесі".to_string(),
            subcategory: "Не указано".to_string(),
            subcategory_translated: "Не указано".to_string(),
        };
        let tracker = DuplicateTracker::seeded_from(&[record]);
        assert!(tracker.is_duplicate("ТАҚЫРЫП", "абзац"));
    }
}
