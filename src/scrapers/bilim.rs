//! bilim-all.kz markup contract.
//!
//! The listing lives at `https://bilim-all.kz/article/list/{category}?page={n}`
//! and links to articles with site-relative URLs. Article pages keep their
//! title and body under `div.blogtext` and their author and category links
//! under `div.blogmetas`.

use super::DocumentExtractor;
use crate::errors::HarvestError;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

pub const BASE_URL: &str = "https://bilim-all.kz";
/// Listing category "Бала тәрбиесі" (child upbringing).
pub const LISTING_CATEGORY_ID: u32 = 14;
/// Category label stored in every dataset row.
pub const DATASET_CATEGORY: &str = "Бала тәрбиесі";

pub const UNTITLED: &str = "Без названия";
pub const UNKNOWN_AUTHOR: &str = "Неизвестен";
pub const UNSPECIFIED_SUBCATEGORY: &str = "Не указано";

/// Titles containing this phrase are low-quality posts and skipped.
pub const LOW_QUALITY_TITLE_MARKER: &str = "көк сөз";
/// Paragraphs containing this phrase are social-media boilerplate.
pub const SOCIAL_MEDIA_MARKER: &str = "әлеуметтік желілерде";

const LINK_SELECTOR: &str = "figure figcaption h2 a[href]";
const TITLE_SELECTOR: &str = "div.blogtext h1.heading";
const AUTHOR_SELECTOR: &str = "div.blogmetas li a[href^='/user/profile/']";
const CATEGORY_SELECTOR: &str = "div.blogmetas li i.fa-align-justify ~ a";
const PARAGRAPH_SELECTOR: &str = "div.blogtext p";

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Where the catalog lives and which of its listings is harvested.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    pub base_url: Url,
    pub category_id: u32,
}

impl SiteProfile {
    pub fn bilim() -> Result<Self, HarvestError> {
        let base_url = Url::parse(BASE_URL).map_err(|e| HarvestError::Fetch {
            url: BASE_URL.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            base_url,
            category_id: LISTING_CATEGORY_ID,
        })
    }

    /// URL of listing page `page` (1-based).
    pub fn listing_url(&self, page: u32) -> String {
        format!(
            "{}/article/list/{}?page={}",
            self.base_url.as_str().trim_end_matches('/'),
            self.category_id,
            page
        )
    }

    /// Resolve a link found on a listing page to an absolute URL.
    pub fn resolve(&self, href: &str) -> Option<String> {
        self.base_url.join(href).ok().map(|u| u.to_string())
    }
}

/// Compiled selectors for the bilim-all.kz page layout.
#[derive(Debug, Clone)]
pub struct BilimSelectors {
    links: Selector,
    title: Selector,
    author: Selector,
    categories: Selector,
    paragraphs: Selector,
}

impl BilimSelectors {
    pub fn new() -> Result<Self, HarvestError> {
        Ok(Self {
            links: compile(LINK_SELECTOR)?,
            title: compile(TITLE_SELECTOR)?,
            author: compile(AUTHOR_SELECTOR)?,
            categories: compile(CATEGORY_SELECTOR)?,
            paragraphs: compile(PARAGRAPH_SELECTOR)?,
        })
    }
}

fn compile(selector: &str) -> Result<Selector, HarvestError> {
    Selector::parse(selector).map_err(|e| HarvestError::Selector(format!("{selector}: {e}")))
}

/// Text content of an element with whitespace runs collapsed and trimmed.
pub fn element_text(element: ElementRef<'_>) -> String {
    let text = element.text().collect::<String>();
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}

impl DocumentExtractor for BilimSelectors {
    fn article_links(&self, doc: &Html) -> Vec<String> {
        doc.select(&self.links)
            .filter_map(|a| a.value().attr("href"))
            .map(str::to_string)
            .collect()
    }

    fn title(&self, doc: &Html) -> Option<String> {
        doc.select(&self.title)
            .next()
            .map(element_text)
            .and_then(non_empty)
    }

    fn author(&self, doc: &Html) -> Option<String> {
        doc.select(&self.author)
            .next()
            .map(element_text)
            .and_then(non_empty)
    }

    fn subcategory(&self, doc: &Html) -> Option<String> {
        doc.select(&self.categories)
            .nth(1)
            .map(element_text)
            .and_then(non_empty)
    }

    fn paragraphs(&self, doc: &Html) -> Vec<String> {
        doc.select(&self.paragraphs).map(element_text).collect()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! HTML shaped like bilim-all.kz pages.

    pub fn listing_page(hrefs: &[&str]) -> String {
        let items: String = hrefs
            .iter()
            .map(|href| {
                format!(
                    r#"<div class="item"><figure><img src="/img.jpg"><figcaption><h2><a href="{href}">Мақала</a></h2></figcaption></figure></div>"#
                )
            })
            .collect();
        format!("<html><body><div class=\"list\">{items}</div></body></html>")
    }

    pub fn article_page(title: &str, paragraphs: &[&str]) -> String {
        let body: String = paragraphs.iter().map(|p| format!("<p>{p}</p>")).collect();
        format!(
            r#"<html><body>
<div class="blogmetas"><ul>
  <li><i class="fa fa-user"></i> <a href="/user/profile/42">Айгүл Сапарова</a></li>
  <li><i class="fa fa-align-justify"></i> <a href="/article/list/14">Бала тәрбиесі</a>, <a href="/article/list/31">Отбасы</a></li>
</ul></div>
<div class="blogtext"><h1 class="heading">{title}</h1>{body}</div>
</body></html>"#
        )
    }
}
