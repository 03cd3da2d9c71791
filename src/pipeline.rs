//! End-to-end harvest: collect links, then extract, deduplicate, filter,
//! translate and persist one article at a time.
//!
//! # Per-article flow
//!
//! ```text
//! fetched ─► title checked ─► dedupe checked ─► content filtered ─► translated ─► persisted
//!               │                  │                   │
//!               └── skipped ◄──────┴───────────────────┘
//! ```
//!
//! Each article ends as [`ArticleOutcome::Accepted`], as
//! [`ArticleOutcome::Skipped`] with a [`SkipReason`], or as an error. Errors
//! are logged with the article URL and never stop the run; only a failed final
//! write does.
//!
//! Everything runs sequentially on the calling task. The record set, the
//! duplicate tracker and the `text_id` counter are owned by [`Pipeline`].

use crate::dedup::DuplicateTracker;
use crate::errors::HarvestError;
use crate::filter::{KeywordFilter, combined_text};
use crate::models::{ArticleRecord, ScrapedArticle};
use crate::outputs::DatasetStore;
use crate::outputs::xlsx::MAX_CELL_CHARS;
use crate::scrapers::article::{ArticleExtractor, Extraction};
use crate::scrapers::bilim::{DATASET_CATEGORY, SOCIAL_MEDIA_MARKER, SiteProfile};
use crate::scrapers::links::LinkCollector;
use crate::scrapers::{DocumentExtractor, PageSource};
use crate::translate::{TranslateAsync, Translator};
use crate::utils::truncate_for_log;
use chrono::{DateTime, Utc};
use itertools::Itertools;
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

/// Tunables of one run.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub max_links: usize,
    pub max_pages: u32,
    /// No article is processed once the next `text_id` would exceed this.
    pub max_articles: u64,
    /// Rewrite the spreadsheet after every this many accepted articles.
    pub checkpoint_every: usize,
    pub page_delay: Duration,
    pub article_delay: Duration,
    /// Value of the `category` column.
    pub category: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_links: 1000,
            max_pages: 39,
            max_articles: 215,
            checkpoint_every: 10,
            page_delay: Duration::from_millis(300),
            article_delay: Duration::from_millis(200),
            category: DATASET_CATEGORY.to_string(),
        }
    }
}

/// Why an article was not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    LowQualityTitle,
    NoParagraphs,
    Duplicate,
    /// The matched block-list keywords.
    Blocked(Vec<String>),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::LowQualityTitle => write!(f, "low-quality title"),
            SkipReason::NoParagraphs => write!(f, "no paragraphs"),
            SkipReason::Duplicate => write!(f, "duplicate"),
            SkipReason::Blocked(keywords) => {
                write!(f, "blocked keywords: {}", keywords.iter().join(", "))
            }
        }
    }
}

/// Successful end states of one article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleOutcome {
    Accepted { text_id: u64, records: usize },
    Skipped(SkipReason),
}

/// Counters for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub links: usize,
    pub accepted: usize,
    pub low_quality: usize,
    pub empty: usize,
    pub duplicates: usize,
    pub blocked: usize,
    pub failed: usize,
    /// Records appended during this run.
    pub records: usize,
    /// Mid-run checkpoints successfully written.
    pub checkpoints: usize,
}

impl RunReport {
    fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            links: 0,
            accepted: 0,
            low_quality: 0,
            empty: 0,
            duplicates: 0,
            blocked: 0,
            failed: 0,
            records: 0,
            checkpoints: 0,
        }
    }

    fn count_skip(&mut self, reason: &SkipReason) {
        match reason {
            SkipReason::LowQualityTitle => self.low_quality += 1,
            SkipReason::NoParagraphs => self.empty += 1,
            SkipReason::Duplicate => self.duplicates += 1,
            SkipReason::Blocked(_) => self.blocked += 1,
        }
    }
}

/// The orchestrator. Owns the dataset, the duplicate tracker and the id counter.
pub struct Pipeline<'a, P, D, T> {
    source: &'a P,
    document: &'a D,
    translator: &'a Translator<T>,
    site: &'a SiteProfile,
    filter: &'a KeywordFilter,
    settings: PipelineSettings,
    store: DatasetStore,
    tracker: DuplicateTracker,
    next_text_id: u64,
}

impl<'a, P, D, T> Pipeline<'a, P, D, T>
where
    P: PageSource,
    D: DocumentExtractor,
    T: TranslateAsync,
{
    /// Build a pipeline resuming from whatever `store` already holds.
    ///
    /// The duplicate tracker is seeded from the stored records and `text_id`
    /// continues one past the highest stored id.
    pub fn new(
        source: &'a P,
        document: &'a D,
        translator: &'a Translator<T>,
        site: &'a SiteProfile,
        filter: &'a KeywordFilter,
        settings: PipelineSettings,
        store: DatasetStore,
    ) -> Self {
        let tracker = DuplicateTracker::seeded_from(store.records());
        let next_text_id = store.next_text_id();
        Self {
            source,
            document,
            translator,
            site,
            filter,
            settings,
            store,
            tracker,
            next_text_id,
        }
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    pub fn next_text_id(&self) -> u64 {
        self.next_text_id
    }

    /// Run the whole harvest and write the final dataset.
    ///
    /// # Errors
    ///
    /// Only a failure of the final write is returned. Per-article failures and
    /// failed checkpoints are logged and counted.
    #[instrument(level = "info", skip_all)]
    pub async fn run(&mut self) -> Result<RunReport, HarvestError> {
        let mut report = RunReport::new();
        if self.store.is_empty() {
            info!(
                keywords = self.filter.keyword_count(),
                "Pipeline starting on an empty dataset"
            );
        } else {
            info!(
                resumed_rows = self.store.len(),
                known_fingerprints = self.tracker.len(),
                next_text_id = self.next_text_id,
                keywords = self.filter.keyword_count(),
                "Pipeline resuming"
            );
        }

        let links = LinkCollector::new(
            self.source,
            self.document,
            self.site,
            self.settings.max_pages,
            self.settings.page_delay,
        )
        .collect(self.settings.max_links)
        .await;
        report.links = links.len();

        for url in &links {
            if self.next_text_id > self.settings.max_articles {
                info!(
                    max_articles = self.settings.max_articles,
                    "Article cap reached"
                );
                break;
            }

            match self.process_article(url).await {
                Ok(ArticleOutcome::Accepted { text_id, records }) => {
                    report.accepted += 1;
                    report.records += records;
                    info!(%url, text_id, records, "Article accepted");
                    if self.settings.checkpoint_every > 0
                        && report.accepted % self.settings.checkpoint_every == 0
                    {
                        match self.store.checkpoint().await {
                            Ok(()) => report.checkpoints += 1,
                            Err(e) => error!(error = %e, "Checkpoint failed; continuing"),
                        }
                    }
                }
                Ok(ArticleOutcome::Skipped(reason)) => {
                    warn!(%url, %reason, "Article skipped");
                    report.count_skip(&reason);
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(%url, error = %e, "Article abandoned");
                }
            }

            sleep(self.settings.article_delay).await;
        }

        self.store.write_final().await?;
        let finished_at = Utc::now();
        report.finished_at = Some(finished_at);
        info!(
            started_at = %report.started_at.to_rfc3339(),
            finished_at = %finished_at.to_rfc3339(),
            links = report.links,
            accepted = report.accepted,
            low_quality = report.low_quality,
            empty = report.empty,
            duplicates = report.duplicates,
            blocked = report.blocked,
            failed = report.failed,
            records = report.records,
            checkpoints = report.checkpoints,
            total_rows = self.store.len(),
            "Pipeline finished"
        );
        Ok(report)
    }

    /// Take one article from fetch to in-memory persistence.
    async fn process_article(&mut self, url: &str) -> Result<ArticleOutcome, HarvestError> {
        let extraction = ArticleExtractor::new(self.source, self.document)
            .extract(url)
            .await?;
        let article = match extraction {
            Extraction::Article(article) => fit_cells(article),
            Extraction::LowQualityTitle(title) => {
                debug!(%url, title = %truncate_for_log(&title, 80), "Low-quality title");
                return Ok(ArticleOutcome::Skipped(SkipReason::LowQualityTitle));
            }
        };

        // Only these paragraphs are persisted, so only they can seed a
        // fingerprint on restart.
        let retained: Vec<&String> = article
            .paragraphs
            .iter()
            .filter(|p| !is_social_media_boilerplate(p))
            .collect();
        let Some(first_paragraph) = retained.first() else {
            debug!(%url, scraped = article.paragraphs.len(), "No retained paragraphs");
            return Ok(ArticleOutcome::Skipped(SkipReason::NoParagraphs));
        };
        if self.tracker.is_duplicate(&article.title, first_paragraph) {
            debug!(%url, title = %truncate_for_log(&article.title, 80), "Fingerprint already seen");
            return Ok(ArticleOutcome::Skipped(SkipReason::Duplicate));
        }
        self.tracker.record(&article.title, first_paragraph);

        let hits = self.filter.matches(&combined_text(&article.paragraphs));
        if !hits.is_empty() {
            debug!(
                %url,
                title = %truncate_for_log(&article.title, 80),
                categories = %hits.iter().map(|hit| hit.category).unique().join(", "),
                "Block-list match"
            );
            let matched = hits.iter().map(|hit| hit.keyword.to_string()).collect();
            return Ok(ArticleOutcome::Skipped(SkipReason::Blocked(matched)));
        }

        let text_id = self.next_text_id;
        let records = self.translate_article(text_id, &article, &retained).await?;
        let count = records.len();
        self.store.extend(records);
        self.next_text_id += 1;
        Ok(ArticleOutcome::Accepted {
            text_id,
            records: count,
        })
    }

    /// Translate an accepted article into its dataset rows.
    ///
    /// Nothing is returned unless every translation succeeds.
    async fn translate_article(
        &self,
        text_id: u64,
        article: &ScrapedArticle,
        paragraphs: &[&String],
    ) -> Result<Vec<ArticleRecord>, HarvestError> {
        let url = article.url.as_str();
        let title_translated = fit_cell(
            url,
            "title_translated",
            self.translator.translate(&article.title).await?,
        );
        let subcategory_translated = fit_cell(
            url,
            "subcategory_translated",
            self.translator.translate(&article.subcategory).await?,
        );

        let mut records = Vec::with_capacity(paragraphs.len());
        for &paragraph in paragraphs {
            let paragraph_translated = fit_cell(
                url,
                "paragraph_translated",
                self.translator.translate(paragraph).await?,
            );
            records.push(ArticleRecord {
                text_id,
                paragraph: paragraph.clone(),
                paragraph_translated,
                title: article.title.clone(),
                title_translated: title_translated.clone(),
                author: article.author.clone(),
                url: article.url.clone(),
                category: self.settings.category.clone(),
                subcategory: article.subcategory.clone(),
                subcategory_translated: subcategory_translated.clone(),
            });
        }
        Ok(records)
    }
}

fn is_social_media_boilerplate(paragraph: &str) -> bool {
    paragraph.to_lowercase().contains(SOCIAL_MEDIA_MARKER)
}

/// Cut every scraped field down to what one spreadsheet cell holds.
fn fit_cells(article: ScrapedArticle) -> ScrapedArticle {
    let ScrapedArticle {
        url,
        title,
        author,
        subcategory,
        paragraphs,
    } = article;
    ScrapedArticle {
        title: fit_cell(&url, "title", title),
        author: fit_cell(&url, "author", author),
        subcategory: fit_cell(&url, "subcategory", subcategory),
        paragraphs: paragraphs
            .into_iter()
            .map(|p| fit_cell(&url, "paragraph", p))
            .collect(),
        url,
    }
}

fn fit_cell(url: &str, field: &'static str, mut text: String) -> String {
    let cut = text.char_indices().nth(MAX_CELL_CHARS).map(|(i, _)| i);
    if let Some(cut) = cut {
        warn!(
            %url,
            field,
            chars = text.chars().count(),
            limit = MAX_CELL_CHARS,
            "Truncating text to the spreadsheet cell limit"
        );
        text.truncate(cut);
    }
    text
}
