//! Command-line interface for the harvester.
//!
//! Every option has a default, so running the binary without arguments
//! harvests the "Бала тәрбиесі" listing into
//! `bilim_articles_300_final.{xlsx,csv}` in the current directory.

use crate::pipeline::PipelineSettings;
use crate::scrapers::bilim::DATASET_CATEGORY;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Command-line arguments for the harvester.
///
/// # Examples
///
/// ```sh
/// # Resume (or start) the default dataset
/// bilim_harvest
///
/// # Small trial run into another directory
/// bilim_harvest --dataset trial/articles.xlsx --csv trial/articles.csv --max-articles 5
///
/// # Use a specific translation backend config
/// bilim_harvest --config ~/.config/aj/config.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Spreadsheet dataset, resumed from if present and rewritten on checkpoints
    #[arg(long, default_value = "bilim_articles_300_final.xlsx")]
    pub dataset: PathBuf,

    /// Comma-separated export written at the end of the run
    #[arg(long, default_value = "bilim_articles_300_final.csv")]
    pub csv: PathBuf,

    /// Path to the translation backend's config.yaml (defaults to the awful_aj config dir)
    #[arg(short, long, env = "BILIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Name of the chat template holding the translation prompt
    #[arg(long, env = "BILIM_TEMPLATE", default_value = "kk_to_ru_translator")]
    pub template: String,

    /// Maximum number of article links to collect
    #[arg(long, default_value_t = 1000)]
    pub max_links: usize,

    /// Highest listing page to visit
    #[arg(long, default_value_t = 39)]
    pub max_pages: u32,

    /// Stop once the dataset holds this many articles
    #[arg(long, default_value_t = 215)]
    pub max_articles: u64,

    /// Rewrite the spreadsheet after every N accepted articles
    #[arg(long, default_value_t = 10)]
    pub checkpoint_every: usize,

    /// Pause between listing pages, in milliseconds
    #[arg(long, default_value_t = 300)]
    pub page_delay_ms: u64,

    /// Pause between articles, in milliseconds
    #[arg(long, default_value_t = 200)]
    pub article_delay_ms: u64,

    /// Maximum length of a single translation, in characters
    #[arg(long, default_value_t = 1000)]
    pub max_translation_chars: usize,
}

impl Cli {
    pub fn settings(&self) -> PipelineSettings {
        PipelineSettings {
            max_links: self.max_links,
            max_pages: self.max_pages,
            max_articles: self.max_articles,
            checkpoint_every: self.checkpoint_every,
            page_delay: Duration::from_millis(self.page_delay_ms),
            article_delay: Duration::from_millis(self.article_delay_ms),
            category: DATASET_CATEGORY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_pipeline_defaults() {
        let cli = Cli::parse_from(["bilim_harvest"]);
        let settings = cli.settings();
        let defaults = PipelineSettings::default();

        assert_eq!(cli.dataset, PathBuf::from("bilim_articles_300_final.xlsx"));
        assert_eq!(cli.csv, PathBuf::from("bilim_articles_300_final.csv"));
        assert_eq!(settings.max_links, defaults.max_links);
        assert_eq!(settings.max_pages, defaults.max_pages);
        assert_eq!(settings.max_articles, defaults.max_articles);
        assert_eq!(settings.checkpoint_every, defaults.checkpoint_every);
        assert_eq!(settings.page_delay, defaults.page_delay);
        assert_eq!(settings.article_delay, defaults.article_delay);
        assert_eq!(settings.category, defaults.category);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "bilim_harvest",
            "--dataset",
            "/tmp/d.xlsx",
            "--max-articles",
            "5",
            "--page-delay-ms",
            "0",
            "-c",
            "/tmp/config.yaml",
        ]);

        assert_eq!(cli.dataset, PathBuf::from("/tmp/d.xlsx"));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/config.yaml")));
        assert_eq!(cli.settings().max_articles, 5);
        assert_eq!(cli.settings().page_delay, Duration::ZERO);
    }
}
