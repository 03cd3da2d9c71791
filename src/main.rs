//! # Bilim Harvest
//!
//! Builds a bilingual Kazakh/Russian text corpus from the "Бала тәрбиесі"
//! listing of [bilim-all.kz](https://bilim-all.kz). Articles are filtered by
//! keyword block-lists, translated paragraph by paragraph and stored as a
//! deduplicated, resumable table.
//!
//! ## Usage
//!
//! ```sh
//! bilim_harvest --dataset bilim_articles_300_final.xlsx
//! ```
//!
//! ## Architecture
//!
//! The application follows a sequential pipeline:
//! 1. **Resume**: load the existing spreadsheet, if any, and seed the duplicate tracker
//! 2. **Indexing**: collect article URLs from the paginated listing
//! 3. **Processing**: per article, extract → dedupe → filter → translate → append
//! 4. **Output**: checkpoint the spreadsheet every few articles, then write
//!    the spreadsheet and the CSV export
//!
//! Rerunning after a crash resumes from the last checkpoint without
//! re-ingesting stored articles.
//!
//! ## Translation template
//!
//! `awful_aj` resolves templates by name inside its own config directory, not
//! in this repository. Copy `templates/kk_to_ru_translator.yaml` into the
//! `templates/` subdirectory of the awful_aj config directory (next to its
//! `config.yaml`) before the first run, or pass `--template` with the name of
//! a template already installed there.

use awful_aj::{config, config_dir, template};
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod dedup;
mod errors;
mod filter;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod translate;
mod utils;

use cli::Cli;
use filter::KeywordFilter;
use outputs::DatasetStore;
use pipeline::Pipeline;
use scrapers::HttpPageSource;
use scrapers::bilim::{BilimSelectors, SiteProfile};
use translate::{KAZAKH_TO_RUSSIAN, LlmBackend, Translator};
use utils::{ensure_writable_dir, parent_dir};

#[tokio::main(flavor = "current_thread")]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("bilim_harvest starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // Fail before any network traffic if the dataset cannot be written.
    for output in [&args.dataset, &args.csv] {
        let dir = parent_dir(output);
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(path = %dir.display(), error = %e, "Output directory is not writable");
            return Err(e);
        }
    }

    // ---- Translation backend ----
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => config_dir()?.join("config.yaml"),
    };
    let config_path = config_path
        .to_str()
        .ok_or("translation config path is not valid UTF-8")?
        .to_string();
    let llm_config = config::load_config(&config_path)?;
    info!(%config_path, "Loaded translation backend configuration");
    let llm_template = template::load_template(&args.template).await?;
    info!(template = %args.template, "Loaded translation template");

    let translator = Translator::new(
        LlmBackend {
            config: &llm_config,
            template: &llm_template,
            languages: KAZAKH_TO_RUSSIAN,
        },
        args.max_translation_chars,
    );

    // ---- Source site ----
    let source = HttpPageSource::new()?;
    let site = SiteProfile::bilim()?;
    let selectors = BilimSelectors::new()?;

    // ---- Resume ----
    let store = DatasetStore::load(&args.dataset, &args.csv).await?;

    let mut pipeline = Pipeline::new(
        &source,
        &selectors,
        &translator,
        &site,
        KeywordFilter::bilim(),
        args.settings(),
        store,
    );

    let report = match pipeline.run().await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Failed to write the final dataset");
            return Err(e.into());
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        accepted = report.accepted,
        failed = report.failed,
        rows = pipeline.store().len(),
        next_text_id = pipeline.next_text_id(),
        xlsx = %pipeline.store().spreadsheet_path().display(),
        csv = %pipeline.store().csv_path().display(),
        "Execution complete"
    );

    Ok(())
}
