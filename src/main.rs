//! # webspider
//!
//! Extracts a structured record from a web page using CSS selector rules,
//! enriches it with site metadata and keeps it only if it is recent enough.
//!
//! ## Features
//!
//! - Selector rules from a YAML file or `-s FIELD=SELECTOR` flags
//! - Keywords from the `keywords` meta tag
//! - robots.txt `User-agent`/`Disallow`/`Allow` report (parsed, never enforced)
//! - Technology fingerprint from `X-Powered-By` and `Server` headers
//! - Date filter with a configurable format and threshold
//! - CSV export of surviving records and an optional JSON site report
//!
//! ## Usage
//!
//! ```sh
//! webspider https://example.com/ --since 2024-01-01 -o scraped_data.csv
//! ```
//!
//! ## Architecture
//!
//! 1. **Analysis**: extractor, keyword, robots and technology fetches run concurrently
//! 2. **Filtering**: records without a usable date, or dated before the threshold, are dropped
//! 3. **Output**: CSV of the filtered records, JSON report of the whole analysis

use std::error::Error;

use clap::Parser;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod analyzers;
mod cli;
mod config;
mod document;
mod error;
mod extract;
mod fetch;
mod filter;
mod models;
mod outputs;
mod pipeline;
mod utils;

use cli::Cli;
use config::SelectorRules;
use fetch::Fetcher;
use filter::{SystemClock, filter_by_date, filter_by_date_with_clock};
use models::Directive;

#[tokio::main]
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
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Rules ----
    let mut rules = match &args.rules {
        Some(path) => SelectorRules::load(path).await?,
        None => SelectorRules::defaults(),
    };
    for raw in &args.selectors {
        rules.apply_override(raw)?;
    }
    if rules.is_empty() {
        warn!("No selector rules; the scraped record will have no fields");
    } else if rules.get(&args.date_field).is_none() {
        warn!(
            date_field = %args.date_field,
            "Date field is not produced by any rule; every record will be skipped"
        );
    }

    // ---- Analyze ----
    let fetcher = Fetcher::new(&args.fetch_settings())?;
    info!(url = %args.url, fields = rules.len(), "Scraping website");
    let report = pipeline::analyze_site(&fetcher, args.url.as_str(), &rules).await;
    if report.record.is_empty() {
        warn!(url = %args.url, "Nothing was scraped from the page");
    }

    // ---- Filter ----
    let records = vec![report.record.clone()];
    let filtered = match args.since {
        Some(since) => filter_by_date(records, &args.date_field, &args.date_format, since),
        None => filter_by_date_with_clock(records, &args.date_field, &args.date_format, &SystemClock),
    };

    if !filtered.skipped.is_empty() {
        warn!(
            by_reason = ?filtered.skipped_by_kind(),
            date_field = %args.date_field,
            "Records without a usable date"
        );
        for skipped in &filtered.skipped {
            debug!(
                index = skipped.index,
                record = %skipped.record,
                reason = %skipped.reason,
                "Skipped record"
            );
        }
    }

    if filtered.kept.is_empty() {
        info!(since = ?args.since, "No data matching the date criteria");
    } else {
        for record in &filtered.kept {
            info!(%record, "Filtered record");
        }
    }

    // ---- Output ----
    if let Err(e) = outputs::csv::export_csv(&filtered.kept, &args.output).await {
        error!(path = %args.output.display(), error = %e, "Failed to write CSV");
    }

    if let Some(path) = &args.report {
        if let Err(e) = outputs::json::write_report(&report, path).await {
            error!(path = %path.display(), error = %e, "Failed to write site report");
        }
    }

    info!(keywords = ?report.keywords, "Keywords");
    if report.robots.is_empty() {
        info!("No robots.txt rules");
    } else {
        info!(
            user_agents = ?report.robots.get(Directive::UserAgent),
            disallowed = report.robots.get(Directive::Disallow).len(),
            robots = %serde_json::to_string(&report.robots)?,
            "Robots.txt rules"
        );
    }
    info!(technologies = ?report.technologies, "Detected technologies");

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
