//! Command-line interface definitions for webspider.
//!
//! Every option can also be supplied through an environment variable.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use url::Url;

use crate::config::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, FetchSettings};
use crate::filter::DEFAULT_DATE_FORMAT;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Default rules (title, date, description), records dated today or later
/// webspider https://example.com/
///
/// # Custom rules and an explicit threshold
/// webspider https://example.com/ --rules rules.yaml --since 2024-01-01 -o out.csv
///
/// # Ad-hoc rule on top of the defaults, plus a JSON report
/// webspider https://example.com/ -s "headline=h1" --report report.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Page to scrape; robots.txt is looked up directly beneath it
    #[arg(env = "WEBSPIDER_URL", default_value = "https://internshala.com/")]
    pub url: Url,

    /// YAML file mapping field names to CSS selectors
    #[arg(short, long, env = "WEBSPIDER_RULES")]
    pub rules: Option<PathBuf>,

    /// Extra FIELD=SELECTOR rule; replaces a rule of the same name (repeatable)
    #[arg(short = 's', long = "selector", value_name = "FIELD=SELECTOR")]
    pub selectors: Vec<String>,

    /// Field holding the record's date
    #[arg(long, env = "WEBSPIDER_DATE_FIELD", default_value = "date")]
    pub date_field: String,

    /// strftime pattern of the date field (date only)
    #[arg(long, env = "WEBSPIDER_DATE_FORMAT", default_value = DEFAULT_DATE_FORMAT)]
    pub date_format: String,

    /// Keep records dated on or after this day (YYYY-MM-DD); defaults to today
    #[arg(long, env = "WEBSPIDER_SINCE")]
    pub since: Option<NaiveDate>,

    /// CSV output path
    #[arg(short, long, env = "WEBSPIDER_OUTPUT", default_value = "scraped_data.csv")]
    pub output: PathBuf,

    /// Optional JSON site report path
    #[arg(long, env = "WEBSPIDER_REPORT")]
    pub report: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, env = "WEBSPIDER_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[arg(long, env = "WEBSPIDER_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

impl Cli {
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            timeout_secs: self.timeout_secs,
            user_agent: self.user_agent.clone(),
        }
    }
}
