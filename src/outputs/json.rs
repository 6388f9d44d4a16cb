//! JSON site report.
//!
//! Serializes a [`SiteReport`] (record, keywords, robots policy and detected
//! technologies) so the metadata gathered alongside the CSV is not lost.
//!
//! ```json
//! {
//!   "url": "https://example.com/",
//!   "record": { "title": "Example", "date": null },
//!   "keywords": ["a", "b"],
//!   "robots": { "User-agent": ["*"], "Disallow": ["/admin"] },
//!   "technologies": ["nginx"]
//! }
//! ```

use std::error::Error;
use std::path::Path;

use tokio::fs;
use tracing::{error, info, instrument};

use crate::models::SiteReport;
use crate::utils::ensure_parent_dir;

/// Write `report` as pretty-printed JSON, creating parent directories.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_report(report: &SiteReport, path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;

    if let Err(e) = ensure_parent_dir(path).await {
        error!(error = %e, "Failed to create report directory");
        return Err(e.into());
    }

    fs::write(path, json).await?;
    info!("Wrote site report");
    Ok(())
}
