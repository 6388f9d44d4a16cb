//! Header-based technology fingerprint.
//!
//! Deliberately narrow: only `X-Powered-By` and `Server` are consulted, in
//! that order, and their raw values are reported unchanged.

use reqwest::header::HeaderMap;
use tracing::{debug, info, instrument, warn};

use crate::error::FetchError;
use crate::fetch::Fetcher;
use crate::models::TechnologyList;

pub const FINGERPRINT_HEADERS: [&str; 2] = ["x-powered-by", "server"];

pub fn detect_from_headers(headers: &HeaderMap) -> TechnologyList {
    FINGERPRINT_HEADERS
        .iter()
        .filter_map(|name| {
            let value = headers.get(*name)?;
            match value.to_str() {
                Ok(v) => Some(v.to_string()),
                Err(_) => {
                    debug!(header = *name, "Skipping non-ASCII header value");
                    None
                }
            }
        })
        .collect()
}

/// The status code is not checked; error pages carry the same headers.
#[instrument(level = "info", skip(fetcher))]
pub async fn fetch_technologies(
    fetcher: &Fetcher,
    url: &str,
) -> Result<TechnologyList, FetchError> {
    let response = fetcher.get(url).await?;
    let technologies = detect_from_headers(&response.headers);
    info!(found = ?technologies, "Detected technologies");
    Ok(technologies)
}

pub async fn detect_web_technologies(fetcher: &Fetcher, url: &str) -> TechnologyList {
    fetch_technologies(fetcher, url).await.unwrap_or_else(|e| {
        warn!(%url, error = %e, "Error detecting technologies");
        TechnologyList::new()
    })
}
