//! Keywords from `<meta name="keywords">`.

use tracing::{info, instrument, warn};

use crate::document::{Document, HtmlDocument};
use crate::error::FetchError;
use crate::fetch::Fetcher;
use crate::models::KeywordList;

const KEYWORDS_SELECTOR: &str = r#"meta[name="keywords"]"#;

/// Split the keywords tag's `content` on commas and trim each entry.
///
/// Empty entries (`"a,,b"`) are kept as empty strings. A missing tag or a tag
/// without a non-empty `content` attribute yields an empty list.
pub fn parse_keywords(document: &impl Document) -> KeywordList {
    document
        .select_first(KEYWORDS_SELECTOR)
        .and_then(|meta| meta.attr("content").map(str::to_string))
        .filter(|content| !content.is_empty())
        .map(|content| content.split(',').map(|k| k.trim().to_string()).collect())
        .unwrap_or_default()
}

#[instrument(level = "info", skip(fetcher))]
pub async fn fetch_keywords(fetcher: &Fetcher, url: &str) -> Result<KeywordList, FetchError> {
    let page = fetcher.fetch(url).await?;
    let keywords = parse_keywords(&HtmlDocument::parse(&page.body));
    info!(count = keywords.len(), "Extracted keywords");
    Ok(keywords)
}

/// Keywords of `url`, or an empty list if the page could not be fetched.
pub async fn extract_keywords(fetcher: &Fetcher, url: &str) -> KeywordList {
    fetch_keywords(fetcher, url).await.unwrap_or_else(|e| {
        if e.is_http_status() {
            warn!(%url, status = ?e.status(), "No keywords from an error page");
        } else {
            warn!(%url, error = %e, "Error fetching the URL for keywords");
        }
        KeywordList::new()
    })
}
