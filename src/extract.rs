//! Selector extractor.
//!
//! Maps a document and a [`SelectorRules`] set to a [`Record`] with exactly
//! the rule set's fields. A selector that matches nothing yields an absent
//! value, never an error.

use tracing::{debug, error, info, instrument, warn};

use crate::config::{SelectorRule, SelectorRules};
use crate::document::{Document, Element, HtmlDocument};
use crate::error::FetchError;
use crate::fetch::Fetcher;
use crate::models::Record;

/// Extract one record from an already parsed document.
pub fn extract(document: &impl Document, rules: &SelectorRules) -> Record {
    let mut record = Record::new();
    for rule in rules.iter() {
        let value = document
            .select_first(&rule.selector)
            .and_then(|el| field_value(&el, rule));
        debug!(field = %rule.field, found = value.is_some(), "Extracted field");
        record.insert(rule.field.clone(), value);
    }
    record
}

/// Trimmed text and the rule's listed attributes, text first unless the rule
/// prefers attributes. Empty results count as absent.
fn field_value(el: &Element, rule: &SelectorRule) -> Option<String> {
    let text = Some(el.text.trim()).filter(|t| !t.is_empty());
    let attr = || {
        rule.attrs
            .iter()
            .filter_map(|name| el.attr(name))
            .map(str::trim)
            .find(|v| !v.is_empty())
    };
    let value = if rule.prefer_attrs {
        attr().or(text)
    } else {
        text.or_else(attr)
    };
    value.map(str::to_string)
}

/// Fetch `url` and extract a record from its body.
///
/// # Arguments
///
/// * `fetcher` - Shared HTTP client
/// * `url` - Page to scrape; the answer must be 2xx
/// * `rules` - Field name to selector mapping; fixes the record's keys and order
///
/// # Returns
///
/// A record holding exactly the rule set's fields, absent where a selector
/// matched nothing, or the [`FetchError`] that prevented reading the page.
#[instrument(level = "info", skip(fetcher, rules), fields(fields = rules.len()))]
pub async fn scrape_website(
    fetcher: &Fetcher,
    url: &str,
    rules: &SelectorRules,
) -> Result<Record, FetchError> {
    let page = fetcher.fetch(url).await?;
    let record = extract(&HtmlDocument::parse(&page.body), rules);
    info!(
        present = record.iter().filter(|(_, v)| v.is_some()).count(),
        total = record.len(),
        "Scraped record"
    );
    Ok(record)
}

/// Like [`scrape_website`], but a failed fetch yields an empty record.
pub async fn scrape_website_lenient(fetcher: &Fetcher, url: &str, rules: &SelectorRules) -> Record {
    match scrape_website(fetcher, url, rules).await {
        Ok(record) => record,
        Err(e) if e.is_transport() => {
            error!(%url, error = %e, "Error fetching the URL");
            Record::new()
        }
        Err(e) => {
            warn!(%url, status = ?e.status(), "Page answered with an error status");
            Record::new()
        }
    }
}
