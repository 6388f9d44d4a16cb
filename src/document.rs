//! Queryable document capability.
//!
//! The extractor and keyword analyzer only need "first element matching a
//! selector". [`HtmlDocument`] provides that on top of `scraper`; tests or
//! other backends can implement [`Document`] directly.

use std::collections::HashMap;

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// The parts of a matched element the pipeline reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Concatenated text of the element and its descendants, untrimmed.
    pub text: String,
    pub attributes: HashMap<String, String>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

pub trait Document {
    /// First element in document order matching `selector`, if any.
    fn select_first(&self, selector: &str) -> Option<Element>;
}

pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }
}

impl From<&ElementRef<'_>> for Element {
    fn from(el: &ElementRef<'_>) -> Self {
        Element {
            text: el.text().collect(),
            attributes: el
                .value()
                .attrs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl Document for HtmlDocument {
    fn select_first(&self, selector: &str) -> Option<Element> {
        let selector = match Selector::parse(selector) {
            Ok(s) => s,
            Err(e) => {
                warn!(%selector, error = %e, "Unparsable selector; treating as no match");
                return None;
            }
        };
        self.html.select(&selector).next().map(|el| Element::from(&el))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head>
        <title> Hello </title>
        <meta name="date" content="2024-03-01">
      </head><body>
        <time datetime="2024-01-01">Jan 1</time>
        <p class="lead">Lead <b>bold</b> text</p>
      </body></html>"#;

    #[test]
    fn test_select_first_text_and_attrs() {
        let doc = HtmlDocument::parse(PAGE);
        let p = doc.select_first("p.lead").unwrap();
        assert_eq!(p.text, "Lead bold text");
        assert_eq!(p.attr("class"), Some("lead"));
    }

    #[test]
    fn test_alternation_is_document_order() {
        let doc = HtmlDocument::parse(PAGE);
        // The <meta> in <head> precedes <time> in <body>, regardless of selector order.
        let el = doc.select_first("time[datetime], meta[name='date']").unwrap();
        assert_eq!(el.attr("content"), Some("2024-03-01"));
    }

    #[test]
    fn test_no_match_and_bad_selector() {
        let doc = HtmlDocument::parse(PAGE);
        assert!(doc.select_first("article h2").is_none());
        assert!(doc.select_first("p[").is_none());
    }
}
