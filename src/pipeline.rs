//! Site analysis pipeline.
//!
//! The extractor and the three metadata analyzers each fetch their own URL and
//! share nothing but the [`Fetcher`], so they are polled concurrently and the
//! report is assembled once all four have finished. Failures inside any of
//! them degrade to empty values; assembling a report never fails.

use futures::join;
use tracing::{info, instrument};

use crate::analyzers::{keywords, robots, technology};
use crate::config::SelectorRules;
use crate::extract::scrape_website_lenient;
use crate::fetch::Fetcher;
use crate::models::SiteReport;

#[instrument(level = "info", skip(fetcher, rules))]
pub async fn analyze_site(fetcher: &Fetcher, url: &str, rules: &SelectorRules) -> SiteReport {
    let (record, keywords, robots, technologies) = join!(
        scrape_website_lenient(fetcher, url, rules),
        keywords::extract_keywords(fetcher, url),
        robots::check_robots_txt(fetcher, url),
        technology::detect_web_technologies(fetcher, url),
    );

    info!(
        fields = record.len(),
        keywords = keywords.len(),
        robots_directives = robots.directives().count(),
        technologies = technologies.len(),
        "Site analysis complete"
    );

    SiteReport {
        url: url.to_string(),
        record,
        keywords,
        robots,
        technologies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::tests::test_fetcher;
    use crate::models::Directive;
    use httpmock::prelude::*;

    const HOME: &str = r#"<html><head>
        <title>Example Home</title>
        <meta name="keywords" content="alpha, beta">
        <meta name="date" content="2024-04-01">
      </head><body></body></html>"#;

    #[tokio::test]
    async fn test_analyze_site_collects_everything() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/");
                then.status(200)
                    .header("Server", "nginx")
                    .header("X-Powered-By", "Next.js")
                    .body(HOME);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/robots.txt");
                then.status(200).body("User-agent: *\nDisallow: /private\n");
            })
            .await;

        let report = analyze_site(&test_fetcher(), &server.url("/"), &SelectorRules::defaults()).await;

        assert_eq!(report.record.value("title"), Some("Example Home"));
        assert_eq!(report.record.value("date"), Some("2024-04-01"));
        assert_eq!(report.record.get("description"), Some(None));
        assert_eq!(report.keywords, vec!["alpha", "beta"]);
        assert_eq!(report.robots.get(Directive::Disallow), ["/private"]);
        assert_eq!(report.technologies, vec!["Next.js", "nginx"]);
    }

    #[tokio::test]
    async fn test_analyze_unreachable_site_is_empty() {
        let report = analyze_site(
            &test_fetcher(),
            "http://127.0.0.1:9/",
            &SelectorRules::defaults(),
        )
        .await;

        assert!(report.record.is_empty());
        assert!(report.keywords.is_empty());
        assert!(report.robots.is_empty());
        assert!(report.technologies.is_empty());
    }
}
