//! robots.txt reader.
//!
//! Only reports the policy; nothing in this crate enforces it. Recognized
//! lines are `User-agent`, `Disallow` and `Allow`, matched case-sensitively on
//! the token before the first colon. Every other line is ignored.

use reqwest::StatusCode;
use tracing::{info, instrument, warn};

use crate::error::FetchError;
use crate::fetch::Fetcher;
use crate::models::{Directive, RobotsPolicy};

/// `{root}/robots.txt`, after dropping one trailing slash from `root`.
pub fn robots_url(root: &str) -> String {
    let root = root.strip_suffix('/').unwrap_or(root);
    format!("{root}/robots.txt")
}

pub fn parse_robots(text: &str) -> RobotsPolicy {
    let mut policy = RobotsPolicy::default();
    for line in text.lines().map(str::trim) {
        let (name, value) = line.split_once(':').unwrap_or((line, ""));
        if let Ok(directive) = name.trim().parse::<Directive>() {
            policy.push(directive, value.trim());
        }
    }
    policy
}

/// Fetch and parse robots.txt for a site root.
///
/// # Arguments
///
/// * `fetcher` - Shared HTTP client
/// * `root` - Site root; `/robots.txt` is appended after one trailing slash is dropped
///
/// # Returns
///
/// * `Ok(Some(policy))` - The server answered `200 OK`
/// * `Ok(None)` - Any other status, including other 2xx codes
/// * `Err(_)` - The request failed before a response arrived
#[instrument(level = "info", skip(fetcher))]
pub async fn fetch_robots(
    fetcher: &Fetcher,
    root: &str,
) -> Result<Option<RobotsPolicy>, FetchError> {
    let response = fetcher.get(&robots_url(root)).await?;
    if response.status != StatusCode::OK {
        info!(url = %response.url, status = %response.status, "robots.txt not found");
        return Ok(None);
    }
    let policy = parse_robots(&response.body);
    info!(
        url = %response.url,
        directives = policy.directives().count(),
        "Parsed robots.txt"
    );
    Ok(Some(policy))
}

/// Robots policy of `root`; empty when the file is missing or unreachable.
///
/// The two cases are indistinguishable here. Use [`fetch_robots`] to tell
/// them apart.
pub async fn check_robots_txt(fetcher: &Fetcher, root: &str) -> RobotsPolicy {
    match fetch_robots(fetcher, root).await {
        Ok(Some(policy)) => policy,
        Ok(None) => {
            warn!(url = %robots_url(root), "robots.txt not found");
            RobotsPolicy::default()
        }
        Err(e) => {
            warn!(error = %e, "Error fetching robots.txt");
            RobotsPolicy::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::tests::test_fetcher;
    use httpmock::prelude::*;

    #[test]
    fn test_robots_url() {
        assert_eq!(robots_url("https://a.com/"), "https://a.com/robots.txt");
        assert_eq!(robots_url("https://a.com"), "https://a.com/robots.txt");
        assert_eq!(robots_url("https://a.com//"), "https://a.com//robots.txt");
    }

    #[test]
    fn test_parse_basic_policy() {
        let policy = parse_robots("User-agent: *\nDisallow: /admin\nDisallow: /tmp\n");
        assert_eq!(policy.get(Directive::UserAgent), ["*"]);
        assert_eq!(policy.get(Directive::Disallow), ["/admin", "/tmp"]);
        assert!(policy.get(Directive::Allow).is_empty());
        assert_eq!(
            policy.directives().collect::<Vec<_>>(),
            vec![Directive::UserAgent, Directive::Disallow]
        );
    }

    #[test]
    fn test_parse_comments_and_blanks_only() {
        let policy = parse_robots("# comment\n\n   \n# User-agent: *\n");
        assert!(policy.is_empty());
    }

    #[test]
    fn test_parse_ignores_other_lines() {
        let text = "\
Sitemap: https://a.com/sitemap.xml
  Allow :  /public
user-agent: lowercase
User-agent-extra: nope
Crawl-delay: 10
Disallow:
Allow: /x:y
";
        let policy = parse_robots(text);
        assert_eq!(policy.get(Directive::Allow), ["/public", "/x:y"]);
        assert_eq!(policy.get(Directive::Disallow), [""]);
        assert!(policy.get(Directive::UserAgent).is_empty());
    }

    #[tokio::test]
    async fn test_fetch_robots_ok() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/robots.txt");
                then.status(200).body("User-agent: *\r\nAllow: /\r\n");
            })
            .await;

        let policy = check_robots_txt(&test_fetcher(), &server.url("/")).await;
        mock.assert_async().await;
        assert_eq!(policy.get(Directive::UserAgent), ["*"]);
        assert_eq!(policy.get(Directive::Allow), ["/"]);
    }

    #[tokio::test]
    async fn test_fetch_robots_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/robots.txt");
                then.status(404).body("User-agent: *\n");
            })
            .await;

        let fetcher = test_fetcher();
        assert!(fetch_robots(&fetcher, &server.url("")).await.unwrap().is_none());
        assert!(check_robots_txt(&fetcher, &server.url("")).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_robots_non_200_success_is_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/robots.txt");
                then.status(204);
            })
            .await;

        let result = fetch_robots(&test_fetcher(), &server.url("/")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_fetch_robots_transport_error() {
        let fetcher = test_fetcher();
        let err = fetch_robots(&fetcher, "http://127.0.0.1:9/")
            .await
            .expect_err("connection should fail");
        assert!(err.is_transport());
        assert!(err.to_string().contains("http://127.0.0.1:9/robots.txt"));

        assert!(check_robots_txt(&fetcher, "http://127.0.0.1:9/").await.is_empty());
    }
}
