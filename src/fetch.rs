//! Document fetcher: a thin wrapper around a shared `reqwest::Client`.
//!
//! [`Fetcher::get`] returns whatever the server answered, while
//! [`Fetcher::fetch`] additionally rejects non-2xx responses with
//! [`FetchError::HttpStatus`]. No retries are attempted.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};

use crate::config::FetchSettings;
use crate::error::FetchError;

/// A completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub url: String,
    pub status: StatusCode,
    /// Header names are matched case-insensitively.
    pub headers: HeaderMap,
    pub body: String,
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Cloneable handle used by every analyzer; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }

    /// GET `url` without judging the status code.
    #[instrument(level = "debug", skip(self))]
    pub async fn get(&self, url: &str) -> Result<FetchResult, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(transport)?;

        debug!(%status, bytes = body.len(), "Fetched");
        Ok(FetchResult {
            url: url.to_string(),
            status,
            headers,
            body,
        })
    }

    /// GET `url`, failing with [`FetchError::HttpStatus`] on a non-2xx answer.
    pub async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
        let result = self.get(url).await?;
        if !result.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: result.status,
            });
        }
        Ok(result)
    }
}
