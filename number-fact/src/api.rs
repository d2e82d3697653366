//! numbersapi.com client
//!
//! The fetch effect only needs "give me text about this number", so the
//! client sits behind [`NumberFactClient`] and tests substitute their own.

use async_trait::async_trait;
use tracing::debug;

/// The one failure the app shows to the user.
///
/// Transport and status details are logged where they happen; the reducer
/// only learns that the fetch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Failed to fetch fact")]
pub struct FactFetchFailed;

/// Why a fetch failed.
#[derive(Debug, thiserror::Error)]
pub enum FactError {
    #[error("fact request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("fact service returned {0}")]
    Status(reqwest::StatusCode),
}

impl From<FactError> for FactFetchFailed {
    fn from(_: FactError) -> Self {
        FactFetchFailed
    }
}

/// Source of number facts.
#[async_trait]
pub trait NumberFactClient: Send + Sync {
    /// Fetch a short piece of trivia about `number`.
    async fn fetch(&self, number: i64) -> Result<String, FactError>;
}

/// Fetches plain-text facts over HTTP from `{base_url}/{number}`.
#[derive(Debug, Clone)]
pub struct HttpNumberFactClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpNumberFactClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, number: i64) -> String {
        format!("{}/{}", self.base_url, number)
    }
}

#[async_trait]
impl NumberFactClient for HttpNumberFactClient {
    async fn fetch(&self, number: i64) -> Result<String, FactError> {
        let url = self.url_for(number);
        debug!(%url, "Fetching fact");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FactError::Status(status));
        }

        let fact = response.text().await?;
        debug!(number, len = fact.len(), "Fact received");
        Ok(fact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_drops_trailing_slash() {
        let client = HttpNumberFactClient::new("http://numbersapi.com/");
        assert_eq!(client.base_url(), "http://numbersapi.com");
        assert_eq!(client.url_for(42), "http://numbersapi.com/42");
        assert_eq!(client.url_for(-3), "http://numbersapi.com/-3");
    }

    #[test]
    fn test_every_error_collapses_to_fetch_failed() {
        let err = FactError::Status(reqwest::StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "fact service returned 404 Not Found");
        let failed: FactFetchFailed = err.into();
        assert_eq!(failed.to_string(), "Failed to fetch fact");
    }
}
