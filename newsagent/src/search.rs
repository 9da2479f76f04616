use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Core trait for news search providers
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run a news search for the given query, returning up to `limit`
    /// results in relevance-rank order.
    async fn search_news(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>>;
}

/// One raw search hit, before summarization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    pub source: String,
    pub snippet: String,
}

/// News search provider backed by a SerpAPI-compatible endpoint
/// (`GET {base_url}?q=...&tbm=nws&num=...` returning a `news_results` array).
pub struct SerpNewsProvider {
    base_url: String,
    api_key: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl SerpNewsProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(15),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout = Duration::from_secs(timeout_secs);
        self
    }
}

#[async_trait::async_trait]
impl SearchProvider for SerpNewsProvider {
    async fn search_news(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let num = limit.to_string();
        let response = tokio::time::timeout(
            self.timeout,
            self.client
                .get(&self.base_url)
                .query(&[
                    ("api_key", self.api_key.as_str()),
                    ("q", query),
                    ("tbm", "nws"),
                    ("num", num.as_str()),
                ])
                .send(),
        )
        .await
        .context("news search request timed out")?
        .context("news search HTTP request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("news search API error {}: {}", status, body);
        }

        let body: SerpResponse = response
            .json()
            .await
            .context("failed to parse news search response")?;

        let results: Vec<SearchResult> = body
            .news_results
            .unwrap_or_default()
            .into_iter()
            .take(limit)
            .map(RawNewsResult::into_search_result)
            .collect();

        info!("news search for '{}' returned {} results", query, results.len());
        Ok(results)
    }
}

#[derive(Debug, Deserialize)]
struct SerpResponse {
    #[serde(default)]
    news_results: Option<Vec<RawNewsResult>>,
}

#[derive(Debug, Deserialize)]
struct RawNewsResult {
    title: Option<String>,
    link: Option<String>,
    source: Option<String>,
    snippet: Option<String>,
}

impl RawNewsResult {
    fn into_search_result(self) -> SearchResult {
        SearchResult {
            title: self.title.unwrap_or_else(|| "No Title".to_string()),
            link: self.link.unwrap_or_else(|| "#".to_string()),
            source: self.source.unwrap_or_else(|| "Unknown".to_string()),
            snippet: self.snippet.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_result_defaults_for_missing_fields() {
        let raw = RawNewsResult {
            title: None,
            link: None,
            source: None,
            snippet: None,
        };
        let result = raw.into_search_result();
        assert_eq!(result.title, "No Title");
        assert_eq!(result.link, "#");
        assert_eq!(result.source, "Unknown");
        assert_eq!(result.snippet, "");
    }
}
