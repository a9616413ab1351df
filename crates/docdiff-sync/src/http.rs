//! HTTP data provider for the docdiff API.

use std::time::Duration;

use async_trait::async_trait;
use docdiff_core::config::ServerConfig;
use docdiff_core::{
    ColouringRecord, ComparisonNote, OutlineNode, PairCounts, Paragraph, ParagraphPair,
    SimilarityPair,
};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::error::FetchError;
use crate::provider::DataProvider;

/// reqwest-backed [`DataProvider`] with a per-request timeout and bounded retry.
pub struct HttpProvider {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    retries: u32,
}

impl HttpProvider {
    /// Create a provider for the given base URL.
    ///
    /// `base_url` should be like `https://docdiff.mooo.com` (a trailing slash
    /// is trimmed).
    pub fn new(base_url: &str, timeout: Duration, retries: u32) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            retries,
        })
    }

    pub fn from_config(server: &ServerConfig) -> Result<Self, FetchError> {
        Self::new(
            &server.base_url,
            Duration::from_secs(server.timeout_secs),
            server.retries,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `url` and decode the body, retrying transient failures.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let mut attempt = 0;
        loop {
            match self.try_get(url, query).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.retries => {
                    attempt += 1;
                    warn!(url = %url, attempt, error = %e, "retrying request");
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn try_get<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Server {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = resp.bytes().await.map_err(|e| self.classify(url, e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn classify(&self, url: &str, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                secs: self.timeout.as_secs(),
            }
        } else {
            FetchError::Http(e)
        }
    }
}

#[async_trait]
impl DataProvider for HttpProvider {
    async fn outline(&self, slug: &str) -> Result<Vec<OutlineNode>, FetchError> {
        let url = self.url(&format!("/toc/{slug}"));
        info!(url = %url, "fetching outline");
        let outline: Vec<OutlineNode> = self.get_json(&url, &[]).await?;
        info!(chapters = outline.len(), "fetched outline");
        Ok(outline)
    }

    async fn similarity_pairs(&self) -> Result<Vec<SimilarityPair>, FetchError> {
        let url = self.url("/whs_pairs");
        info!(url = %url, "fetching similarity pairs");
        let pairs: Vec<SimilarityPair> = self.get_json(&url, &[]).await?;
        info!(count = pairs.len(), "fetched similarity pairs");
        Ok(pairs)
    }

    async fn colouring(&self) -> Result<Vec<ColouringRecord>, FetchError> {
        let url = self.url("/whs_color");
        info!(url = %url, "fetching colouring");
        let records: Vec<ColouringRecord> = self.get_json(&url, &[]).await?;
        info!(count = records.len(), "fetched colouring");
        Ok(records)
    }

    async fn comparisons(&self) -> Result<Vec<ComparisonNote>, FetchError> {
        let url = self.url("/comparisons");
        info!(url = %url, "fetching comparisons");
        let notes: Vec<ComparisonNote> = self.get_json(&url, &[]).await?;
        info!(count = notes.len(), "fetched comparisons");
        Ok(notes)
    }

    async fn paragraphs(&self, document: &str) -> Result<Vec<Paragraph>, FetchError> {
        let url = self.url(&format!("/api/paragraphs/{document}"));
        info!(url = %url, "fetching paragraphs");
        let paras: Vec<Paragraph> = self.get_json(&url, &[]).await?;
        info!(document, count = paras.len(), "fetched paragraphs");
        Ok(paras)
    }

    async fn pair_counts(&self, document: &str) -> Result<PairCounts, FetchError> {
        let url = self.url(&format!("/api/pair_counts/{document}"));
        info!(url = %url, "fetching pair counts");
        let counts: PairCounts = self.get_json(&url, &[]).await?;
        info!(document, count = counts.len(), "fetched pair counts");
        Ok(counts)
    }

    async fn paragraph_pairs(
        &self,
        document: &str,
        para_id: &str,
        size: u32,
    ) -> Result<Vec<ParagraphPair>, FetchError> {
        let url = self.url("/api/pairs");
        let size = size.to_string();
        info!(url = %url, document, para_id, "fetching paragraph pairs");
        let pairs: Vec<ParagraphPair> = self
            .get_json(
                &url,
                &[("doc", document), ("para_id", para_id), ("size", &size)],
            )
            .await?;
        info!(count = pairs.len(), "fetched paragraph pairs");
        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(base: &str) -> HttpProvider {
        HttpProvider::new(base, Duration::from_secs(1), 0).unwrap()
    }

    #[test]
    fn trims_trailing_slash() {
        let http = provider("https://docdiff.mooo.com/");
        assert_eq!(http.base_url(), "https://docdiff.mooo.com");
        assert_eq!(http.url("/toc/nsw"), "https://docdiff.mooo.com/toc/nsw");
    }

    #[test]
    fn from_config_uses_server_section() {
        let server = ServerConfig {
            base_url: "http://localhost:8000//".into(),
            timeout_secs: 4,
            retries: 2,
        };
        let http = HttpProvider::from_config(&server).unwrap();
        assert_eq!(http.base_url(), "http://localhost:8000");
        assert_eq!(http.timeout, Duration::from_secs(4));
        assert_eq!(http.retries, 2);
    }

    #[tokio::test]
    async fn unreachable_host_is_http_error_after_retries() {
        // Port 9 on loopback is reserved (discard) and normally closed.
        let http = HttpProvider::new("http://127.0.0.1:9", Duration::from_secs(2), 1).unwrap();
        let err = http.similarity_pairs().await.unwrap_err();
        assert!(!err.is_abort());
        assert!(matches!(
            err,
            FetchError::Http(_) | FetchError::Timeout { .. }
        ));
    }
}
