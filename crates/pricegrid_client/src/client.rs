use std::time::Instant;

use bytes::BytesMut;
use futures_util::StreamExt;
use pricegrid_core::{SearchOutcome, SearchRequest, SearchResponse};
use pricegrid_logging::{grid_debug, grid_info, grid_warn};
use reqwest::header::CONTENT_TYPE;

use crate::{FailureKind, SearchConfig, SearchError, SearchOptions};

#[async_trait::async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchOutcome, SearchError>;
}

/// Posts one JSON request per search to the configured endpoint.
///
/// No retries and no caching: every call is exactly one round trip.
#[derive(Debug, Clone)]
pub struct ReqwestSearchClient {
    config: SearchConfig,
    client: reqwest::Client,
}

impl ReqwestSearchClient {
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        let mut builder = reqwest::Client::builder().connect_timeout(config.connect_timeout);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| SearchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { config, client })
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<BytesMut, SearchError> {
        let max_bytes = self.config.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, content_len));
            }
        }

        let mut body = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, next_len));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl SearchClient for ReqwestSearchClient {
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchOutcome, SearchError> {
        let request = SearchRequest {
            query: query.to_string(),
            max_results: options.max_results.or(self.config.default_max_results),
        };
        let payload = serde_json::to_vec(&request)
            .map_err(|err| SearchError::new(FailureKind::InvalidBody, err.to_string()))?;

        grid_info!(
            "POST {} query_len={} max_results={:?}",
            self.config.endpoint,
            query.len(),
            request.max_results
        );
        let started = Instant::now();

        let response = self
            .client
            .post(self.config.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|err| {
                let err = map_reqwest_error(err);
                grid_warn!("Search request failed: {}", err);
                err
            })?;

        let status = response.status();
        let body = self.read_body(response).await?;
        let parsed: SearchResponse = serde_json::from_slice(&body).map_err(|err| {
            grid_warn!("Search response from status {} is not valid JSON: {}", status, err);
            SearchError::new(FailureKind::InvalidBody, err.to_string())
        })?;
        let elapsed = started.elapsed();

        if !status.is_success() || !parsed.success {
            grid_warn!(
                "Search declined status={} error={:?}",
                status.as_u16(),
                parsed.error
            );
            return Err(SearchError::new(
                FailureKind::Declined {
                    status: status.as_u16(),
                    message: parsed.error,
                },
                "server declined the search",
            ));
        }

        grid_debug!(
            "Search response offers={} bytes={} elapsed_ms={}",
            parsed.products.len(),
            body.len(),
            elapsed.as_millis()
        );
        Ok(SearchOutcome {
            response: parsed,
            elapsed,
        })
    }
}

fn too_large(max_bytes: u64, actual: u64) -> SearchError {
    SearchError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> SearchError {
    if err.is_timeout() {
        return SearchError::new(FailureKind::Timeout, err.to_string());
    }
    SearchError::new(FailureKind::Network, err.to_string())
}
