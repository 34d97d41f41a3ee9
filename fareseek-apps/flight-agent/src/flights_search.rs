//!  Fareseek Flight Agent
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # Fare Search Client
//!
//! Effectful (time, network) operations for the international fare search.
//! One GET per search, no retries. Every failure is folded into text at
//! [`FlightSearchClient::search_flights_text`].

use crate::flights_query_builder::{FlightSearchParams, UPSTREAM_HEADERS};
use crate::flights_results_parser::FlightSearchResult;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use wreq::redirect::Policy;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure categories of a search. `Display` is the user-facing text.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Connection failure, timeout or non-2xx status.
    #[error("Error fetching flight data: {0}")]
    Http(String),
    #[error("Error: API returned non-JSON response. Content start: {preview}")]
    NonJson { preview: String },
    /// Reported by the upstream in its summary block.
    #[error("API Error: {0}")]
    Api(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

#[derive(Clone)]
pub struct FlightSearchClient {
    client: Arc<wreq::Client>,
    base_url: String,
}

impl FlightSearchClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = wreq::Client::builder()
            .redirect(Policy::default())
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client: Arc::new(client),
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl FlightSearchClient {
    pub async fn fetch_raw(&self, url: &str) -> Result<String, SearchError> {
        let http_start = Instant::now();
        tracing::trace!("[fetch_raw] Starting HTTP request to: {}", url);

        let mut request = self.client.get(url);
        for (name, value) in UPSTREAM_HEADERS {
            request = request.header(name, value);
        }
        let response = request.send().await.map_err(|e| {
            tracing::error!("[fetch_raw] Request failed after {:?}: {}", http_start.elapsed(), e);
            SearchError::Http(e.to_string())
        })?;

        let status = response.status();
        tracing::debug!(
            "[fetch_raw] HTTP Status: {} {} in {:?}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown"),
            http_start.elapsed()
        );

        if !status.is_success() {
            return Err(SearchError::Http(format!(
                "HTTP status {} for url '{}'",
                status, url
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("failed to read body: {e}")))?;
        tracing::debug!("[fetch_raw] Response body: {} KB", body.len() / 1024);

        Ok(body)
    }

    /// Fetches and decodes one search. `timestamp_ms` feeds the cache-busting field.
    pub async fn search_flights_at(
        &self,
        params: &FlightSearchParams,
        timestamp_ms: i64,
    ) -> Result<FlightSearchResult, SearchError> {
        let overall_start = Instant::now();
        let url = params.get_search_url(&self.base_url, timestamp_ms);
        tracing::info!(
            "🔗 Searching {} → {} ({}): {}",
            params.departure_city,
            params.arrival_city,
            params.trip_type.code(),
            url
        );

        let body = self.fetch_raw(&url).await?;
        let result = FlightSearchResult::from_json(&body);
        tracing::info!("Total search_flights time: {:?}", overall_start.elapsed());
        result
    }

    pub async fn search_flights(
        &self,
        params: &FlightSearchParams,
    ) -> Result<FlightSearchResult, SearchError> {
        self.search_flights_at(params, chrono::Utc::now().timestamp_millis())
            .await
    }

    /// The whole operation: never fails, errors come back as their message.
    pub async fn search_flights_text(&self, params: &FlightSearchParams, raw_json: bool) -> String {
        let outcome = self
            .search_flights(params)
            .await
            .and_then(|result| result.to_text(raw_json));
        match outcome {
            Ok(text) => text,
            Err(e) => {
                match &e {
                    SearchError::Api(msg) => tracing::warn!("Upstream reported an error: {}", msg),
                    other => tracing::error!("Flight search failed: {}", other),
                }
                e.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SearchError::Http("operation timed out".into()).to_string(),
            "Error fetching flight data: operation timed out"
        );
        assert_eq!(
            SearchError::NonJson {
                preview: "<html>".into()
            }
            .to_string(),
            "Error: API returned non-JSON response. Content start: <html>"
        );
        assert_eq!(
            SearchError::Api("No fares found".into()).to_string(),
            "API Error: No fares found"
        );
        assert_eq!(
            SearchError::Unexpected("boom".into()).to_string(),
            "An unexpected error occurred: boom"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        let client =
            FlightSearchClient::new("http://127.0.0.1:9".into(), Duration::from_secs(2)).unwrap();
        let params = FlightSearchParams::builder("ICN".into(), "FUK".into(), "2026-03-03".into())
            .build();
        let text = client.search_flights_text(&params, false).await;
        assert!(
            text.starts_with("Error fetching flight data: "),
            "got: {text}"
        );
    }
}
