//! CoinGecko v3 HTTP price source.
//!
//! Each method issues exactly one `GET` and maps the outcome onto the fetch
//! error taxonomy at the point of capture:
//!
//! | outcome | error |
//! |---|---|
//! | request could not be built or sent (DNS, connect, timeout) | `Transport` |
//! | empty coin id | `Transport` |
//! | non-2xx status | `Http { status }` |
//! | body is not the expected JSON | `Transport` |
//!
//! The failure class is logged here with `error_kind`, since callers further
//! up only keep the message.
//!
//! Path segments such as a coin id are percent-encoded, so user input can
//! never add query parameters or reach a different endpoint.

use super::backend::PriceSource;
use crate::domain::{
    AssetDetails, AssetRecord, DashboardError, FetchError, FetchResult, MarketQuery, Result,
    SearchHit,
};
use crate::Config;
use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Public CoinGecko API root.
pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// HTTP client for the CoinGecko API.
#[derive(Debug, Clone)]
pub struct CoinGeckoSource {
    client: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    coins: Option<Vec<SearchHit>>,
}

impl CoinGeckoSource {
    /// Builds a client for `base_url`.
    ///
    /// `timeout` bounds the whole request at the transport layer; an expiry
    /// surfaces as a `Transport` error like any other network failure.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] if `base_url` is not an absolute
    /// URL or the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let base_url = base_url.into();
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| DashboardError::Config(format!("invalid API base URL '{base_url}'")))?;

        let mut builder =
            reqwest::Client::builder().user_agent(concat!("cryptodash/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DashboardError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    /// Builds a client from the dashboard configuration.
    ///
    /// # Errors
    ///
    /// See [`CoinGeckoSource::new`].
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.api_base_url.clone(),
            config.api_key.clone(),
            config.request_timeout_ms.map(Duration::from_millis),
        )
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&str, String)],
    ) -> FetchResult<T> {
        let url = self.endpoint(segments);

        let mut request = self.client.get(url.clone()).query(params);
        if let Some(key) = &self.api_key {
            request = request.query(&[("api_key", key)]);
        }

        let response = request.send().await.map_err(|e| {
            let error = FetchError::Transport(e.to_string());
            tracing::warn!(error_kind = error.kind(), url = %url, error = %e, "request failed");
            error
        })?;

        let status = response.status();
        if !status.is_success() {
            let error = FetchError::Http {
                status: status.as_u16(),
            };
            tracing::warn!(
                error_kind = error.kind(),
                status = status.as_u16(),
                url = %url,
                "non-success status"
            );
            return Err(error);
        }

        response.json::<T>().await.map_err(|e| {
            let error = FetchError::Transport(format!("invalid response body: {e}"));
            tracing::warn!(error_kind = error.kind(), url = %url, error = %e, "undecodable body");
            error
        })
    }
}

#[async_trait]
impl PriceSource for CoinGeckoSource {
    async fn top_assets(&self, query: &MarketQuery) -> FetchResult<Vec<AssetRecord>> {
        let params = [
            ("vs_currency", query.vs_currency.clone()),
            ("order", "market_cap_desc".to_string()),
            ("per_page", query.per_page.to_string()),
            ("page", query.page.to_string()),
            ("sparkline", "false".to_string()),
        ];
        let assets: Vec<AssetRecord> = self.get_json(&["coins", "markets"], &params).await?;
        tracing::debug!(asset_count = assets.len(), "markets fetched");
        Ok(assets)
    }

    async fn asset_details(&self, id: &str) -> FetchResult<AssetDetails> {
        let params = [
            ("localization", "false".to_string()),
            ("tickers", "false".to_string()),
            ("community_data", "false".to_string()),
            ("developer_data", "false".to_string()),
            ("sparkline", "false".to_string()),
        ];
        let id = id.trim();
        if id.is_empty() {
            let error = FetchError::Transport("coin id must not be empty".to_string());
            tracing::warn!(error_kind = error.kind(), "rejected details request");
            return Err(error);
        }
        self.get_json(&["coins", id], &params).await
    }

    async fn search(&self, text: &str) -> FetchResult<Vec<SearchHit>> {
        let params = [("query", text.to_string())];
        let response: SearchResponse = self.get_json(&["search"], &params).await?;
        Ok(response.coins.unwrap_or_default())
    }
}
