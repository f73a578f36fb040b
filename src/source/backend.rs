//! Price source abstraction.
//!
//! This module defines the [`PriceSource`] trait that abstracts over where
//! market data comes from. The worker only talks to this trait, which lets
//! tests substitute a scripted source with controllable latency.
//!
//! The trait is minimal and maps one method to one remote endpoint. It does
//! no caching, retrying, or deduplication; each call is a single attempt.

use crate::domain::{AssetDetails, AssetRecord, FetchResult, MarketQuery, SearchHit};
use async_trait::async_trait;

/// Abstraction over remote market data providers.
///
/// # Implementations
///
/// - [`CoinGeckoSource`](crate::source::CoinGeckoSource): CoinGecko v3 over HTTPS
/// - [`MockPriceSource`](crate::source::mock::MockPriceSource): scripted replies for tests
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetches one page of assets ordered by market cap.
    ///
    /// # Errors
    ///
    /// [`FetchError::Http`](crate::domain::FetchError::Http) for non-2xx
    /// responses, [`FetchError::Transport`](crate::domain::FetchError::Transport)
    /// for network failures and undecodable bodies.
    async fn top_assets(&self, query: &MarketQuery) -> FetchResult<Vec<AssetRecord>>;

    /// Fetches the detail record of a single coin by its remote id.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`top_assets`](Self::top_assets).
    async fn asset_details(&self, id: &str) -> FetchResult<AssetDetails>;

    /// Searches coins by free text on the remote side.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`top_assets`](Self::top_assets).
    async fn search(&self, text: &str) -> FetchResult<Vec<SearchHit>>;
}
