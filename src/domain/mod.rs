//! Domain layer for the dashboard.
//!
//! Core data types and the error taxonomy, independent of the HTTP client,
//! the async runtime, and the terminal.
//!
//! # Organization
//!
//! - [`asset`]: Market records, query parameters, and the 24h summary
//! - [`error`]: Error types and result aliases
//!
//! # Examples
//!
//! ```
//! use cryptodash::domain::{AssetRecord, MarketSummary};
//!
//! let assets = vec![AssetRecord::new("Bitcoin", "btc").with_change_24h(1.0)];
//! assert_eq!(MarketSummary::from_assets(&assets).gaining, 1);
//! ```

pub mod asset;
pub mod error;

pub use asset::{AssetDetails, AssetRecord, Description, MarketQuery, MarketSummary, SearchHit};
pub use error::{DashboardError, FetchError, FetchResult, Result};
