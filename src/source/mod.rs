//! Market data sources.
//!
//! - `backend`: the [`PriceSource`] trait the worker fetches through
//! - `coingecko`: HTTP implementation against the CoinGecko v3 API
//! - `mock`: scripted implementation with per-call latency for tests

pub mod backend;
pub mod coingecko;
pub mod mock;

pub use backend::PriceSource;
pub use coingecko::{CoinGeckoSource, DEFAULT_BASE_URL};
pub use mock::{MockPriceSource, MockReply};
