//! Market data records returned by the price API.
//!
//! The dashboard core only ever looks at an asset's name and symbol; every
//! other field is passthrough payload for the rendering layer. All fields are
//! optional so that partial or null-laden records never fail a fetch.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of market data for a single cryptocurrency.
///
/// Mirrors an element of the CoinGecko `coins/markets` response. Fields the
/// struct does not name are kept in [`extra`](Self::extra) so nothing the
/// remote sends is lost on the way to the renderer.
///
/// # Examples
///
/// ```
/// use cryptodash::domain::AssetRecord;
///
/// let btc = AssetRecord::new("Bitcoin", "btc").with_price(50_000.0);
/// assert_eq!(btc.display_name(), "Bitcoin");
/// assert_eq!(btc.symbol(), "btc");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap_rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_24h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_24h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circulating_supply: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_supply: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_supply: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,

    /// Any field not modelled above, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AssetRecord {
    /// Creates a record with only a name and symbol set.
    #[must_use]
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            symbol: Some(symbol.into()),
            ..Self::default()
        }
    }

    /// Sets the current price.
    #[must_use]
    pub fn with_price(mut self, price: f64) -> Self {
        self.current_price = Some(price);
        self
    }

    /// Sets the 24h price change percentage.
    #[must_use]
    pub fn with_change_24h(mut self, change: f64) -> Self {
        self.price_change_percentage_24h = Some(change);
        self
    }

    /// Display name, or the empty string if the remote omitted it.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Ticker symbol as sent by the remote, or the empty string.
    #[must_use]
    pub fn symbol(&self) -> &str {
        self.symbol.as_deref().unwrap_or_default()
    }

    /// Whether the name or symbol contains `needle`.
    ///
    /// `needle` must already be lower-cased and trimmed.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        self.display_name().to_lowercase().contains(needle)
            || self.symbol().to_lowercase().contains(needle)
    }
}

/// Parameters of the top-N markets request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketQuery {
    pub vs_currency: String,
    pub page: u32,
    pub per_page: u32,
}

impl Default for MarketQuery {
    fn default() -> Self {
        Self {
            vs_currency: "usd".to_string(),
            page: 1,
            per_page: 20,
        }
    }
}

/// Detail payload for a single coin (`coins/{id}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetDetails {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub description: Option<Description>,
    #[serde(default)]
    pub market_data: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AssetDetails {
    /// English description, if the remote provided a non-empty one.
    #[must_use]
    pub fn description_en(&self) -> Option<&str> {
        self.description
            .as_ref()
            .and_then(|d| d.en.as_deref())
            .filter(|s| !s.trim().is_empty())
    }

    /// A per-currency figure from `market_data`, e.g. `high_24h` in `eur`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cryptodash::domain::AssetDetails;
    ///
    /// let details: AssetDetails = serde_json::from_str(
    ///     r#"{"market_data":{"market_cap":{"usd":1.5e12},"total_supply":21e6}}"#,
    /// ).unwrap();
    /// assert_eq!(details.market_value("market_cap", "usd"), Some(1.5e12));
    /// assert_eq!(details.market_value("market_cap", "eur"), None);
    /// assert_eq!(details.market_figure("total_supply"), Some(21e6));
    /// ```
    #[must_use]
    pub fn market_value(&self, field: &str, vs_currency: &str) -> Option<f64> {
        self.market_data
            .as_ref()?
            .get(field)?
            .get(vs_currency.to_lowercase())?
            .as_f64()
    }

    /// A currency-independent figure from `market_data`, such as a supply.
    #[must_use]
    pub fn market_figure(&self, field: &str) -> Option<f64> {
        self.market_data.as_ref()?.get(field)?.as_f64()
    }
}

/// Localized description block; only English is requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    #[serde(default)]
    pub en: Option<String>,
}

/// One coin returned by the remote search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub thumb: Option<String>,
}

/// Gaining/losing breakdown of a list of assets over 24h.
///
/// A missing 24h change counts as zero, and zero counts as gaining.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarketSummary {
    pub total: usize,
    pub gaining: usize,
    pub losing: usize,
}

impl MarketSummary {
    #[must_use]
    pub fn from_assets(assets: &[AssetRecord]) -> Self {
        let gaining = assets
            .iter()
            .filter(|a| a.price_change_percentage_24h.unwrap_or(0.0) >= 0.0)
            .count();
        Self {
            total: assets.len(),
            gaining,
            losing: assets.len() - gaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_record_with_nulls_and_missing_fields() {
        let json = r#"{
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "current_price": 50000.5,
            "market_cap": null,
            "max_supply": null,
            "roi": {"times": 1.2}
        }"#;
        let record: AssetRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.display_name(), "Bitcoin");
        assert_eq!(record.current_price, Some(50000.5));
        assert_eq!(record.market_cap, None);
        assert_eq!(record.total_volume, None);
        assert!(record.extra.contains_key("roi"));
    }

    #[test]
    fn missing_name_and_symbol_read_as_empty() {
        let record: AssetRecord = serde_json::from_str(r#"{"id": "mystery"}"#).unwrap();
        assert_eq!(record.display_name(), "");
        assert_eq!(record.symbol(), "");
        assert!(record.matches(""));
        assert!(!record.matches("m"));
    }

    #[test]
    fn matches_name_or_symbol_case_insensitively() {
        let eth = AssetRecord::new("Ethereum", "ETH");
        assert!(eth.matches("eth"));
        assert!(eth.matches("reum"));
        assert!(!eth.matches("btc"));
    }

    #[test]
    fn summary_counts_missing_change_as_gaining() {
        let assets = vec![
            AssetRecord::new("Bitcoin", "btc").with_change_24h(2.5),
            AssetRecord::new("Ethereum", "eth").with_change_24h(-1.2),
            AssetRecord::new("Tether", "usdt"),
        ];
        let summary = MarketSummary::from_assets(&assets);
        assert_eq!(summary, MarketSummary { total: 3, gaining: 2, losing: 1 });
    }

    #[test]
    fn details_description_ignores_blank_text() {
        let details: AssetDetails =
            serde_json::from_str(r#"{"id": "x", "description": {"en": "  "}}"#).unwrap();
        assert_eq!(details.description_en(), None);
    }
}
