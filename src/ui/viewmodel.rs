//! View model types representing renderable UI state.
//!
//! View models are created via `Dashboard::compute_viewmodel()` and consumed by
//! the renderer. They contain no business logic, only display-ready strings.
//!
//! # Example
//!
//! ```rust
//! use cryptodash::domain::AssetRecord;
//! use cryptodash::ui::viewmodel::DisplayItem;
//!
//! let btc = AssetRecord::new("Bitcoin", "btc").with_price(50_000.0);
//!
//! let item = DisplayItem::from_asset(&btc, "usd");
//! assert_eq!(item.symbol, "BTC");
//! assert_eq!(item.price, "$50,000.00");
//!
//! let item = DisplayItem::from_asset(&btc, "eur");
//! assert_eq!(item.price, "50,000.00 EUR");
//! ```

use crate::domain::{AssetRecord, MarketSummary};

/// Complete UI view model for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct UIViewModel {
    /// Title and fetch status.
    pub header: HeaderInfo,

    /// Immediate query echoed back to the user.
    pub search_bar: SearchBarInfo,

    /// `N results for "q"` line, present while a query is typed.
    pub result_banner: Option<String>,

    /// Message shown instead of the table when there are no rows.
    pub empty_state: Option<EmptyState>,

    /// One entry per record of the filtered view, in order.
    pub rows: Vec<DisplayItem>,

    /// Gaining/losing counts over the rows.
    pub summary: Option<MarketSummary>,

    /// Last update time and keybinding hints.
    pub footer: FooterInfo,
}

/// Display information for a single asset row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    /// Market cap rank as `#N`, or `-` when unknown.
    pub rank: String,

    pub name: String,

    /// Upper-cased ticker symbol.
    pub symbol: String,

    /// Price in the quote currency, or `-` when unknown.
    pub price: String,

    /// Compact market cap such as `$1.23T`, or `-` when unknown.
    pub market_cap: String,

    /// Compact 24h trading volume, or `-` when unknown.
    pub volume_24h: String,

    /// Signed 24h change such as `+1.25%`, or `-` when unknown.
    pub change_24h: String,

    /// `true` when the 24h change is negative.
    pub is_losing: bool,
}

impl DisplayItem {
    /// Formats one record for display, with amounts in `vs_currency`.
    #[must_use]
    pub fn from_asset(asset: &AssetRecord, vs_currency: &str) -> Self {
        let change = asset.price_change_percentage_24h;
        let large = |value: Option<f64>| {
            value.map_or_else(|| "-".to_string(), |v| format_large_number(v, vs_currency))
        };
        Self {
            rank: asset
                .market_cap_rank
                .map_or_else(|| "-".to_string(), |r| format!("#{r}")),
            name: asset.display_name().to_string(),
            symbol: asset.symbol().to_uppercase(),
            price: asset
                .current_price
                .map_or_else(|| "-".to_string(), |p| format_price(p, vs_currency)),
            market_cap: large(asset.market_cap),
            volume_24h: large(asset.total_volume),
            change_24h: change.map_or_else(|| "-".to_string(), format_change),
            is_losing: change.is_some_and(|c| c < 0.0),
        }
    }
}

/// Header display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    /// Title including the dataset size.
    pub title: String,

    /// `idle`, `refreshing...`, `live` or `error: <message>`.
    pub status: String,
}

/// Footer display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    /// Time of the last successful fetch, already formatted.
    pub last_updated: Option<String>,

    pub keybindings: String,
}

/// Empty state message display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    /// Primary message (e.g., "No results found").
    pub message: String,

    /// Secondary hint, may be empty.
    pub subtitle: String,
}

/// Search bar display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    /// Current immediate query text.
    pub query: String,
}

/// Formats a price: two decimals from 1 up, six below.
///
/// USD amounts carry a `$` prefix; any other quote currency is appended as
/// its upper-cased code.
#[must_use]
pub fn format_price(price: f64, vs_currency: &str) -> String {
    let price = if price.is_finite() { price } else { 0.0 };
    let decimals = if price.abs() >= 1.0 { 2 } else { 6 };
    denominate(&group_thousands(price.abs(), decimals), price < 0.0, vs_currency)
}

/// Formats a large amount with a `T`, `B` or `M` suffix.
///
/// Amounts under a million fall back to [`format_price`].
#[must_use]
pub fn format_large_number(value: f64, vs_currency: &str) -> String {
    let abs = value.abs();
    let scaled = [(1e12, 'T'), (1e9, 'B'), (1e6, 'M')]
        .into_iter()
        .find(|(unit, _)| abs >= *unit);
    match scaled {
        Some((unit, suffix)) => {
            denominate(&format!("{:.2}{suffix}", abs / unit), value < 0.0, vs_currency)
        }
        None => format_price(value, vs_currency),
    }
}

/// Formats a coin supply in millions, e.g. `19.70M`.
#[must_use]
pub fn format_supply(supply: f64) -> String {
    format!("{:.2}M", supply / 1e6)
}

fn group_thousands(value: f64, decimals: usize) -> String {
    let fixed = format!("{value:.decimals$}");
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if !frac_part.is_empty() {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}

fn denominate(amount: &str, negative: bool, vs_currency: &str) -> String {
    let sign = if negative { "-" } else { "" };
    if vs_currency.eq_ignore_ascii_case("usd") {
        format!("{sign}${amount}")
    } else {
        format!("{sign}{amount} {}", vs_currency.to_uppercase())
    }
}

/// Formats a 24h change percentage with an explicit sign.
#[must_use]
pub fn format_change(change: f64) -> String {
    if change >= 0.0 {
        format!("+{change:.2}%")
    } else {
        format!("{change:.2}%")
    }
}
