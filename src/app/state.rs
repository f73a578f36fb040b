//! Dashboard state and view model computation.
//!
//! [`Dashboard`] is the single container the event handler mutates. It pairs
//! the [`FetchController`] (owner of the dataset and load state) with the
//! [`DebouncedFilter`] (owner of the query and filtered view). The filter only
//! ever reads the controller's dataset; nothing else writes to it.
//!
//! View models are computed on demand from a state snapshot and hold only
//! display-ready data.
//!
//! # Example
//!
//! ```rust
//! use cryptodash::app::Dashboard;
//! use std::time::Duration;
//!
//! let dashboard = Dashboard::new(Duration::from_millis(300));
//! let vm = dashboard.compute_viewmodel();
//! assert!(vm.rows.is_empty());
//! ```

use super::controller::FetchController;
use super::filter::DebouncedFilter;
use super::load_state::LoadState;
use crate::domain::MarketSummary;
use crate::ui::viewmodel::{
    DisplayItem, EmptyState, FooterInfo, HeaderInfo, SearchBarInfo, UIViewModel,
};
use std::time::Duration;

/// Format used for the "last updated" footer.
const LAST_UPDATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Central state container: fetch lifecycle plus query/filter state.
#[derive(Debug)]
pub struct Dashboard {
    pub controller: FetchController,
    pub filter: DebouncedFilter,

    /// Quote currency amounts are displayed in.
    pub vs_currency: String,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            controller: FetchController::new(),
            filter: DebouncedFilter::default(),
            vs_currency: "usd".to_string(),
        }
    }
}

impl Dashboard {
    /// Creates a dashboard that has not fetched anything yet.
    #[must_use]
    pub fn new(debounce: Duration) -> Self {
        Self {
            filter: DebouncedFilter::new(debounce),
            ..Self::default()
        }
    }

    /// Sets the quote currency used for displayed amounts.
    #[must_use]
    pub fn with_currency(mut self, vs_currency: impl Into<String>) -> Self {
        self.vs_currency = vs_currency.into();
        self
    }

    /// Computes a renderable view model from the current state.
    #[must_use]
    pub fn compute_viewmodel(&self) -> UIViewModel {
        let view = self.filter.filtered_view();
        let query = self.filter.query();

        let rows: Vec<DisplayItem> = view
            .iter()
            .map(|asset| DisplayItem::from_asset(asset, &self.vs_currency))
            .collect();

        let result_banner = if query.is_empty() {
            None
        } else {
            let n = rows.len();
            let plural = if n == 1 { "" } else { "s" };
            Some(format!("{n} result{plural} for \"{query}\""))
        };

        let summary = if rows.is_empty() {
            None
        } else {
            Some(MarketSummary::from_assets(view))
        };

        UIViewModel {
            header: self.compute_header(),
            search_bar: SearchBarInfo {
                query: query.to_string(),
            },
            result_banner,
            empty_state: self.compute_empty_state(rows.is_empty()),
            rows,
            summary,
            footer: self.compute_footer(),
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        let status = match self.controller.load_state() {
            LoadState::Idle => "idle".to_string(),
            LoadState::Loading => "refreshing...".to_string(),
            LoadState::Ready => "live".to_string(),
            LoadState::Failed => format!(
                "error: {}",
                self.controller.error_message().unwrap_or_default()
            ),
        };
        HeaderInfo {
            title: format!(" Fortress Crypto ({}) ", self.controller.dataset().len()),
            status,
        }
    }

    /// Empty state, chosen by load state when there is nothing to list.
    ///
    /// Loading with an empty dataset shows a loading message; a failure with
    /// nothing to fall back on shows the error with a retry hint; a query
    /// that matches nothing shows the no-results message.
    fn compute_empty_state(&self, no_rows: bool) -> Option<EmptyState> {
        if !no_rows {
            return None;
        }
        let dataset_empty = self.controller.dataset().is_empty();

        match self.controller.load_state() {
            LoadState::Idle | LoadState::Loading if dataset_empty => Some(EmptyState {
                message: "Loading market data...".to_string(),
                subtitle: String::new(),
            }),
            LoadState::Failed if dataset_empty => Some(EmptyState {
                message: self.controller.error_message().unwrap_or_default(),
                subtitle: "Type :r to retry".to_string(),
            }),
            _ if !self.filter.derived_query().trim().is_empty() => Some(EmptyState {
                message: "No results found".to_string(),
                subtitle: "Try searching for a different cryptocurrency".to_string(),
            }),
            _ => Some(EmptyState {
                message: "No assets available".to_string(),
                subtitle: "Type :r to refresh".to_string(),
            }),
        }
    }

    fn compute_footer(&self) -> FooterInfo {
        FooterInfo {
            last_updated: self
                .controller
                .last_updated()
                .map(|at| at.format(LAST_UPDATED_FORMAT).to_string()),
            keybindings: "type to filter  :r refresh  :q quit".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssetRecord, FetchError};

    fn ready_dashboard() -> Dashboard {
        let mut dashboard = Dashboard::default();
        let generation = dashboard.controller.refetch();
        dashboard.controller.resolve(
            generation,
            Ok(vec![
                AssetRecord::new("Bitcoin", "btc").with_change_24h(1.0),
                AssetRecord::new("Ethereum", "eth").with_change_24h(-2.0),
            ]),
        );
        dashboard.filter.on_dataset_changed(dashboard.controller.dataset());
        dashboard
    }

    #[test]
    fn loading_without_data_shows_loading_state() {
        let mut dashboard = Dashboard::default();
        dashboard.controller.initialize();
        let vm = dashboard.compute_viewmodel();
        assert_eq!(vm.header.status, "refreshing...");
        assert_eq!(vm.empty_state.unwrap().message, "Loading market data...");
    }

    #[test]
    fn failure_without_data_shows_error_with_retry_hint() {
        let mut dashboard = Dashboard::default();
        let generation = dashboard.controller.refetch();
        dashboard
            .controller
            .resolve(generation, Err(FetchError::Http { status: 500 }));
        let vm = dashboard.compute_viewmodel();
        let empty = vm.empty_state.unwrap();
        assert!(empty.message.contains("500"));
        assert!(empty.subtitle.contains(":r"));
        assert!(vm.header.status.starts_with("error:"));
    }

    #[test]
    fn ready_lists_rows_with_summary_and_footer() {
        let vm = ready_dashboard().compute_viewmodel();
        assert_eq!(vm.rows.len(), 2);
        assert!(vm.empty_state.is_none());
        assert_eq!(vm.summary.map(|s| (s.gaining, s.losing)), Some((1, 1)));
        assert!(vm.footer.last_updated.is_some());
        assert!(vm.result_banner.is_none());
    }

    #[test]
    fn unmatched_query_shows_no_results() {
        let mut dashboard = ready_dashboard();
        let ticket = dashboard.filter.set_query("doge").unwrap();
        dashboard.filter.fire(ticket, dashboard.controller.dataset());

        let vm = dashboard.compute_viewmodel();
        assert_eq!(vm.result_banner.as_deref(), Some("0 results for \"doge\""));
        assert_eq!(vm.empty_state.unwrap().message, "No results found");
        assert!(vm.summary.is_none());
    }

    #[test]
    fn stale_rows_stay_visible_while_refreshing() {
        let mut dashboard = ready_dashboard();
        dashboard.controller.refetch();
        let vm = dashboard.compute_viewmodel();
        assert_eq!(vm.rows.len(), 2);
        assert!(vm.empty_state.is_none());
        assert_eq!(vm.header.status, "refreshing...");
    }

    #[test]
    fn rows_use_the_configured_currency() {
        let mut dashboard = ready_dashboard().with_currency("eur");
        let generation = dashboard.controller.refetch();
        dashboard.controller.resolve(
            generation,
            Ok(vec![AssetRecord::new("Bitcoin", "btc").with_price(50_000.0)]),
        );
        dashboard.filter.on_dataset_changed(dashboard.controller.dataset());

        let vm = dashboard.compute_viewmodel();
        assert_eq!(vm.rows[0].price, "50,000.00 EUR");
    }
}
