//! Debounced live filter over the current dataset.
//!
//! The filter owns two query values: the immediate `query`, updated
//! synchronously on every keystroke so it can be echoed back to the user, and
//! the `derived` query that actually drives filtering. The derived value only
//! catches up after the user has paused typing for `delay`.
//!
//! # Recomputation triggers
//!
//! The filtered view is `filter_assets(dataset, derived)` and is recomputed
//! when either committed input changes:
//!
//! 1. a debounce window elapses with a new derived query ([`DebouncedFilter::fire`])
//! 2. the dataset is replaced ([`DebouncedFilter::on_dataset_changed`])
//!
//! # Timer ownership
//!
//! At most one recomputation is pending. Each scheduled recomputation gets a
//! fresh [`RecomputeTicket`]; the runtime attaches the spawned timer's
//! [`AbortHandle`] via [`DebouncedFilter::arm`]. Rescheduling aborts the
//! previous handle before creating the new ticket, and teardown (explicit
//! [`cancel`](DebouncedFilter::cancel) or drop) aborts whatever is live. A
//! timer that still manages to fire for an old ticket is ignored.

use crate::domain::AssetRecord;
use std::time::Duration;
use tokio::task::AbortHandle;

/// Debounce window used when none is configured.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Tag identifying one scheduled recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecomputeTicket(u64);

impl RecomputeTicket {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct PendingRecompute {
    ticket: RecomputeTicket,
    timer: Option<AbortHandle>,
}

impl PendingRecompute {
    fn abort(self) {
        if let Some(timer) = self.timer {
            timer.abort();
        }
    }
}

/// Returns the records whose name or symbol contains `query`.
///
/// Matching is a case-insensitive substring test against the display name OR
/// the symbol. The query is trimmed first, and an empty trimmed query matches
/// every record. Order is preserved.
///
/// # Example
///
/// ```rust
/// use cryptodash::app::filter::filter_assets;
/// use cryptodash::domain::AssetRecord;
///
/// let dataset = vec![
///     AssetRecord::new("Bitcoin", "BTC"),
///     AssetRecord::new("Ethereum", "ETH"),
/// ];
/// assert_eq!(filter_assets(&dataset, "btc").len(), 1);
/// assert_eq!(filter_assets(&dataset, "  ").len(), 2);
/// assert!(filter_assets(&dataset, "XYZ").is_empty());
/// ```
#[must_use]
pub fn filter_assets(dataset: &[AssetRecord], query: &str) -> Vec<AssetRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return dataset.to_vec();
    }
    dataset
        .iter()
        .filter(|asset| asset.matches(&needle))
        .cloned()
        .collect()
}

/// Query state plus the filtered view derived from it.
#[derive(Debug)]
pub struct DebouncedFilter {
    query: String,
    derived: String,
    delay: Duration,
    view: Vec<AssetRecord>,
    pending: Option<PendingRecompute>,
    next_ticket: u64,
}

impl Default for DebouncedFilter {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl DebouncedFilter {
    /// Creates an empty filter with the given debounce window.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            query: String::new(),
            derived: String::new(),
            delay,
            view: Vec::new(),
            pending: None,
            next_ticket: 0,
        }
    }

    /// Updates the immediate query without touching the filtered view.
    ///
    /// Any pending recomputation is cancelled and a new one is requested;
    /// the caller schedules it `delay` from now and reports back through
    /// [`fire`](Self::fire). Setting the query it already holds is a no-op
    /// and returns `None`.
    pub fn set_query(&mut self, text: impl Into<String>) -> Option<RecomputeTicket> {
        let text = text.into();
        if text == self.query {
            tracing::trace!(query = %text, "query unchanged");
            return None;
        }

        self.query = text;
        self.cancel();

        self.next_ticket += 1;
        let ticket = RecomputeTicket(self.next_ticket);
        self.pending = Some(PendingRecompute { ticket, timer: None });

        tracing::trace!(query = %self.query, ticket = ticket.0, "recompute scheduled");
        Some(ticket)
    }

    /// Attaches the spawned timer for `ticket` so it can be cancelled.
    ///
    /// If `ticket` is no longer the pending one, the timer is aborted at once.
    pub fn arm(&mut self, ticket: RecomputeTicket, timer: AbortHandle) {
        match self.pending.as_mut() {
            Some(pending) if pending.ticket == ticket => {
                if let Some(previous) = pending.timer.replace(timer) {
                    previous.abort();
                }
            }
            _ => {
                tracing::debug!(ticket = ticket.0, "arming superseded ticket, aborting timer");
                timer.abort();
            }
        }
    }

    /// Handles the elapsed debounce window for `ticket`.
    ///
    /// Commits the immediate query as the derived query and recomputes the
    /// view against `dataset`. Returns `false` (and does nothing) for stale
    /// tickets or when the derived query would not change.
    pub fn fire(&mut self, ticket: RecomputeTicket, dataset: &[AssetRecord]) -> bool {
        match &self.pending {
            Some(pending) if pending.ticket == ticket => {
                self.pending = None;
            }
            _ => {
                tracing::debug!(ticket = ticket.0, "ignoring superseded debounce timer");
                return false;
            }
        }

        if self.derived == self.query {
            tracing::trace!(query = %self.query, "derived query unchanged, skipping recompute");
            return false;
        }

        self.derived.clone_from(&self.query);
        self.recompute(dataset);
        true
    }

    /// Recomputes the view immediately against a newly replaced dataset.
    ///
    /// Uses the existing derived query; a pending debounce keeps running.
    pub fn on_dataset_changed(&mut self, dataset: &[AssetRecord]) {
        self.recompute(dataset);
    }

    fn recompute(&mut self, dataset: &[AssetRecord]) {
        let _span = tracing::debug_span!(
            "apply_search_filter",
            total_assets = dataset.len(),
            query_len = self.derived.len()
        )
        .entered();

        self.view = filter_assets(dataset, &self.derived);

        tracing::debug!(filtered_count = self.view.len(), "search filter applied");
    }

    /// Cancels the pending recomputation, if any.
    ///
    /// Returns whether something was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().map_or(false, |pending| {
            tracing::trace!(ticket = pending.ticket.0, "pending recompute cancelled");
            pending.abort();
            true
        })
    }

    /// The query as typed, for echoing into the input field.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The query the current view was computed with.
    #[must_use]
    pub fn derived_query(&self) -> &str {
        &self.derived
    }

    #[must_use]
    pub fn filtered_view(&self) -> &[AssetRecord] {
        &self.view
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether a recomputation is scheduled but has not fired.
    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for DebouncedFilter {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Vec<AssetRecord> {
        vec![
            AssetRecord::new("Bitcoin", "BTC").with_price(50_000.0),
            AssetRecord::new("Ethereum", "ETH").with_price(3_000.0),
        ]
    }

    #[test]
    fn matching_is_case_insensitive_and_trimmed() {
        let data = dataset();
        let hits = filter_assets(&data, "  bItCoIn ");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].display_name(), "Bitcoin");

        let by_symbol = filter_assets(&data, "eth");
        assert_eq!(by_symbol[0].symbol(), "ETH");
    }

    #[test]
    fn set_query_does_not_touch_view_until_fired() {
        let data = dataset();
        let mut filter = DebouncedFilter::default();
        filter.on_dataset_changed(&data);

        let ticket = filter.set_query("eth").unwrap();
        assert_eq!(filter.query(), "eth");
        assert_eq!(filter.derived_query(), "");
        assert_eq!(filter.filtered_view().len(), 2);

        assert!(filter.fire(ticket, &data));
        assert_eq!(filter.derived_query(), "eth");
        assert_eq!(filter.filtered_view(), &data[1..]);
    }

    #[test]
    fn rescheduling_supersedes_previous_ticket() {
        let data = dataset();
        let mut filter = DebouncedFilter::default();
        filter.on_dataset_changed(&data);

        let first = filter.set_query("b").unwrap();
        let second = filter.set_query("bi").unwrap();
        assert_ne!(first, second);

        assert!(!filter.fire(first, &data));
        assert_eq!(filter.derived_query(), "");
        assert!(filter.fire(second, &data));
        assert_eq!(filter.derived_query(), "bi");
    }

    #[test]
    fn identical_query_schedules_nothing() {
        let data = dataset();
        let mut filter = DebouncedFilter::default();
        let ticket = filter.set_query("btc").unwrap();
        assert!(filter.fire(ticket, &data));

        assert!(filter.set_query("btc").is_none());
        assert!(!filter.has_pending());
    }

    #[test]
    fn window_ending_on_unchanged_query_skips_recompute() {
        let data = dataset();
        let mut filter = DebouncedFilter::default();
        filter.on_dataset_changed(&data);
        filter.set_query("b");
        let ticket = filter.set_query("").unwrap();
        assert!(!filter.fire(ticket, &data));
        assert!(!filter.has_pending());
    }

    #[test]
    fn dataset_change_reuses_derived_query() {
        let mut filter = DebouncedFilter::default();
        let ticket = filter.set_query("eth").unwrap();
        filter.fire(ticket, &[]);
        assert!(filter.filtered_view().is_empty());

        filter.on_dataset_changed(&dataset());
        assert_eq!(filter.filtered_view().len(), 1);
        assert_eq!(filter.filtered_view()[0].symbol(), "ETH");
    }

    #[test]
    fn cancel_clears_pending_ticket() {
        let data = dataset();
        let mut filter = DebouncedFilter::new(Duration::from_millis(50));
        let ticket = filter.set_query("eth").unwrap();
        assert!(filter.cancel());
        assert!(!filter.cancel());
        assert!(!filter.fire(ticket, &data));
        assert_eq!(filter.delay(), Duration::from_millis(50));
    }

    #[tokio::test]
    async fn arming_a_stale_ticket_aborts_the_timer() {
        let mut filter = DebouncedFilter::default();
        let stale = filter.set_query("a").unwrap();
        filter.set_query("ab");

        let timer = tokio::spawn(std::future::pending::<()>());
        filter.arm(stale, timer.abort_handle());
        let joined = timer.await;
        assert!(joined.unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn drop_aborts_live_timer() {
        let mut filter = DebouncedFilter::default();
        let ticket = filter.set_query("a").unwrap();
        let timer = tokio::spawn(std::future::pending::<()>());
        filter.arm(ticket, timer.abort_handle());

        drop(filter);
        assert!(timer.await.unwrap_err().is_cancelled());
    }
}
