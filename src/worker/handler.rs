//! Worker implementation for fetches and debounce timers.
//!
//! The worker turns [`Action`]s into tokio tasks. Each task reports back by
//! sending an [`Event::WorkerResponse`] on the event channel; it never touches
//! dashboard state directly. Must be used from within a tokio runtime.

use crate::app::{handle_event, Action, Dashboard, Event, Generation, RecomputeTicket};
use crate::domain::error::Result;
use crate::domain::MarketQuery;
use crate::source::PriceSource;
use crate::worker::{WorkerMessage, WorkerResponse};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Result of dispatching one event through handler and worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    /// Visible state changed.
    pub should_render: bool,

    /// `false` once a shutdown action has been executed.
    pub keep_running: bool,
}

/// Executes actions by spawning tasks against a [`PriceSource`].
#[derive(Clone)]
pub struct DashboardWorker {
    source: Arc<dyn PriceSource>,
    events: UnboundedSender<Event>,
    query: MarketQuery,
}

impl DashboardWorker {
    /// Creates a worker that fetches `query` from `source` and posts
    /// completions to `events`.
    pub fn new(
        source: Arc<dyn PriceSource>,
        events: UnboundedSender<Event>,
        query: MarketQuery,
    ) -> Self {
        Self {
            source,
            events,
            query,
        }
    }

    /// Runs `event` through [`handle_event`] and executes the resulting actions.
    ///
    /// # Errors
    ///
    /// Propagates errors from the event handler.
    pub fn dispatch(&self, state: &mut Dashboard, event: &Event) -> Result<Dispatch> {
        let (should_render, actions) = handle_event(state, event)?;
        tracing::debug!(
            action_count = actions.len(),
            should_render = should_render,
            "event handled successfully"
        );

        let mut keep_running = true;
        for action in &actions {
            keep_running &= self.execute_action(state, action);
        }

        Ok(Dispatch {
            should_render,
            keep_running,
        })
    }

    /// Executes one action. Returns `false` for [`Action::Shutdown`].
    pub fn execute_action(&self, state: &mut Dashboard, action: &Action) -> bool {
        match action {
            Action::PostToWorker(message) => {
                self.handle_message(state, message);
                true
            }
            Action::Shutdown => {
                tracing::debug!("shutdown requested");
                false
            }
        }
    }

    /// Processes a worker message by spawning the matching task.
    ///
    /// Debounce timers are handed back to the filter as abort handles so a
    /// newer keystroke or teardown can cancel them.
    pub fn handle_message(&self, state: &mut Dashboard, message: &WorkerMessage) {
        let span = tracing::debug_span!("worker_handle_message", message_type = ?message);
        let _guard = span.entered();

        match *message {
            WorkerMessage::LoadAssets { generation } => {
                self.spawn_load(generation);
            }
            WorkerMessage::ScheduleRecompute { ticket, delay } => {
                let handle = self.spawn_recompute(ticket, delay);
                state.filter.arm(ticket, handle.abort_handle());
            }
        }
    }

    fn spawn_load(&self, generation: Generation) -> JoinHandle<()> {
        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        let query = self.query.clone();
        let span = tracing::debug_span!("fetch_assets", generation = generation.get());

        tokio::spawn(
            async move {
                let response = match source.top_assets(&query).await {
                    Ok(assets) => {
                        tracing::debug!(asset_count = assets.len(), "fetch succeeded");
                        WorkerResponse::AssetsLoaded { generation, assets }
                    }
                    Err(error) => {
                        tracing::debug!(error_kind = error.kind(), error = %error, "fetch failed");
                        WorkerResponse::LoadFailed { generation, error }
                    }
                };
                post(&events, response);
            }
            .instrument(span),
        )
    }

    fn spawn_recompute(&self, ticket: RecomputeTicket, delay: Duration) -> JoinHandle<()> {
        let events = self.events.clone();
        let span = tracing::trace_span!("debounce_timer", ticket = ticket.get());

        tokio::spawn(
            async move {
                tokio::time::sleep(delay).await;
                post(&events, WorkerResponse::RecomputeDue { ticket });
            }
            .instrument(span),
        )
    }
}

fn post(events: &UnboundedSender<Event>, response: WorkerResponse) {
    if events.send(Event::WorkerResponse(response)).is_err() {
        tracing::debug!("event loop closed, dropping worker response");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssetRecord, FetchError};
    use crate::source::{MockPriceSource, MockReply};
    use tokio::sync::mpsc;

    fn worker_with(source: MockPriceSource) -> (DashboardWorker, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = DashboardWorker::new(Arc::new(source), tx, MarketQuery::default());
        (worker, rx)
    }

    #[tokio::test]
    async fn load_posts_tagged_success() {
        let source =
            MockPriceSource::new().with_reply(MockReply::ok(vec![AssetRecord::new("Bitcoin", "btc")]));
        let (worker, mut rx) = worker_with(source);
        let mut state = Dashboard::default();

        worker.dispatch(&mut state, &Event::Initialize).unwrap();

        match rx.recv().await {
            Some(Event::WorkerResponse(WorkerResponse::AssetsLoaded { generation, assets })) => {
                assert_eq!(Some(generation), state.controller.current_generation());
                assert_eq!(assets.len(), 1);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn load_posts_tagged_failure() {
        let source = MockPriceSource::new().with_reply(MockReply::err(FetchError::Http { status: 429 }));
        let (worker, mut rx) = worker_with(source);
        let mut state = Dashboard::default();

        worker.dispatch(&mut state, &Event::Refetch).unwrap();

        assert!(matches!(
            rx.recv().await,
            Some(Event::WorkerResponse(WorkerResponse::LoadFailed {
                error: FetchError::Http { status: 429 },
                ..
            }))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn quit_stops_loop_and_silences_timer() {
        let (worker, mut rx) = worker_with(MockPriceSource::new());
        let mut state = Dashboard::default();

        worker.dispatch(&mut state, &Event::SetQuery("eth".into())).unwrap();
        let outcome = worker.dispatch(&mut state, &Event::Quit).unwrap();
        assert!(!outcome.keep_running);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }
}
