//! Event handling and state transition logic.
//!
//! This module implements the event handler that processes user input and
//! worker completions, translating them into state changes and action
//! sequences. It is the only place dashboard state is mutated.
//!
//! # Architecture
//!
//! 1. Events arrive from the input loop or from worker tasks
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State mutations occur via `FetchController` / `DebouncedFilter` methods
//! 4. Actions are collected and returned for execution
//!
//! # Event Types
//!
//! - **Lifecycle**: `Initialize`, `Quit`
//! - **Input**: `SetQuery`, `Refetch`
//! - **Worker**: `WorkerResponse` with fetch outcomes and debounce expiries
//!
//! # Example
//!
//! ```rust
//! use cryptodash::app::{handle_event, Action, Dashboard, Event};
//!
//! let mut state = Dashboard::default();
//! let (should_render, actions) = handle_event(&mut state, &Event::Initialize)?;
//! assert!(should_render);
//! assert!(matches!(actions[0], Action::PostToWorker(_)));
//! # Ok::<(), cryptodash::DashboardError>(())
//! ```

use crate::app::controller::Resolution;
use crate::app::{Action, Dashboard};
use crate::domain::error::Result;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Events triggered by user input or worker completions.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// First use of the dashboard; starts the initial fetch once.
    Initialize,

    /// Starts a new fetch attempt, superseding any outstanding one.
    Refetch,

    /// Replaces the immediate search query.
    SetQuery(String),

    /// Dismisses the view; cancels any pending debounce timer.
    Quit,

    /// Wraps a completion reported by a worker task.
    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates dashboard state, and returns actions to run.
///
/// The boolean is `true` when the visible state changed and the view should
/// be re-rendered.
///
/// # Errors
///
/// Currently infallible; fetch failures are absorbed into state. The
/// `Result` keeps the handler signature stable for the runtime.
pub fn handle_event(state: &mut Dashboard, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?EventKind::of(event)).entered();

    match event {
        Event::Initialize => Ok(state.controller.initialize().map_or_else(
            || (false, vec![]),
            |generation| {
                tracing::debug!(generation = %generation, "initial fetch requested");
                (
                    true,
                    vec![Action::PostToWorker(WorkerMessage::load_assets(generation))],
                )
            },
        )),
        Event::Refetch => {
            let generation = state.controller.refetch();
            tracing::debug!(generation = %generation, "manual refetch requested");
            Ok((
                true,
                vec![Action::PostToWorker(WorkerMessage::load_assets(generation))],
            ))
        }
        Event::SetQuery(text) => {
            let Some(ticket) = state.filter.set_query(text.as_str()) else {
                return Ok((false, vec![]));
            };
            let delay = state.filter.delay();
            Ok((
                true,
                vec![Action::PostToWorker(WorkerMessage::schedule_recompute(ticket, delay))],
            ))
        }
        Event::Quit => {
            if state.filter.cancel() {
                tracing::debug!("cancelled pending recompute on teardown");
            }
            Ok((false, vec![Action::Shutdown]))
        }
        Event::WorkerResponse(response) => match response {
            WorkerResponse::AssetsLoaded { generation, assets } => {
                let resolution = state.controller.resolve(*generation, Ok(assets.clone()));
                Ok((apply_resolution(state, resolution), vec![]))
            }
            WorkerResponse::LoadFailed { generation, error } => {
                let resolution = state.controller.resolve(*generation, Err(error.clone()));
                Ok((apply_resolution(state, resolution), vec![]))
            }
            WorkerResponse::RecomputeDue { ticket } => {
                let changed = state.filter.fire(*ticket, state.controller.dataset());
                Ok((changed, vec![]))
            }
        },
    }
}

/// Propagates an applied fetch result to the filter.
fn apply_resolution(state: &mut Dashboard, resolution: Resolution) -> bool {
    match resolution {
        Resolution::Applied { dataset_replaced } => {
            if dataset_replaced {
                state.filter.on_dataset_changed(state.controller.dataset());
            }
            true
        }
        Resolution::Discarded => false,
    }
}

/// Payload-free event label for span fields; datasets are not logged.
#[derive(Debug)]
enum EventKind {
    Initialize,
    Refetch,
    SetQuery,
    Quit,
    AssetsLoaded,
    LoadFailed,
    RecomputeDue,
}

impl EventKind {
    const fn of(event: &Event) -> Self {
        match event {
            Event::Initialize => Self::Initialize,
            Event::Refetch => Self::Refetch,
            Event::SetQuery(_) => Self::SetQuery,
            Event::Quit => Self::Quit,
            Event::WorkerResponse(WorkerResponse::AssetsLoaded { .. }) => Self::AssetsLoaded,
            Event::WorkerResponse(WorkerResponse::LoadFailed { .. }) => Self::LoadFailed,
            Event::WorkerResponse(WorkerResponse::RecomputeDue { .. }) => Self::RecomputeDue,
        }
    }
}
