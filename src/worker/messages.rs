//! Worker message types for the event loop ↔ background task protocol.
//!
//! The event handler never performs I/O or sleeps. Instead it emits
//! [`WorkerMessage`]s; the worker runs them as tokio tasks and reports their
//! completion as [`WorkerResponse`]s, which re-enter the event handler as
//! [`Event::WorkerResponse`](crate::app::Event::WorkerResponse).

use crate::app::controller::Generation;
use crate::app::filter::RecomputeTicket;
use crate::domain::{AssetRecord, FetchError};
use std::time::Duration;

/// Requests sent from the event handler to the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerMessage {
    /// Fetch the top-N assets for attempt `generation`.
    LoadAssets {
        /// Tag the response must carry back.
        generation: Generation,
    },

    /// Report [`WorkerResponse::RecomputeDue`] after `delay`.
    ScheduleRecompute {
        /// Ticket issued by the debounced filter.
        ticket: RecomputeTicket,

        /// Debounce window to wait.
        delay: Duration,
    },
}

impl WorkerMessage {
    pub const fn load_assets(generation: Generation) -> Self {
        Self::LoadAssets { generation }
    }

    pub const fn schedule_recompute(ticket: RecomputeTicket, delay: Duration) -> Self {
        Self::ScheduleRecompute { ticket, delay }
    }
}

/// Completions sent from worker tasks back to the event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerResponse {
    /// A fetch attempt returned a dataset.
    AssetsLoaded {
        generation: Generation,
        assets: Vec<AssetRecord>,
    },

    /// A fetch attempt failed.
    LoadFailed {
        generation: Generation,
        error: FetchError,
    },

    /// A debounce window elapsed without being cancelled.
    RecomputeDue { ticket: RecomputeTicket },
}
