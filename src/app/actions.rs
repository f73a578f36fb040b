//! Actions representing side effects to be executed by the runtime.
//!
//! The event handler returns a `Vec<Action>` after processing each event,
//! allowing several side effects to be queued at once. The binary (or a test
//! harness) executes them in order through
//! [`DashboardWorker::execute_action`].
//!
//! # Example
//!
//! ```rust
//! use cryptodash::app::{Action, FetchController};
//! use cryptodash::worker::WorkerMessage;
//!
//! let mut controller = FetchController::new();
//! let generation = controller.refetch();
//! let actions = vec![Action::PostToWorker(WorkerMessage::load_assets(generation))];
//! assert_eq!(actions.len(), 1);
//! ```
//!
//! [`DashboardWorker::execute_action`]: crate::worker::DashboardWorker::execute_action

use crate::worker::WorkerMessage;

/// Commands representing side effects to be executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hands a message to the background worker (fetches, timers).
    PostToWorker(WorkerMessage),

    /// Stops the event loop; the view has been dismissed.
    Shutdown,
}
