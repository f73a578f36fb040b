//! Background task runner for fetches and debounce timers.
//!
//! The event handler stays synchronous and side-effect free; everything that
//! waits (network requests, debounce windows) runs here as tokio tasks whose
//! completions are posted back onto the event channel.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol between the handler and the worker
//! - `handler`: Worker implementation and action execution

pub mod handler;
pub mod messages;

pub use handler::{DashboardWorker, Dispatch};
pub use messages::{WorkerMessage, WorkerResponse};
