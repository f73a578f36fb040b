//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the runtime shell (`main.rs`, the worker) and the
//! domain layer. It holds the two stateful components of the dashboard and
//! the event-driven loop that drives them.
//!
//! # Architecture
//!
//! ```text
//! User Input → Events → Event Handler → State Mutations → Actions → Worker
//!                           ↑                                          │
//!                           └────────── Worker Responses ──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`controller`]: Fetch lifecycle and the current dataset
//! - [`filter`]: Debounced query state and the filtered view
//! - [`handler`]: Event processing and state transitions
//! - [`load_state`]: Fetch lifecycle stages
//! - [`state`]: Dashboard container and view model computation

pub mod actions;
pub mod controller;
pub mod filter;
pub mod handler;
pub mod load_state;
pub mod state;

pub use actions::Action;
pub use controller::{FetchController, Generation, Resolution};
pub use filter::{filter_assets, DebouncedFilter, RecomputeTicket, DEFAULT_DEBOUNCE};
pub use handler::{handle_event, Event};
pub use load_state::LoadState;
pub use state::Dashboard;
