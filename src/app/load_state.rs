//! Lifecycle stage of the most recent fetch attempt.
//!
//! # State Machine
//!
//! ```text
//!            initialize()          success
//!   Idle ───────────────► Loading ─────────► Ready
//!                          ▲   │                │
//!                refetch() │   │ failure        │ refetch()
//!                          │   ▼                │
//!                          └─ Failed ◄──────────┘ (via Loading)
//! ```
//!
//! `Loading` never clears the previous dataset or error; it only signals that
//! a newer attempt is outstanding.

/// Lifecycle stage of the fetch controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// No fetch has ever been started.
    #[default]
    Idle,

    /// The most recently started attempt has not resolved yet.
    Loading,

    /// The most recent attempt succeeded.
    Ready,

    /// The most recent attempt failed.
    Failed,
}

impl LoadState {
    /// Whether an attempt is outstanding.
    #[must_use]
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Short lowercase label for status lines and log fields.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}
