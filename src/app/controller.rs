//! Fetch controller: the sole owner of the current dataset.
//!
//! The controller tracks one logical "current dataset" and the lifecycle of
//! the fetch attempts that replace it. It performs no I/O itself; starting an
//! attempt hands out a [`Generation`] tag, and the worker later reports the
//! outcome back through [`FetchController::resolve`].
//!
//! # Stale-result discard
//!
//! Every call to [`initialize`](FetchController::initialize) or
//! [`refetch`](FetchController::refetch) bumps a monotonically increasing
//! generation counter. A resolution is applied only if its tag equals the
//! generation current at completion time, so results are ordered by start
//! order rather than completion order.
//!
//! ```rust
//! use cryptodash::app::{FetchController, LoadState, Resolution};
//! use cryptodash::domain::AssetRecord;
//!
//! let mut controller = FetchController::new();
//! let first = controller.refetch();
//! let second = controller.refetch();
//!
//! let x = vec![AssetRecord::new("X", "x")];
//! let y = vec![AssetRecord::new("Y", "y")];
//! controller.resolve(second, Ok(x.clone()));
//! assert_eq!(controller.resolve(first, Ok(y)), Resolution::Discarded);
//! assert_eq!(controller.dataset(), x.as_slice());
//! assert_eq!(controller.load_state(), LoadState::Ready);
//! ```

use super::load_state::LoadState;
use crate::domain::{AssetRecord, FetchError, FetchResult};
use chrono::{DateTime, Utc};
use std::fmt;

/// Tag identifying one fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What happened to a reported fetch outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The outcome was current and has been applied.
    Applied {
        /// Whether the dataset was replaced (success path).
        dataset_replaced: bool,
    },

    /// The outcome belonged to a superseded attempt and was ignored.
    Discarded,
}

/// Owner of the dataset, load state, error descriptor, and refresh time.
#[derive(Debug, Clone, Default)]
pub struct FetchController {
    dataset: Vec<AssetRecord>,
    load_state: LoadState,
    error: Option<FetchError>,
    last_updated: Option<DateTime<Utc>>,
    generation: u64,
}

impl FetchController {
    /// Creates a controller that has never loaded anything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the first fetch attempt.
    ///
    /// Returns `None` once any attempt has been started, so repeated calls
    /// never trigger more than one initial fetch.
    pub fn initialize(&mut self) -> Option<Generation> {
        if self.load_state != LoadState::Idle {
            tracing::debug!(load_state = self.load_state.label(), "already initialized");
            return None;
        }
        Some(self.begin())
    }

    /// Starts a new fetch attempt, superseding any outstanding one.
    ///
    /// The previous dataset and error stay observable until the new attempt
    /// resolves.
    pub fn refetch(&mut self) -> Generation {
        self.begin()
    }

    fn begin(&mut self) -> Generation {
        self.generation += 1;
        self.load_state = LoadState::Loading;
        tracing::debug!(generation = self.generation, "fetch attempt started");
        Generation(self.generation)
    }

    /// Applies the outcome of attempt `generation`, timestamped now.
    pub fn resolve(
        &mut self,
        generation: Generation,
        outcome: FetchResult<Vec<AssetRecord>>,
    ) -> Resolution {
        self.resolve_at(generation, outcome, Utc::now())
    }

    /// Applies the outcome of attempt `generation` as if it completed at `at`.
    ///
    /// Outcomes from any attempt other than the most recently started one are
    /// discarded without touching state.
    pub fn resolve_at(
        &mut self,
        generation: Generation,
        outcome: FetchResult<Vec<AssetRecord>>,
        at: DateTime<Utc>,
    ) -> Resolution {
        if generation.0 != self.generation {
            tracing::debug!(
                generation = generation.0,
                current_generation = self.generation,
                "discarding stale fetch result"
            );
            return Resolution::Discarded;
        }

        match outcome {
            Ok(assets) => {
                tracing::debug!(
                    generation = generation.0,
                    asset_count = assets.len(),
                    "fetch succeeded"
                );
                self.dataset = assets;
                self.load_state = LoadState::Ready;
                self.error = None;
                self.last_updated = Some(at);
                Resolution::Applied { dataset_replaced: true }
            }
            Err(error) => {
                tracing::warn!(
                    generation = generation.0,
                    error_kind = error.kind(),
                    error = %error,
                    kept_assets = self.dataset.len(),
                    "fetch failed"
                );
                self.load_state = LoadState::Failed;
                self.error = Some(error);
                Resolution::Applied { dataset_replaced: false }
            }
        }
    }

    /// The current dataset: the product of the last successful fetch.
    #[must_use]
    pub fn dataset(&self) -> &[AssetRecord] {
        &self.dataset
    }

    #[must_use]
    pub const fn load_state(&self) -> LoadState {
        self.load_state
    }

    /// Error of the most recent failed attempt, kept until a success.
    #[must_use]
    pub const fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    /// Human-readable form of [`error`](Self::error).
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Completion time of the last successful fetch.
    #[must_use]
    pub const fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// Tag of the most recently started attempt, if any.
    #[must_use]
    pub const fn current_generation(&self) -> Option<Generation> {
        if self.generation == 0 {
            None
        } else {
            Some(Generation(self.generation))
        }
    }
}
