//! Scripted price source for tests.
//!
//! Replies to `top_assets` are consumed from a queue in call order, each with
//! its own delay, so tests can make an earlier request finish after a later
//! one. When the queue is empty the fallback reply is used.

use super::backend::PriceSource;
use crate::domain::{
    AssetDetails, AssetRecord, FetchError, FetchResult, MarketQuery, SearchHit,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// One scripted `top_assets` reply.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub delay: Duration,
    pub outcome: FetchResult<Vec<AssetRecord>>,
}

impl MockReply {
    #[must_use]
    pub const fn ok(assets: Vec<AssetRecord>) -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Ok(assets),
        }
    }

    #[must_use]
    pub const fn err(error: FetchError) -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Err(error),
        }
    }

    #[must_use]
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Mock source with scripted replies and a call counter.
#[derive(Debug, Default)]
pub struct MockPriceSource {
    replies: Mutex<VecDeque<MockReply>>,
    fallback: Mutex<Option<MockReply>>,
    details: Mutex<Option<FetchResult<AssetDetails>>>,
    hits: Mutex<Vec<SearchHit>>,
    calls: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockPriceSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply for the next unanswered `top_assets` call.
    #[must_use]
    pub fn with_reply(self, reply: MockReply) -> Self {
        lock(&self.replies).push_back(reply);
        self
    }

    /// Reply used once the queue is exhausted.
    #[must_use]
    pub fn with_fallback(self, reply: MockReply) -> Self {
        *lock(&self.fallback) = Some(reply);
        self
    }

    #[must_use]
    pub fn with_details(self, outcome: FetchResult<AssetDetails>) -> Self {
        *lock(&self.details) = Some(outcome);
        self
    }

    #[must_use]
    pub fn with_search_hits(self, hits: Vec<SearchHit>) -> Self {
        *lock(&self.hits) = hits;
        self
    }

    /// Number of `top_assets` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_reply(&self) -> MockReply {
        if let Some(reply) = lock(&self.replies).pop_front() {
            return reply;
        }
        lock(&self.fallback)
            .clone()
            .unwrap_or_else(|| MockReply::ok(Vec::new()))
    }
}

#[async_trait]
impl PriceSource for MockPriceSource {
    async fn top_assets(&self, _query: &MarketQuery) -> FetchResult<Vec<AssetRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.next_reply();
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.outcome
    }

    async fn asset_details(&self, id: &str) -> FetchResult<AssetDetails> {
        lock(&self.details).clone().unwrap_or_else(|| {
            Ok(AssetDetails {
                id: Some(id.to_string()),
                ..AssetDetails::default()
            })
        })
    }

    async fn search(&self, text: &str) -> FetchResult<Vec<SearchHit>> {
        let needle = text.trim().to_lowercase();
        Ok(lock(&self.hits)
            .iter()
            .filter(|hit| {
                [&hit.name, &hit.symbol]
                    .into_iter()
                    .flatten()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }
}
