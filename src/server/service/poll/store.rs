use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::server::model::poll::Poll;

/// Storage for running polls, keyed by poll message id.
#[async_trait]
pub trait PollStore: Send + Sync {
    async fn get(&self, poll_id: u64) -> Option<Poll>;

    /// Inserts or replaces a poll.
    async fn put(&self, poll: Poll);

    /// Applies `apply` to a stored poll under a single lock.
    ///
    /// Returns `false` without calling `apply` when the poll is not stored, so
    /// an update never brings back a poll that was ended.
    async fn update(&self, poll_id: u64, apply: &mut (dyn for<'p> FnMut(&'p mut Poll) + Send)) -> bool;

    /// Removes a poll, returning it when it existed.
    async fn delete(&self, poll_id: u64) -> Option<Poll>;
}

/// Process-lifetime poll store. Polls do not survive a restart.
#[derive(Debug, Default)]
pub struct InMemoryPollStore {
    polls: RwLock<HashMap<u64, Poll>>,
}

impl InMemoryPollStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PollStore for InMemoryPollStore {
    async fn get(&self, poll_id: u64) -> Option<Poll> {
        self.polls.read().await.get(&poll_id).cloned()
    }

    async fn put(&self, poll: Poll) {
        self.polls.write().await.insert(poll.id, poll);
    }

    async fn update(&self, poll_id: u64, apply: &mut (dyn for<'p> FnMut(&'p mut Poll) + Send)) -> bool {
        match self.polls.write().await.get_mut(&poll_id) {
            Some(poll) => {
                apply(poll);
                true
            }
            None => false,
        }
    }

    async fn delete(&self, poll_id: u64) -> Option<Poll> {
        self.polls.write().await.remove(&poll_id)
    }
}
