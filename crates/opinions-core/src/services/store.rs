//! Client-side cache of the opinion feed.
//!
//! The store is the only component that talks to the remote service. It
//! publishes immutable snapshots over a `watch` channel; every mutation
//! replaces the list instead of editing entries in place.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

use crate::domain::{NewOpinion, Opinion, OpinionId};
use crate::ports::OpinionsApi;

use super::VoteDirection;

/// Immutable view of the cached feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpinionSnapshot {
    /// Cached opinions, newest creations first.
    pub opinions: Arc<[Opinion]>,
    /// Number of completed full loads.
    pub revision: u64,
}

impl OpinionSnapshot {
    pub fn find(&self, id: &OpinionId) -> Option<&Opinion> {
        self.opinions.iter().find(|opinion| &opinion.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.opinions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.opinions.len()
    }
}

/// Cheap-to-clone handle over the shared opinion cache.
#[derive(Clone)]
pub struct OpinionStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    api: Arc<dyn OpinionsApi>,
    snapshot: watch::Sender<OpinionSnapshot>,
    loading: AtomicBool,
}

/// Clears the in-flight flag when the load settles or is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl OpinionStore {
    pub fn new(api: Arc<dyn OpinionsApi>) -> Self {
        let (snapshot, _) = watch::channel(OpinionSnapshot::default());
        Self {
            inner: Arc::new(StoreInner {
                api,
                snapshot,
                loading: AtomicBool::new(false),
            }),
        }
    }

    /// Receive every snapshot published from now on.
    pub fn subscribe(&self) -> watch::Receiver<OpinionSnapshot> {
        self.inner.snapshot.subscribe()
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> OpinionSnapshot {
        self.inner.snapshot.borrow().clone()
    }

    /// Replace the cache with the server's full list.
    ///
    /// Returns `false` when the request failed (the cached list is kept) or
    /// when another load was already in flight (no request is made).
    pub async fn load(&self) -> bool {
        if self.inner.loading.swap(true, Ordering::AcqRel) {
            tracing::debug!("Load already in flight");
            return false;
        }
        let _in_flight = InFlight(&self.inner.loading);

        match self.inner.api.list().await {
            Ok(opinions) => {
                let opinions = dedup_by_id(opinions);
                let count = opinions.len();
                self.inner.snapshot.send_modify(|snapshot| {
                    snapshot.opinions = opinions.into();
                    snapshot.revision += 1;
                });
                tracing::info!(count, "Opinions loaded");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load opinions; keeping cached list");
                false
            }
        }
    }

    /// Persist a new opinion and prepend the stored entity to the cache.
    ///
    /// Returns `None` without touching the cache when the service did not
    /// accept it.
    pub async fn create(&self, draft: NewOpinion) -> Option<Opinion> {
        match self.inner.api.create(&draft).await {
            Ok(opinion) => {
                self.inner.snapshot.send_modify(|snapshot| {
                    snapshot.opinions = prepend(&snapshot.opinions, opinion.clone());
                });
                tracing::info!(id = %opinion.id, "Opinion created");
                Some(opinion)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to create opinion");
                None
            }
        }
    }

    /// Send an upvote. The cache is left alone either way.
    pub async fn upvote(&self, id: &OpinionId) -> bool {
        self.vote(id, VoteDirection::Up).await
    }

    /// Send a downvote. The cache is left alone either way.
    pub async fn downvote(&self, id: &OpinionId) -> bool {
        self.vote(id, VoteDirection::Down).await
    }

    async fn vote(&self, id: &OpinionId, direction: VoteDirection) -> bool {
        let result = match direction {
            VoteDirection::Up => self.inner.api.upvote(id).await,
            VoteDirection::Down => self.inner.api.downvote(id).await,
        };

        match result {
            Ok(()) => {
                tracing::debug!(id = %id, ?direction, "Vote confirmed");
                true
            }
            Err(e) => {
                tracing::warn!(id = %id, ?direction, error = %e, "Vote failed");
                false
            }
        }
    }
}

fn prepend(current: &[Opinion], created: Opinion) -> Arc<[Opinion]> {
    let id = created.id.clone();
    std::iter::once(created)
        .chain(current.iter().filter(|opinion| opinion.id != id).cloned())
        .collect()
}

fn dedup_by_id(opinions: Vec<Opinion>) -> Vec<Opinion> {
    let mut seen = HashSet::with_capacity(opinions.len());
    opinions
        .into_iter()
        .filter(|opinion| {
            let fresh = seen.insert(opinion.id.clone());
            if !fresh {
                tracing::warn!(id = %opinion.id, "Dropping duplicate opinion from server list");
            }
            fresh
        })
        .collect()
}
