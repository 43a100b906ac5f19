//! Optimistic per-opinion vote counter.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};

use crate::domain::OpinionId;

use super::{ClientPolicy, OpinionSnapshot, OpinionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    pub fn delta(self) -> i64 {
        match self {
            VoteDirection::Up => 1,
            VoteDirection::Down => -1,
        }
    }
}

/// How a vote action settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The service accepted the vote.
    Confirmed,
    /// The request failed; the optimistic count stands unless rollback is on.
    Failed,
    /// Another vote for this opinion was still in flight; nothing was sent.
    Ignored,
}

/// Optimistic vote counter for one opinion.
///
/// The displayed count moves by one as soon as a vote is cast and is
/// re-seeded from the store whenever the server value for this opinion
/// changes or a full load lands. Clones share the same counter.
#[derive(Clone)]
pub struct VoteController {
    id: OpinionId,
    store: OpinionStore,
    policy: ClientPolicy,
    state: Arc<Mutex<VoteState>>,
}

struct VoteState {
    updates: watch::Receiver<OpinionSnapshot>,
    authoritative: i64,
    revision: u64,
    optimistic: i64,
    /// Bumped on every re-seed so a late rollback never undoes fresh data.
    seed: u64,
    pending: bool,
}

impl VoteController {
    pub fn new(store: OpinionStore, id: OpinionId, policy: ClientPolicy) -> Self {
        let mut updates = store.subscribe();
        let (votes, revision) = {
            let snapshot = updates.borrow_and_update();
            (
                snapshot.find(&id).map(|o| o.votes).unwrap_or_default(),
                snapshot.revision,
            )
        };

        Self {
            id,
            store,
            policy,
            state: Arc::new(Mutex::new(VoteState {
                updates,
                authoritative: votes,
                revision,
                optimistic: votes,
                seed: 0,
                pending: false,
            })),
        }
    }

    /// The count to show right now.
    pub async fn displayed_votes(&self) -> i64 {
        let mut guard = self.state.lock().await;
        self.reconcile(&mut guard);
        guard.optimistic
    }

    /// Whether both vote controls should be disabled.
    pub async fn is_pending(&self) -> bool {
        self.state.lock().await.pending
    }

    pub async fn upvote(&self) -> VoteOutcome {
        self.vote(VoteDirection::Up).await
    }

    pub async fn downvote(&self) -> VoteOutcome {
        self.vote(VoteDirection::Down).await
    }

    async fn vote(&self, direction: VoteDirection) -> VoteOutcome {
        match self.start(direction).await {
            Some(request) => request.send().await,
            None => VoteOutcome::Ignored,
        }
    }

    /// Apply the optimistic delta now and hand back the request to send.
    ///
    /// Returns `None`, changing nothing, while another vote for this opinion
    /// is pending.
    pub async fn start(&self, direction: VoteDirection) -> Option<VoteRequest> {
        let mut guard = self.state.lock().await;
        self.reconcile(&mut guard);
        if guard.pending {
            tracing::debug!(id = %self.id, ?direction, "Vote ignored while another is pending");
            return None;
        }
        guard.pending = true;
        guard.optimistic = guard.optimistic.saturating_add(direction.delta());

        Some(VoteRequest {
            controller: self.clone(),
            direction,
            seed: guard.seed,
        })
    }

    fn reconcile(&self, state: &mut VoteState) {
        if !state.updates.has_changed().unwrap_or(false) {
            return;
        }

        let (votes, revision) = {
            let snapshot = state.updates.borrow_and_update();
            (snapshot.find(&self.id).map(|o| o.votes), snapshot.revision)
        };

        // An opinion missing from the list keeps its last known count.
        let Some(votes) = votes else {
            return;
        };

        if votes != state.authoritative || revision != state.revision {
            state.authoritative = votes;
            state.revision = revision;
            state.optimistic = votes;
            state.seed += 1;
        }
    }
}

/// A vote whose optimistic delta is already displayed.
///
/// Dropping it without sending leaves the controls disabled.
#[must_use = "the vote stays pending until it is sent"]
pub struct VoteRequest {
    controller: VoteController,
    direction: VoteDirection,
    seed: u64,
}

impl VoteRequest {
    /// Send the vote and re-enable the controls once it settles.
    pub async fn send(self) -> VoteOutcome {
        let VoteRequest {
            controller,
            direction,
            seed,
        } = self;

        let confirmed = match direction {
            VoteDirection::Up => controller.store.upvote(&controller.id).await,
            VoteDirection::Down => controller.store.downvote(&controller.id).await,
        };

        let mut guard = controller.state.lock().await;
        guard.pending = false;
        if confirmed {
            return VoteOutcome::Confirmed;
        }

        if controller.policy.rollback_failed_votes && guard.seed == seed {
            guard.optimistic = guard.optimistic.saturating_sub(direction.delta());
            tracing::debug!(id = %controller.id, votes = guard.optimistic, "Optimistic vote rolled back");
        }
        VoteOutcome::Failed
    }
}
