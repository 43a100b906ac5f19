//! In-memory opinions service.
//!
//! Stands in for the remote service in tests and in `minimal` builds.
//! Works within a single process only; data is lost on restart.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use opinions_core::ApiError;
use opinions_core::domain::{NewOpinion, Opinion, OpinionId};
use opinions_core::ports::OpinionsApi;

/// Request counters, for asserting how many calls reached the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestStats {
    pub list: usize,
    pub create: usize,
    pub upvote: usize,
    pub downvote: usize,
}

#[derive(Default)]
struct Counters {
    list: AtomicUsize,
    create: AtomicUsize,
    upvote: AtomicUsize,
    downvote: AtomicUsize,
}

/// In-memory opinions service with newest opinions first.
pub struct InMemoryOpinionsApi {
    opinions: RwLock<Vec<Opinion>>,
    counters: Counters,
    unavailable: AtomicBool,
}

impl InMemoryOpinionsApi {
    pub fn new() -> Self {
        Self::with_opinions(Vec::new())
    }

    pub fn with_opinions(opinions: Vec<Opinion>) -> Self {
        Self {
            opinions: RwLock::new(opinions),
            counters: Counters::default(),
            unavailable: AtomicBool::new(false),
        }
    }

    /// While unavailable every request fails with a 503 and changes nothing.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
        tracing::debug!(unavailable, "In-memory service availability changed");
    }

    pub fn stats(&self) -> RequestStats {
        RequestStats {
            list: self.counters.list.load(Ordering::SeqCst),
            create: self.counters.create.load(Ordering::SeqCst),
            upvote: self.counters.upvote.load(Ordering::SeqCst),
            downvote: self.counters.downvote.load(Ordering::SeqCst),
        }
    }

    /// Server-side vote count for `id`, if it exists.
    pub async fn votes_of(&self, id: &OpinionId) -> Option<i64> {
        self.opinions
            .read()
            .await
            .iter()
            .find(|opinion| &opinion.id == id)
            .map(|opinion| opinion.votes)
    }

    fn check_available(&self) -> Result<(), ApiError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ApiError::Status(503));
        }
        Ok(())
    }

    async fn apply_vote(&self, id: &OpinionId, delta: i64) -> Result<(), ApiError> {
        self.check_available()?;

        let mut opinions = self.opinions.write().await;
        let opinion = opinions
            .iter_mut()
            .find(|opinion| &opinion.id == id)
            .ok_or(ApiError::Status(404))?;
        opinion.votes = opinion.votes.saturating_add(delta);

        tracing::debug!(id = %id, votes = opinion.votes, "Vote applied");
        Ok(())
    }
}

impl Default for InMemoryOpinionsApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OpinionsApi for InMemoryOpinionsApi {
    async fn list(&self) -> Result<Vec<Opinion>, ApiError> {
        self.counters.list.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self.opinions.read().await.clone())
    }

    async fn create(&self, new_opinion: &NewOpinion) -> Result<Opinion, ApiError> {
        self.counters.create.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let opinion = Opinion {
            id: OpinionId::new(Uuid::new_v4().to_string()),
            title: new_opinion.title.clone(),
            body: new_opinion.body.clone(),
            user_name: new_opinion.user_name.clone(),
            votes: 0,
        };
        self.opinions.write().await.insert(0, opinion.clone());

        tracing::debug!(id = %opinion.id, "Opinion stored");
        Ok(opinion)
    }

    async fn upvote(&self, id: &OpinionId) -> Result<(), ApiError> {
        self.counters.upvote.fetch_add(1, Ordering::SeqCst);
        self.apply_vote(id, 1).await
    }

    async fn downvote(&self, id: &OpinionId) -> Result<(), ApiError> {
        self.counters.downvote.fetch_add(1, Ordering::SeqCst);
        self.apply_vote(id, -1).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NewOpinion {
        NewOpinion {
            title: "Borrowck is a friend".to_string(),
            body: "It only yells when you deserve it.".to_string(),
            user_name: "Ferris".to_string(),
        }
    }

    fn draft_opinion() -> Opinion {
        let draft = draft();
        Opinion {
            id: OpinionId::from("seed"),
            title: draft.title,
            body: draft.body,
            user_name: draft.user_name,
            votes: 0,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_prepends() {
        let api = InMemoryOpinionsApi::new();
        let first = api.create(&draft()).await.unwrap();
        let second = api.create(&draft()).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(second.votes, 0);

        let listed = api.list().await.unwrap();
        assert_eq!(listed, vec![second, first]);
    }

    #[tokio::test]
    async fn test_votes_apply_to_existing_opinion() {
        let api = InMemoryOpinionsApi::new();
        let created = api.create(&draft()).await.unwrap();

        api.upvote(&created.id).await.unwrap();
        api.upvote(&created.id).await.unwrap();
        api.downvote(&created.id).await.unwrap();

        assert_eq!(api.votes_of(&created.id).await, Some(1));
    }

    #[tokio::test]
    async fn test_votes_saturate_at_limits() {
        let api = InMemoryOpinionsApi::with_opinions(vec![
            Opinion {
                id: OpinionId::from("max"),
                votes: i64::MAX,
                ..draft_opinion()
            },
            Opinion {
                id: OpinionId::from("min"),
                votes: i64::MIN,
                ..draft_opinion()
            },
        ]);

        api.upvote(&OpinionId::from("max")).await.unwrap();
        api.downvote(&OpinionId::from("min")).await.unwrap();

        assert_eq!(api.votes_of(&OpinionId::from("max")).await, Some(i64::MAX));
        assert_eq!(api.votes_of(&OpinionId::from("min")).await, Some(i64::MIN));
    }

    #[tokio::test]
    async fn test_vote_on_unknown_id_is_not_found() {
        let api = InMemoryOpinionsApi::new();
        let result = api.upvote(&OpinionId::from("missing")).await;
        assert!(matches!(result, Err(ApiError::Status(404))));
    }

    #[tokio::test]
    async fn test_unavailable_rejects_and_counts() {
        let api = InMemoryOpinionsApi::new();
        api.set_unavailable(true);

        assert!(matches!(api.list().await, Err(ApiError::Status(503))));
        assert!(api.create(&draft()).await.is_err());

        api.set_unavailable(false);
        assert!(api.list().await.unwrap().is_empty());
        assert_eq!(
            api.stats(),
            RequestStats {
                list: 2,
                create: 1,
                ..RequestStats::default()
            }
        );
    }
}
