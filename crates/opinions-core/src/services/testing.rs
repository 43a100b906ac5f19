//! Scripted `OpinionsApi` for service tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::{Notify, Semaphore};

use crate::domain::{NewOpinion, Opinion, OpinionId};
use crate::error::ApiError;
use crate::ports::OpinionsApi;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    List,
    Create(NewOpinion),
    Upvote(OpinionId),
    Downvote(OpinionId),
}

pub(crate) fn opinion(id: &str, votes: i64) -> Opinion {
    Opinion {
        id: id.into(),
        title: format!("Title {id}"),
        body: format!("Body of opinion {id}"),
        user_name: "Tester".to_string(),
        votes,
    }
}

pub(crate) fn new_opinion() -> NewOpinion {
    NewOpinion {
        title: "Tabs over spaces".to_string(),
        body: "Because alignment is a rendering concern.".to_string(),
        user_name: "Grace".to_string(),
    }
}

/// Fake service that records calls, applies votes to its own list, and can
/// fail or hold every request on demand.
pub(crate) struct ScriptedApi {
    opinions: Mutex<Vec<Opinion>>,
    calls: Mutex<Vec<Call>>,
    next_id: Mutex<Option<String>>,
    created: AtomicU64,
    failing: AtomicBool,
    holding: AtomicBool,
    started: Notify,
    release: Semaphore,
}

impl ScriptedApi {
    pub(crate) fn with_opinions(opinions: Vec<Opinion>) -> Self {
        Self {
            opinions: Mutex::new(opinions),
            calls: Mutex::new(Vec::new()),
            next_id: Mutex::new(None),
            created: AtomicU64::new(0),
            failing: AtomicBool::new(false),
            holding: AtomicBool::new(false),
            started: Notify::new(),
            release: Semaphore::new(0),
        }
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub(crate) fn set_next_id(&self, id: &str) {
        *self.next_id.lock().unwrap() = Some(id.to_string());
    }

    /// Make every following request wait for [`release`](Self::release).
    pub(crate) fn hold(&self) {
        self.holding.store(true, Ordering::SeqCst);
    }

    pub(crate) fn unhold(&self) {
        self.holding.store(false, Ordering::SeqCst);
    }

    /// Wait until a held request has reached the service.
    pub(crate) async fn started(&self) {
        self.started.notified().await;
    }

    pub(crate) fn release(&self, requests: usize) {
        self.release.add_permits(requests);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn server_votes(&self, id: &str) -> i64 {
        self.opinions
            .lock()
            .unwrap()
            .iter()
            .find(|opinion| opinion.id.as_str() == id)
            .map(|opinion| opinion.votes)
            .unwrap()
    }

    async fn enter(&self, call: Call) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        if self.holding.load(Ordering::SeqCst) {
            self.started.notify_one();
            self.release.acquire().await.unwrap().forget();
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(ApiError::Status(500));
        }
        Ok(())
    }

    fn apply_vote(&self, id: &OpinionId, delta: i64) -> Result<(), ApiError> {
        let mut opinions = self.opinions.lock().unwrap();
        let opinion = opinions
            .iter_mut()
            .find(|opinion| &opinion.id == id)
            .ok_or(ApiError::Status(404))?;
        opinion.votes = opinion.votes.saturating_add(delta);
        Ok(())
    }
}

#[async_trait]
impl OpinionsApi for ScriptedApi {
    async fn list(&self) -> Result<Vec<Opinion>, ApiError> {
        self.enter(Call::List).await?;
        Ok(self.opinions.lock().unwrap().clone())
    }

    async fn create(&self, new_opinion: &NewOpinion) -> Result<Opinion, ApiError> {
        self.enter(Call::Create(new_opinion.clone())).await?;
        let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        let id = self
            .next_id
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| format!("created-{n}"));
        let opinion = Opinion {
            id: id.into(),
            title: new_opinion.title.clone(),
            body: new_opinion.body.clone(),
            user_name: new_opinion.user_name.clone(),
            votes: 0,
        };
        self.opinions.lock().unwrap().insert(0, opinion.clone());
        Ok(opinion)
    }

    async fn upvote(&self, id: &OpinionId) -> Result<(), ApiError> {
        self.enter(Call::Upvote(id.clone())).await?;
        self.apply_vote(id, 1)
    }

    async fn downvote(&self, id: &OpinionId) -> Result<(), ApiError> {
        self.enter(Call::Downvote(id.clone())).await?;
        self.apply_vote(id, -1)
    }
}
