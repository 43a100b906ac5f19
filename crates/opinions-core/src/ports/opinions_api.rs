use async_trait::async_trait;

use crate::domain::{NewOpinion, Opinion, OpinionId};
use crate::error::ApiError;

/// The remote opinions service.
///
/// Any non-success response is reported as an error; implementations do not
/// interpret error bodies.
#[async_trait]
pub trait OpinionsApi: Send + Sync {
    /// Fetch the full opinion collection, in server order.
    async fn list(&self) -> Result<Vec<Opinion>, ApiError>;

    /// Persist a new opinion and return the stored entity.
    async fn create(&self, opinion: &NewOpinion) -> Result<Opinion, ApiError>;

    /// Record one upvote for an existing opinion.
    async fn upvote(&self, id: &OpinionId) -> Result<(), ApiError>;

    /// Record one downvote for an existing opinion.
    async fn downvote(&self, id: &OpinionId) -> Result<(), ApiError>;
}
