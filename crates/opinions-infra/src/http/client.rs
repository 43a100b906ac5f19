use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, Url};

use opinions_core::ApiError;
use opinions_core::domain::{NewOpinion, Opinion, OpinionId};
use opinions_core::ports::OpinionsApi;
use opinions_shared::{CreateOpinionRequest, OpinionDto};

/// Connection settings for the remote service.
#[derive(Debug, Clone)]
pub struct HttpApiConfig {
    /// Base URL, e.g. `http://localhost:3000`.
    pub base_url: String,
    /// Per-request timeout. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for HttpApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout: None,
        }
    }
}

/// `OpinionsApi` backed by the REST service.
///
/// Any non-2xx status is a failure; error bodies are never read.
pub struct HttpOpinionsApi {
    client: Client,
    base_url: Url,
}

impl HttpOpinionsApi {
    pub fn new(config: HttpApiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| ApiError::Config(format!("invalid base URL {}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Config(format!(
                "base URL {} cannot carry a path",
                config.base_url
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        tracing::debug!(base_url = %base_url, timeout = ?config.timeout, "HTTP opinions client ready");
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(super) fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn vote(&self, id: &OpinionId, action: &str) -> Result<(), ApiError> {
        let url = self.url(&["opinions", id.as_str(), action]);
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(transport)?;
        ensure_success(response)?;
        Ok(())
    }
}

#[async_trait]
impl OpinionsApi for HttpOpinionsApi {
    async fn list(&self) -> Result<Vec<Opinion>, ApiError> {
        let response = self
            .client
            .get(self.url(&["opinions"]))
            .send()
            .await
            .map_err(transport)?;

        let opinions: Vec<OpinionDto> = ensure_success(response)?
            .json()
            .await
            .map_err(decode)?;

        opinions.into_iter().map(into_opinion).collect()
    }

    async fn create(&self, opinion: &NewOpinion) -> Result<Opinion, ApiError> {
        let body = CreateOpinionRequest {
            title: opinion.title.clone(),
            body: opinion.body.clone(),
            user_name: opinion.user_name.clone(),
        };

        let response = self
            .client
            .post(self.url(&["opinions"]))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        let saved: Option<OpinionDto> = ensure_success(response)?
            .json()
            .await
            .map_err(decode)?;

        saved
            .ok_or_else(|| ApiError::Decode("service returned no opinion".to_string()))
            .and_then(into_opinion)
    }

    async fn upvote(&self, id: &OpinionId) -> Result<(), ApiError> {
        self.vote(id, "upvote").await
    }

    async fn downvote(&self, id: &OpinionId) -> Result<(), ApiError> {
        self.vote(id, "downvote").await
    }
}

fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if !status.is_success() {
        tracing::debug!(status = status.as_u16(), url = %response.url(), "Non-success response");
        return Err(ApiError::Status(status.as_u16()));
    }
    Ok(response)
}

fn transport(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

fn decode(err: reqwest::Error) -> ApiError {
    ApiError::Decode(err.to_string())
}

fn into_opinion(dto: OpinionDto) -> Result<Opinion, ApiError> {
    let id = dto
        .id
        .ok_or_else(|| ApiError::Decode("opinion without id".to_string()))?;

    Ok(Opinion {
        id: OpinionId::new(id.to_string()),
        title: dto.title,
        body: dto.body,
        user_name: dto.user_name,
        votes: dto.votes,
    })
}
