//! # Backend Module
//!
//! REST surface of the quest backend, behind the [`QuestBackend`] seam so
//! the engine and its tests run without a server.
//!
//! [`HttpQuestBackend`] is the production implementation: reqwest with a
//! per-request timeout, percent-encoded path segments, and status mapping
//! (403 on a detail fetch is the server-side proximity check and surfaces
//! exactly like the local gate's rejection).

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use serde::Deserialize;
use tokio::time::timeout;

use crate::config::BackendConfig;
use crate::geo::Coordinate;
use crate::play::errors::PlayError;
use crate::play::types::{QuizAnswer, StageDetail, StagePoint};

/// Backend REST surface consumed by the play engine.
#[async_trait]
pub trait QuestBackend: Send + Sync {
    /// `GET /play/{questId}/points`
    async fn list_stage_points(&self, quest_id: &str) -> Result<Vec<StagePoint>, PlayError>;

    /// `GET /play/{questId}/{stageId}?lat&lng`, proximity re-validated
    /// server-side; a 403 maps to [`PlayError::TooFar`].
    async fn fetch_stage_detail(
        &self,
        quest_id: &str,
        stage_id: &str,
        at: Coordinate,
    ) -> Result<StageDetail, PlayError>;

    /// `POST /play/{questId}/{stageId}` with the selected answer.
    /// `Ok(true)` means the backend validated the answer and marked the
    /// stage cleared.
    async fn submit_answer(
        &self,
        quest_id: &str,
        stage_id: &str,
        answer: QuizAnswer,
    ) -> Result<bool, PlayError>;

    /// `POST /play/{questId}/end`
    async fn end_session(&self, quest_id: &str) -> Result<(), PlayError>;

    /// `GET /clear/quest-album/count`: lifetime cleared-quest count for the
    /// signed-in user.
    async fn cleared_quest_count(&self) -> Result<u32, PlayError>;
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    correct: bool,
}

/// HTTP implementation of [`QuestBackend`].
pub struct HttpQuestBackend {
    base_url: String,
    timeout_seconds: u64,
    client: reqwest::Client,
}

impl HttpQuestBackend {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_seconds: config.timeout_seconds,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    /// Send a request with the configured timeout and map the status.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, PlayError> {
        let seconds = self.timeout_seconds;
        let response = timeout(Duration::from_secs(seconds), request.send())
            .await
            .map_err(|_| PlayError::Timeout { seconds })??;
        Ok(response)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, PlayError> {
        let status = response.status();
        if !status.is_success() {
            return Err(PlayError::Status(status.as_u16()));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| PlayError::MalformedPayload(e.to_string()))
    }
}

#[async_trait]
impl QuestBackend for HttpQuestBackend {
    async fn list_stage_points(&self, quest_id: &str) -> Result<Vec<StagePoint>, PlayError> {
        let url = self.url(&["play", quest_id, "points"]);
        debug!("fetching stage points: {url}");
        let response = self.send(self.client.get(&url)).await?;
        Self::decode(response).await
    }

    async fn fetch_stage_detail(
        &self,
        quest_id: &str,
        stage_id: &str,
        at: Coordinate,
    ) -> Result<StageDetail, PlayError> {
        let url = self.url(&["play", quest_id, stage_id]);
        debug!("fetching stage detail: {url}");
        let request = self
            .client
            .get(&url)
            .query(&[("lat", at.latitude), ("lng", at.longitude)]);
        let response = self.send(request).await?;

        if response.status().as_u16() == 403 {
            // Server-side distance check failed; the client gate was stale
            // or bypassed. Distance is unknown here, only the verdict.
            warn!("server rejected stage {stage_id}: proximity check failed");
            return Err(PlayError::TooFar {
                distance_m: f64::INFINITY,
                threshold_m: 0.0,
            });
        }
        Self::decode(response).await
    }

    async fn submit_answer(
        &self,
        quest_id: &str,
        stage_id: &str,
        answer: QuizAnswer,
    ) -> Result<bool, PlayError> {
        let url = self.url(&["play", quest_id, stage_id]);
        debug!("submitting answer {} to {url}", answer.as_str());
        let request = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "answer": answer.as_str() }));
        let response = self.send(request).await?;
        let body: SubmitResponse = Self::decode(response).await?;
        Ok(body.correct)
    }

    async fn end_session(&self, quest_id: &str) -> Result<(), PlayError> {
        let url = self.url(&["play", quest_id, "end"]);
        debug!("ending play session: {url}");
        let response = self.send(self.client.post(&url)).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PlayError::Status(status.as_u16()));
        }
        Ok(())
    }

    async fn cleared_quest_count(&self) -> Result<u32, PlayError> {
        let url = self.url(&["clear", "quest-album", "count"]);
        debug!("fetching cleared-quest count: {url}");
        let response = self.send(self.client.get(&url)).await?;
        Self::decode(response).await
    }
}
