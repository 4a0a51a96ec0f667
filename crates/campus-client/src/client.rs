//! HTTP implementation of [`QuizBackend`].

use std::time::Duration;

use campus_config::BackendConfig;
use campus_core::entities::{DomainDescriptor, Question, Recommendation};
use campus_core::enums::Phase;
use campus_core::responses::{
    ActionRequest, ActionResponse, PhaseOutcome, QuestionsResponse, RawQuestion,
    RecommendationsResponse, SearchRequest, SubmitRequest, SubmitResponse,
    validate_recommendations,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::QuizBackend;
use crate::error::ClientError;
use crate::http::decode_json;

/// JSON-over-HTTP client for the portal backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl BackendClient {
    /// Create a client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// fails to build.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, ClientError> {
        let base_url: String = base_url.into();
        Ok(Self {
            http: reqwest::Client::builder()
                .user_agent(user_agent)
                .timeout(timeout)
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Create a client from the `[backend]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// fails to build.
    pub fn from_config(config: &BackendConfig) -> Result<Self, ClientError> {
        Self::new(
            config.normalized_base_url(),
            Duration::from_secs(config.timeout_secs),
            &config.user_agent,
        )
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve a descriptor path pattern to an absolute URL.
    ///
    /// Absolute patterns (`http://`, `https://`) are used as-is after
    /// placeholder expansion.
    #[must_use]
    pub fn endpoint(&self, pattern: &str, domain: &str) -> String {
        let path = DomainDescriptor::expand_path(pattern, &urlencoding::encode(domain));
        if path.starts_with("http://") || path.starts_with("https://") {
            path
        } else if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.timeout.as_secs())
        } else {
            ClientError::Http(err)
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        tracing::debug!(url, "GET");
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        decode_json(resp).await
    }

    async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(url, "POST");
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        decode_json(resp).await
    }
}

fn unsupported(descriptor: &DomainDescriptor, operation: &str) -> ClientError {
    ClientError::Unsupported {
        domain: descriptor.name.clone(),
        operation: operation.to_string(),
    }
}

impl QuizBackend for BackendClient {
    async fn fetch_initial_questions(
        &self,
        descriptor: &DomainDescriptor,
    ) -> Result<Vec<Question>, ClientError> {
        let url = self.endpoint(&descriptor.questions_path, &descriptor.name);
        let data: QuestionsResponse = self.get_json(&url).await?;
        data.questions
            .into_iter()
            .map(RawQuestion::into_initial)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    async fn submit_phase(
        &self,
        descriptor: &DomainDescriptor,
        phase: Phase,
        request: &SubmitRequest,
    ) -> Result<PhaseOutcome, ClientError> {
        let pattern = match phase {
            Phase::Initial => descriptor.submit_path.as_str(),
            Phase::FollowUp => descriptor
                .follow_up_path
                .as_deref()
                .ok_or_else(|| unsupported(descriptor, "follow-up submission"))?,
            Phase::Recommendations => return Err(unsupported(descriptor, "submission")),
        };
        let url = self.endpoint(pattern, &descriptor.name);
        let data: SubmitResponse = self.post_json(&url, request).await?;
        data.into_outcome()
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    async fn search(
        &self,
        descriptor: &DomainDescriptor,
        request: &SearchRequest,
    ) -> Result<Vec<Recommendation>, ClientError> {
        let pattern = descriptor
            .search_path
            .as_deref()
            .ok_or_else(|| unsupported(descriptor, "search"))?;
        let url = self.endpoint(pattern, &descriptor.name);
        let data: RecommendationsResponse = self.post_json(&url, request).await?;
        validate_recommendations(data.recommendations)
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    async fn commit_action(
        &self,
        descriptor: &DomainDescriptor,
        request: &ActionRequest,
    ) -> Result<ActionResponse, ClientError> {
        let pattern = descriptor
            .action_path
            .as_deref()
            .ok_or_else(|| unsupported(descriptor, &descriptor.action_label))?;
        let url = self.endpoint(pattern, &descriptor.name);
        self.post_json(&url, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> BackendClient {
        BackendClient::new("https://portal.example.edu/", Duration::from_secs(5), "test").unwrap()
    }

    #[test]
    fn endpoint_expands_and_encodes_domain() {
        let client = client();
        assert_eq!(
            client.endpoint("/api/modules/{domain}/ai-questions", "dorm"),
            "https://portal.example.edu/api/modules/dorm/ai-questions"
        );
        assert_eq!(
            client.endpoint("/api/modules/{domain}", "study abroad"),
            "https://portal.example.edu/api/modules/study%20abroad"
        );
    }

    #[test]
    fn endpoint_keeps_absolute_urls_and_adds_slash() {
        let client = client();
        assert_eq!(
            client.endpoint("https://search.example.edu/{domain}", "clubs"),
            "https://search.example.edu/clubs"
        );
        assert_eq!(
            client.endpoint("api/jobs/apply", "jobs"),
            "https://portal.example.edu/api/jobs/apply"
        );
    }

    #[test]
    fn from_config_uses_timeout_and_trims_url() {
        let config = BackendConfig {
            base_url: "http://localhost:3000/".into(),
            timeout_secs: 7,
            ..Default::default()
        };
        let client = BackendClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.timeout(), Duration::from_secs(7));
    }

    #[tokio::test]
    async fn search_without_path_is_unsupported() {
        let descriptor = DomainDescriptor::new("onboarding");
        let request = SearchRequest {
            search: "quiet".into(),
            current_recommendations: Vec::new(),
        };
        let err = client().search(&descriptor, &request).await.unwrap_err();
        assert!(matches!(err, ClientError::Unsupported { .. }));
    }
}
