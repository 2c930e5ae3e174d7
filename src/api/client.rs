use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::ApiError;
use super::{
    prediction_feedback_path, prediction_summary_path, CdssApi, PATH_BASIC_HEALTH,
    PATH_DATABASE_HEALTH, PATH_DETAILED_HEALTH, PATH_FEEDBACK, PATH_FEEDBACK_STATS,
    PATH_OUTCOME, PATH_PREDICT, PATH_TRAINING_DATA,
};
use crate::config::ClientConfig;
use crate::models::{
    ClinicalFeedbackRequest, ClinicalFeedbackResponse, ClinicalOutcomeRequest,
    ClinicalOutcomeResponse, FeedbackStatistics, FeedbackSummary, HealthResponse,
    PredictionRequest, PredictionResponse, TrainingDataRequest, TrainingDataResponse,
};

/// JSON-over-HTTP client for the prediction backend.
///
/// No retries, no caching. Every call is bounded by the configured
/// request timeout and logged as a request/response pair.
pub struct HttpClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Client configured from `CDSS_*` environment variables.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(&ClientConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::info!(method = "GET", %url, "API request");
        let sent = self.client.get(&url).send().await;
        self.read_response("GET", &url, sent).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let payload = serde_json::to_string(body).map_err(|e| ApiError::Unknown(e.to_string()))?;
        tracing::info!(method = "POST", %url, "API request");
        tracing::debug!(%payload, "Request data");
        let sent = self.client.post(&url).body(payload).send().await;
        self.read_response("POST", &url, sent).await
    }

    async fn read_response<T: DeserializeOwned>(
        &self,
        method: &str,
        url: &str,
        sent: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<T, ApiError> {
        let response = sent.map_err(|e| {
            tracing::warn!(method, url, error = %e, "API request failed without a response");
            ApiError::from_transport(&e, &self.base_url)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::warn!(method, url, error = %e, "API response body could not be read");
            ApiError::from_transport(&e, &self.base_url)
        })?;

        if !status.is_success() {
            tracing::warn!(method, url, status = status.as_u16(), %body, "API error response");
            return Err(ApiError::from_response(status.as_u16(), &body));
        }

        tracing::info!(method, url, status = status.as_u16(), "API response");
        tracing::debug!(%body, "Response data");

        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(method, url, error = %e, "API response did not match schema");
            ApiError::Unknown(e.to_string())
        })
    }
}

impl CdssApi for HttpClient {
    async fn check_basic_health(&self) -> Result<HealthResponse, ApiError> {
        self.get(PATH_BASIC_HEALTH).await
    }

    async fn check_detailed_health(&self) -> Result<HealthResponse, ApiError> {
        self.get(PATH_DETAILED_HEALTH).await
    }

    async fn check_database_health(&self) -> Result<HealthResponse, ApiError> {
        self.get(PATH_DATABASE_HEALTH).await
    }

    async fn submit_prediction(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, ApiError> {
        self.post(PATH_PREDICT, request).await
    }

    async fn submit_feedback(
        &self,
        request: &ClinicalFeedbackRequest,
    ) -> Result<ClinicalFeedbackResponse, ApiError> {
        self.post(PATH_FEEDBACK, request).await
    }

    async fn submit_outcome(
        &self,
        request: &ClinicalOutcomeRequest,
    ) -> Result<ClinicalOutcomeResponse, ApiError> {
        self.post(PATH_OUTCOME, request).await
    }

    async fn add_training_data(
        &self,
        request: &TrainingDataRequest,
    ) -> Result<TrainingDataResponse, ApiError> {
        self.post(PATH_TRAINING_DATA, request).await
    }

    async fn get_feedback_for_prediction(
        &self,
        prediction_id: i64,
    ) -> Result<Vec<ClinicalFeedbackRequest>, ApiError> {
        self.get(&prediction_feedback_path(prediction_id)).await
    }

    async fn get_feedback_summary(
        &self,
        prediction_id: i64,
    ) -> Result<FeedbackSummary, ApiError> {
        self.get(&prediction_summary_path(prediction_id)).await
    }

    async fn get_feedback_stats(&self) -> Result<FeedbackStatistics, ApiError> {
        self.get(PATH_FEEDBACK_STATS).await
    }
}
