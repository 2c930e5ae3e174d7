//! Backend API surface: one operation per endpoint.
//!
//! `CdssApi` is the seam between the wizard and the transport. `HttpClient`
//! talks to the real backend; `MockApi` answers from memory.

pub mod client;
pub mod error;
pub mod mock;

pub use client::HttpClient;
pub use error::{ApiError, ErrorKind, FieldError, LocSegment, NetworkFailure};
pub use mock::MockApi;

use crate::models::{
    ClinicalFeedbackRequest, ClinicalFeedbackResponse, ClinicalOutcomeRequest,
    ClinicalOutcomeResponse, FeedbackStatistics, FeedbackSummary, HealthResponse,
    PredictionRequest, PredictionResponse, TrainingDataRequest, TrainingDataResponse,
};

pub const PATH_BASIC_HEALTH: &str = "/health";
pub const PATH_DETAILED_HEALTH: &str = "/api/v1/health/";
pub const PATH_DATABASE_HEALTH: &str = "/api/v1/health/database";
pub const PATH_PREDICT: &str = "/api/v1/predict/";
pub const PATH_FEEDBACK: &str = "/api/v1/feedback/prediction-feedback";
pub const PATH_OUTCOME: &str = "/api/v1/feedback/clinical-outcome";
pub const PATH_TRAINING_DATA: &str = "/api/v1/feedback/add-training-data";
pub const PATH_FEEDBACK_STATS: &str = "/api/v1/feedback/feedback-stats";

pub fn prediction_feedback_path(prediction_id: i64) -> String {
    format!("/api/v1/feedback/prediction/{prediction_id}/feedback")
}

pub fn prediction_summary_path(prediction_id: i64) -> String {
    format!("/api/v1/feedback/prediction/{prediction_id}/summary")
}

/// Clinical decision support backend operations.
#[allow(async_fn_in_trait)]
pub trait CdssApi {
    async fn check_basic_health(&self) -> Result<HealthResponse, ApiError>;

    async fn check_detailed_health(&self) -> Result<HealthResponse, ApiError>;

    async fn check_database_health(&self) -> Result<HealthResponse, ApiError>;

    async fn submit_prediction(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, ApiError>;

    async fn submit_feedback(
        &self,
        request: &ClinicalFeedbackRequest,
    ) -> Result<ClinicalFeedbackResponse, ApiError>;

    async fn submit_outcome(
        &self,
        request: &ClinicalOutcomeRequest,
    ) -> Result<ClinicalOutcomeResponse, ApiError>;

    async fn add_training_data(
        &self,
        request: &TrainingDataRequest,
    ) -> Result<TrainingDataResponse, ApiError>;

    async fn get_feedback_for_prediction(
        &self,
        prediction_id: i64,
    ) -> Result<Vec<ClinicalFeedbackRequest>, ApiError>;

    async fn get_feedback_summary(&self, prediction_id: i64)
        -> Result<FeedbackSummary, ApiError>;

    async fn get_feedback_stats(&self) -> Result<FeedbackStatistics, ApiError>;

    /// Whether the basic liveness probe answers. Failures are logged, not returned.
    async fn is_backend_reachable(&self) -> bool {
        match self.check_basic_health().await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Backend connection failed");
                false
            }
        }
    }
}
