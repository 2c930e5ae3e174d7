use std::sync::Mutex;

use super::error::ApiError;
use super::CdssApi;
use crate::models::{
    ClinicalFeedbackRequest, ClinicalFeedbackResponse, ClinicalOutcomeRequest,
    ClinicalOutcomeResponse, ConditionAccuracy, DiseasePrediction, FeedbackStatistics,
    FeedbackSummary, HealthResponse, PredictionRequest, PredictionResponse, RecommendedMedication,
    RecommendedTest, TrainingDataRequest, TrainingDataResponse, Urgency,
};

/// In-memory backend for testing. Returns configurable responses
/// and records which operations were called.
pub struct MockApi {
    basic: Result<HealthResponse, ApiError>,
    detailed: Result<HealthResponse, ApiError>,
    database: Result<HealthResponse, ApiError>,
    prediction: Result<PredictionResponse, ApiError>,
    feedback: Result<ClinicalFeedbackResponse, ApiError>,
    outcome: Result<ClinicalOutcomeResponse, ApiError>,
    calls: Mutex<Vec<&'static str>>,
    feedback_sent: Mutex<Vec<ClinicalFeedbackRequest>>,
    outcomes_sent: Mutex<Vec<ClinicalOutcomeRequest>>,
}

impl MockApi {
    /// All probes healthy, every submission succeeds.
    pub fn healthy() -> Self {
        Self {
            basic: Ok(HealthResponse::with_status("healthy")),
            detailed: Ok(HealthResponse::with_status("healthy")),
            database: Ok(HealthResponse::with_status("healthy").with_database_state("connected")),
            prediction: Ok(sample_prediction()),
            feedback: Ok(ClinicalFeedbackResponse {
                message: "Feedback recorded".into(),
                feedback_id: 7,
                training_data_added: false,
                training_record_id: None,
                total_feedback_for_prediction: 1,
                prediction_accuracy_rate: 1.0,
            }),
            outcome: Ok(ClinicalOutcomeResponse {
                message: "Outcome recorded".into(),
                outcome_id: 42,
            }),
            calls: Mutex::new(Vec::new()),
            feedback_sent: Mutex::new(Vec::new()),
            outcomes_sent: Mutex::new(Vec::new()),
        }
    }

    pub fn with_basic(mut self, response: Result<HealthResponse, ApiError>) -> Self {
        self.basic = response;
        self
    }

    pub fn with_detailed(mut self, response: Result<HealthResponse, ApiError>) -> Self {
        self.detailed = response;
        self
    }

    pub fn with_database(mut self, response: Result<HealthResponse, ApiError>) -> Self {
        self.database = response;
        self
    }

    pub fn with_prediction(mut self, response: Result<PredictionResponse, ApiError>) -> Self {
        self.prediction = response;
        self
    }

    pub fn with_feedback(mut self, response: Result<ClinicalFeedbackResponse, ApiError>) -> Self {
        self.feedback = response;
        self
    }

    pub fn with_outcome(mut self, response: Result<ClinicalOutcomeResponse, ApiError>) -> Self {
        self.outcome = response;
        self
    }

    /// Names of the operations called so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.calls().iter().filter(|c| **c == operation).count()
    }

    pub fn feedback_sent(&self) -> Vec<ClinicalFeedbackRequest> {
        self.feedback_sent.lock().map(|f| f.clone()).unwrap_or_default()
    }

    pub fn outcomes_sent(&self) -> Vec<ClinicalOutcomeRequest> {
        self.outcomes_sent.lock().map(|o| o.clone()).unwrap_or_default()
    }

    fn record(&self, operation: &'static str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(operation);
        }
    }
}

impl CdssApi for MockApi {
    async fn check_basic_health(&self) -> Result<HealthResponse, ApiError> {
        self.record("check_basic_health");
        self.basic.clone()
    }

    async fn check_detailed_health(&self) -> Result<HealthResponse, ApiError> {
        self.record("check_detailed_health");
        self.detailed.clone()
    }

    async fn check_database_health(&self) -> Result<HealthResponse, ApiError> {
        self.record("check_database_health");
        self.database.clone()
    }

    async fn submit_prediction(
        &self,
        _request: &PredictionRequest,
    ) -> Result<PredictionResponse, ApiError> {
        self.record("submit_prediction");
        self.prediction.clone()
    }

    async fn submit_feedback(
        &self,
        request: &ClinicalFeedbackRequest,
    ) -> Result<ClinicalFeedbackResponse, ApiError> {
        self.record("submit_feedback");
        if let Ok(mut sent) = self.feedback_sent.lock() {
            sent.push(request.clone());
        }
        self.feedback.clone()
    }

    async fn submit_outcome(
        &self,
        request: &ClinicalOutcomeRequest,
    ) -> Result<ClinicalOutcomeResponse, ApiError> {
        self.record("submit_outcome");
        if let Ok(mut sent) = self.outcomes_sent.lock() {
            sent.push(request.clone());
        }
        self.outcome.clone()
    }

    async fn add_training_data(
        &self,
        _request: &TrainingDataRequest,
    ) -> Result<TrainingDataResponse, ApiError> {
        self.record("add_training_data");
        Ok(TrainingDataResponse {
            message: "Training data added".into(),
            training_id: 1,
        })
    }

    async fn get_feedback_for_prediction(
        &self,
        _prediction_id: i64,
    ) -> Result<Vec<ClinicalFeedbackRequest>, ApiError> {
        self.record("get_feedback_for_prediction");
        Ok(self.feedback_sent())
    }

    async fn get_feedback_summary(
        &self,
        prediction_id: i64,
    ) -> Result<FeedbackSummary, ApiError> {
        self.record("get_feedback_summary");
        Ok(FeedbackSummary {
            prediction_id,
            total_feedback_count: 0,
            accuracy_rate: 0.0,
            consensus_reached: false,
            average_confidence: 0.0,
            most_common_actual_diagnosis: None,
        })
    }

    async fn get_feedback_stats(&self) -> Result<FeedbackStatistics, ApiError> {
        self.record("get_feedback_stats");
        Ok(FeedbackStatistics {
            total_feedback_submissions: 0,
            overall_accuracy_rate: 0.0,
            high_confidence_feedback_count: 0,
            training_data_generated: 0,
            average_doctor_confidence: 0.0,
            most_accurate_predictions: vec![ConditionAccuracy {
                condition: "Influenza".into(),
                accuracy: 0.9,
            }],
        })
    }
}

/// A realistic single-diagnosis prediction result.
pub fn sample_prediction() -> PredictionResponse {
    PredictionResponse {
        predictions: vec![DiseasePrediction {
            icd10_code: "J18.9".into(),
            diagnosis: "Pneumonia, unspecified organism".into(),
            confidence: 0.82,
            recommended_tests: vec![RecommendedTest {
                test: "Chest X-ray".into(),
                confidence: 0.91,
                urgency: Urgency::Urgent,
                rationale: Some("Confirm consolidation".into()),
            }],
            recommended_medications: vec![RecommendedMedication {
                medication: "Azithromycin".into(),
                confidence: 0.74,
                dose_suggestion: Some("500mg day 1, then 250mg daily".into()),
                duration: Some("5 days".into()),
                contraindication_check: true,
            }],
            assessment_plan: "Treat as community-acquired pneumonia; reassess in 48h.".into(),
            rationale: vec!["fever".into(), "productive cough".into()],
            risk_factors: vec!["diabetes type 2".into()],
            differential_diagnoses: vec!["Acute bronchitis".into()],
        }],
        model_version: "1.4.0".into(),
        processing_time_ms: 42.7,
        confidence_threshold: 0.3,
        generated_at: "2026-10-17T09:00:00Z".into(),
        clinical_warnings: vec!["Penicillin allergy reported".into()],
        disclaimer: "For clinical decision support only.".into(),
    }
}
