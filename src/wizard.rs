//! Four-step wizard: health check → prediction → results → feedback.
//!
//! `WizardState` is the single source of truth for the session and only
//! changes through its transition methods. `Wizard` owns the state together
//! with an injected [`CdssApi`] and runs the network-backed operations that
//! drive those transitions. Failures never advance the wizard; they leave a
//! dismissible [`StatusMessage`] behind instead.

use std::collections::HashSet;

use rand::Rng;

use crate::api::{ApiError, CdssApi};
use crate::display::format_processing_time;
use crate::feedback_form::{FeedbackForm, OutcomeForm};
use crate::health_check::{self, HealthReport};
use crate::models::{
    ClinicalFeedbackResponse, ClinicalOutcomeResponse, FeedbackSummary, PredictionResponse,
};
use crate::prediction_form::PredictionForm;

/// Upper bound for synthetic prediction ids.
const MAX_PREDICTION_ID: i64 = 9_999_999;

pub const NO_RESULTS_MESSAGE: &str = "No prediction results available";
pub const NO_FEEDBACK_DATA_MESSAGE: &str = "No prediction data available for feedback";

// ═══════════════════════════════════════════════════════════
// Steps
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WizardStep {
    #[default]
    Health,
    Prediction,
    Results,
    Feedback,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Health,
        WizardStep::Prediction,
        WizardStep::Results,
        WizardStep::Feedback,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Health => "Health Check",
            Self::Prediction => "Disease Prediction",
            Self::Results => "Results",
            Self::Feedback => "Clinical Feedback",
        }
    }

    /// Position in the stepper, starting at 0.
    pub fn index(&self) -> usize {
        match self {
            Self::Health => 0,
            Self::Prediction => 1,
            Self::Results => 2,
            Self::Feedback => 3,
        }
    }

    /// Target of "back". `Health` has no predecessor and stays put.
    pub fn previous(&self) -> Self {
        match self {
            Self::Health | Self::Prediction => Self::Health,
            Self::Results => Self::Prediction,
            Self::Feedback => Self::Results,
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WizardError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{0}")]
    Unhealthy(String),

    #[error("{action} is only available from the {expected} step")]
    WrongStep {
        action: &'static str,
        expected: WizardStep,
    },

    #[error("No prediction results available")]
    NoPredictionResult,

    #[error("No prediction data available for feedback")]
    NoPredictionData,

    #[error("No unused prediction ids remain in this session")]
    PredictionIdsExhausted,
}

/// What the front end should render for the active step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepView<'a> {
    Health,
    Prediction,
    Results(&'a PredictionResponse),
    Feedback { prediction_id: i64 },
    /// A data-requiring step without its data.
    Unavailable(&'static str),
}

// ═══════════════════════════════════════════════════════════
// WizardState: pure transitions
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WizardState {
    current_step: WizardStep,
    prediction_result: Option<PredictionResponse>,
    prediction_id: Option<i64>,
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_step(&self) -> WizardStep {
        self.current_step
    }

    pub fn prediction_result(&self) -> Option<&PredictionResponse> {
        self.prediction_result.as_ref()
    }

    pub fn prediction_id(&self) -> Option<i64> {
        self.prediction_id
    }

    fn set_step(&mut self, step: WizardStep) {
        if self.current_step != step {
            tracing::info!(from = %self.current_step, to = %step, "Wizard step changed");
        }
        self.current_step = step;
    }

    fn require_step(&self, action: &'static str, expected: WizardStep) -> Result<(), WizardError> {
        if self.current_step == expected {
            Ok(())
        } else {
            Err(WizardError::WrongStep { action, expected })
        }
    }

    /// `health → prediction`, once every probe reported healthy.
    pub fn health_passed(&mut self) -> Result<(), WizardError> {
        self.require_step("Starting a prediction", WizardStep::Health)?;
        self.set_step(WizardStep::Prediction);
        Ok(())
    }

    /// `prediction → results`, storing the response under a fresh id.
    pub fn prediction_completed(
        &mut self,
        result: PredictionResponse,
        prediction_id: i64,
    ) -> Result<(), WizardError> {
        self.require_step("Showing results", WizardStep::Prediction)?;
        self.prediction_result = Some(result);
        self.prediction_id = Some(prediction_id);
        self.set_step(WizardStep::Results);
        Ok(())
    }

    /// `results → feedback`. Needs both the result and its id.
    pub fn proceed_to_feedback(&mut self) -> Result<(), WizardError> {
        self.require_step("Clinical feedback", WizardStep::Results)?;
        if self.prediction_result.is_none() {
            return Err(WizardError::NoPredictionResult);
        }
        if self.prediction_id.is_none() {
            return Err(WizardError::NoPredictionData);
        }
        self.set_step(WizardStep::Feedback);
        Ok(())
    }

    pub fn back(&mut self) {
        self.set_step(self.current_step.previous());
    }

    /// Return to the health check and forget the current prediction.
    pub fn home(&mut self) {
        self.prediction_result = None;
        self.prediction_id = None;
        self.set_step(WizardStep::Health);
    }

    pub fn view(&self) -> StepView<'_> {
        match self.current_step {
            WizardStep::Health => StepView::Health,
            WizardStep::Prediction => StepView::Prediction,
            WizardStep::Results => match &self.prediction_result {
                Some(result) => StepView::Results(result),
                None => StepView::Unavailable(NO_RESULTS_MESSAGE),
            },
            WizardStep::Feedback => match (&self.prediction_result, self.prediction_id) {
                (Some(_), Some(prediction_id)) => StepView::Feedback { prediction_id },
                _ => StepView::Unavailable(NO_FEEDBACK_DATA_MESSAGE),
            },
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Status messages
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// Inline, dismissible message for the active step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub severity: Severity,
    pub text: String,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            text: text.into(),
        }
    }
}

/// Random draws tried before falling back to a scan for a free id.
const RANDOM_ID_ATTEMPTS: usize = 64;

/// Issues client-local prediction ids, never the same one twice.
#[derive(Debug)]
struct PredictionIds {
    issued: HashSet<i64>,
    max: i64,
}

impl Default for PredictionIds {
    fn default() -> Self {
        Self::with_limit(MAX_PREDICTION_ID)
    }
}

impl PredictionIds {
    fn with_limit(max: i64) -> Self {
        Self {
            issued: HashSet::new(),
            max,
        }
    }

    /// `None` once every id in `1..=max` has been handed out.
    fn next(&mut self) -> Option<i64> {
        if self.issued.len() as i64 >= self.max {
            return None;
        }
        let mut rng = rand::thread_rng();
        for _ in 0..RANDOM_ID_ATTEMPTS {
            let id = rng.gen_range(1..=self.max);
            if self.issued.insert(id) {
                return Some(id);
            }
        }
        let id = (1..=self.max).find(|id| !self.issued.contains(id))?;
        self.issued.insert(id);
        Some(id)
    }
}

// ═══════════════════════════════════════════════════════════
// Wizard: network-backed controller
// ═══════════════════════════════════════════════════════════

pub struct Wizard<A> {
    api: A,
    state: WizardState,
    health: Option<HealthReport>,
    status: Option<StatusMessage>,
    ids: PredictionIds,
}

impl<A: CdssApi> Wizard<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: WizardState::new(),
            health: None,
            status: None,
            ids: PredictionIds::default(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn current_step(&self) -> WizardStep {
        self.state.current_step()
    }

    pub fn view(&self) -> StepView<'_> {
        self.state.view()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn dismiss_status(&mut self) {
        self.status = None;
    }

    /// Responses from the last complete health check.
    pub fn health_report(&self) -> Option<&HealthReport> {
        self.health.as_ref()
    }

    fn fail<T>(&mut self, err: WizardError, text: String) -> Result<T, WizardError> {
        tracing::warn!(step = %self.state.current_step(), error = %err, "Wizard operation failed");
        self.status = Some(StatusMessage::error(text));
        Err(err)
    }

    fn fail_plain<T>(&mut self, err: WizardError) -> Result<T, WizardError> {
        let text = err.to_string();
        self.fail(err, text)
    }

    /// Probe the backend and advance to the prediction form when all is well.
    pub async fn run_health_check(&mut self) -> Result<(), WizardError> {
        if let Err(e) = self.state.require_step("Health check", WizardStep::Health) {
            return self.fail_plain(e);
        }
        self.status = None;

        let report = match health_check::check_all(&self.api).await {
            Ok(report) => report,
            Err(e) => {
                self.health = None;
                return self.fail_plain(e.into());
            }
        };

        let failure = report.failure_message();
        self.health = Some(report);
        if let Some(message) = failure {
            return self.fail_plain(WizardError::Unhealthy(message));
        }

        tracing::info!("Health check passed, proceeding to prediction form");
        self.state.health_passed()
    }

    /// Validate the form, request a prediction and show its results.
    pub async fn submit_prediction(&mut self, form: &PredictionForm) -> Result<(), WizardError> {
        if let Err(e) = self.state.require_step("Submitting a prediction", WizardStep::Prediction)
        {
            return self.fail_plain(e);
        }
        self.status = None;

        let request = match form.to_request() {
            Ok(request) => request,
            Err(e) => return self.fail_plain(e.into()),
        };

        let result = match self.api.submit_prediction(&request).await {
            Ok(result) => result,
            Err(e) => return self.fail_plain(e.into()),
        };

        let Some(prediction_id) = self.ids.next() else {
            return self.fail_plain(WizardError::PredictionIdsExhausted);
        };
        let elapsed = format_processing_time(result.processing_time_ms);
        tracing::info!(prediction_id, predictions = result.predictions.len(), "Prediction completed");
        self.state.prediction_completed(result, prediction_id)?;
        self.status = Some(StatusMessage::success(format!(
            "Prediction completed in {elapsed}"
        )));
        Ok(())
    }

    /// Move from the results to the feedback forms.
    pub fn proceed_to_feedback(&mut self) -> Result<(), WizardError> {
        match self.state.proceed_to_feedback() {
            Ok(()) => {
                self.status = None;
                Ok(())
            }
            Err(e) => self.fail_plain(e),
        }
    }

    pub fn back(&mut self) {
        self.status = None;
        self.state.back();
    }

    /// Start over from the health check. Always allowed.
    pub fn home(&mut self) {
        self.status = None;
        self.state.home();
    }

    fn feedback_prediction_id(&self, action: &'static str) -> Result<i64, WizardError> {
        self.state.require_step(action, WizardStep::Feedback)?;
        self.state.prediction_id().ok_or(WizardError::NoPredictionData)
    }

    /// Send doctor feedback for the current prediction. The step does not change.
    pub async fn submit_feedback(
        &mut self,
        form: &FeedbackForm,
    ) -> Result<ClinicalFeedbackResponse, WizardError> {
        let prediction_id = match self.feedback_prediction_id("Submitting feedback") {
            Ok(id) => id,
            Err(e) => return self.fail_plain(e),
        };

        let request = match form.to_request(prediction_id) {
            Ok(request) => request,
            Err(e) => return self.fail_plain(e.into()),
        };

        match self.api.submit_feedback(&request).await {
            Ok(response) => {
                tracing::info!(prediction_id, feedback_id = response.feedback_id, "Feedback submitted");
                self.status = Some(StatusMessage::success(format!(
                    "Feedback submitted successfully! ID: {}",
                    response.feedback_id
                )));
                Ok(response)
            }
            Err(e) => {
                let text = format!("Failed to submit feedback: {e}");
                self.fail(e.into(), text)
            }
        }
    }

    /// Record the patient outcome for the current prediction. The step does not change.
    pub async fn submit_outcome(
        &mut self,
        form: &OutcomeForm,
    ) -> Result<ClinicalOutcomeResponse, WizardError> {
        let prediction_id = match self.feedback_prediction_id("Recording an outcome") {
            Ok(id) => id,
            Err(e) => return self.fail_plain(e),
        };

        let request = match form.to_request(prediction_id, chrono::Utc::now()) {
            Ok(request) => request,
            Err(e) => {
                let text = format!("Failed to record outcome: {e}");
                return self.fail(e.into(), text);
            }
        };

        match self.api.submit_outcome(&request).await {
            Ok(response) => {
                tracing::info!(prediction_id, outcome_id = response.outcome_id, "Clinical outcome recorded");
                self.status = Some(StatusMessage::success("Clinical outcome recorded successfully!"));
                Ok(response)
            }
            Err(e) => {
                let text = format!("Failed to record outcome: {e}");
                self.fail(e.into(), text)
            }
        }
    }

    /// Consensus across all feedback filed for the current prediction.
    pub async fn load_feedback_summary(&mut self) -> Result<FeedbackSummary, WizardError> {
        let Some(prediction_id) = self.state.prediction_id() else {
            return self.fail_plain(WizardError::NoPredictionData);
        };
        match self.api.get_feedback_summary(prediction_id).await {
            Ok(summary) => Ok(summary),
            Err(e) => self.fail_plain(e.into()),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
