//! Doctor feedback and outcome recording for one prediction.
//!
//! The two forms are independent; both are keyed by the same prediction id,
//! which the caller supplies when building the request.

use chrono::{DateTime, Utc};

use crate::api::ApiError;
use crate::models::{ClinicalFeedbackRequest, ClinicalOutcomeRequest, PatientOutcome};
use crate::prediction_form::{non_blank, non_empty_list, push_unique};

pub const DOCTOR_ID_REQUIRED_MESSAGE: &str = "Doctor ID is required";
pub const CONFIDENCE_RANGE_MESSAGE: &str = "Confidence in feedback must be between 0 and 1";
pub const OUTCOME_REQUIRED_MESSAGE: &str =
    "Final diagnosis ID, condition name, and reporter ID are required";

/// Format used for `outcome_date`: UTC, whole seconds.
const OUTCOME_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackForm {
    pub doctor_id: String,
    pub doctor_name: String,
    pub hospital_unit: String,
    pub prediction_accurate: bool,
    pub confidence_in_feedback: f64,
    /// Only sent when the prediction is marked inaccurate.
    pub actual_disease_id: Option<i64>,
    /// Only sent when the prediction is marked inaccurate.
    pub actual_condition_name: String,
    pub clinical_notes: String,
    pub outcome_notes: String,
    ordered_tests: Vec<String>,
    prescribed_medications: Vec<String>,
}

impl Default for FeedbackForm {
    fn default() -> Self {
        Self {
            doctor_id: String::new(),
            doctor_name: String::new(),
            hospital_unit: String::new(),
            prediction_accurate: true,
            confidence_in_feedback: 0.8,
            actual_disease_id: None,
            actual_condition_name: String::new(),
            clinical_notes: String::new(),
            outcome_notes: String::new(),
            ordered_tests: Vec::new(),
            prescribed_medications: Vec::new(),
        }
    }
}

impl FeedbackForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ordered_tests(&self) -> &[String] {
        &self.ordered_tests
    }

    pub fn prescribed_medications(&self) -> &[String] {
        &self.prescribed_medications
    }

    pub fn add_test(&mut self, test: &str) -> bool {
        push_unique(&mut self.ordered_tests, test)
    }

    pub fn remove_test(&mut self, test: &str) {
        self.ordered_tests.retain(|t| t != test);
    }

    pub fn add_medication(&mut self, medication: &str) -> bool {
        push_unique(&mut self.prescribed_medications, medication)
    }

    pub fn remove_medication(&mut self, medication: &str) {
        self.prescribed_medications.retain(|m| m != medication);
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.doctor_id.trim().is_empty() {
            return Err(ApiError::Validation(DOCTOR_ID_REQUIRED_MESSAGE.into()));
        }
        if !(0.0..=1.0).contains(&self.confidence_in_feedback) {
            return Err(ApiError::Validation(CONFIDENCE_RANGE_MESSAGE.into()));
        }
        Ok(())
    }

    pub fn to_request(&self, prediction_id: i64) -> Result<ClinicalFeedbackRequest, ApiError> {
        self.validate()?;

        let (actual_disease_id, actual_condition_name) = if self.prediction_accurate {
            (None, None)
        } else {
            (self.actual_disease_id, non_blank(&self.actual_condition_name))
        };

        Ok(ClinicalFeedbackRequest {
            prediction_id,
            doctor_id: self.doctor_id.trim().to_string(),
            doctor_name: non_blank(&self.doctor_name),
            hospital_unit: non_blank(&self.hospital_unit),
            prediction_accurate: self.prediction_accurate,
            confidence_in_feedback: self.confidence_in_feedback,
            actual_disease_id,
            actual_condition_name,
            ordered_tests: non_empty_list(&self.ordered_tests),
            prescribed_medications: non_empty_list(&self.prescribed_medications),
            clinical_notes: non_blank(&self.clinical_notes),
            outcome_notes: non_blank(&self.outcome_notes),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeForm {
    pub patient_outcome: PatientOutcome,
    pub final_diagnosis_id: Option<i64>,
    pub final_condition_name: String,
    pub reported_by: String,
    pub treatment_effective: bool,
    pub diagnosis_confirmation_days: Option<u32>,
    pub treatment_duration_days: Option<u32>,
    pub readmission_required: bool,
    side_effects: Vec<String>,
    complications: Vec<String>,
}

impl Default for OutcomeForm {
    fn default() -> Self {
        Self {
            patient_outcome: PatientOutcome::Improved,
            final_diagnosis_id: None,
            final_condition_name: String::new(),
            reported_by: String::new(),
            treatment_effective: true,
            diagnosis_confirmation_days: Some(1),
            treatment_duration_days: Some(7),
            readmission_required: false,
            side_effects: Vec::new(),
            complications: Vec::new(),
        }
    }
}

impl OutcomeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn side_effects(&self) -> &[String] {
        &self.side_effects
    }

    pub fn complications(&self) -> &[String] {
        &self.complications
    }

    pub fn add_side_effect(&mut self, effect: &str) -> bool {
        push_unique(&mut self.side_effects, effect)
    }

    pub fn add_complication(&mut self, complication: &str) -> bool {
        push_unique(&mut self.complications, complication)
    }

    /// All three identifying fields must be present; one combined message otherwise.
    pub fn validate(&self) -> Result<(), ApiError> {
        let has_diagnosis = self.final_diagnosis_id.is_some_and(|id| id > 0);
        if !has_diagnosis
            || self.final_condition_name.trim().is_empty()
            || self.reported_by.trim().is_empty()
        {
            return Err(ApiError::Validation(OUTCOME_REQUIRED_MESSAGE.into()));
        }
        Ok(())
    }

    /// Build the request, stamping `outcome_date` from `now`.
    pub fn to_request(
        &self,
        prediction_id: i64,
        now: DateTime<Utc>,
    ) -> Result<ClinicalOutcomeRequest, ApiError> {
        self.validate()?;
        let final_diagnosis_id = self
            .final_diagnosis_id
            .ok_or_else(|| ApiError::Validation(OUTCOME_REQUIRED_MESSAGE.into()))?;

        Ok(ClinicalOutcomeRequest {
            prediction_id,
            patient_outcome: self.patient_outcome,
            final_diagnosis_id,
            final_condition_name: self.final_condition_name.trim().to_string(),
            treatment_effective: self.treatment_effective,
            side_effects: non_empty_list(&self.side_effects),
            diagnosis_confirmation_days: self.diagnosis_confirmation_days,
            treatment_duration_days: self.treatment_duration_days,
            readmission_required: self.readmission_required,
            complications: non_empty_list(&self.complications),
            reported_by: self.reported_by.trim().to_string(),
            outcome_date: outcome_timestamp(now),
        })
    }
}

/// `2026-10-17T09:30:05Z`, sub-second precision dropped.
pub fn outcome_timestamp(now: DateTime<Utc>) -> String {
    now.format(OUTCOME_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 5).unwrap()
            + chrono::Duration::milliseconds(874)
    }

    fn complete_outcome() -> OutcomeForm {
        OutcomeForm {
            final_diagnosis_id: Some(1),
            final_condition_name: "X".into(),
            reported_by: "DR001".into(),
            ..OutcomeForm::default()
        }
    }

    #[test]
    fn doctor_id_required() {
        let mut form = FeedbackForm::new();
        form.doctor_id = "   ".into();
        let err = form.to_request(12).unwrap_err();
        assert_eq!(err.to_string(), DOCTOR_ID_REQUIRED_MESSAGE);
    }

    #[test]
    fn confidence_outside_unit_interval_rejected() {
        let mut form = FeedbackForm::new();
        form.doctor_id = "DR001".into();
        form.confidence_in_feedback = 1.2;
        assert_eq!(form.validate().unwrap_err().to_string(), CONFIDENCE_RANGE_MESSAGE);
    }

    #[test]
    fn accurate_feedback_drops_corrective_fields() {
        let mut form = FeedbackForm::new();
        form.doctor_id = "DR001".into();
        form.actual_disease_id = Some(9);
        form.actual_condition_name = "Bronchitis".into();

        let request = form.to_request(12).unwrap();
        assert!(request.prediction_accurate);
        assert_eq!(request.actual_disease_id, None);
        assert_eq!(request.actual_condition_name, None);
    }

    #[test]
    fn inaccurate_feedback_keeps_corrective_fields() {
        let mut form = FeedbackForm::new();
        form.doctor_id = "DR001".into();
        form.prediction_accurate = false;
        form.actual_disease_id = Some(9);
        form.actual_condition_name = "Bronchitis".into();
        form.add_test("CBC");
        form.add_medication("Salbutamol");

        let request = form.to_request(12).unwrap();
        assert_eq!(request.prediction_id, 12);
        assert_eq!(request.actual_disease_id, Some(9));
        assert_eq!(request.actual_condition_name.as_deref(), Some("Bronchitis"));
        assert_eq!(request.ordered_tests, Some(vec!["CBC".to_string()]));
        assert_eq!(request.prescribed_medications, Some(vec!["Salbutamol".to_string()]));
    }

    #[test]
    fn test_and_medication_lists_deduplicate() {
        let mut form = FeedbackForm::new();
        assert!(form.add_test("CBC"));
        assert!(!form.add_test("CBC"));
        assert!(!form.add_test(""));
        form.remove_test("CBC");
        assert!(form.ordered_tests().is_empty());

        assert!(form.add_medication("Paracetamol"));
        form.remove_medication("Paracetamol");
        assert!(form.prescribed_medications().is_empty());
    }

    #[test]
    fn outcome_missing_fields_share_one_message() {
        let variants = [
            OutcomeForm { final_diagnosis_id: None, ..complete_outcome() },
            OutcomeForm { final_diagnosis_id: Some(0), ..complete_outcome() },
            OutcomeForm { final_condition_name: " ".into(), ..complete_outcome() },
            OutcomeForm { reported_by: String::new(), ..complete_outcome() },
        ];
        for form in variants {
            let err = form.to_request(12, fixed_now()).unwrap_err();
            assert_eq!(err.to_string(), OUTCOME_REQUIRED_MESSAGE);
        }
    }

    #[test]
    fn outcome_date_truncated_to_seconds() {
        let request = complete_outcome().to_request(12, fixed_now()).unwrap();
        assert_eq!(request.outcome_date, "2026-10-17T09:30:05Z");
    }

    #[test]
    fn outcome_defaults_carried_into_request() {
        let request = complete_outcome().to_request(12, fixed_now()).unwrap();
        assert_eq!(request.patient_outcome, PatientOutcome::Improved);
        assert!(request.treatment_effective);
        assert!(!request.readmission_required);
        assert_eq!(request.diagnosis_confirmation_days, Some(1));
        assert_eq!(request.treatment_duration_days, Some(7));
        assert_eq!(request.side_effects, None);
    }

    #[test]
    fn outcome_lists_included_when_filled() {
        let mut form = complete_outcome();
        form.add_side_effect("nausea");
        form.add_complication("pleural effusion");
        assert_eq!(form.side_effects(), ["nausea"]);
        let request = form.to_request(12, fixed_now()).unwrap();
        assert_eq!(request.side_effects, Some(vec!["nausea".to_string()]));
        assert_eq!(request.complications, Some(vec!["pleural effusion".to_string()]));
    }
}
