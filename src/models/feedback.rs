use serde::{Deserialize, Serialize};

use super::enums::{PatientOutcome, Sex};

/// Doctor feedback on a prediction (`POST /api/v1/feedback/prediction-feedback`).
///
/// Also the item type of `GET /api/v1/feedback/prediction/{id}/feedback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalFeedbackRequest {
    pub prediction_id: i64,
    pub doctor_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital_unit: Option<String>,
    pub prediction_accurate: bool,
    pub confidence_in_feedback: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_disease_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_condition_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordered_tests: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prescribed_medications: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalFeedbackResponse {
    pub message: String,
    pub feedback_id: i64,
    pub training_data_added: bool,
    #[serde(default)]
    pub training_record_id: Option<i64>,
    pub total_feedback_for_prediction: u32,
    pub prediction_accuracy_rate: f64,
}

/// Recorded patient outcome (`POST /api/v1/feedback/clinical-outcome`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalOutcomeRequest {
    pub prediction_id: i64,
    pub patient_outcome: PatientOutcome,
    pub final_diagnosis_id: i64,
    pub final_condition_name: String,
    pub treatment_effective: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_effects: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis_confirmation_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment_duration_days: Option<u32>,
    pub readmission_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complications: Option<Vec<String>>,
    pub reported_by: String,
    /// UTC, whole seconds, e.g. `2026-10-17T09:30:00Z`.
    pub outcome_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalOutcomeResponse {
    pub message: String,
    pub outcome_id: i64,
}

/// Expert-labelled case (`POST /api/v1/feedback/add-training-data`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingDataRequest {
    pub age: u32,
    pub sex: Sex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vital_temperature_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vital_heart_rate: Option<f64>,
    pub symptom_list: Vec<String>,
    pub target_disease: i64,
    #[serde(default)]
    pub target_tests: Vec<i64>,
    #[serde(default)]
    pub target_medications: Vec<i64>,
    pub condition_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chief_complaint: Option<String>,
    /// 0.0 to 1.0
    pub quality_score: f64,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingDataResponse {
    pub message: String,
    pub training_id: i64,
}

/// Consensus across all doctor feedback for one prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackSummary {
    pub prediction_id: i64,
    pub total_feedback_count: u32,
    pub accuracy_rate: f64,
    pub consensus_reached: bool,
    pub average_confidence: f64,
    #[serde(default)]
    pub most_common_actual_diagnosis: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionAccuracy {
    pub condition: String,
    pub accuracy: f64,
}

/// System-wide feedback statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackStatistics {
    pub total_feedback_submissions: u32,
    pub overall_accuracy_rate: f64,
    pub high_confidence_feedback_count: u32,
    pub training_data_generated: u32,
    pub average_doctor_confidence: f64,
    #[serde(default)]
    pub most_accurate_predictions: Vec<ConditionAccuracy>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_request_omits_corrective_fields_when_absent() {
        let request = ClinicalFeedbackRequest {
            prediction_id: 4821,
            doctor_id: "DR001".into(),
            doctor_name: None,
            hospital_unit: None,
            prediction_accurate: true,
            confidence_in_feedback: 0.8,
            actual_disease_id: None,
            actual_condition_name: None,
            ordered_tests: None,
            prescribed_medications: None,
            clinical_notes: None,
            outcome_notes: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("actual_disease_id"));
        assert!(!object.contains_key("actual_condition_name"));
        assert_eq!(json["prediction_accurate"], true);
        assert_eq!(json["confidence_in_feedback"], 0.8);
    }

    #[test]
    fn feedback_response_without_training_record() {
        let response: ClinicalFeedbackResponse = serde_json::from_str(
            r#"{"message":"ok","feedback_id":7,"training_data_added":false,"total_feedback_for_prediction":3,"prediction_accuracy_rate":0.66}"#,
        )
        .unwrap();
        assert_eq!(response.feedback_id, 7);
        assert_eq!(response.training_record_id, None);
    }

    #[test]
    fn outcome_request_wire_shape() {
        let request = ClinicalOutcomeRequest {
            prediction_id: 12,
            patient_outcome: PatientOutcome::ExcellentRecovery,
            final_diagnosis_id: 1,
            final_condition_name: "Pneumonia".into(),
            treatment_effective: true,
            side_effects: None,
            diagnosis_confirmation_days: Some(1),
            treatment_duration_days: Some(7),
            readmission_required: false,
            complications: None,
            reported_by: "DR001".into(),
            outcome_date: "2026-10-17T09:30:00Z".into(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["patient_outcome"], "excellent_recovery");
        assert_eq!(json["treatment_duration_days"], 7);
        assert!(json.get("side_effects").is_none());
    }

    #[test]
    fn statistics_deserialize() {
        let stats: FeedbackStatistics = serde_json::from_str(
            r#"{
                "total_feedback_submissions": 120,
                "overall_accuracy_rate": 0.74,
                "high_confidence_feedback_count": 80,
                "training_data_generated": 31,
                "average_doctor_confidence": 0.81,
                "most_accurate_predictions": [{"condition": "Influenza", "accuracy": 0.93}]
            }"#,
        )
        .unwrap();
        assert_eq!(stats.most_accurate_predictions[0].condition, "Influenza");
    }

    #[test]
    fn summary_without_common_diagnosis() {
        let summary: FeedbackSummary = serde_json::from_str(
            r#"{"prediction_id":5,"total_feedback_count":0,"accuracy_rate":0.0,"consensus_reached":false,"average_confidence":0.0}"#,
        )
        .unwrap();
        assert!(!summary.consensus_reached);
        assert!(summary.most_common_actual_diagnosis.is_none());
    }
}
