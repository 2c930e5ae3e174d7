use serde::{Deserialize, Serialize};

use super::enums::{Sex, Urgency};

/// Body of `POST /api/v1/predict/`. Absent optional fields are not sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub age: u32,
    pub sex: Sex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vital_temperature_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vital_heart_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vital_blood_pressure_systolic: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vital_blood_pressure_diastolic: Option<f64>,
    pub symptom_list: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pmh_list: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_medications: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chief_complaint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_text_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedTest {
    pub test: String,
    pub confidence: f64,
    pub urgency: Urgency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedMedication {
    pub medication: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dose_suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub contraindication_check: bool,
}

/// One ranked diagnosis with its supporting recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseasePrediction {
    pub icd10_code: String,
    pub diagnosis: String,
    pub confidence: f64,
    #[serde(default)]
    pub recommended_tests: Vec<RecommendedTest>,
    #[serde(default)]
    pub recommended_medications: Vec<RecommendedMedication>,
    #[serde(default)]
    pub assessment_plan: String,
    #[serde(default)]
    pub rationale: Vec<String>,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    #[serde(default)]
    pub differential_diagnoses: Vec<String>,
}

/// Body returned by the prediction endpoint. Predictions keep server order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub predictions: Vec<DiseasePrediction>,
    pub model_version: String,
    pub processing_time_ms: f64,
    pub confidence_threshold: f64,
    pub generated_at: String,
    #[serde(default)]
    pub clinical_warnings: Vec<String>,
    #[serde(default)]
    pub disclaimer: String,
}

impl PredictionResponse {
    /// The first (highest-ranked) prediction, if any.
    pub fn top_prediction(&self) -> Option<&DiseasePrediction> {
        self.predictions.first()
    }

    pub fn has_warnings(&self) -> bool {
        !self.clinical_warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_request() -> PredictionRequest {
        PredictionRequest {
            age: 30,
            sex: Sex::Male,
            vital_temperature_c: None,
            vital_heart_rate: None,
            vital_blood_pressure_systolic: None,
            vital_blood_pressure_diastolic: None,
            symptom_list: vec!["headache".into()],
            pmh_list: None,
            current_medications: None,
            allergies: None,
            chief_complaint: None,
            free_text_notes: None,
        }
    }

    #[test]
    fn absent_optionals_not_serialized() {
        let json = serde_json::to_value(minimal_request()).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert_eq!(json["age"], 30);
        assert_eq!(json["sex"], "male");
        assert_eq!(json["symptom_list"][0], "headache");
        assert!(!object.contains_key("vital_heart_rate"));
        assert!(!object.contains_key("pmh_list"));
    }

    #[test]
    fn present_optionals_serialized() {
        let mut request = minimal_request();
        request.vital_temperature_c = Some(38.5);
        request.allergies = Some(vec!["penicillin".into()]);
        let json = serde_json::to_value(request).unwrap();
        assert_eq!(json["vital_temperature_c"], 38.5);
        assert_eq!(json["allergies"][0], "penicillin");
    }

    #[test]
    fn response_deserializes_with_nested_recommendations() {
        let body = r#"{
            "predictions": [{
                "icd10_code": "J18.9",
                "diagnosis": "Pneumonia, unspecified organism",
                "confidence": 0.82,
                "recommended_tests": [
                    {"test": "Chest X-ray", "confidence": 0.9, "urgency": "urgent", "rationale": "Confirm consolidation"}
                ],
                "recommended_medications": [
                    {"medication": "Amoxicillin", "confidence": 0.7, "dose_suggestion": "500mg TID", "contraindication_check": false}
                ],
                "assessment_plan": "Treat as community-acquired pneumonia",
                "rationale": ["fever", "productive cough"],
                "risk_factors": ["diabetes"],
                "differential_diagnoses": ["Acute bronchitis"]
            }],
            "model_version": "1.4.0",
            "processing_time_ms": 42.7,
            "confidence_threshold": 0.3,
            "generated_at": "2026-10-17T09:00:00Z",
            "clinical_warnings": ["Penicillin allergy reported"],
            "disclaimer": "Decision support only."
        }"#;
        let response: PredictionResponse = serde_json::from_str(body).unwrap();
        let top = response.top_prediction().unwrap();
        assert_eq!(top.icd10_code, "J18.9");
        assert_eq!(top.recommended_tests[0].urgency, Urgency::Urgent);
        assert!(!top.recommended_medications[0].contraindication_check);
        assert_eq!(top.recommended_medications[0].duration, None);
        assert!(response.has_warnings());
    }

    #[test]
    fn empty_prediction_list_has_no_top() {
        let response: PredictionResponse = serde_json::from_str(
            r#"{"predictions":[],"model_version":"1","processing_time_ms":1.0,"confidence_threshold":0.5,"generated_at":"now"}"#,
        )
        .unwrap();
        assert!(response.top_prediction().is_none());
        assert!(!response.has_warnings());
        assert!(response.disclaimer.is_empty());
    }
}
