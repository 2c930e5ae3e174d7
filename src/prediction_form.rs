//! Prediction request assembly and pre-flight validation.
//!
//! The form holds raw user input. [`PredictionForm::to_request`] is the only
//! way to obtain a [`PredictionRequest`], so an invalid age or an empty
//! symptom list can never reach the network.

use crate::api::ApiError;
use crate::models::{PredictionRequest, Sex};

pub const MIN_AGE: i64 = 1;
pub const MAX_AGE: i64 = 120;

pub const INVALID_AGE_MESSAGE: &str = "Please enter a valid age (1-120)";
pub const NO_SYMPTOM_MESSAGE: &str = "Please enter at least one symptom";

/// The list-valued inputs of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListField {
    Symptoms,
    PastMedicalHistory,
    CurrentMedications,
    Allergies,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionForm {
    /// `None` when the field is empty or not a whole number.
    pub age: Option<i64>,
    pub sex: Sex,
    pub temperature_c: Option<f64>,
    pub heart_rate: Option<f64>,
    pub systolic_bp: Option<f64>,
    pub diastolic_bp: Option<f64>,
    pub chief_complaint: String,
    pub notes: String,
    symptoms: Vec<String>,
    past_medical_history: Vec<String>,
    current_medications: Vec<String>,
    allergies: Vec<String>,
}

impl Default for PredictionForm {
    fn default() -> Self {
        Self {
            age: None,
            sex: Sex::Male,
            temperature_c: None,
            heart_rate: None,
            systolic_bp: None,
            diastolic_bp: None,
            chief_complaint: String::new(),
            notes: String::new(),
            symptoms: Vec::new(),
            past_medical_history: Vec::new(),
            current_medications: Vec::new(),
            allergies: Vec::new(),
        }
    }
}

impl PredictionForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filled-in sample case for demonstrations.
    pub fn example() -> Self {
        let mut form = Self {
            age: Some(45),
            sex: Sex::Female,
            temperature_c: Some(38.5),
            heart_rate: Some(95.0),
            systolic_bp: Some(140.0),
            diastolic_bp: Some(90.0),
            chief_complaint: "Cough and fever for 4 days".into(),
            notes: "Patient reports productive cough with yellow sputum, worsening over past 4 days. No recent travel.".into(),
            ..Self::default()
        };
        for symptom in ["fever", "cough", "shortness of breath", "fatigue"] {
            form.add(ListField::Symptoms, symptom);
        }
        for condition in ["hypertension", "diabetes type 2"] {
            form.add(ListField::PastMedicalHistory, condition);
        }
        for medication in ["lisinopril", "metformin"] {
            form.add(ListField::CurrentMedications, medication);
        }
        form.add(ListField::Allergies, "penicillin");
        form
    }

    /// Reset every field to its empty value.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Set the age from text input. Anything but a whole number clears it.
    pub fn set_age_input(&mut self, input: &str) {
        self.age = input.trim().parse::<i64>().ok();
    }

    pub fn items(&self, field: ListField) -> &[String] {
        match field {
            ListField::Symptoms => &self.symptoms,
            ListField::PastMedicalHistory => &self.past_medical_history,
            ListField::CurrentMedications => &self.current_medications,
            ListField::Allergies => &self.allergies,
        }
    }

    fn items_mut(&mut self, field: ListField) -> &mut Vec<String> {
        match field {
            ListField::Symptoms => &mut self.symptoms,
            ListField::PastMedicalHistory => &mut self.past_medical_history,
            ListField::CurrentMedications => &mut self.current_medications,
            ListField::Allergies => &mut self.allergies,
        }
    }

    /// Append a trimmed entry. Blank entries and duplicates are ignored.
    pub fn add(&mut self, field: ListField, value: &str) -> bool {
        push_unique(self.items_mut(field), value)
    }

    pub fn remove(&mut self, field: ListField, value: &str) -> bool {
        let items = self.items_mut(field);
        let before = items.len();
        items.retain(|item| item != value.trim());
        items.len() != before
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        match self.age {
            Some(age) if (MIN_AGE..=MAX_AGE).contains(&age) => {}
            _ => return Err(ApiError::Validation(INVALID_AGE_MESSAGE.into())),
        }
        if self.symptoms.is_empty() {
            return Err(ApiError::Validation(NO_SYMPTOM_MESSAGE.into()));
        }
        Ok(())
    }

    /// Validate and build the request body. Empty optional inputs are omitted.
    pub fn to_request(&self) -> Result<PredictionRequest, ApiError> {
        self.validate()?;
        let age = self
            .age
            .and_then(|a| u32::try_from(a).ok())
            .ok_or_else(|| ApiError::Validation(INVALID_AGE_MESSAGE.into()))?;

        Ok(PredictionRequest {
            age,
            sex: self.sex,
            vital_temperature_c: finite(self.temperature_c),
            vital_heart_rate: finite(self.heart_rate),
            vital_blood_pressure_systolic: finite(self.systolic_bp),
            vital_blood_pressure_diastolic: finite(self.diastolic_bp),
            symptom_list: self.symptoms.clone(),
            pmh_list: non_empty_list(&self.past_medical_history),
            current_medications: non_empty_list(&self.current_medications),
            allergies: non_empty_list(&self.allergies),
            chief_complaint: non_blank(&self.chief_complaint),
            free_text_notes: non_blank(&self.notes),
        })
    }
}

/// Trimmed push that skips blanks and exact duplicates. Shared with the feedback form.
pub(crate) fn push_unique(items: &mut Vec<String>, value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() || items.iter().any(|item| item == value) {
        return false;
    }
    items.push(value.to_string());
    true
}

/// NaN and infinities would serialize as `null`; treat them as not entered.
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

pub(crate) fn non_empty_list(items: &[String]) -> Option<Vec<String>> {
    (!items.is_empty()).then(|| items.to_vec())
}

pub(crate) fn non_blank(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
