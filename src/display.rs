//! Presentation-neutral formatting shared by every front end.

use crate::models::Urgency;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.8 {
            Self::High
        } else if confidence >= 0.6 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// `0.853` → `"85.3%"`.
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}

/// `42.66` → `"42.7ms"`.
pub fn format_processing_time(ms: f64) -> String {
    format!("{ms:.1}ms")
}

/// Whole hours and minutes; `"Unknown"` when absent or zero.
pub fn format_uptime(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) if s > 0.0 => {
            let total = s as u64;
            format!("{}h {}m", total / 3600, (total % 3600) / 60)
        }
        _ => "Unknown".to_string(),
    }
}

/// Whether a recommended test should be flagged as time-critical.
pub fn is_time_critical(urgency: Urgency) -> bool {
    matches!(urgency, Urgency::Urgent | Urgency::Stat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_bands_at_thresholds() {
        assert_eq!(ConfidenceBand::from_confidence(0.8), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_confidence(0.79), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_confidence(0.6), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_confidence(0.59), ConfidenceBand::Low);
        assert_eq!(ConfidenceBand::High.label(), "High");
    }

    #[test]
    fn confidence_percentage_one_decimal() {
        assert_eq!(format_confidence(0.853), "85.3%");
        assert_eq!(format_confidence(1.0), "100.0%");
        assert_eq!(format_confidence(0.0), "0.0%");
    }

    #[test]
    fn processing_time_one_decimal() {
        assert_eq!(format_processing_time(42.66), "42.7ms");
    }

    #[test]
    fn uptime_hours_and_minutes() {
        assert_eq!(format_uptime(Some(3725.5)), "1h 2m");
        assert_eq!(format_uptime(Some(59.0)), "0h 0m");
        assert_eq!(format_uptime(Some(0.0)), "Unknown");
        assert_eq!(format_uptime(None), "Unknown");
    }

    #[test]
    fn urgent_and_stat_are_time_critical() {
        assert!(is_time_critical(Urgency::Stat));
        assert!(is_time_critical(Urgency::Urgent));
        assert!(!is_time_critical(Urgency::Routine));
    }
}
