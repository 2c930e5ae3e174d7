use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const STATUS_HEALTHY: &str = "healthy";
pub const DATABASE_CONNECTED: &str = "connected";

/// Body returned by every health probe.
///
/// Only `status` is guaranteed. The backend has reported database
/// connectivity under both `database_status` and `database`; read it
/// through [`HealthResponse::database_state`] rather than either field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    database_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tables_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_query_time_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_query: Option<String>,
    /// Diagnostic fields this client does not know about, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HealthResponse {
    /// A bare response carrying only a status string.
    pub fn with_status(status: &str) -> Self {
        Self {
            status: status.to_string(),
            service: None,
            version: None,
            timestamp: None,
            ml_model: None,
            uptime_seconds: None,
            database_status: None,
            database: None,
            database_type: None,
            tables_count: None,
            last_query_time_ms: None,
            test_query: None,
            extra: Map::new(),
        }
    }

    /// Set the database state under the current field name.
    pub fn with_database_state(mut self, state: &str) -> Self {
        self.database_status = Some(state.to_string());
        self
    }

    /// Set the database state under the older `database` field name.
    pub fn with_legacy_database_state(mut self, state: &str) -> Self {
        self.database = Some(state.to_string());
        self
    }

    pub fn is_healthy(&self) -> bool {
        self.status == STATUS_HEALTHY
    }

    /// Database connectivity, whichever field name the backend used.
    ///
    /// When both fields are present and disagree, a `connected` value wins.
    pub fn database_state(&self) -> Option<&str> {
        let current = self.database_status.as_deref();
        let legacy = self.database.as_deref();
        match (current, legacy) {
            (Some(DATABASE_CONNECTED), _) | (_, Some(DATABASE_CONNECTED)) => {
                Some(DATABASE_CONNECTED)
            }
            (Some(state), _) | (None, Some(state)) => Some(state),
            (None, None) => None,
        }
    }

    pub fn is_database_connected(&self) -> bool {
        self.database_state() == Some(DATABASE_CONNECTED)
    }
}
