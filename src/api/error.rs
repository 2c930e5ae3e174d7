//! Client-side error taxonomy for every backend call.
//!
//! `Display` of [`ApiError`] is the message shown to the user. Every failure
//! of an API call lands in exactly one variant: HTTP error responses go
//! through [`ApiError::from_response`], transport failures through
//! [`ApiError::from_transport`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of a structured 422 `detail` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub loc: Vec<LocSegment>,
    pub msg: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl FieldError {
    /// Dotted field path, e.g. `body.symptom_list.0`.
    pub fn path(&self) -> String {
        self.loc
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// A `loc` path element: object key or array index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocSegment {
    Key(String),
    Index(i64),
}

impl std::fmt::Display for LocSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Why no HTTP response was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkFailure {
    /// Connection refused, DNS failure, TLS or cross-origin rejection.
    Connection,
    /// The overall request timeout elapsed.
    Timeout,
    /// The request was sent but the exchange never completed.
    NoResponse,
}

/// Coarse category of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before any network call.
    LocalValidation,
    /// HTTP 422 with structured field errors.
    ServerValidation,
    /// Any other error status.
    Server,
    /// No response received.
    Network,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Validation Error: {}", join_field_errors(.0))]
    ServerValidation(Vec<FieldError>),

    #[error("Error {status}: {detail}")]
    Server { status: u16, detail: String },

    #[error("Error {status}: Server error occurred")]
    ServerUnspecified { status: u16 },

    #[error("{}", network_message(.base_url, .failure))]
    Network {
        base_url: String,
        failure: NetworkFailure,
    },

    #[error("Error: {0}")]
    Unknown(String),
}

/// Error body shape used by the backend for non-2xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
}

impl ApiError {
    /// Classify a non-2xx response from its status and raw body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail);

        match detail {
            Some(Value::Array(items)) if status == 422 => {
                match serde_json::from_value::<Vec<FieldError>>(Value::Array(items)) {
                    Ok(errors) => Self::ServerValidation(errors),
                    Err(_) => Self::ServerUnspecified { status },
                }
            }
            Some(Value::String(detail)) => Self::Server { status, detail },
            _ => Self::ServerUnspecified { status },
        }
    }

    /// Classify a transport-level failure where no usable response exists.
    pub fn from_transport(err: &reqwest::Error, base_url: &str) -> Self {
        let failure = if err.is_timeout() {
            NetworkFailure::Timeout
        } else if err.is_connect() {
            NetworkFailure::Connection
        } else if err.is_request() {
            NetworkFailure::NoResponse
        } else {
            return Self::Unknown(err.to_string());
        };

        Self::Network {
            base_url: base_url.to_string(),
            failure,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::LocalValidation,
            Self::ServerValidation(_) => ErrorKind::ServerValidation,
            Self::Server { .. } | Self::ServerUnspecified { .. } => ErrorKind::Server,
            Self::Network { .. } => ErrorKind::Network,
            Self::Unknown(_) => ErrorKind::Unknown,
        }
    }

    pub fn is_network(&self) -> bool {
        self.kind() == ErrorKind::Network
    }

    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ServerValidation(_) => Some(422),
            Self::Server { status, .. } | Self::ServerUnspecified { status } => Some(*status),
            _ => None,
        }
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.path(), e.msg))
        .collect::<Vec<_>>()
        .join(", ")
}

fn network_message(base_url: &str, failure: &NetworkFailure) -> String {
    match failure {
        NetworkFailure::Connection => format!(
            "Network Error: Unable to connect to backend server at {base_url}. \
             Please ensure the backend is running and CORS is properly configured."
        ),
        NetworkFailure::Timeout => format!(
            "Network Error: Request timed out. Please check if the backend is running on {base_url}"
        ),
        NetworkFailure::NoResponse => format!(
            "Network Error: Unable to connect to server. Please check if the backend is running on {base_url}"
        ),
    }
}
