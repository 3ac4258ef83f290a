//! API error types and response handling.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use petdoor_engine::{EngineError, OpenRejection};
use serde::{Deserialize, Serialize};

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// 409 Conflict - Operation not possible in the current door state.
    Conflict {
        /// Machine-readable error code.
        error_code: String,
        /// Human-readable error message.
        message: String,
        /// Lock state at the time of the request.
        lock_state: Option<String>,
    },

    /// 503 Service Unavailable - Door hardware did not respond.
    ServiceUnavailable {
        /// Machine-readable error code.
        error_code: String,
        /// Human-readable error message.
        message: String,
    },
}

/// Standard JSON error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "door_locked").
    pub error: String,

    /// Human-readable error message.
    pub message: String,

    /// Optional additional details.
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Build the 409 response for a rejected open.
    pub fn open_rejected(reason: OpenRejection, lock_state: impl ToString) -> Self {
        let message = match reason {
            OpenRejection::DoorLocked => "Door is locked",
            OpenRejection::AlreadyOpen => "Door is already open",
        };
        Self::Conflict {
            error_code: reason.to_string(),
            message: message.to_string(),
            lock_state: Some(lock_state.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            Self::Conflict {
                error_code,
                message,
                lock_state,
            } => (
                StatusCode::CONFLICT,
                ErrorResponse {
                    error: error_code,
                    message,
                    details: lock_state.map(|s| serde_json::json!({ "lock_state": s })),
                },
            ),

            Self::ServiceUnavailable {
                error_code,
                message,
            } => {
                tracing::error!(
                    error_code = %error_code,
                    message = %message,
                    "Door hardware unavailable"
                );

                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse {
                        error: error_code,
                        message,
                        details: None,
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conflict { message, .. } => write!(f, "Conflict: {message}"),
            Self::ServiceUnavailable { message, .. } => write!(f, "Service Unavailable: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        let error_code = match &err {
            EngineError::Actuator(_) => "actuator_failed",
            EngineError::Switch(_) => "switch_unreadable",
            EngineError::Scan(_) => "scan_failed",
        };
        Self::ServiceUnavailable {
            error_code: error_code.to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petdoor_hardware::HardwareError;

    #[test]
    fn test_open_rejected_codes() {
        let err = ApiError::open_rejected(OpenRejection::DoorLocked, "LockedBySwitch");
        match err {
            ApiError::Conflict {
                error_code,
                lock_state,
                ..
            } => {
                assert_eq!(error_code, "door_locked");
                assert_eq!(lock_state.as_deref(), Some("LockedBySwitch"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_actuator_failure_is_unavailable() {
        let err: ApiError = EngineError::Actuator(HardwareError::communication("relay")).into();
        assert!(err.to_string().starts_with("Service Unavailable"));
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_error_response_serialization() {
        let response = ErrorResponse {
            error: "already_open".to_string(),
            message: "Door is already open".to_string(),
            details: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"error\":\"already_open\""));
    }
}
