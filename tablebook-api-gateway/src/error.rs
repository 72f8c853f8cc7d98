use axum::{extract::rejection::JsonRejection, http::StatusCode, response::Json};
use serde_json::json;
use tablebook_auth_service::AuthError;
use tablebook_reservation_service::{AdmissionError, TableError};
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication failed")]
    AuthenticationFailed,
    #[error("Invalid token")]
    InvalidToken,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match &self {
            ApiError::AuthenticationFailed => (
                StatusCode::UNAUTHORIZED,
                "Authentication failed".to_string(),
            ),
            ApiError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token".to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            ApiError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<AdmissionError> for ApiError {
    fn from(err: AdmissionError) -> Self {
        match err {
            AdmissionError::Validation(e) => ApiError::BadRequest(e.to_string()),
            AdmissionError::TableNotFound(number) => {
                ApiError::NotFound(format!("Table {number} not found"))
            }
            AdmissionError::OverlapConflict {
                table_number, date, ..
            } => ApiError::Conflict(format!(
                "Requested slot overlaps an existing reservation for table {table_number} on {date}"
            )),
            AdmissionError::StorageFailure(cause) => {
                error!(error = ?cause, "reservation storage failure");
                ApiError::ServiceUnavailable("Storage is unavailable".to_string())
            }
        }
    }
}

impl From<TableError> for ApiError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::InvalidField { .. } => ApiError::BadRequest(err.to_string()),
            TableError::Duplicate => ApiError::Conflict(err.to_string()),
            TableError::NotFound(id) => ApiError::NotFound(format!("Table {id} not found")),
            TableError::Storage(cause) => {
                error!(error = ?cause, "table storage failure");
                ApiError::ServiceUnavailable("Storage is unavailable".to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidField { .. } => ApiError::BadRequest(err.to_string()),
            AuthError::UserExists => ApiError::Conflict("User already exists".to_string()),
            AuthError::InvalidCredentials => ApiError::AuthenticationFailed,
            AuthError::InvalidToken => ApiError::InvalidToken,
            AuthError::Hash | AuthError::Token(_) => {
                error!(error = ?err, "cannot complete authentication");
                ApiError::InternalError("Cannot complete authentication".to_string())
            }
            AuthError::Store(cause) => {
                error!(error = ?cause, "user storage failure");
                ApiError::ServiceUnavailable("Storage is unavailable".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;
    use tablebook_reservation_service::{ValidationError, store::StoreError};

    use super::*;

    #[test]
    fn test_admission_errors_map_to_distinct_statuses() {
        let cases = [
            (
                AdmissionError::Validation(ValidationError::MissingFields(vec!["date"])),
                StatusCode::BAD_REQUEST,
            ),
            (AdmissionError::TableNotFound(5), StatusCode::NOT_FOUND),
            (
                AdmissionError::StorageFailure(StoreError::Unavailable("down".to_string())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_storage_failure_hides_cause() {
        let err = ApiError::from(AdmissionError::StorageFailure(StoreError::Unavailable(
            "connection refused to 10.0.0.7".to_string(),
        )));
        assert!(!err.to_string().contains("10.0.0.7"));
    }
}
