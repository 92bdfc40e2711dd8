use application::ApplicationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code,
                message: message.into(),
            },
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        use application::ApplicationError as AppErr;
        use domain::{DomainError, RepositoryError};

        match error {
            AppErr::Domain(DomainError::InvalidInput { field, reason }) => ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_INPUT",
                format!("{field}: {reason}"),
            ),
            AppErr::Domain(DomainError::ParticipantExists) => ApiError::new(
                StatusCode::CONFLICT,
                "PARTICIPANT_EXISTS",
                "participant already exists",
            ),
            AppErr::Domain(DomainError::ParticipantNotFound) => ApiError::new(
                StatusCode::NOT_FOUND,
                "PARTICIPANT_NOT_FOUND",
                "participant not found",
            ),
            AppErr::Repository(repo_err) => match repo_err {
                RepositoryError::Conflict => ApiError::new(
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    "resource already exists",
                ),
                RepositoryError::NotFound => ApiError::new(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    "requested resource not found",
                ),
                RepositoryError::Storage { message } => {
                    // 存储细节只进日志，不回给调用方
                    tracing::error!(error = %message, "store operation failed");
                    ApiError::new(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "STORE_ERROR",
                        "internal storage error",
                    )
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
