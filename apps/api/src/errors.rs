use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid survey ID. Must be a number.")]
    InvalidSurveyId,

    #[error("Request failed for survey {survey_id}: {message}")]
    SurveyUnreachable { survey_id: u32, message: String },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::InvalidSurveyId => (
                StatusCode::BAD_REQUEST,
                json!({"error": "Invalid survey ID. Must be a number."}),
            ),
            AppError::SurveyUnreachable { survey_id, message } => {
                tracing::error!("Survey API unreachable for survey {survey_id}: {message}");
                (
                    StatusCode::BAD_GATEWAY,
                    json!({
                        "error": format!("Request failed for survey {survey_id}: {message}"),
                        "survey_id": survey_id,
                    }),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "An internal server error occurred"}),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
