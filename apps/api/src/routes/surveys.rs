//! Survey processing endpoints.
//!
//! All four take the survey id as a path parameter and parse it as an
//! integer up front; a non-numeric id is a 400 before any upstream call.
//! The two streaming endpoints send identical `data: <json>\n\n` frames
//! and differ only in response headers.

use std::convert::Infallible;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use tokio_stream::{Stream, StreamExt};

use crate::analysis::{analyze_survey, SurveyAnalysis};
use crate::errors::AppError;
use crate::models::recommendation::SurveyResult;
use crate::pipeline::events::NullSink;
use crate::pipeline::{self, PipelineAbort};
use crate::state::AppState;

fn parse_survey_id(raw: &str) -> Result<u32, AppError> {
    raw.parse::<u32>().map_err(|_| AppError::InvalidSurveyId)
}

/// GET /process_survey/:survey_id
/// Blocking: runs the whole pipeline, then returns the aggregate result.
pub async fn process_survey_handler(
    State(state): State<AppState>,
    Path(survey_id): Path<String>,
) -> Result<Json<SurveyResult>, AppError> {
    let survey_id = parse_survey_id(&survey_id)?;

    let result = pipeline::process_survey(
        &state.survey,
        state.recommender.as_ref(),
        survey_id,
        &NullSink,
    )
    .await
    .map_err(|abort| match abort {
        PipelineAbort::Upstream(e) => AppError::SurveyUnreachable {
            survey_id,
            message: e.to_string(),
        },
        // NullSink never reports a lost client.
        PipelineAbort::Disconnected => {
            AppError::Internal(anyhow::anyhow!("event sink closed unexpectedly"))
        }
    })?;

    Ok(Json(result))
}

/// GET /process_survey_stream/:survey_id
/// Chunked plain-text stream of event frames.
pub async fn process_survey_stream_handler(
    State(state): State<AppState>,
    Path(survey_id): Path<String>,
) -> Result<Response, AppError> {
    let survey_id = parse_survey_id(&survey_id)?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from_stream(frame_stream(state, survey_id)))
        .map_err(|e| AppError::Internal(e.into()))
}

/// GET /process_survey_sse/:survey_id
/// Same frames as the chunked endpoint, wrapped in SSE headers.
pub async fn process_survey_sse_handler(
    State(state): State<AppState>,
    Path(survey_id): Path<String>,
) -> Result<Response, AppError> {
    let survey_id = parse_survey_id(&survey_id)?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .body(Body::from_stream(frame_stream(state, survey_id)))
        .map_err(|e| AppError::Internal(e.into()))
}

fn frame_stream(
    state: AppState,
    survey_id: u32,
) -> impl Stream<Item = Result<String, Infallible>> {
    pipeline::survey_event_stream(state, survey_id).map(|event| Ok(event.to_frame()))
}

/// GET /analyze_survey/:survey_id
/// Table-driven analysis of the survey; no model calls on this path.
pub async fn analyze_survey_handler(
    State(state): State<AppState>,
    Path(survey_id): Path<String>,
) -> Result<Json<SurveyAnalysis>, AppError> {
    let survey_id = parse_survey_id(&survey_id)?;

    let snapshot = state
        .survey
        .fetch(survey_id)
        .await
        .map_err(|e| AppError::SurveyUnreachable {
            survey_id,
            message: e.to_string(),
        })?;

    Ok(Json(analyze_survey(&snapshot)))
}
