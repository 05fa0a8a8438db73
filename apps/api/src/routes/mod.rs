pub mod health;
pub mod surveys;

use axum::{routing::get, Router};

use crate::state::AppState;

/// GET /
async fn home_handler() -> &'static str {
    "NIST 2.0 Recommendation Engine API is running"
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/health", get(health::health_handler))
        .route("/process_survey/:survey_id", get(surveys::process_survey_handler))
        .route(
            "/process_survey_stream/:survey_id",
            get(surveys::process_survey_stream_handler),
        )
        .route(
            "/process_survey_sse/:survey_id",
            get(surveys::process_survey_sse_handler),
        )
        .route("/analyze_survey/:survey_id", get(surveys::analyze_survey_handler))
        .with_state(state)
}
