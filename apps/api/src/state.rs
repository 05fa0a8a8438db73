use std::sync::Arc;

use crate::recommend::Recommender;
use crate::survey_client::SurveyClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub survey: SurveyClient,
    /// Pluggable recommendation backend. Production wires OpenAiRecommender;
    /// tests substitute scripted implementations.
    pub recommender: Arc<dyn Recommender>,
}
