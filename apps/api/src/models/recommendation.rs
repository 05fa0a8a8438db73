//! Recommendation payloads: the JSON shape the model is asked to produce,
//! plus the enriched variants the API emits after attaching survey metadata.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::survey::CategoryScores;
use crate::scoring;

/// The structured body a recommendation generation must yield. Every field
/// is defaulted so a model response missing optional keys still parses;
/// unknown extra keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationPayload {
    pub subcategory: String,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub recommendation: String,
    pub rationale: String,
    pub supporting_resources: Vec<String>,
    pub remediation_steps: Vec<String>,
    pub tools: Vec<String>,
    pub references: Vec<String>,
    pub effort_level: String,
    pub impact_score: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_note: Option<String>,
}

/// A generated payload enriched with the control it remediates.
#[derive(Debug, Clone, Serialize)]
pub struct ControlRecommendation {
    #[serde(flatten)]
    pub payload: RecommendationPayload,
    pub nist_subcategory: Value,
    pub subcategory_title: String,
    pub category: String,
    pub current_score: i64,
    pub score_response: String,
    pub recommendation_id: Uuid,
    pub timestamp: String,
}

/// The whole-survey positive assessment emitted when nothing needs
/// remediation.
#[derive(Debug, Clone, Serialize)]
pub struct PositiveRecommendation {
    #[serde(flatten)]
    pub payload: RecommendationPayload,
    pub assessment_type: String,
    pub recommendation_id: Uuid,
    pub timestamp: String,
}

/// Either kind of recommendation, serialized by shape.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Recommendation {
    Control(ControlRecommendation),
    Positive(PositiveRecommendation),
}

/// Survey-level context emitted ahead of any recommendations.
#[derive(Debug, Clone, Serialize)]
pub struct UserContext {
    pub survey_id: u32,
    pub assessment_date: String,
    pub current_maturity_scores: CategoryScores,
    pub overall_maturity_level: String,
}

impl UserContext {
    pub fn new(survey_id: u32, scores: &CategoryScores) -> Self {
        Self {
            survey_id,
            assessment_date: Utc::now().format("%Y-%m-%d").to_string(),
            current_maturity_scores: scores.clone(),
            overall_maturity_level: scoring::overall_maturity(scores).to_string(),
        }
    }
}

/// Response body of the blocking processing endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SurveyResult {
    pub user_context: UserContext,
    pub recommendations: Vec<Recommendation>,
}
