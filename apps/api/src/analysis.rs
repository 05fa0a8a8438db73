//! Deterministic whole-survey analysis built entirely from the static
//! guidance tables. No model calls happen on this path, so it stays fast
//! and free, and it works even when the LLM is down.

use serde::Serialize;

use crate::catalog;
use crate::models::survey::{CategoryScores, SurveySnapshot};
use crate::scoring::{self, Priority};

/// Table-driven guidance for one CSF category. `current_score` repeats the
/// raw percentage; `current_percentage` is the display form.
#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub priority: Priority,
    pub current_score: i64,
    pub current_percentage: String,
    pub recommendation: String,
    pub rationale: String,
    pub supporting_resources: Vec<String>,
}

/// Guidance for one low-scoring control.
#[derive(Debug, Clone, Serialize)]
pub struct ControlAssessment {
    pub control_id: String,
    pub priority: Priority,
    pub current_score: i64,
    pub recommendation: String,
    pub rationale: String,
    pub supporting_resources: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SurveyAnalysis {
    pub summary_insight: String,
    pub category_summaries: Vec<CategorySummary>,
    pub individual_controls: Vec<ControlAssessment>,
    pub next_steps: Vec<String>,
}

pub fn analyze_survey(snapshot: &SurveySnapshot) -> SurveyAnalysis {
    let category_summaries = snapshot
        .scores
        .iter()
        .map(|(category, &percentage)| CategorySummary {
            category: category.clone(),
            priority: Priority::from_percentage(percentage),
            current_score: percentage,
            current_percentage: format!("{percentage}%"),
            recommendation: catalog::category_recommendation(category, percentage),
            rationale: catalog::category_rationale(category, percentage),
            supporting_resources: catalog::category_resources(category),
        })
        .collect();

    let individual_controls = snapshot
        .tasks
        .iter()
        .filter_map(|task| {
            let control_id = catalog::extract_control_id(&task.name)?;
            // Unscored controls are treated as score 0 on this path.
            let score = task.score.unwrap_or(0);
            if score > scoring::REMEDIATION_SCORE_CEILING {
                return None;
            }
            let guidance = catalog::control_guidance(control_id);
            Some(ControlAssessment {
                control_id: control_id.to_string(),
                priority: Priority::from_score(score),
                current_score: score,
                recommendation: guidance.recommendation,
                rationale: guidance.rationale,
                supporting_resources: guidance.resources,
            })
        })
        .collect();

    SurveyAnalysis {
        summary_insight: scoring::summary_insight(&snapshot.scores).to_string(),
        category_summaries,
        individual_controls,
        next_steps: next_steps(&snapshot.scores),
    }
}

/// Improvement steps for the weakest categories, worst first. Categories in
/// the top maturity band contribute nothing.
fn next_steps(scores: &CategoryScores) -> Vec<String> {
    let mut ranked: Vec<(&String, &i64)> = scores.iter().collect();
    ranked.sort_by_key(|(_, &percentage)| percentage);

    ranked
        .into_iter()
        .filter_map(|(category, &percentage)| {
            match Priority::from_percentage(percentage).bucket() {
                0 => Some(format!("Implement basic {category} measures and controls")),
                1 => Some(format!("Develop formal {category} processes and documentation")),
                2 => Some(format!("Enhance existing {category} practices")),
                _ => None,
            }
        })
        .collect()
}
