//! Survey processing pipeline.
//!
//! Flow:
//! 1. Fetch the task list and survey meta from the survey API
//! 2. Classify each control's score; keep those at or under the ceiling
//! 3. Generate one remediation recommendation per qualifying control
//! 4. If nothing qualified, synthesize a single positive assessment
//!
//! Every milestone goes through an [`EventSink`], so the blocking endpoint
//! (which discards events) and the streaming endpoints (which forward them)
//! share this one code path.

use chrono::{SecondsFormat, Utc};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::recommendation::{
    ControlRecommendation, PositiveRecommendation, Recommendation, RecommendationPayload,
    SurveyResult, UserContext,
};
use crate::models::survey::{CategoryScores, SurveySnapshot, SurveyTask};
use crate::recommend::{prompts, Recommender};
use crate::scoring::{self, Priority};
use crate::state::AppState;
use crate::survey_client::SurveyClient;

use self::events::{ChannelSink, ClientGone, EventSink, StreamEvent, EVENT_CHANNEL_CAPACITY};

pub mod events;

/// Upper bound on controls processed in one request. Each control costs a
/// model call, so this caps worst-case latency for pathological surveys.
pub const MAX_CONTROLS_PER_REQUEST: usize = 100;

/// Why a pipeline run stopped early.
#[derive(Debug)]
pub enum PipelineAbort {
    /// The survey API was unreachable at the transport level.
    Upstream(reqwest::Error),
    /// The streaming client went away; no point generating further.
    Disconnected,
}

impl From<ClientGone> for PipelineAbort {
    fn from(_: ClientGone) -> Self {
        PipelineAbort::Disconnected
    }
}

impl From<reqwest::Error> for PipelineAbort {
    fn from(e: reqwest::Error) -> Self {
        PipelineAbort::Upstream(e)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pipeline
// ─────────────────────────────────────────────────────────────────────────────

/// Runs the full pipeline for one survey: fetch, then process.
pub async fn process_survey<S: EventSink>(
    survey: &SurveyClient,
    recommender: &dyn Recommender,
    survey_id: u32,
    sink: &S,
) -> Result<SurveyResult, PipelineAbort> {
    sink.emit(StreamEvent::status_with_id(
        "Starting survey processing...",
        survey_id,
    ))
    .await?;
    sink.emit(StreamEvent::status("Fetching survey data...")).await?;

    let snapshot = survey.fetch(survey_id).await?;
    process_snapshot(&snapshot, recommender, sink).await
}

/// Processes an already-fetched snapshot. Event order: warnings, api
/// status, user context, processing count, then progress/recommendation
/// pairs per qualifying control, then the completion status.
pub async fn process_snapshot<S: EventSink>(
    snapshot: &SurveySnapshot,
    recommender: &dyn Recommender,
    sink: &S,
) -> Result<SurveyResult, PipelineAbort> {
    for warning in &snapshot.warnings {
        sink.emit(StreamEvent::warning(warning.clone())).await?;
    }
    sink.emit(StreamEvent::status(format!(
        "API Status - Task: {}, Meta: {}",
        snapshot.task_status, snapshot.meta_status
    )))
    .await?;

    let user_context = UserContext::new(snapshot.survey_id, &snapshot.scores);
    sink.emit(StreamEvent::UserContext {
        data: user_context.clone(),
    })
    .await?;

    // Tasks without a score are skipped outright, not treated as zero.
    let mut qualifying: Vec<(&SurveyTask, i64)> = snapshot
        .tasks
        .iter()
        .filter_map(|task| {
            let score = task.score?;
            (score <= scoring::REMEDIATION_SCORE_CEILING).then_some((task, score))
        })
        .collect();

    if qualifying.len() > MAX_CONTROLS_PER_REQUEST {
        warn!(
            "Survey {} has {} qualifying controls, capping at {}",
            snapshot.survey_id,
            qualifying.len(),
            MAX_CONTROLS_PER_REQUEST
        );
        qualifying.truncate(MAX_CONTROLS_PER_REQUEST);
    }

    let total = qualifying.len();
    sink.emit(StreamEvent::status(format!("Processing {total} tasks...")))
        .await?;

    let mut recommendations: Vec<Recommendation> = Vec::new();
    let mut failed = 0usize;

    for (index, (task, score)) in qualifying.into_iter().enumerate() {
        let current = index + 1;
        sink.emit(StreamEvent::Progress {
            current,
            total,
            percentage: round_percentage(current, total),
        })
        .await?;

        match build_control_recommendation(task, score, &snapshot.scores, recommender).await {
            Some(rec) => {
                let rec = Recommendation::Control(rec);
                sink.emit(StreamEvent::Recommendation { data: rec.clone() }).await?;
                recommendations.push(rec);
            }
            None => failed += 1,
        }

        sink.pace().await;
    }

    if failed > 0 {
        warn!(
            "Survey {}: {failed} of {total} controls produced no recommendation",
            snapshot.survey_id
        );
    }

    sink.emit(StreamEvent::status("Processing complete!")).await?;

    if recommendations.is_empty() {
        sink.emit(StreamEvent::status(
            "Generating positive assessment via LLM...",
        ))
        .await?;
        let positive =
            build_positive_recommendation(&snapshot.scores, snapshot.survey_id, recommender).await;
        let rec = Recommendation::Positive(positive);
        sink.emit(StreamEvent::Recommendation { data: rec.clone() }).await?;
        recommendations.push(rec);
    }

    info!(
        "Survey {} processed: {} recommendation(s)",
        snapshot.survey_id,
        recommendations.len()
    );

    Ok(SurveyResult {
        user_context,
        recommendations,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Recommendation assembly
// ─────────────────────────────────────────────────────────────────────────────

async fn build_control_recommendation(
    task: &SurveyTask,
    score: i64,
    scores: &CategoryScores,
    recommender: &dyn Recommender,
) -> Option<ControlRecommendation> {
    let category = task
        .kind
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string();
    let score_description = scoring::score_description(score);
    let prompt = prompts::build_control_prompt(task, score, &category, score_description, scores);

    let mut payload = match recommender.generate(&prompt).await {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Recommendation generation failed for task {}: {e}", task.id);
            return None;
        }
    };

    // The classifier's tier wins over whatever the model chose.
    payload.priority = Priority::from_score(score).to_string();

    Some(ControlRecommendation {
        payload,
        nist_subcategory: task.id.clone(),
        subcategory_title: task.name.clone(),
        category,
        current_score: score,
        score_response: score_description.to_string(),
        recommendation_id: Uuid::new_v4(),
        timestamp: now_iso(),
    })
}

/// Positive assessments must always exist when nothing qualified, so a
/// failed model call falls back to a canned payload.
async fn build_positive_recommendation(
    scores: &CategoryScores,
    survey_id: u32,
    recommender: &dyn Recommender,
) -> PositiveRecommendation {
    let prompt = prompts::build_positive_prompt(scores, survey_id);
    let payload = match recommender.generate(&prompt).await {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Positive assessment generation failed for survey {survey_id}, using canned payload: {e}");
            canned_positive_payload()
        }
    };

    PositiveRecommendation {
        payload,
        assessment_type: "positive_evaluation".to_string(),
        recommendation_id: Uuid::new_v4(),
        timestamp: now_iso(),
    }
}

fn canned_positive_payload() -> RecommendationPayload {
    RecommendationPayload {
        subcategory: "OVERALL-ASSESSMENT".to_string(),
        title: "Cybersecurity Excellence Achieved".to_string(),
        description:
            "Organization demonstrates strong cybersecurity maturity across all assessed areas"
                .to_string(),
        priority: "Low".to_string(),
        recommendation: "Congratulations! Your cybersecurity controls are well-established and working effectively. Continue monitoring and optimizing your security posture.".to_string(),
        rationale: "All assessed areas show strong maturity levels, indicating effective cybersecurity implementation".to_string(),
        supporting_resources: vec![
            "Continuous Monitoring Guide".to_string(),
            "Security Optimization Best Practices".to_string(),
        ],
        remediation_steps: vec![
            "Continue regular security assessments".to_string(),
            "Monitor for emerging threats and technologies".to_string(),
            "Optimize existing controls for efficiency".to_string(),
        ],
        tools: vec![
            "Security Monitoring Platforms".to_string(),
            "Threat Intelligence Services".to_string(),
        ],
        references: vec![
            "NIST Cybersecurity Framework".to_string(),
            "Security Excellence Guidelines".to_string(),
        ],
        effort_level: "Low".to_string(),
        impact_score: 8,
        reference_note: None,
    }
}

fn round_percentage(current: usize, total: usize) -> f64 {
    ((current as f64 / total as f64) * 1000.0).round() / 10.0
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

// ─────────────────────────────────────────────────────────────────────────────
// Event stream producer
// ─────────────────────────────────────────────────────────────────────────────

/// Spawns the pipeline as a producer task and returns the event stream the
/// response body reads from. Dropping the stream (client disconnect) makes
/// the next emit fail, which stops the producer.
pub fn survey_event_stream(state: AppState, survey_id: u32) -> ReceiverStream<StreamEvent> {
    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

    tokio::spawn(async move {
        let sink = ChannelSink::new(tx);
        let outcome =
            process_survey(&state.survey, state.recommender.as_ref(), survey_id, &sink).await;

        let tail = match outcome {
            Ok(result) => {
                sink.emit(StreamEvent::Summary {
                    total_recommendations: result.recommendations.len(),
                    survey_id,
                    timestamp: now_iso(),
                })
                .await
            }
            Err(PipelineAbort::Upstream(e)) => {
                sink.emit(StreamEvent::Error {
                    message: format!("Request failed: {e}"),
                })
                .await
            }
            Err(PipelineAbort::Disconnected) => {
                debug!("Client for survey {survey_id} disconnected mid-stream");
                Err(ClientGone)
            }
        };

        if tail.is_ok() {
            let _ = sink.emit(StreamEvent::End).await;
        }
    });

    ReceiverStream::new(rx)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
