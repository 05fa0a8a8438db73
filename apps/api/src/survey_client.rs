//! HTTP client for the survey API.
//!
//! Two resources are fetched per survey: the task list and the survey meta
//! record. Failure handling is two-tier: transport errors (DNS, refused
//! connection, timeout) escape as `Err` and abort processing, while data
//! problems (non-2xx status, empty body, malformed JSON) degrade to
//! warnings on the snapshot so processing can continue with whatever
//! parsed.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use tracing::{debug, warn};

use crate::models::survey::{
    normalize_scores, CategoryScores, RawSurveyMeta, SurveySnapshot, SurveyTask, TaskEnvelope,
};

const FETCH_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct SurveyClient {
    client: Client,
    base_url: String,
}

impl SurveyClient {
    pub fn new(base_url: String, api_user: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
            ),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(
            "x-user",
            HeaderValue::from_str(api_user).expect("x-user header must be a valid header value"),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self { client, base_url }
    }

    /// Fetches both survey resources and reconciles them into a snapshot.
    /// Meta warnings precede task warnings in the result.
    pub async fn fetch(&self, survey_id: u32) -> Result<SurveySnapshot, reqwest::Error> {
        let task_url = format!("{}/surveyTasks?surveyId={}", self.base_url, survey_id);
        let meta_url = format!("{}/survey?surveyId={}", self.base_url, survey_id);

        let task_response = self.client.get(&task_url).send().await?;
        let task_status = task_response.status().as_u16();
        let task_body = task_response.text().await?;

        let meta_response = self.client.get(&meta_url).send().await?;
        let meta_status = meta_response.status().as_u16();
        let meta_body = meta_response.text().await?;

        debug!("Survey {survey_id} fetched: task status {task_status}, meta status {meta_status}");

        let (scores, meta_warnings) = reconcile_meta(meta_status, &meta_body);
        let (tasks, task_warnings) = reconcile_tasks(task_status, &task_body);

        let mut warnings = meta_warnings;
        warnings.extend(task_warnings);
        for warning in &warnings {
            warn!("Survey {survey_id}: {warning}");
        }

        Ok(SurveySnapshot {
            survey_id,
            task_status,
            meta_status,
            scores,
            tasks,
            warnings,
        })
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Extracts category scores from the meta response body.
fn reconcile_meta(status: u16, body: &str) -> (CategoryScores, Vec<String>) {
    if !is_success(status) || body.trim().is_empty() {
        return (
            CategoryScores::new(),
            vec!["Empty or non-JSON meta response".to_string()],
        );
    }
    match serde_json::from_str::<RawSurveyMeta>(body) {
        Ok(meta) => {
            let (scores, warning) = normalize_scores(&meta.scores);
            (scores, warning.into_iter().collect())
        }
        Err(e) => (
            CategoryScores::new(),
            vec![format!("Meta JSON error: {e}")],
        ),
    }
}

/// Extracts the task list from the tasks response body.
fn reconcile_tasks(status: u16, body: &str) -> (Vec<SurveyTask>, Vec<String>) {
    if !is_success(status) || body.trim().is_empty() {
        return (
            Vec::new(),
            vec!["Empty or non-JSON task response".to_string()],
        );
    }
    match serde_json::from_str::<TaskEnvelope>(body) {
        Ok(envelope) => (envelope.tasks, Vec::new()),
        Err(e) => (Vec::new(), vec![format!("Task JSON error: {e}")]),
    }
}
