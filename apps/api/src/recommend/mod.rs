#![allow(dead_code)]
//! Recommendation generation.
//!
//! This is the only module that retries LLM calls. The pipeline hands a
//! prompt to a [`Recommender`] and gets back a parsed payload or a final
//! error; transport failures and unparseable output are retried with a
//! fixed delay, while an empty completion fails immediately since
//! temperature-0 output will not improve on a second ask.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::time::sleep;
use tracing::warn;

use crate::llm_client::{strip_json_fences, LlmClient};
use crate::models::recommendation::RecommendationPayload;

pub mod prompts;

pub const DEFAULT_GENERATION_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(10);

// ─────────────────────────────────────────────────────────────────────────────
// Retry policy
// ─────────────────────────────────────────────────────────────────────────────

/// How many attempts to make, and the pause inserted before every attempt
/// after the first.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_GENERATION_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("model returned empty content")]
    EmptyContent,

    #[error("generation failed after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}

// ─────────────────────────────────────────────────────────────────────────────
// Recommender seam
// ─────────────────────────────────────────────────────────────────────────────

/// Produces a recommendation payload from a prompt. The pipeline only
/// depends on this trait, so tests can script outcomes without an API key.
#[async_trait]
pub trait Recommender: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<RecommendationPayload, GenerateError>;
}

/// Outcome of a single generation attempt.
enum Attempt {
    Payload(RecommendationPayload),
    Empty,
    Failed(String),
}

fn parse_payload(content: &str) -> Attempt {
    if content.trim().is_empty() {
        return Attempt::Empty;
    }
    match serde_json::from_str::<RecommendationPayload>(strip_json_fences(content)) {
        Ok(payload) => Attempt::Payload(payload),
        Err(e) => Attempt::Failed(format!("model did not return valid JSON: {e}")),
    }
}

/// Runs `attempt` up to `policy.attempts` times, sleeping `policy.delay`
/// before every attempt after the first. `Empty` aborts without retrying.
async fn run_with_retry<F, Fut>(
    policy: RetryPolicy,
    mut attempt: F,
) -> Result<RecommendationPayload, GenerateError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Attempt>,
{
    let mut last_error = String::new();

    for round in 0..policy.attempts {
        if round > 0 {
            sleep(policy.delay).await;
        }

        match attempt().await {
            Attempt::Payload(payload) => return Ok(payload),
            Attempt::Empty => {
                warn!("empty response from model, not retrying");
                return Err(GenerateError::EmptyContent);
            }
            Attempt::Failed(message) => {
                warn!("generation attempt {} failed: {message}", round + 1);
                last_error = message;
            }
        }
    }

    Err(GenerateError::RetriesExhausted {
        attempts: policy.attempts,
        last_error,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// OpenAI-backed recommender
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct OpenAiRecommender {
    llm: LlmClient,
    policy: RetryPolicy,
}

impl OpenAiRecommender {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(llm: LlmClient, policy: RetryPolicy) -> Self {
        Self { llm, policy }
    }
}

#[async_trait]
impl Recommender for OpenAiRecommender {
    async fn generate(&self, prompt: &str) -> Result<RecommendationPayload, GenerateError> {
        let llm = &self.llm;
        run_with_retry(self.policy, || async move {
            match llm.complete(prompt, prompts::SYSTEM_INSTRUCTION).await {
                Ok(content) => parse_payload(&content),
                Err(e) => Attempt::Failed(e.to_string()),
            }
        })
        .await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
