//! Recommendation text generation.
//!
//! Builds the recommendation prompt and runs it against an ordered list of
//! models, retrying each model with a linear backoff while it reports
//! overload.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use tracing::{info, warn};

/// Instruction prepended to every user query
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that suggests manga titles matching the user's query.
Return up to 6 suggestions. Do NOT invent titles if unsure, put \"unknown\" as the title or omit it. Keep reasons short (2-4 sentences). Format as a numbered list:
1. **Title**: Reason
2. **Title**: Reason
...";

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The model is temporarily overloaded or unavailable
    #[error("model overloaded: status={status} message={message}")]
    Overloaded { status: StatusCode, message: String },

    #[error("model returned error: status={status} code={code:?} message={message}")]
    Api {
        status: StatusCode,
        code: Option<String>,
        message: String,
    },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid response JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("all models exhausted: {models:?}")]
    Exhausted { models: Vec<String> },
}

impl GenerationError {
    /// Whether the failure is an overload that is worth waiting out
    pub fn is_retryable(&self) -> bool {
        matches!(self, GenerationError::Overloaded { .. })
    }
}

/// A text completion backend
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate text for `prompt` with the named model
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerationError>;
}

/// Bounded retry with linearly increasing backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_step: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay after the failed attempt with 0-based index `attempt`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff_step.saturating_mul(attempt.saturating_add(1))
    }
}

/// Turns a user query into raw recommendation text
#[derive(Clone)]
pub struct RecommendationGenerator {
    model: Arc<dyn LanguageModel>,
    models: Vec<String>,
    retry: RetryPolicy,
}

impl RecommendationGenerator {
    pub fn new(model: Arc<dyn LanguageModel>, models: Vec<String>, retry: RetryPolicy) -> Self {
        Self {
            model,
            models,
            retry,
        }
    }

    pub fn build_prompt(query: &str) -> String {
        format!("{}\nUser query: \"{}\"", SYSTEM_PROMPT, query)
    }

    /// Generate recommendation text for `query`
    ///
    /// Models are tried in order, one at a time. Overload errors are retried
    /// up to `max_attempts` times per model; any other error is returned
    /// immediately.
    pub async fn generate(&self, query: &str) -> Result<String, GenerationError> {
        let prompt = Self::build_prompt(query);

        for model in &self.models {
            for attempt in 0..self.retry.max_attempts {
                match self.model.generate(model, &prompt).await {
                    Ok(text) => {
                        info!(model = %model, attempt, chars = text.len(), "Generation succeeded");
                        return Ok(text);
                    }
                    Err(e) if e.is_retryable() => {
                        let delay = self.retry.delay_for(attempt);
                        warn!(
                            model = %model,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "Model overloaded, retrying"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    Err(e) => return Err(e),
                }
            }
            warn!(model = %model, "Model exhausted retries, moving to next model");
        }

        Err(GenerationError::Exhausted {
            models: self.models.clone(),
        })
    }
}
