//! Language-model collaborator: the client interface, bounded retry and
//! the two calls the tracker makes through it.
//!
//! No concrete HTTP client lives here. Hosts implement
//! [`CompletionClient`] for whatever provider they use and get retry,
//! fence stripping and payload validation from this module.
//!
//! # Examples
//!
//! ```rust
//! use cadence_core::model_client::{optimize_plan, CompletionClient, ModelError, RetryPolicy};
//!
//! struct Canned;
//!
//! impl CompletionClient for Canned {
//!     fn complete(&self, _system: &str, _user: &str) -> Result<String, ModelError> {
//!         Ok("```json\n{\"total_minutes\": 25, \"tasks\": [{\"name\": \"Read\", \"minutes\": 25, \"priority\": \"S\", \"focus\": \"8\"}]}\n```".to_string())
//!     }
//! }
//!
//! let draft = optimize_plan(&Canned, &RetryPolicy::default(), "read for a while").unwrap();
//! assert_eq!(draft.tasks[0].focus, 8);
//! ```

use std::{thread, time::Duration};

use log::{debug, warn};
use thiserror::Error;

use crate::{
    error::{Result, TrackerError},
    execution::ExecutionSnapshot,
    payload::{parse_plan_text, PlanDraft},
};

/// System prompt asking the model for a structured plan payload.
pub const OPTIMIZE_PLAN_PROMPT: &str = r#"You are an uncompromising time-optimization coach. Turn the user's plan for today into a sequence of focused micro-tasks.

Rules:
1. Break the plan into concrete tasks of at most 25 minutes each.
2. Give every task a tight but realistic time limit.
3. Mark each task's priority as S, A or B and its target focus level from 1 to 10.
4. Keep breaks to a minimum and maximize deep-work time.

Reply with JSON only, no other text:
{
  "total_minutes": <total minutes>,
  "tasks": [
    {
      "id": <sequence number>,
      "name": "<task name>",
      "minutes": <estimated minutes>,
      "priority": "S/A/B",
      "focus": "<focus 1-10>",
      "method": "<suggested method>",
      "warning": "<time-pressure reminder>"
    }
  ],
  "motivation": "<one motivating line>",
  "tips": "<execution advice>"
}"#;

/// Shown when a coaching request fails.
pub const FALLBACK_COACHING: &str = "Keep going. The clock is running.";

/// Failure reported by a [`CompletionClient`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Quota or rate limit hit; worth retrying after a pause
    #[error("Rate limit exceeded: {message}")]
    RateLimited { message: String },

    /// Credential rejected; never retried
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// Any other failure
    #[error("Request failed: {message}")]
    Request { message: String },
}

impl ModelError {
    /// Check if this error indicates the request should be retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Classifies a provider error message by its well-known markers.
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        if lower.contains("429") || lower.contains("quota") || lower.contains("exceeded") {
            Self::RateLimited { message }
        } else if lower.contains("401")
            || lower.contains("unauthorized")
            || lower.contains("invalid api key")
        {
            Self::AuthenticationFailed { message }
        } else {
            Self::Request { message }
        }
    }

    fn hint(&self) -> &'static str {
        match self {
            Self::RateLimited { .. } => {
                "Try again later, or check the account's quota and balance with the provider."
            }
            Self::AuthenticationFailed { .. } => {
                "Check the API key (`cadence config set api_key <KEY>`)."
            }
            Self::Request { .. } => "Check the network connection and the configured base URL.",
        }
    }
}

/// A chat-completion endpoint: system prompt and user input in, text out.
pub trait CompletionClient {
    fn complete(&self, system_prompt: &str, user_input: &str) -> std::result::Result<String, ModelError>;
}

impl<T: CompletionClient + ?Sized> CompletionClient for &T {
    fn complete(&self, system_prompt: &str, user_input: &str) -> std::result::Result<String, ModelError> {
        (**self).complete(system_prompt, user_input)
    }
}

/// Bounded exponential backoff for rate-limited calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first
    pub max_attempts: u32,
    /// Pause before the second attempt; doubles each time after
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Pause after the failed attempt number `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .checked_mul(2u32.saturating_pow(attempt))
            .unwrap_or(Duration::MAX)
    }
}

/// Calls the client, retrying rate-limit failures per `policy`.
///
/// # Errors
///
/// Returns [`TrackerError::ModelCall`] once attempts are exhausted or on the
/// first non-retryable failure.
pub fn complete_with_retry<C: CompletionClient + ?Sized>(
    client: &C,
    policy: &RetryPolicy,
    system_prompt: &str,
    user_input: &str,
) -> Result<String> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        match client.complete(system_prompt, user_input) {
            Ok(text) => return Ok(text),
            Err(e) if e.is_retryable() && attempt + 1 < max_attempts => {
                let wait = policy.delay_for(attempt);
                warn!(
                    "{e}; retrying in {}s ({}/{max_attempts})",
                    wait.as_secs_f64(),
                    attempt + 1
                );
                thread::sleep(wait);
                attempt += 1;
            }
            Err(e) => {
                return Err(TrackerError::ModelCall {
                    attempts: attempt + 1,
                    message: e.to_string(),
                    hint: e.hint().to_string(),
                })
            }
        }
    }
}

/// Removes a surrounding markdown code fence, with or without a language tag.
///
/// ```rust
/// use cadence_core::model_client::strip_code_fence;
///
/// assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
/// assert_eq!(strip_code_fence("  {}  "), "{}");
/// ```
pub fn strip_code_fence(text: &str) -> &str {
    let mut cleaned = text.trim();
    if cleaned.starts_with("```") {
        cleaned = cleaned.split_once('\n').map_or("", |(_, rest)| rest);
    }
    if let Some(body) = cleaned.trim_end().strip_suffix("```") {
        cleaned = body;
    }
    cleaned.trim()
}

/// Asks the model to structure `free_text` and validates the reply.
/// Nothing is persisted.
pub fn optimize_plan<C: CompletionClient + ?Sized>(
    client: &C,
    policy: &RetryPolicy,
    free_text: &str,
) -> Result<PlanDraft> {
    let user_input = format!(
        "My plan for today: {free_text}\n\nOptimize it aggressively for maximum efficiency."
    );
    let reply = complete_with_retry(client, policy, OPTIMIZE_PLAN_PROMPT, &user_input)?;
    debug!("Model replied with {} byte(s)", reply.len());
    parse_plan_text(strip_code_fence(&reply))
}

/// System prompt for a mid-task coaching line.
pub fn coaching_prompt(snapshot: &ExecutionSnapshot) -> String {
    let elapsed = snapshot.elapsed_secs;
    format!(
        "You are a demanding time coach. The user is executing a high-intensity plan.\n\n\
         Overall progress: {:.0}%\n\
         Time used: {}m {}s\n\
         Current task: {}\n\
         Task budget: {} minutes\n\
         Target focus: {}/10\n\n\
         Give one short, direct line of motivation and advice.",
        snapshot.total_progress * 100.0,
        elapsed / 60,
        elapsed % 60,
        snapshot.task.name,
        snapshot.task.minutes,
        snapshot.task.focus,
    )
}

/// A coaching line for the current task. Failures fall back to
/// [`FALLBACK_COACHING`] instead of surfacing.
pub fn request_coaching<C: CompletionClient + ?Sized>(
    client: &C,
    policy: &RetryPolicy,
    snapshot: &ExecutionSnapshot,
) -> String {
    match complete_with_retry(
        client,
        policy,
        &coaching_prompt(snapshot),
        "Give me one line of motivation and advice.",
    ) {
        Ok(line) if !line.trim().is_empty() => line.trim().to_string(),
        Ok(_) => FALLBACK_COACHING.to_string(),
        Err(e) => {
            warn!("Coaching request failed: {e}");
            FALLBACK_COACHING.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::VecDeque};

    use super::*;
    use crate::{
        execution::TimerPhase,
        models::{Priority, TaskSpec},
    };

    /// Replays scripted replies and counts calls.
    struct Scripted {
        replies: RefCell<VecDeque<std::result::Result<String, ModelError>>>,
        calls: RefCell<u32>,
    }

    impl Scripted {
        fn new(replies: Vec<std::result::Result<String, ModelError>>) -> Self {
            Self {
                replies: RefCell::new(replies.into()),
                calls: RefCell::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.borrow()
        }
    }

    impl CompletionClient for Scripted {
        fn complete(&self, _system: &str, _user: &str) -> std::result::Result<String, ModelError> {
            *self.calls.borrow_mut() += 1;
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ModelError::classify("script exhausted")))
        }
    }

    fn instant() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::ZERO,
        }
    }

    fn rate_limited() -> ModelError {
        ModelError::classify("Error code: 429 - quota exceeded")
    }

    #[test]
    fn test_classify_markers() {
        assert!(rate_limited().is_retryable());
        assert!(matches!(
            ModelError::classify("401 Unauthorized"),
            ModelError::AuthenticationFailed { .. }
        ));
        assert!(matches!(
            ModelError::classify("connection reset"),
            ModelError::Request { .. }
        ));
    }

    #[test]
    fn test_retry_recovers_after_rate_limit() {
        let client = Scripted::new(vec![Err(rate_limited()), Ok("done".to_string())]);
        let reply = complete_with_retry(&client, &instant(), "sys", "user").unwrap();
        assert_eq!(reply, "done");
        assert_eq!(client.calls(), 2);
    }

    #[test]
    fn test_retry_gives_up_after_max_attempts() {
        let client = Scripted::new(vec![
            Err(rate_limited()),
            Err(rate_limited()),
            Err(rate_limited()),
            Ok("too late".to_string()),
        ]);
        let err = complete_with_retry(&client, &instant(), "sys", "user").unwrap_err();
        assert!(matches!(err, TrackerError::ModelCall { attempts: 3, .. }));
        assert!(err.to_string().contains("quota"));
        assert_eq!(client.calls(), 3);
    }

    #[test]
    fn test_auth_failure_is_not_retried() {
        let client = Scripted::new(vec![
            Err(ModelError::AuthenticationFailed {
                message: "bad key".to_string(),
            }),
            Ok("unused".to_string()),
        ]);
        let err = complete_with_retry(&client, &instant(), "sys", "user").unwrap_err();
        assert!(matches!(err, TrackerError::ModelCall { attempts: 1, .. }));
        assert_eq!(client.calls(), 1);
    }

    #[test]
    fn test_delay_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_secs(2));
        assert_eq!(policy.delay_for(1), Duration::from_secs(4));
        assert_eq!(policy.delay_for(2), Duration::from_secs(8));
    }

    #[test]
    fn test_strip_code_fence_variants() {
        assert_eq!(strip_code_fence("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```\n"), "{\"a\":1}");
        assert_eq!(strip_code_fence("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn test_optimize_plan_reports_malformed_reply() {
        let client = Scripted::new(vec![Ok("Sure! Here is your plan.".to_string())]);
        let err = optimize_plan(&client, &instant(), "study").unwrap_err();
        assert_eq!(err.raw_payload(), Some("Sure! Here is your plan."));
    }

    #[test]
    fn test_optimize_plan_rejects_missing_tasks() {
        let client = Scripted::new(vec![Ok("{\"total_minutes\": 30}".to_string())]);
        let err = optimize_plan(&client, &instant(), "study").unwrap_err();
        assert!(matches!(err, TrackerError::InvalidPlan { ref field, .. } if field == "tasks"));
    }

    #[test]
    fn test_coaching_falls_back_on_failure() {
        let snapshot = ExecutionSnapshot {
            plan_id: 1,
            plan_title: "Plan".to_string(),
            task_index: 0,
            task_count: 1,
            task: TaskSpec {
                name: "Read".to_string(),
                minutes: 25,
                priority: Priority::Top,
                focus: 8,
                method: String::new(),
                warning: String::new(),
            },
            already_recorded: false,
            elapsed_secs: 125,
            task_elapsed_secs: 125,
            remaining_secs: 1375,
            task_overtime_secs: 0,
            planned_total_secs: 1500,
            task_progress: 125.0 / 1500.0,
            total_progress: 125.0 / 1500.0,
            phase: TimerPhase::Calm,
            upcoming: Vec::new(),
        };

        assert!(coaching_prompt(&snapshot).contains("Time used: 2m 5s"));

        let failing = Scripted::new(vec![Err(ModelError::Request {
            message: "offline".to_string(),
        })]);
        assert_eq!(
            request_coaching(&failing, &instant(), &snapshot),
            FALLBACK_COACHING
        );

        let working = Scripted::new(vec![Ok("  Move faster.  ".to_string())]);
        assert_eq!(request_coaching(&working, &instant(), &snapshot), "Move faster.");
    }
}
