//! Bounded retry for upstream model calls
//!
//! One chat turn is driven through an explicit state machine:
//!
//! ```text
//! Sending(n) --ok--------------------> Done
//!            --empty reply-----------> FailedEmptyReply
//!            --503, n < max----------> Backoff(n) --> Sending(n + 1)
//!            --503, n == max---------> Exhausted
//!            --any other failure-----> FailedUpstream
//! ```
//!
//! Only HTTP 503 is retried. An empty reply after a 200 is terminal.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::llm::error::UpstreamError;
use crate::llm::gemini_types::Content;
use crate::llm::model::{GenerativeModel, TextStream};

/// Delay schedule between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// `attempt × base_delay`
    Linear,
    /// `2^(attempt - 1) × base_delay`
    Exponential,
}

/// How many times to call the model and how long to wait in between
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Unit delay fed into the backoff schedule
    pub base_delay: Duration,
    /// Delay schedule
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            backoff: Backoff::Linear,
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after failed attempt number `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = match self.backoff {
            Backoff::Linear => attempt,
            Backoff::Exponential => 2u32.saturating_pow(attempt.saturating_sub(1)),
        };
        self.base_delay.saturating_mul(factor)
    }
}

#[derive(Debug)]
enum TurnState<T> {
    Sending { attempt: u32 },
    Backoff { attempt: u32, delay: Duration },
    Done(T),
    FailedEmptyReply,
    FailedUpstream(UpstreamError),
    Exhausted { attempts: u32 },
}

impl<T> TurnState<T> {
    /// Transition out of `Sending { attempt }` given the call outcome
    fn after_attempt(attempt: u32, outcome: Result<T, UpstreamError>, policy: &RetryPolicy) -> Self {
        match outcome {
            Ok(value) => TurnState::Done(value),
            Err(UpstreamError::EmptyReply) => TurnState::FailedEmptyReply,
            Err(e) if e.is_retryable() && attempt < policy.max_attempts => TurnState::Backoff {
                attempt,
                delay: policy.delay_for(attempt),
            },
            Err(e) if e.is_retryable() => TurnState::Exhausted { attempts: attempt },
            Err(e) => TurnState::FailedUpstream(e),
        }
    }
}

/// Run `call` under `policy` until it succeeds or a terminal state is reached
pub async fn run_with_retry<T, F, Fut>(policy: &RetryPolicy, mut call: F) -> Result<T, UpstreamError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, UpstreamError>>,
{
    let mut state = TurnState::Sending { attempt: 1 };
    loop {
        state = match state {
            TurnState::Sending { attempt } => {
                debug!(attempt, max_attempts = policy.max_attempts, "Calling upstream model");
                let outcome = call().await;
                TurnState::after_attempt(attempt, outcome, policy)
            }
            TurnState::Backoff { attempt, delay } => {
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Upstream model unavailable, backing off"
                );
                tokio::time::sleep(delay).await;
                TurnState::Sending { attempt: attempt + 1 }
            }
            TurnState::Done(value) => return Ok(value),
            TurnState::FailedEmptyReply => {
                warn!("Upstream model returned an empty reply");
                return Err(UpstreamError::EmptyReply);
            }
            TurnState::FailedUpstream(e) => {
                error!(error = %e, "Upstream model call failed");
                return Err(e);
            }
            TurnState::Exhausted { attempts } => {
                error!(attempts, "Upstream model still unavailable, giving up");
                return Err(UpstreamError::Exhausted { attempts });
            }
        };
    }
}

/// Generate a complete, non-empty reply
pub async fn generate_with_retry(
    model: &dyn GenerativeModel,
    contents: &[Content],
    policy: &RetryPolicy,
) -> Result<String, UpstreamError> {
    run_with_retry(policy, move || async move {
        let text = model.generate(contents).await?;
        if text.trim().is_empty() {
            Err(UpstreamError::EmptyReply)
        } else {
            Ok(text)
        }
    })
    .await
}

/// Open a reply stream; only failures before the first chunk are retried
pub async fn open_stream_with_retry(
    model: &dyn GenerativeModel,
    contents: &[Content],
    policy: &RetryPolicy,
) -> Result<TextStream, UpstreamError> {
    run_with_retry(policy, move || model.stream(contents)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn instant_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::ZERO,
            backoff: Backoff::Linear,
        }
    }

    fn unavailable() -> UpstreamError {
        UpstreamError::from_status(503, "overloaded".into())
    }

    #[test]
    fn test_linear_delays() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(3));
    }

    #[test]
    fn test_exponential_delays() {
        let policy = RetryPolicy {
            backoff: Backoff::Exponential,
            base_delay: Duration::from_millis(100),
            ..RetryPolicy::default()
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(4), Duration::from_millis(800));
        assert!(policy.delay_for(200) > policy.delay_for(4));
    }

    #[test]
    fn test_transitions() {
        let policy = RetryPolicy::default();

        let state = TurnState::after_attempt(1, Ok("hi"), &policy);
        assert!(matches!(state, TurnState::Done("hi")));

        let state = TurnState::<&str>::after_attempt(1, Err(unavailable()), &policy);
        assert!(matches!(
            state,
            TurnState::Backoff { attempt: 1, delay } if delay == Duration::from_secs(1)
        ));

        let state = TurnState::<&str>::after_attempt(3, Err(unavailable()), &policy);
        assert!(matches!(state, TurnState::Exhausted { attempts: 3 }));

        let state = TurnState::<&str>::after_attempt(1, Err(UpstreamError::EmptyReply), &policy);
        assert!(matches!(state, TurnState::FailedEmptyReply));

        let state =
            TurnState::<&str>::after_attempt(1, Err(UpstreamError::Network("reset".into())), &policy);
        assert!(matches!(state, TurnState::FailedUpstream(UpstreamError::Network(_))));
    }

    #[tokio::test]
    async fn test_succeeds_on_third_attempt() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = run_with_retry(&instant_policy(3), || async move {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(unavailable())
            } else {
                Ok("done".to_string())
            }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausts_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<String, _> = run_with_retry(&instant_policy(3), || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(unavailable())
        })
        .await;

        assert!(matches!(result, Err(UpstreamError::Exhausted { attempts: 3 })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_single_attempt_policy_never_backs_off() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<String, _> = run_with_retry(&instant_policy(1), || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(unavailable())
        })
        .await;

        assert!(matches!(result, Err(UpstreamError::Exhausted { attempts: 1 })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_terminal_failures_are_not_retried() {
        for failure in [
            UpstreamError::EmptyReply,
            UpstreamError::from_status(429, "quota".into()),
            UpstreamError::Network("timeout".into()),
        ] {
            let calls = AtomicU32::new(0);
            let mut failure = Some(failure);
            let result: Result<String, _> = run_with_retry(&instant_policy(3), || {
                calls.fetch_add(1, Ordering::SeqCst);
                let outcome = failure.take().map(Err).unwrap_or_else(|| Ok(String::new()));
                async move { outcome }
            })
            .await;

            assert!(result.is_err());
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }
    }
}
