//! ScriptExecutor - submit a script to a collector and wait for its result
//!
//! ```text
//! submit ──► polling ──► completed
//!   │           ├──────► cancelled
//!   │           └──────► timed out   (attempt cap reached)
//!   └──────────────────► errored     (submit failed / no session id)
//! ```
//!
//! A failed poll request is not terminal: it is logged and the next attempt
//! runs as usual. The last such error is reported if the cap is reached, so an
//! unreachable collector can be told apart from a script that is just slow.

use gateway::{param, ApiTransport};
use serde_json::Value;
use shared::{ClientError, ExecutionTarget, Result};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::command::ScriptCommand;
use crate::outcome::{classify, PollClassification, ScriptResult};

/// Job submission endpoint
pub const DEBUG_PATH: &str = "/debug/";

/// Maximum polling attempts (60 seconds with 2 second intervals)
pub const POLL_MAX_ATTEMPTS: u32 = 30;

/// Delay before each poll
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Attempt cap and cadence of the poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: POLL_MAX_ATTEMPTS,
            interval: POLL_INTERVAL,
        }
    }
}

impl PollPolicy {
    /// Total wall-clock budget
    pub fn budget(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

/// A submitted debug session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    pub session_id: String,
    pub collector_id: u64,
}

impl JobHandle {
    pub fn status_path(&self) -> String {
        format!("{}{}", DEBUG_PATH, self.session_id)
    }
}

/// State transitions reported to an observer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionState {
    Submitted { session_id: String },
    Polling { attempt: u32, max_attempts: u32 },
    Completed,
    Cancelled,
    TimedOut,
    Errored,
}

/// Terminal result of one execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Completed(ScriptResult),
    Cancelled {
        message: String,
    },
    TimedOut {
        attempts: u32,
        /// Most recent poll error swallowed on the way, if any
        last_error: Option<String>,
    },
}

pub struct ScriptExecutor<'a, T: ApiTransport + ?Sized> {
    transport: &'a T,
    policy: PollPolicy,
}

impl<'a, T: ApiTransport + ?Sized> ScriptExecutor<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self {
            transport,
            policy: PollPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Submit the command; a response without a session id is fatal
    pub async fn submit(&self, target: ExecutionTarget, command: &ScriptCommand) -> Result<JobHandle> {
        let query = vec![param("collectorId", target.collector_id)];
        let response = self
            .transport
            .post(DEBUG_PATH, &query, &command.payload())
            .await?;

        let session_id = match &response["sessionId"] {
            Value::String(s) if !s.is_empty() => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => {
                return Err(ClientError::MissingSessionId {
                    collector_id: target.collector_id,
                })
            }
        };

        info!(
            session_id = %session_id,
            collector_id = target.collector_id,
            device_id = target.device_id,
            "script submitted"
        );
        Ok(JobHandle {
            session_id,
            collector_id: target.collector_id,
        })
    }

    /// Poll a submitted job until it reaches a terminal state or the cap
    pub async fn poll<F>(&self, job: &JobHandle, on_state: &mut F) -> ExecutionOutcome
    where
        F: FnMut(&ExecutionState),
    {
        let path = job.status_path();
        let mut last_error: Option<String> = None;

        for attempt in 1..=self.policy.max_attempts {
            tokio::time::sleep(self.policy.interval).await;
            on_state(&ExecutionState::Polling {
                attempt,
                max_attempts: self.policy.max_attempts,
            });

            let query = vec![
                param("collectorId", job.collector_id),
                param("_", uuid::Uuid::new_v4().simple()),
            ];
            let response = match self.transport.get(&path, &query).await {
                Ok(response) => response,
                Err(e) => {
                    debug!(attempt, error = %e, "poll failed, retrying");
                    last_error = Some(e.to_string());
                    continue;
                }
            };

            match classify(&response) {
                PollClassification::Completed(result) => {
                    info!(attempt, return_code = ?result.return_code, "script completed");
                    on_state(&ExecutionState::Completed);
                    return ExecutionOutcome::Completed(result);
                }
                PollClassification::Cancelled(message) => {
                    warn!(attempt, "script cancelled on collector");
                    on_state(&ExecutionState::Cancelled);
                    return ExecutionOutcome::Cancelled { message };
                }
                PollClassification::Pending => {
                    debug!(attempt, "script still running");
                }
            }
        }

        warn!(
            attempts = self.policy.max_attempts,
            seconds = self.policy.budget().as_secs(),
            "gave up waiting for script result"
        );
        on_state(&ExecutionState::TimedOut);
        ExecutionOutcome::TimedOut {
            attempts: self.policy.max_attempts,
            last_error,
        }
    }

    /// Submit and poll
    pub async fn execute(
        &self,
        target: ExecutionTarget,
        command: &ScriptCommand,
    ) -> Result<ExecutionOutcome> {
        self.execute_with(target, command, |_| {}).await
    }

    /// Submit and poll, reporting each state transition to `on_state`
    pub async fn execute_with<F>(
        &self,
        target: ExecutionTarget,
        command: &ScriptCommand,
        mut on_state: F,
    ) -> Result<ExecutionOutcome>
    where
        F: FnMut(&ExecutionState),
    {
        let job = match self.submit(target, command).await {
            Ok(job) => job,
            Err(e) => {
                on_state(&ExecutionState::Errored);
                return Err(e);
            }
        };
        on_state(&ExecutionState::Submitted {
            session_id: job.session_id.clone(),
        });
        Ok(self.poll(&job, &mut on_state).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateway::MockTransport;
    use serde_json::json;
    use shared::ScriptLanguage;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    const TARGET: ExecutionTarget = ExecutionTarget {
        collector_id: 12,
        device_id: 345,
    };

    fn fast_policy(max_attempts: u32) -> PollPolicy {
        PollPolicy {
            max_attempts,
            interval: Duration::ZERO,
        }
    }

    fn command() -> ScriptCommand {
        ScriptCommand::new(ScriptLanguage::Groovy, TARGET.device_id, "return 0")
    }

    /// Accepts the submission, then answers polls with `poll(n)` for the n-th poll (1-based)
    fn portal<F>(poll: F) -> MockTransport
    where
        F: Fn(u32) -> Result<Value> + Send + Sync + 'static,
    {
        let polls = Arc::new(AtomicU32::new(0));
        MockTransport::new(move |req| {
            if req.method == "POST" {
                Ok(json!({ "sessionId": "sess-1" }))
            } else {
                let n = polls.fetch_add(1, Ordering::SeqCst) + 1;
                poll(n)
            }
        })
    }

    fn transient() -> ClientError {
        ClientError::Transport {
            path: "/debug/sess-1".to_string(),
            message: "connection reset".to_string(),
        }
    }

    // ============== Submit ==============

    #[tokio::test]
    async fn test_submit_request_shape() {
        let mock = portal(|_| Ok(json!({ "output": "returns 0" })));
        let executor = ScriptExecutor::new(&mock).with_policy(fast_policy(3));
        let job = executor.submit(TARGET, &command()).await.unwrap();

        assert_eq!(job.session_id, "sess-1");
        assert_eq!(job.collector_id, 12);
        let call = &mock.calls()[0];
        assert_eq!(call.method, "POST");
        assert_eq!(call.path, DEBUG_PATH);
        assert_eq!(call.param("collectorId"), Some("12"));
        assert_eq!(
            call.body.as_ref().unwrap()["cmd"],
            "!groovy hostId=345\nreturn 0"
        );
    }

    #[tokio::test]
    async fn test_missing_session_id_is_fatal() {
        let mock = MockTransport::new(|_| Ok(json!({ "status": "queued" })));
        let executor = ScriptExecutor::new(&mock).with_policy(fast_policy(3));

        let mut states = Vec::new();
        let err = executor
            .execute_with(TARGET, &command(), |s| states.push(s.clone()))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::MissingSessionId { collector_id: 12 }));
        assert_eq!(states, vec![ExecutionState::Errored]);
        // nothing polled, nothing retried
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_submit_http_error_propagates() {
        let mock = MockTransport::new(|req| {
            Err(ClientError::Http {
                status: 401,
                path: req.path.clone(),
                body: "signature mismatch".to_string(),
            })
        });
        let executor = ScriptExecutor::new(&mock).with_policy(fast_policy(3));
        let err = executor.execute(TARGET, &command()).await.unwrap_err();
        assert!(matches!(err, ClientError::Http { status: 401, .. }));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_numeric_session_id_accepted() {
        let mock = MockTransport::new(|_| Ok(json!({ "sessionId": 991 })));
        let executor = ScriptExecutor::new(&mock);
        let job = executor.submit(TARGET, &command()).await.unwrap();
        assert_eq!(job.status_path(), "/debug/991");
    }

    // ============== Poll ==============

    #[tokio::test]
    async fn test_completes_after_pending_polls() {
        let mock = portal(|n| {
            if n < 3 {
                Ok(json!({ "output": "" }))
            } else {
                Ok(json!({ "output": "returns 0\noutput:\nhello\nworld" }))
            }
        });
        let executor = ScriptExecutor::new(&mock).with_policy(fast_policy(10));

        let outcome = executor.execute(TARGET, &command()).await.unwrap();
        assert_eq!(
            outcome,
            ExecutionOutcome::Completed(ScriptResult {
                return_code: Some(0),
                output: "hello\r\nworld".to_string(),
            })
        );
        // 1 submit + 3 polls
        assert_eq!(mock.call_count(), 4);
    }

    #[tokio::test]
    async fn test_poll_request_shape() {
        let mock = portal(|n| {
            if n < 2 {
                Ok(json!({}))
            } else {
                Ok(json!({ "status": "completed" }))
            }
        });
        let executor = ScriptExecutor::new(&mock).with_policy(fast_policy(5));
        executor.execute(TARGET, &command()).await.unwrap();

        let polls: Vec<_> = mock.calls().into_iter().filter(|c| c.method == "GET").collect();
        assert_eq!(polls.len(), 2);
        assert!(polls.iter().all(|p| p.path == "/debug/sess-1"));
        assert!(polls.iter().all(|p| p.param("collectorId") == Some("12")));
        // cache-defeating nonce changes every attempt
        assert_ne!(polls[0].param("_"), polls[1].param("_"));
        assert!(polls[0].param("_").is_some());
    }

    #[tokio::test]
    async fn test_cancelled_status_ends_polling() {
        let mock = portal(|_| Ok(json!({ "status": "cancelled", "output": "" })));
        let executor = ScriptExecutor::new(&mock).with_policy(fast_policy(10));

        let outcome = executor.execute(TARGET, &command()).await.unwrap();
        assert!(matches!(outcome, ExecutionOutcome::Cancelled { .. }));
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_cancel_marker_ends_polling() {
        let mock = portal(|_| Ok(json!({ "output": "task was cancelled" })));
        let executor = ScriptExecutor::new(&mock).with_policy(fast_policy(10));

        let outcome = executor.execute(TARGET, &command()).await.unwrap();
        assert_eq!(
            outcome,
            ExecutionOutcome::Cancelled {
                message: "task was cancelled".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_times_out_after_exact_attempts() {
        let mock = portal(|_| Ok(json!({ "output": "still working" })));
        let executor = ScriptExecutor::new(&mock).with_policy(fast_policy(7));

        let outcome = executor.execute(TARGET, &command()).await.unwrap();
        assert_eq!(
            outcome,
            ExecutionOutcome::TimedOut {
                attempts: 7,
                last_error: None
            }
        );
        assert_eq!(mock.call_count(), 1 + 7);
    }

    // ============== Transient Errors ==============

    #[tokio::test]
    async fn test_transient_errors_do_not_terminate() {
        let mock = portal(|n| {
            if n <= 2 {
                Err(transient())
            } else {
                Ok(json!({ "output": "returns -1\noutput:\nbad" }))
            }
        });
        let executor = ScriptExecutor::new(&mock).with_policy(fast_policy(5));

        let outcome = executor.execute(TARGET, &command()).await.unwrap();
        assert_eq!(
            outcome,
            ExecutionOutcome::Completed(ScriptResult {
                return_code: Some(-1),
                output: "bad".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_persistent_errors_time_out_with_last_error() {
        // Permanent failures are treated like transient ones until the cap
        let mock = portal(|_| Err(transient()));
        let executor = ScriptExecutor::new(&mock).with_policy(fast_policy(4));

        match executor.execute(TARGET, &command()).await.unwrap() {
            ExecutionOutcome::TimedOut {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 4);
                assert!(last_error.unwrap().contains("connection reset"));
            }
            other => panic!("expected timeout, got {:?}", other),
        }
        assert_eq!(mock.call_count(), 1 + 4);
    }

    // ============== Observer ==============

    #[tokio::test]
    async fn test_state_sequence() {
        let mock = portal(|n| {
            if n == 1 {
                Ok(json!({}))
            } else {
                Ok(json!({ "output": "returns null" }))
            }
        });
        let executor = ScriptExecutor::new(&mock).with_policy(fast_policy(3));

        let mut states = Vec::new();
        executor
            .execute_with(TARGET, &command(), |s| states.push(s.clone()))
            .await
            .unwrap();

        assert_eq!(
            states,
            vec![
                ExecutionState::Submitted {
                    session_id: "sess-1".to_string()
                },
                ExecutionState::Polling {
                    attempt: 1,
                    max_attempts: 3
                },
                ExecutionState::Polling {
                    attempt: 2,
                    max_attempts: 3
                },
                ExecutionState::Completed,
            ]
        );
    }

    #[test]
    fn test_default_policy_budget() {
        let policy = PollPolicy::default();
        assert_eq!(policy.max_attempts, POLL_MAX_ATTEMPTS);
        assert_eq!(policy.budget(), Duration::from_secs(60));
    }
}
