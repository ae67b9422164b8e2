//! Submit-then-poll client for remote job runs.
//!
//! [`JobsClient::submit`] starts one run and hands back a [`JobHandle`];
//! [`JobsClient::await_result`] consumes the handle and polls the run at
//! a fixed interval until it terminates, the attempt budget runs out, or
//! (with [`await_result_with_cancel`](JobsClient::await_result_with_cancel))
//! the caller's [`CancellationToken`] fires. The client holds no state
//! across calls, so one instance can drive any number of runs from
//! independent call sites.
//!
//! The interval is fixed rather than backed off: the remote jobs have a
//! roughly known wall-clock duration, and `max_attempts * poll_interval`
//! gives the caller a deterministic worst-case wait to surface to users.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::api::{JobsApi, JobsApiError};
use crate::config::JobsConfig;
use crate::run::{LifecycleState, ResultState, RunId};

// ---------------------------------------------------------------------------
// Submission types
// ---------------------------------------------------------------------------

/// One unit of work to hand to the platform.
///
/// The remote side is stateless per invocation, so `parameters` must
/// carry everything the job needs.
#[derive(Debug, Clone)]
pub struct JobSubmission {
    /// Identifier of the remote job definition.
    pub job_id: String,
    /// Notebook parameters, passed to the run verbatim.
    pub parameters: HashMap<String, serde_json::Value>,
}

impl JobSubmission {
    /// Create a submission for a job definition with no parameters yet.
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            parameters: HashMap::new(),
        }
    }

    /// Add one parameter, builder-style.
    pub fn with_param(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

/// Handle to one in-flight run, produced by a successful submission.
///
/// Consumed by value by exactly one polling sequence; a terminated run
/// cannot be re-awaited.
#[derive(Debug, Clone)]
pub struct JobHandle {
    /// Server-assigned run identifier.
    pub run_id: RunId,
    /// When the submission was accepted.
    pub submitted_at: DateTime<Utc>,
}

/// Why a submission produced no handle.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// The caller passed an empty job id; nothing was sent.
    #[error("job_id must not be empty")]
    EmptyJobId,

    /// The platform rejected the run-now call, or it never arrived.
    #[error(transparent)]
    Api(#[from] JobsApiError),
}

// ---------------------------------------------------------------------------
// Polling types
// ---------------------------------------------------------------------------

/// Attempt budget for one polling sequence.
///
/// The worst-case wait is `max_attempts * poll_interval`; the default
/// budget is 30 x 10 s, about five minutes.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Maximum number of status polls; values below 1 are treated as 1.
    pub max_attempts: u32,
    /// Sleep before each status poll. Zero is valid (test mode).
    pub poll_interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            poll_interval: Duration::from_secs(10),
        }
    }
}

/// Result of one completed polling sequence. Exactly one variant is
/// produced per sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    /// The run terminated successfully and its output decoded as JSON.
    Success {
        /// Decoded run output.
        payload: serde_json::Value,
    },
    /// The run is over and produced no usable result. Final at this
    /// layer -- re-polling a terminated run cannot change the outcome.
    Failure {
        /// Remote state message or transport error text.
        reason: String,
    },
    /// The budget was exhausted with the run still in flight. The run
    /// may yet complete; whether to re-poll with a fresh budget is the
    /// caller's call.
    Timeout {
        /// Number of status polls actually made.
        attempts_made: u32,
    },
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client for submitting runs and awaiting their outcome.
pub struct JobsClient {
    api: JobsApi,
}

impl JobsClient {
    /// Create a client from workspace configuration.
    pub fn new(config: JobsConfig) -> Self {
        Self {
            api: JobsApi::new(config.host, config.token),
        }
    }

    /// Start one run of the submitted job.
    ///
    /// Issues a single authenticated run-now call; no retry here, since
    /// submission retry policy belongs to the caller. An empty `job_id`
    /// is rejected before any network I/O.
    pub async fn submit(&self, job: &JobSubmission) -> Result<JobHandle, SubmissionError> {
        if job.job_id.is_empty() {
            return Err(SubmissionError::EmptyJobId);
        }

        let run_id = self.api.run_now(&job.job_id, &job.parameters).await?;
        tracing::info!(job_id = %job.job_id, %run_id, "Submitted job run");

        Ok(JobHandle {
            run_id,
            submitted_at: Utc::now(),
        })
    }

    /// Poll a run to completion, with no external abort signal.
    ///
    /// See [`await_result_with_cancel`](Self::await_result_with_cancel)
    /// for the loop semantics; this variant always runs the sequence to
    /// one of the three [`JobOutcome`]s.
    pub async fn await_result(&self, handle: JobHandle, poll: &PollConfig) -> JobOutcome {
        match self
            .await_result_with_cancel(handle, poll, &CancellationToken::new())
            .await
        {
            Some(outcome) => outcome,
            // Unreachable: a freshly created token never fires.
            None => JobOutcome::Timeout { attempts_made: 0 },
        }
    }

    /// Poll a run until it terminates, the budget runs out, or `cancel`
    /// fires.
    ///
    /// Each attempt sleeps `poll_interval`, then issues one status call:
    ///
    /// - terminated successfully: one output fetch; the decoded JSON
    ///   becomes [`JobOutcome::Success`]. An unreadable output is a
    ///   [`JobOutcome::Failure`], never a retry.
    /// - terminated any other way: [`JobOutcome::Failure`] immediately,
    ///   with the remote state message.
    /// - still pending/running: next attempt, until the budget is spent
    ///   and the outcome is [`JobOutcome::Timeout`].
    /// - a failed status call consumes the attempt and polling continues;
    ///   on the final attempt it becomes a [`JobOutcome::Failure`].
    ///
    /// Returns `None` if `cancel` fires first; the remote run itself is
    /// not stopped.
    pub async fn await_result_with_cancel(
        &self,
        handle: JobHandle,
        poll: &PollConfig,
        cancel: &CancellationToken,
    ) -> Option<JobOutcome> {
        let max_attempts = poll.max_attempts.max(1);
        let run_id = handle.run_id;

        for attempt in 1..=max_attempts {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(%run_id, attempt, "Polling cancelled");
                    return None;
                }
                _ = tokio::time::sleep(poll.poll_interval) => {}
            }

            let state = tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(%run_id, attempt, "Polling cancelled");
                    return None;
                }
                state = self.api.get_run_state(run_id) => state,
            };

            match state {
                Ok(state) => match LifecycleState::from_wire(&state) {
                    LifecycleState::Terminated(ResultState::Success) => {
                        tracing::info!(%run_id, attempt, "Run succeeded, fetching output");
                        return Some(self.fetch_output(run_id).await);
                    }
                    LifecycleState::Terminated(result) => {
                        let reason = state
                            .state_message
                            .unwrap_or_else(|| format!("run terminated: {result:?}"));
                        tracing::warn!(%run_id, attempt, %reason, "Run failed");
                        return Some(JobOutcome::Failure { reason });
                    }
                    LifecycleState::Pending | LifecycleState::Running => {
                        tracing::debug!(%run_id, attempt, max_attempts, "Run still in flight");
                    }
                },
                Err(e) => {
                    // Documented policy: a transport error consumes the
                    // attempt; only the final attempt turns it into a
                    // Failure.
                    tracing::warn!(%run_id, attempt, error = %e, "Status poll failed");
                    if attempt == max_attempts {
                        return Some(JobOutcome::Failure {
                            reason: format!("status poll failed on final attempt: {e}"),
                        });
                    }
                }
            }
        }

        tracing::warn!(%run_id, max_attempts, "Polling budget exhausted");
        Some(JobOutcome::Timeout {
            attempts_made: max_attempts,
        })
    }

    /// Fetch and decode the output of a successfully terminated run.
    ///
    /// Any error here is final: the run is already over, so the result
    /// is a [`JobOutcome::Failure`] rather than another poll.
    async fn fetch_output(&self, run_id: RunId) -> JobOutcome {
        let raw = match self.api.get_run_output(run_id).await {
            Ok(raw) => raw,
            Err(e) => {
                return JobOutcome::Failure {
                    reason: format!("failed to fetch run output: {e}"),
                }
            }
        };

        match serde_json::from_str(&raw) {
            Ok(payload) => JobOutcome::Success { payload },
            Err(e) => JobOutcome::Failure {
                reason: format!("run output is not valid JSON: {e}"),
            },
        }
    }
}
