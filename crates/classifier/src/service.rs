//! The classification service: job parameters in, report out.
//!
//! One classification pass is one remote run. The service owns no
//! state across calls; the caller accumulates results in a
//! [`ClassificationLog`](triage_core::history::ClassificationLog) if it
//! wants history.

use triage_core::classification::{ClassificationReport, EmailRecord};
use triage_jobs::client::{JobOutcome, JobSubmission, JobsClient, PollConfig, SubmissionError};

use crate::config::ClassifierConfig;

/// Why a classification pass produced no report.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// The run could not be started.
    #[error(transparent)]
    Submission(#[from] SubmissionError),

    /// The run terminated without a usable result.
    #[error("classification run failed: {reason}")]
    RunFailed {
        /// Remote state message or output error text.
        reason: String,
    },

    /// The polling budget ran out with the run still in flight.
    #[error("classification run still in flight after {attempts_made} polls")]
    RunTimedOut {
        /// Number of status polls made before giving up.
        attempts_made: u32,
    },

    /// The run output decoded as JSON but not as a report.
    #[error("malformed classification payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// The job ran but reported `success: false`.
    #[error("classifier rejected the request: {0}")]
    Rejected(String),
}

/// Drives the remote email-classification job.
pub struct Classifier {
    jobs: JobsClient,
    config: ClassifierConfig,
}

impl Classifier {
    /// Create a classifier over an existing job client.
    pub fn new(jobs: JobsClient, config: ClassifierConfig) -> Self {
        Self { jobs, config }
    }

    /// Classify up to `max_emails` unread emails from the caller's
    /// inbox.
    ///
    /// The Gmail token travels to the job as a parameter; the job side
    /// does all fetching and parsing.
    pub async fn classify_inbox(
        &self,
        gmail_token: &str,
        max_emails: u32,
        poll: &PollConfig,
    ) -> Result<ClassificationReport, ClassifyError> {
        let job = self.base_submission(gmail_token, max_emails);
        self.run(job, poll).await
    }

    /// Classify a single caller-supplied email (manual classification).
    ///
    /// The email is JSON-encoded into the `email_data` parameter; the
    /// job skips inbox fetching and classifies just this record.
    pub async fn classify_one(
        &self,
        gmail_token: &str,
        email: &EmailRecord,
        poll: &PollConfig,
    ) -> Result<ClassificationReport, ClassifyError> {
        let job = self
            .base_submission(gmail_token, 1)
            .with_param("email_data", serde_json::to_string(email)?);
        self.run(job, poll).await
    }

    /// Parameters common to every classification run. Notebook
    /// parameters are strings on the wire, so counts are stringified.
    fn base_submission(&self, gmail_token: &str, max_emails: u32) -> JobSubmission {
        JobSubmission::new(self.config.job_id.clone())
            .with_param("gmail_token", gmail_token)
            .with_param("llm_api_key", self.config.llm_api_key.clone())
            .with_param("max_emails", max_emails.to_string())
    }

    /// Submit one run, await its outcome, and decode the report.
    async fn run(
        &self,
        job: JobSubmission,
        poll: &PollConfig,
    ) -> Result<ClassificationReport, ClassifyError> {
        let handle = self.jobs.submit(&job).await?;
        let outcome = self.jobs.await_result(handle, poll).await;

        let payload = match outcome {
            JobOutcome::Success { payload } => payload,
            JobOutcome::Failure { reason } => return Err(ClassifyError::RunFailed { reason }),
            JobOutcome::Timeout { attempts_made } => {
                return Err(ClassifyError::RunTimedOut { attempts_made })
            }
        };

        let report: ClassificationReport = serde_json::from_value(payload)?;
        if !report.success {
            let reason = report
                .error
                .unwrap_or_else(|| "no error message in report".to_string());
            return Err(ClassifyError::Rejected(reason));
        }

        tracing::info!(emails = report.len(), "Classification run complete");
        Ok(report)
    }
}
