//! `triage-runner` -- one-shot classification pass.
//!
//! Loads configuration from the environment, checks connectivity to
//! the job platform and the Gmail API, runs one classification job to
//! completion, and prints the report as pretty JSON on stdout. Exits
//! non-zero when no report was produced.
//!
//! # Environment variables
//!
//! | Variable             | Required | Default | Description                          |
//! |----------------------|----------|---------|--------------------------------------|
//! | `JOBS_API_HOST`      | yes      | --      | Job platform base URL                |
//! | `JOBS_API_TOKEN`     | yes      | --      | Bearer token for the platform        |
//! | `CLASSIFIER_JOB_ID`  | yes      | --      | Classification job definition id     |
//! | `LLM_API_KEY`        | yes      | --      | LLM key forwarded to the job         |
//! | `GMAIL_TOKEN`        | yes      | --      | Gmail access token to classify with  |
//! | `MAX_EMAILS`         | no       | `5`     | Unread emails to classify            |
//! | `POLL_MAX_ATTEMPTS`  | no       | `30`    | Status polls before giving up        |
//! | `POLL_INTERVAL_SECS` | no       | `10`    | Seconds between status polls         |

use std::time::Duration;

use triage_classifier::config::ClassifierConfig;
use triage_classifier::probe;
use triage_classifier::service::Classifier;
use triage_jobs::client::{JobsClient, PollConfig};
use triage_jobs::config::JobsConfig;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default number of unread emails to classify per pass.
const DEFAULT_MAX_EMAILS: u32 = 5;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "triage_runner=info,triage_jobs=info,triage_classifier=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let jobs_config = JobsConfig::from_env().unwrap_or_else(|e| {
        tracing::error!("{e}");
        std::process::exit(1);
    });
    let classifier_config = ClassifierConfig::from_env().unwrap_or_else(|e| {
        tracing::error!("{e}");
        std::process::exit(1);
    });
    let gmail_token = std::env::var("GMAIL_TOKEN").unwrap_or_else(|_| {
        tracing::error!("GMAIL_TOKEN environment variable is required");
        std::process::exit(1);
    });

    let max_emails: u32 = std::env::var("MAX_EMAILS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_EMAILS);

    let default_poll = PollConfig::default();
    let poll = PollConfig {
        max_attempts: std::env::var("POLL_MAX_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default_poll.max_attempts),
        poll_interval: std::env::var("POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(default_poll.poll_interval),
    };

    tracing::info!(
        host = %jobs_config.host,
        job_id = %classifier_config.job_id,
        max_emails,
        max_attempts = poll.max_attempts,
        "Starting triage-runner",
    );

    if !probe::platform_reachable(&jobs_config).await {
        tracing::error!(host = %jobs_config.host, "Job platform is unreachable");
        std::process::exit(1);
    }
    if !probe::gmail_token_valid(&gmail_token).await {
        tracing::error!("Gmail token was rejected by the Gmail API");
        std::process::exit(1);
    }

    let classifier = Classifier::new(JobsClient::new(jobs_config), classifier_config);

    match classifier
        .classify_inbox(&gmail_token, max_emails, &poll)
        .await
    {
        Ok(report) => {
            tracing::info!(emails = report.len(), "Classification pass complete");
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to render report");
                    std::process::exit(1);
                }
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Classification pass failed");
            std::process::exit(1);
        }
    }
}
