//! REST API wrapper for the job platform's HTTP endpoints.
//!
//! Wraps the three run endpoints (`run-now`, `runs/get`,
//! `runs/get-output`) using [`reqwest`]. Every request carries the
//! bearer token; every response is either decoded into a typed value
//! or surfaced as a [`JobsApiError`] with the remote status and body.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::run::RunId;

/// Per-request timeout for every platform call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for one job platform workspace.
pub struct JobsApi {
    client: reqwest::Client,
    host: String,
    token: String,
}

/// Raw run state as reported by `runs/get`.
///
/// `life_cycle_state` is always present; `result_state` only once the
/// run has terminated. Convert to a typed state with
/// [`LifecycleState::from_wire`](crate::run::LifecycleState::from_wire).
#[derive(Debug, Clone, Deserialize)]
pub struct RunState {
    /// Coarse lifecycle phase, e.g. `PENDING`, `RUNNING`, `TERMINATED`.
    pub life_cycle_state: String,
    /// Terminal result, e.g. `SUCCESS` or `FAILED`; absent while running.
    #[serde(default)]
    pub result_state: Option<String>,
    /// Human-readable message attached to the current state.
    #[serde(default)]
    pub state_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RunNowResponse {
    run_id: RunId,
}

#[derive(Debug, Deserialize)]
struct RunStatusResponse {
    state: RunState,
}

#[derive(Debug, Deserialize)]
struct RunOutputResponse {
    #[serde(default)]
    notebook_output: Option<NotebookOutput>,
}

#[derive(Debug, Deserialize)]
struct NotebookOutput {
    #[serde(default)]
    result: Option<String>,
}

/// Errors from the job platform REST layer.
#[derive(Debug, thiserror::Error)]
pub enum JobsApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The platform returned a non-2xx status code.
    #[error("job platform error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response body did not have the expected shape.
    #[error("malformed platform response: {0}")]
    MalformedResponse(String),
}

impl JobsApi {
    /// Create a new API client for a platform workspace.
    ///
    /// * `host`  - Base HTTPS URL, e.g. `https://acme.cloud.example`.
    ///   A trailing slash is stripped so endpoint paths join cleanly.
    /// * `token` - Bearer token for the `Authorization` header.
    pub fn new(host: String, token: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            host: host.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Base URL this client talks to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Trigger one run of a job definition.
    ///
    /// Sends `POST /api/2.1/jobs/run-now` with the job id and its
    /// notebook parameters. Returns the server-assigned run id.
    pub async fn run_now(
        &self,
        job_id: &str,
        notebook_params: &HashMap<String, serde_json::Value>,
    ) -> Result<RunId, JobsApiError> {
        let body = serde_json::json!({
            "job_id": job_id,
            "notebook_params": notebook_params,
        });

        let response = self
            .client
            .post(format!("{}/api/2.1/jobs/run-now", self.host))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        let parsed: RunNowResponse = Self::parse_response(response).await?;
        Ok(parsed.run_id)
    }

    /// Fetch the current state of a run.
    ///
    /// Sends `GET /api/2.1/jobs/runs/get?run_id={id}`.
    pub async fn get_run_state(&self, run_id: RunId) -> Result<RunState, JobsApiError> {
        let response = self
            .client
            .get(format!("{}/api/2.1/jobs/runs/get", self.host))
            .query(&[("run_id", run_id.as_i64())])
            .bearer_auth(&self.token)
            .send()
            .await?;

        let parsed: RunStatusResponse = Self::parse_response(response).await?;
        Ok(parsed.state)
    }

    /// Fetch the output of a terminated run.
    ///
    /// Sends `GET /api/2.1/jobs/runs/get-output?run_id={id}` and
    /// extracts the JSON-encoded result string the notebook exited
    /// with. A run with no notebook output is a
    /// [`JobsApiError::MalformedResponse`].
    pub async fn get_run_output(&self, run_id: RunId) -> Result<String, JobsApiError> {
        let response = self
            .client
            .get(format!("{}/api/2.1/jobs/runs/get-output", self.host))
            .query(&[("run_id", run_id.as_i64())])
            .bearer_auth(&self.token)
            .send()
            .await?;

        let parsed: RunOutputResponse = Self::parse_response(response).await?;
        parsed
            .notebook_output
            .and_then(|o| o.result)
            .ok_or_else(|| {
                JobsApiError::MalformedResponse("run output carries no notebook result".into())
            })
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`JobsApiError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, JobsApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(JobsApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Decode a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, JobsApiError> {
        let response = Self::ensure_success(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| JobsApiError::MalformedResponse(format!("{e}: {body}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_strips_trailing_slash() {
        let api = JobsApi::new("https://acme.example/".into(), "t".into());
        assert_eq!(api.host(), "https://acme.example");
    }

    #[test]
    fn run_state_decodes_without_result_state() {
        let state: RunState = serde_json::from_value(serde_json::json!({
            "life_cycle_state": "RUNNING",
        }))
        .unwrap();
        assert_eq!(state.life_cycle_state, "RUNNING");
        assert!(state.result_state.is_none());
        assert!(state.state_message.is_none());
    }

    #[test]
    fn api_error_display_includes_status_and_body() {
        let err = JobsApiError::Api {
            status: 403,
            body: "invalid token".into(),
        };
        assert_eq!(err.to_string(), "job platform error (403): invalid token");
    }
}
