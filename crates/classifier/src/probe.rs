//! Connectivity probes for the sidebar-style "test connection" checks.
//!
//! Both probes answer a yes/no question and never fail hard: any
//! transport error is logged and reported as unreachable.

use std::time::Duration;

use triage_jobs::config::JobsConfig;

/// Public Gmail API base URL.
const GMAIL_API_BASE: &str = "https://gmail.googleapis.com";

/// Probe requests use a short timeout; these are interactive checks.
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Check that the job platform accepts our token.
///
/// Issues an authenticated `GET /api/2.0/clusters/list`; any 2xx means
/// the workspace is reachable and the token is valid.
pub async fn platform_reachable(config: &JobsConfig) -> bool {
    let url = format!(
        "{}/api/2.0/clusters/list",
        config.host.trim_end_matches('/')
    );
    authorized_get_succeeds(&url, &config.token).await
}

/// Check that a Gmail access token is currently valid.
///
/// Issues `GET /gmail/v1/users/me/labels` with the bearer token. Only
/// reachability is checked here; message fetching happens job-side.
pub async fn gmail_token_valid(gmail_token: &str) -> bool {
    gmail_token_valid_at(GMAIL_API_BASE, gmail_token).await
}

/// Same as [`gmail_token_valid`] against an explicit base URL.
pub async fn gmail_token_valid_at(base: &str, gmail_token: &str) -> bool {
    let url = format!("{}/gmail/v1/users/me/labels", base.trim_end_matches('/'));
    authorized_get_succeeds(&url, gmail_token).await
}

/// Issue one authenticated GET and report whether it returned 2xx.
async fn authorized_get_succeeds(url: &str, token: &str) -> bool {
    let client = reqwest::Client::builder()
        .timeout(PROBE_TIMEOUT)
        .build()
        .expect("Failed to build reqwest HTTP client");

    match client.get(url).bearer_auth(token).send().await {
        Ok(response) => {
            let ok = response.status().is_success();
            if !ok {
                tracing::warn!(url, status = response.status().as_u16(), "Probe rejected");
            }
            ok
        }
        Err(e) => {
            tracing::warn!(url, error = %e, "Probe request failed");
            false
        }
    }
}
