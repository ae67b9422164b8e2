//! Job platform configuration loaded from environment variables.

/// Connection settings for the job platform workspace.
///
/// | Env Var          | Required | Description                              |
/// |------------------|----------|------------------------------------------|
/// | `JOBS_API_HOST`  | yes      | Base URL, e.g. `https://acme.example`    |
/// | `JOBS_API_TOKEN` | yes      | Bearer token for every platform request  |
#[derive(Debug, Clone)]
pub struct JobsConfig {
    /// Base URL of the platform workspace.
    pub host: String,
    /// Bearer token; read-only after construction.
    pub token: String,
}

/// A required configuration variable is missing or empty.
#[derive(Debug, thiserror::Error)]
#[error("{0} environment variable is required")]
pub struct MissingConfig(pub &'static str);

impl JobsConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, MissingConfig> {
        Ok(Self {
            host: require_env("JOBS_API_HOST")?,
            token: require_env("JOBS_API_TOKEN")?,
        })
    }
}

/// Read a required, non-empty environment variable.
pub fn require_env(name: &'static str) -> Result<String, MissingConfig> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(MissingConfig(name)),
    }
}
