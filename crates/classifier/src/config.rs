//! Classifier configuration loaded from environment variables.

use triage_jobs::config::{require_env, MissingConfig};

/// Settings for the remote classification job.
///
/// | Env Var             | Required | Description                             |
/// |---------------------|----------|-----------------------------------------|
/// | `CLASSIFIER_JOB_ID` | yes      | Job definition id on the platform       |
/// | `LLM_API_KEY`       | yes      | API key the notebook uses for the LLM   |
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Identifier of the classification job definition.
    pub job_id: String,
    /// LLM API key, forwarded to the job as a parameter.
    pub llm_api_key: String,
}

impl ClassifierConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, MissingConfig> {
        Ok(Self {
            job_id: require_env("CLASSIFIER_JOB_ID")?,
            llm_api_key: require_env("LLM_API_KEY")?,
        })
    }
}
