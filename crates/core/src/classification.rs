//! Classification record and report types.
//!
//! These mirror the JSON payload emitted by the remote classification
//! job: a report envelope wrapping a list of per-email records, each
//! carrying a category, a priority, a confidence score, and a suggested
//! reply.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single email supplied by the caller for manual classification.
///
/// Sent to the remote job verbatim as the `email_data` parameter; the
/// platform never parses raw MIME here -- subject, sender, and body are
/// already-extracted plain text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRecord {
    /// Subject line.
    pub subject: String,
    /// Sender address, serialized as `from` on the wire.
    #[serde(rename = "from")]
    pub sender: String,
    /// Plain-text body.
    pub body: String,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Priority assigned to a classified email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// One classified email, as produced by the remote job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    /// Subject line of the classified email.
    pub subject: String,
    /// Sender address, `from` on the wire.
    #[serde(rename = "from")]
    pub sender: String,
    /// Assigned category (e.g. `"Complaint"`, `"Feedback"`).
    pub category: String,
    /// Assigned priority.
    pub priority: Priority,
    /// Model confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    /// Suggested canned reply text.
    pub reply: String,
}

/// Envelope returned by the classification job.
///
/// `success: false` means the job ran to completion but could not
/// produce classifications (e.g. the Gmail token was rejected inside
/// the notebook); `error` then carries the job-side message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// Whether the job-side pipeline succeeded.
    pub success: bool,
    /// Classified emails; empty when the inbox had nothing unread.
    #[serde(default)]
    pub emails_processed: Vec<Classification>,
    /// Job-side error message when `success` is `false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ClassificationReport {
    /// Number of classified emails in this report.
    pub fn len(&self) -> usize {
        self.emails_processed.len()
    }

    /// `true` when the report carries no classifications.
    pub fn is_empty(&self) -> bool {
        self.emails_processed.is_empty()
    }
}
