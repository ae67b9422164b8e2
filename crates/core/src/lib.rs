//! Shared domain types for the triage platform.
//!
//! Classification records and report payloads produced by the remote
//! classification job, plus the caller-owned history accumulator.
//! Pure serde types, no I/O.

pub mod classification;
pub mod history;
