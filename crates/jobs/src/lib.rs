//! Async job client for the remote job-execution platform.
//!
//! Provides the raw HTTP API wrapper (run submission, status, output),
//! typed run lifecycle states, the submit-then-poll client, and
//! environment-based configuration.

pub mod api;
pub mod client;
pub mod config;
pub mod run;
