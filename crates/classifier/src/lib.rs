//! Email classification service.
//!
//! Drives the remote classification job through the async job client:
//! builds the job parameters from the caller's Gmail token, awaits the
//! run, and decodes the resulting classification report. Also provides
//! connectivity probes for the job platform and the Gmail API.

pub mod config;
pub mod probe;
pub mod service;
