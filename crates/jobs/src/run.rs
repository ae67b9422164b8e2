//! Typed run identifiers and lifecycle states.
//!
//! The platform reports run state as a pair of strings
//! (`life_cycle_state`, `result_state`); [`LifecycleState::from_wire`]
//! folds that pair into the three-phase model the polling loop works
//! with. States are observed only -- the client never transitions a run
//! itself.

use serde::{Deserialize, Serialize};

use crate::api::RunState;

/// Server-assigned identifier of one run of a job definition.
///
/// Numeric on the wire, otherwise opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(i64);

impl RunId {
    /// Wire representation of this run id.
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl From<i64> for RunId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Terminal result of a run that will not transition further.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultState {
    /// The run completed and produced output.
    Success,
    /// The run executed but ended in failure (includes timed-out and
    /// cancelled runs -- anything terminal that is not a success).
    Failed,
    /// The platform itself failed while handling the run.
    InternalError,
    /// The platform decided not to execute the run.
    Skipped,
}

/// Coarse lifecycle phase of a run, as observed from the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Queued, not yet started.
    Pending,
    /// Executing (or tearing down).
    Running,
    /// Finished; will never transition again.
    Terminated(ResultState),
}

impl LifecycleState {
    /// Fold the platform's wire state into a typed lifecycle state.
    ///
    /// Unrecognized lifecycle strings map to [`Running`](Self::Running)
    /// so an unknown intermediate state cannot abort a live run; the
    /// poll budget still bounds the total wait.
    pub fn from_wire(state: &RunState) -> Self {
        match state.life_cycle_state.as_str() {
            "PENDING" => Self::Pending,
            "RUNNING" | "TERMINATING" => Self::Running,
            "TERMINATED" => match state.result_state.as_deref() {
                Some("SUCCESS") => Self::Terminated(ResultState::Success),
                _ => Self::Terminated(ResultState::Failed),
            },
            "INTERNAL_ERROR" => Self::Terminated(ResultState::InternalError),
            "SKIPPED" => Self::Terminated(ResultState::Skipped),
            _ => Self::Running,
        }
    }

    /// `true` once the run has reached a state it cannot leave.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(life_cycle: &str, result: Option<&str>) -> RunState {
        serde_json::from_value(serde_json::json!({
            "life_cycle_state": life_cycle,
            "result_state": result,
        }))
        .unwrap()
    }

    #[test]
    fn pending_maps_to_pending() {
        assert_eq!(
            LifecycleState::from_wire(&wire("PENDING", None)),
            LifecycleState::Pending
        );
    }

    #[test]
    fn running_and_terminating_map_to_running() {
        assert_eq!(
            LifecycleState::from_wire(&wire("RUNNING", None)),
            LifecycleState::Running
        );
        assert_eq!(
            LifecycleState::from_wire(&wire("TERMINATING", None)),
            LifecycleState::Running
        );
    }

    #[test]
    fn terminated_success() {
        let state = LifecycleState::from_wire(&wire("TERMINATED", Some("SUCCESS")));
        assert_eq!(state, LifecycleState::Terminated(ResultState::Success));
        assert!(state.is_terminal());
    }

    #[test]
    fn terminated_non_success_is_failed() {
        for result in ["FAILED", "TIMEDOUT", "CANCELED"] {
            assert_eq!(
                LifecycleState::from_wire(&wire("TERMINATED", Some(result))),
                LifecycleState::Terminated(ResultState::Failed)
            );
        }
        // A TERMINATED run with no result_state at all is still terminal.
        assert_eq!(
            LifecycleState::from_wire(&wire("TERMINATED", None)),
            LifecycleState::Terminated(ResultState::Failed)
        );
    }

    #[test]
    fn top_level_error_states_are_terminal() {
        assert_eq!(
            LifecycleState::from_wire(&wire("INTERNAL_ERROR", None)),
            LifecycleState::Terminated(ResultState::InternalError)
        );
        assert_eq!(
            LifecycleState::from_wire(&wire("SKIPPED", None)),
            LifecycleState::Terminated(ResultState::Skipped)
        );
    }

    #[test]
    fn unknown_state_is_treated_as_in_flight() {
        let state = LifecycleState::from_wire(&wire("QUEUED_WEIRDLY", None));
        assert_eq!(state, LifecycleState::Running);
        assert!(!state.is_terminal());
    }

    #[test]
    fn run_id_is_transparent_over_the_wire() {
        let id: RunId = serde_json::from_value(serde_json::json!(42)).unwrap();
        assert_eq!(id, RunId::from(42));
        assert_eq!(id.to_string(), "42");
    }
}
