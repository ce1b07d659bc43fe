//! Per-machine configuration.

use serde::{Deserialize, Serialize};

/// Whether `set_state` and `set_terminate` may be called from run actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunPhasePolicy {
    /// Reject both calls while a run action executes.
    #[default]
    Reject,

    /// Accept both calls from run actions. A transition made this way stops
    /// the event from bubbling to ancestors, as does termination.
    Permit,
}

/// Settings a [`Machine`](crate::engine::Machine) is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub run_phase: RunPhasePolicy,

    /// Keep the most recent violation on the machine for inspection.
    pub record_violations: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            run_phase: RunPhasePolicy::Reject,
            record_violations: true,
        }
    }
}
