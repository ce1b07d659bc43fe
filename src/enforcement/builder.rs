//! Builder API for machine configuration.

use crate::enforcement::config::{MachineConfig, RunPhasePolicy};

/// Builder for creating a [`MachineConfig`].
pub struct ConfigBuilder {
    run_phase: RunPhasePolicy,
    record_violations: bool,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        let defaults = MachineConfig::default();
        Self {
            run_phase: defaults.run_phase,
            record_violations: defaults.record_violations,
        }
    }

    /// Set whether run actions may transition or terminate
    pub fn run_phase(mut self, policy: RunPhasePolicy) -> Self {
        self.run_phase = policy;
        self
    }

    /// Shorthand for `run_phase(RunPhasePolicy::Permit)`
    pub fn permit_run_phase_calls(self) -> Self {
        self.run_phase(RunPhasePolicy::Permit)
    }

    /// Set whether the last violation is kept on the machine
    pub fn record_violations(mut self, record: bool) -> Self {
        self.record_violations = record;
        self
    }

    pub fn build(self) -> MachineConfig {
        MachineConfig {
            run_phase: self.run_phase,
            record_violations: self.record_violations,
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
