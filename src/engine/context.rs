//! Per-instance bookkeeping of a machine.

use crate::core::{Phase, StateId};
use crate::enforcement::Violation;

/// The mutable record of one machine instance.
///
/// Only the engine writes to it; callers and actions read it through the
/// accessors here or the shortcuts on [`Machine`](super::Machine).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    pub(crate) current: Option<StateId>,
    pub(crate) previous: Option<StateId>,
    pub(crate) executing: Option<StateId>,
    pub(crate) terminate: Option<i32>,
    pub(crate) phase: Phase,
    // Both flags are scoped to a single `run_state` pass.
    pub(crate) new_state: bool,
    pub(crate) handled: bool,
    pub(crate) last_violation: Option<Violation>,
    pub(crate) transitions: u64,
    // Bumped by every committed transition and every `set_initial`; an entry
    // walk that sees it change knows a nested call superseded it.
    pub(crate) epoch: u64,
}

impl Context {
    /// Active leaf state, `None` before `set_initial`.
    pub fn current(&self) -> Option<StateId> {
        self.current
    }

    /// Leaf that was active before the last completed transition.
    pub fn previous(&self) -> Option<StateId> {
        self.previous
    }

    /// State whose action ran most recently. Only meaningful while an action
    /// is executing.
    pub fn executing(&self) -> Option<StateId> {
        self.executing
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_terminated(&self) -> bool {
        self.terminate.is_some()
    }

    /// Value passed to the successful `set_terminate` call, if any.
    pub fn terminate_val(&self) -> Option<i32> {
        self.terminate
    }

    pub fn last_violation(&self) -> Option<Violation> {
        self.last_violation
    }

    /// Transitions committed since the last `set_initial`.
    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    /// Reset everything for a fresh start at `leaf`.
    pub(crate) fn restart(&mut self, leaf: StateId) {
        *self = Self {
            current: Some(leaf),
            previous: None,
            executing: Some(leaf),
            terminate: None,
            phase: self.phase,
            new_state: false,
            handled: false,
            last_violation: None,
            transitions: 0,
            epoch: self.epoch.wrapping_add(1),
        };
    }

    /// Consume the run-scoped flags. Returns whether the event must stop
    /// bubbling: the machine terminated, transitioned, or an action marked
    /// the event handled.
    pub(crate) fn take_consumed(&mut self) -> bool {
        if self.terminate.is_some() {
            return true;
        }
        if self.new_state || self.handled {
            self.new_state = false;
            self.handled = false;
            return true;
        }
        false
    }
}
