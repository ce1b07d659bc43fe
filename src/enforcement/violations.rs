//! Rejected calls and the operations they were rejected from.

use crate::core::StateId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Public operation that can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    SetInitial,
    SetState,
    SetTerminate,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SetInitial => "set_initial",
            Self::SetState => "set_state",
            Self::SetTerminate => "set_terminate",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A call into the engine that broke the reentrancy contract or named a
/// state the machine cannot reach.
///
/// Violations are never returned to the action that caused them. The engine
/// logs them, records the most recent one on the machine, and carries on as
/// if the call had not been made.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum Violation {
    #[error("set_state called from a run action")]
    TransitionFromRun,

    #[error("set_state called from an exit action")]
    TransitionFromExit,

    #[error("set_terminate called from a run action")]
    TerminateFromRun,

    #[error("{op} called with state {state}, which is not part of the graph")]
    UnknownState { op: Operation, state: StateId },

    #[error("set_state target {to} is not in the same tree as {from}")]
    DisjointTarget { from: StateId, to: StateId },

    #[error("{op} called before set_initial")]
    NotInitialized { op: Operation },
}

impl Violation {
    /// Operation the rejected call was made to.
    pub fn operation(&self) -> Operation {
        match self {
            Self::TransitionFromRun | Self::TransitionFromExit | Self::DisjointTarget { .. } => {
                Operation::SetState
            }
            Self::TerminateFromRun => Operation::SetTerminate,
            Self::UnknownState { op, .. } | Self::NotInitialized { op } => *op,
        }
    }
}
