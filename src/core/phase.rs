//! Dispatch phase of a machine.
//!
//! The phase records which kind of action, if any, the engine is currently
//! executing. The legality rules for re-entering the engine from inside an
//! action are expressed against it (see [`crate::enforcement::rules`]).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where in the dispatch cycle a machine currently is.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum Phase {
    /// No action is executing; the caller drives the machine directly.
    #[default]
    Idle,
    /// An entry action is executing.
    Entry,
    /// A run action is executing, either the leaf's or an ancestor's.
    Run,
    /// An exit action is executing.
    Exit,
}

impl Phase {
    /// Whether an action of any kind is on the stack.
    pub fn in_action(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Entry => "entry",
            Self::Run => "run",
            Self::Exit => "exit",
        })
    }
}
