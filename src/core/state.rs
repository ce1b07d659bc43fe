//! State descriptors and the handles used to reference them.
//!
//! A state is an immutable record: a diagnostic name, up to three optional
//! actions, and two optional links into the graph (`parent` and `initial`).
//! States are created through [`GraphBuilder`](crate::builder::GraphBuilder)
//! and owned by the resulting [`StateGraph`](super::StateGraph); machines only
//! ever borrow them.

use super::phase::Phase;
use crate::engine::Machine;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of a state inside a [`StateGraph`](super::StateGraph).
///
/// Handles are plain indices into the graph's arena. They are cheap to copy
/// and compare, and are only meaningful for the graph that issued them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct StateId(pub(crate) usize);

impl StateId {
    /// Position of the state in its graph's arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Action attached to a state.
///
/// Actions receive the machine that is dispatching them, so they can reach the
/// user data as well as call [`Machine::set_state`], [`Machine::set_terminate`]
/// and [`Machine::set_handled`].
pub type Action<U> = Box<dyn for<'g> Fn(&mut Machine<'g, U>) + Send + Sync>;

/// The three points at which a state can run code.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Hook {
    Entry,
    Run,
    Exit,
}

impl Hook {
    /// Dispatch phase the machine is in while this hook executes.
    pub fn phase(self) -> Phase {
        match self {
            Self::Entry => Phase::Entry,
            Self::Run => Phase::Run,
            Self::Exit => Phase::Exit,
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Entry => "entry",
            Self::Run => "run",
            Self::Exit => "exit",
        })
    }
}

/// Immutable description of one state in a graph.
pub struct StateDef<U> {
    pub(crate) name: &'static str,
    pub(crate) entry: Option<Action<U>>,
    pub(crate) run: Option<Action<U>>,
    pub(crate) exit: Option<Action<U>>,
    pub(crate) parent: Option<StateId>,
    pub(crate) initial: Option<StateId>,
}

impl<U> StateDef<U> {
    /// Name given to the state when it was declared.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Enclosing state, or `None` for a root.
    pub fn parent(&self) -> Option<StateId> {
        self.parent
    }

    /// Default child entered when this state is a transition target.
    pub fn initial(&self) -> Option<StateId> {
        self.initial
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Whether a transition targeting this state descends further.
    pub fn has_initial(&self) -> bool {
        self.initial.is_some()
    }

    /// The action registered for `hook`, if any.
    pub fn action(&self, hook: Hook) -> Option<&Action<U>> {
        match hook {
            Hook::Entry => self.entry.as_ref(),
            Hook::Run => self.run.as_ref(),
            Hook::Exit => self.exit.as_ref(),
        }
    }

    pub fn has_action(&self, hook: Hook) -> bool {
        self.action(hook).is_some()
    }
}

impl<U> fmt::Debug for StateDef<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateDef")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("initial", &self.initial)
            .field("entry", &self.entry.is_some())
            .field("run", &self.run.is_some())
            .field("exit", &self.exit.is_some())
            .finish()
    }
}
