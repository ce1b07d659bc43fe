//! Ordered execution of entry and exit actions.

use crate::core::{Hook, StateId};
use crate::engine::Machine;
use tracing::trace;

/// How an entry or exit walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    /// Every state on the path was visited.
    Completed,
    /// An action terminated the machine; the walk stopped right after it.
    Terminated,
    /// An action started a new transition or re-initialised the machine,
    /// which already brought the machine into a consistent configuration.
    Superseded,
}

impl Flow {
    pub(crate) fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl<'g, U> Machine<'g, U> {
    /// Run the `hook` action of `state`, if it has one, in the matching
    /// phase. The previous phase is restored afterwards.
    pub(crate) fn invoke(&mut self, state: StateId, hook: Hook) {
        let graph = self.graph;
        let Some(action) = graph.state(state).action(hook) else {
            return;
        };

        trace!(state = graph.name_of(state), %hook, "invoking action");
        let outer = std::mem::replace(&mut self.ctx.phase, hook.phase());
        action(&mut *self);
        self.ctx.phase = outer;
    }

    /// Outcome of the action that just ran, given the epoch observed before
    /// the walk started.
    pub(crate) fn flow_after_action(&self, epoch: u64) -> Flow {
        if self.ctx.terminate.is_some() {
            Flow::Terminated
        } else if self.ctx.epoch != epoch {
            Flow::Superseded
        } else {
            Flow::Completed
        }
    }

    /// Enter every state strictly below `boundary` down to `target`
    /// inclusive, root to leaf.
    ///
    /// `executing` is moved to each state before its entry action runs, so a
    /// transition requested from inside the action is anchored there.
    pub(crate) fn enter_all(&mut self, target: StateId, boundary: StateId) -> Flow {
        let graph = self.graph;
        let epoch = self.ctx.epoch;
        let mut cursor = boundary;

        while cursor != target {
            let Some(next) = graph.direct_child_on_path(target, Some(cursor)) else {
                break;
            };
            self.ctx.executing = Some(next);
            self.invoke(next, Hook::Entry);

            let flow = self.flow_after_action(epoch);
            if !flow.is_completed() {
                return flow;
            }
            cursor = next;
        }
        Flow::Completed
    }

    /// Exit every state from the current leaf up to `boundary` exclusive,
    /// leaf to root. `executing` follows the state being exited.
    pub(crate) fn exit_all(&mut self, boundary: StateId) -> Flow {
        let graph = self.graph;
        let epoch = self.ctx.epoch;
        let Some(current) = self.ctx.current else {
            return Flow::Completed;
        };

        for state in graph.ancestors(current) {
            if state == boundary {
                break;
            }
            self.ctx.executing = Some(state);
            self.invoke(state, Hook::Exit);

            let flow = self.flow_after_action(epoch);
            if !flow.is_completed() {
                return flow;
            }
        }
        Flow::Completed
    }
}
