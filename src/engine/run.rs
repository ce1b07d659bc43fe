//! Run dispatch: the leaf's run action, then bubbling to its ancestors.

use crate::core::Hook;
use crate::engine::Machine;

impl<'g, U> Machine<'g, U> {
    /// Give the machine control once.
    ///
    /// Runs the current leaf's run action. Unless that action marked the
    /// event handled, transitioned, or terminated the machine, the event
    /// bubbles to each ancestor's run action in turn, leaf to root, under the
    /// same stop rules.
    ///
    /// Returns `0`, or the termination value once the machine has been
    /// terminated. A terminated machine runs nothing at all. Before
    /// [`set_initial`](Self::set_initial) this returns `0` without running
    /// anything.
    pub fn run_state(&mut self) -> i32 {
        if let Some(val) = self.ctx.terminate {
            return val;
        }
        let Some(leaf) = self.ctx.current else {
            return 0;
        };
        let graph = self.graph;

        self.ctx.new_state = false;
        self.ctx.handled = false;
        self.ctx.executing = Some(leaf);
        self.invoke(leaf, Hook::Run);

        if !self.ctx.take_consumed() {
            for ancestor in graph.ancestors(leaf).skip(1) {
                if !graph.state(ancestor).has_action(Hook::Run) {
                    continue;
                }
                self.ctx.executing = Some(ancestor);
                self.invoke(ancestor, Hook::Run);
                if self.ctx.take_consumed() {
                    break;
                }
            }
        }

        self.ctx.terminate.unwrap_or(0)
    }
}
