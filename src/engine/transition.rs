//! Transitions: initial entry, state changes, termination and handling.

use crate::core::{Hook, StateId};
use crate::engine::executor::Flow;
use crate::engine::Machine;
use crate::enforcement::rules::{check_termination, check_transition};
use crate::enforcement::{Operation, Violation};
use tracing::{debug, trace};

impl<'g, U> Machine<'g, U> {
    /// Start (or restart) the machine in `state`.
    ///
    /// `state` is resolved through its `initial` chain to a leaf. All
    /// bookkeeping is reset, including termination, and then every state from
    /// the root of the leaf's tree down to the leaf is entered, the root
    /// included.
    pub fn set_initial(&mut self, state: StateId) {
        let graph = self.graph;
        if !graph.contains(state) {
            self.reject(Violation::UnknownState {
                op: Operation::SetInitial,
                state,
            });
            return;
        }

        let leaf = graph.resolve_leaf(state);
        let root = graph.root_of(leaf);
        self.ctx.restart(leaf);
        debug!(state = graph.name_of(leaf), "initialising machine");

        let epoch = self.ctx.epoch;
        self.ctx.executing = Some(root);
        self.invoke(root, Hook::Entry);
        if !self.flow_after_action(epoch).is_completed() {
            return;
        }

        self.enter_all(leaf, root);
    }

    /// Transition to `target`.
    ///
    /// Legal from entry actions and from outside any action. Calls made from
    /// an exit action, or from a run action unless the machine is configured
    /// with [`RunPhasePolicy::Permit`](crate::enforcement::RunPhasePolicy),
    /// are rejected: nothing happens apart from a logged warning and the
    /// recorded [`Violation`].
    ///
    /// The transition is anchored at the executing state (the current leaf
    /// when called from outside an action). States below the boundary are
    /// exited leaf to root, `target` is resolved through its `initial` chain,
    /// and the states below the boundary on the way to the resolved leaf are
    /// entered root to leaf. Targeting the executing state itself exits and
    /// re-enters it.
    pub fn set_state(&mut self, target: StateId) {
        let graph = self.graph;
        if !graph.contains(target) {
            self.reject(Violation::UnknownState {
                op: Operation::SetState,
                state: target,
            });
            return;
        }
        if let Err(violation) = check_transition(self.ctx.phase, self.config.run_phase) {
            self.reject(violation);
            return;
        }
        let Some(current) = self.ctx.current else {
            self.reject(Violation::NotInitialized {
                op: Operation::SetState,
            });
            return;
        };

        if !self.ctx.phase.in_action() {
            self.ctx.executing = Some(current);
        }
        let executing = self.ctx.executing.unwrap_or(current);

        let topmost = if graph.has_ancestor(executing, target) {
            target
        } else if graph.has_ancestor(target, executing) {
            executing
        } else if let Some(lca) = graph.lca_of(executing, target) {
            lca
        } else {
            self.reject(Violation::DisjointTarget {
                from: executing,
                to: target,
            });
            return;
        };

        let epoch = self.ctx.epoch;
        self.ctx.new_state = true;

        if !self.exit_all(topmost).is_completed() {
            return;
        }
        self.ctx.executing = Some(executing);

        if executing == target {
            self.invoke(target, Hook::Exit);
            if !self.flow_after_action(epoch).is_completed() {
                return;
            }
            self.invoke(target, Hook::Entry);
            if !self.flow_after_action(epoch).is_completed() {
                return;
            }
        }

        let leaf = graph.resolve_leaf(target);
        self.ctx.previous = self.ctx.current;
        self.ctx.current = Some(leaf);
        self.ctx.transitions += 1;
        self.ctx.epoch = self.ctx.epoch.wrapping_add(1);
        trace!(
            from = graph.name_of(current),
            to = graph.name_of(leaf),
            boundary = graph.name_of(topmost),
            "transition"
        );

        if let Flow::Terminated = self.enter_all(leaf, topmost) {
            debug!(state = graph.name_of(leaf), "machine terminated during entry");
        }
    }

    /// Terminate the machine with `val`.
    ///
    /// Afterwards every [`run_state`](Self::run_state) returns `val` without
    /// running anything, until [`set_initial`](Self::set_initial) is called
    /// again. Rejected from run actions unless the machine permits run-phase
    /// calls; legal from entry and exit actions.
    pub fn set_terminate(&mut self, val: i32) {
        if let Err(violation) = check_termination(self.ctx.phase, self.config.run_phase) {
            self.reject(violation);
            return;
        }
        debug!(val, phase = %self.ctx.phase, "terminating machine");
        self.ctx.terminate = Some(val);
    }

    /// Mark the event being dispatched as handled, so it does not bubble to
    /// the ancestors' run actions. Only meaningful from a run action.
    pub fn set_handled(&mut self) {
        self.ctx.handled = true;
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::{GraphBuilder, StateBuilder};
    use crate::core::{StateGraph, StateId};
    use crate::engine::Machine;
    use crate::enforcement::{Operation, Violation};

    type Log = Vec<String>;

    struct Tree {
        graph: StateGraph<Log>,
        root: StateId,
        idle: StateId,
        active: StateId,
        running: StateId,
        paused: StateId,
    }

    fn traced(name: &'static str) -> StateBuilder<Log> {
        StateBuilder::<Log>::new(name)
            .on_entry(move |m| m.data_mut().push(format!("{name}.entry")))
            .on_exit(move |m| m.data_mut().push(format!("{name}.exit")))
    }

    // Root -> {Idle, Active -> {Running, Paused}}, Active.initial = Running
    fn tree() -> Tree {
        let mut builder = GraphBuilder::new();
        let root = builder.add(traced("Root"));
        let idle = builder.add(traced("Idle").parent(root));
        let active = builder.add(traced("Active").parent(root));
        let running = builder.add(traced("Running").parent(active));
        let paused = builder.add(traced("Paused").parent(active));
        builder.set_initial(active, running);
        Tree {
            graph: builder.build().unwrap(),
            root,
            idle,
            active,
            running,
            paused,
        }
    }

    fn started(tree: &Tree, state: StateId) -> Machine<'_, Log> {
        let mut machine = Machine::new(&tree.graph, Vec::new());
        machine.set_initial(state);
        machine.data_mut().clear();
        machine
    }

    #[test]
    fn set_initial_enters_root_down_to_resolved_leaf() {
        let tree = tree();
        let mut machine = Machine::new(&tree.graph, Vec::new());

        machine.set_initial(tree.active);

        assert_eq!(machine.current(), Some(tree.running));
        assert_eq!(machine.previous(), None);
        assert_eq!(
            machine.data(),
            &["Root.entry", "Active.entry", "Running.entry"]
        );
    }

    #[test]
    fn set_initial_on_root_enters_only_root() {
        let mut builder = GraphBuilder::new();
        let only = builder.add(traced("Only"));
        let graph = builder.build().unwrap();
        let mut machine = Machine::new(&graph, Vec::new());

        machine.set_initial(only);

        assert_eq!(machine.current(), Some(only));
        assert_eq!(machine.data(), &["Only.entry"]);
    }

    #[test]
    fn set_initial_rejects_foreign_state() {
        let tree = tree();
        let mut machine = Machine::new(&tree.graph, Vec::new());

        machine.set_initial(StateId(64));

        assert_eq!(machine.current(), None);
        assert_eq!(
            machine.last_violation(),
            Some(Violation::UnknownState {
                op: Operation::SetInitial,
                state: StateId(64),
            })
        );
    }

    #[test]
    fn external_transition_between_cousins_uses_common_root() {
        let tree = tree();
        let mut machine = started(&tree, tree.running);

        machine.set_state(tree.idle);

        assert_eq!(machine.current(), Some(tree.idle));
        assert_eq!(machine.previous(), Some(tree.running));
        assert_eq!(
            machine.data(),
            &["Running.exit", "Active.exit", "Idle.entry"]
        );
        assert_eq!(machine.transition_count(), 1);
    }

    #[test]
    fn transition_to_sibling_stays_inside_parent() {
        let tree = tree();
        let mut machine = started(&tree, tree.running);

        machine.set_state(tree.paused);

        assert_eq!(machine.data(), &["Running.exit", "Paused.entry"]);
    }

    #[test]
    fn transition_to_compound_state_enters_default_child() {
        let tree = tree();
        let mut machine = started(&tree, tree.idle);

        machine.set_state(tree.active);

        assert_eq!(machine.current(), Some(tree.running));
        assert_eq!(
            machine.data(),
            &["Idle.exit", "Active.entry", "Running.entry"]
        );
    }

    #[test]
    fn transition_to_ancestor_exits_below_it_without_reentering_it() {
        let tree = tree();
        let mut machine = started(&tree, tree.paused);

        machine.set_state(tree.active);

        // Active is the boundary: neither exited nor entered, and its
        // default child is entered again.
        assert_eq!(machine.current(), Some(tree.running));
        assert_eq!(machine.data(), &["Paused.exit", "Running.entry"]);
    }

    #[test]
    fn external_self_transition_exits_and_reenters_leaf_only() {
        let tree = tree();
        let mut machine = started(&tree, tree.paused);

        machine.set_state(tree.paused);

        assert_eq!(machine.current(), Some(tree.paused));
        assert_eq!(machine.previous(), Some(tree.paused));
        assert_eq!(machine.data(), &["Paused.exit", "Paused.entry"]);
    }

    #[test]
    fn transition_from_entry_is_anchored_at_entering_state() {
        let mut builder = GraphBuilder::<Log>::new();
        let root = builder.add(traced("Root"));
        let boot = builder.add(
            StateBuilder::<Log>::new("Boot")
                .parent(root)
                .on_entry(|m| {
                    m.data_mut().push("Boot.entry".into());
                    let ready = m.graph().find("Ready").unwrap();
                    m.set_state(ready);
                })
                .on_exit(|m| m.data_mut().push("Boot.exit".into())),
        );
        let ready = builder.add(traced("Ready").parent(root));
        let graph = builder.build().unwrap();
        let mut machine = Machine::new(&graph, Vec::new());

        machine.set_initial(boot);

        assert_eq!(machine.current(), Some(ready));
        assert_eq!(machine.previous(), Some(boot));
        assert_eq!(
            machine.data(),
            &["Root.entry", "Boot.entry", "Boot.exit", "Ready.entry"]
        );
        assert_eq!(machine.last_violation(), None);
    }

    #[test]
    fn shared_exit_action_sees_each_exiting_state() {
        fn who(m: &mut Machine<'_, Log>) {
            let name = m.executing().map_or("-", |id| m.graph().name_of(id));
            m.data_mut().push(format!("exit:{name}"));
        }
        let mut builder = GraphBuilder::<Log>::new();
        let root = builder.add(StateBuilder::new("Root"));
        let a = builder.add(StateBuilder::new("A").parent(root).on_exit(who));
        let leaf = builder.add(StateBuilder::new("Leaf").parent(a).on_exit(who));
        let other = builder.add(StateBuilder::new("Other").parent(root));
        let graph = builder.build().unwrap();
        let mut machine = Machine::new(&graph, Vec::new());
        machine.set_initial(leaf);

        machine.set_state(other);

        assert_eq!(machine.data(), &["exit:Leaf", "exit:A"]);
        assert_eq!(machine.current(), Some(other));
    }

    #[test]
    fn transition_from_entry_to_descendant_enters_below_entering_state() {
        let mut builder = GraphBuilder::<Log>::new();
        let root = builder.add(traced("Root"));
        let outer = builder.add(
            StateBuilder::<Log>::new("Outer")
                .parent(root)
                .on_entry(|m| {
                    m.data_mut().push("Outer.entry".into());
                    let deep = m.graph().find("Deep").unwrap();
                    m.set_state(deep);
                })
                .on_exit(|m| m.data_mut().push("Outer.exit".into())),
        );
        let mid = builder.add(traced("Mid").parent(outer));
        let deep = builder.add(traced("Deep").parent(mid));
        let graph = builder.build().unwrap();
        let mut machine = Machine::new(&graph, Vec::new());

        machine.set_initial(outer);

        assert_eq!(machine.current(), Some(deep));
        assert_eq!(machine.previous(), Some(outer));
        assert_eq!(
            machine.data(),
            &["Root.entry", "Outer.entry", "Mid.entry", "Deep.entry"]
        );
    }

    #[test]
    fn transition_from_entry_to_ancestor_reenters_its_default_child() {
        let mut builder = GraphBuilder::<Log>::new();
        let root = builder.add(traced("Root"));
        let outer = builder.add(traced("Outer").parent(root));
        let inner = builder.add(
            StateBuilder::<Log>::new("Inner")
                .parent(outer)
                .on_entry(|m| {
                    m.data_mut().push("Inner.entry".into());
                    let outer = m.graph().find("Outer").unwrap();
                    m.set_state(outer);
                })
                .on_exit(|m| m.data_mut().push("Inner.exit".into())),
        );
        let fallback = builder.add(traced("Fallback").parent(outer));
        builder.set_initial(outer, fallback);
        let graph = builder.build().unwrap();
        let mut machine = Machine::new(&graph, Vec::new());

        machine.set_initial(inner);

        // Outer is the boundary: it is neither exited nor entered again.
        assert_eq!(machine.current(), Some(fallback));
        assert_eq!(machine.previous(), Some(inner));
        assert_eq!(
            machine.data(),
            &[
                "Root.entry",
                "Outer.entry",
                "Inner.entry",
                "Inner.exit",
                "Fallback.entry"
            ]
        );
    }

    #[test]
    fn nested_transition_supersedes_outer_entry_walk() {
        let mut builder = GraphBuilder::<Log>::new();
        let root = builder.add(traced("Root"));
        let outer = builder.add(StateBuilder::<Log>::new("Outer").parent(root).on_entry(|m| {
            m.data_mut().push("Outer.entry".into());
            let side = m.graph().find("Side").unwrap();
            m.set_state(side);
        }));
        let inner = builder.add(traced("Inner").parent(outer));
        builder.set_initial(outer, inner);
        let side = builder.add(traced("Side").parent(root));
        let graph = builder.build().unwrap();
        let mut machine = Machine::new(&graph, Vec::new());

        machine.set_initial(outer);

        // Inner was the pending leaf but was never entered; the walk towards
        // it stops once Side is active. Inner's exit still runs because it
        // was already the current leaf when the nested transition started.
        assert_eq!(machine.current(), Some(side));
        assert!(!machine.data().contains(&"Inner.entry".to_string()));
        assert_eq!(machine.data().last().map(String::as_str), Some("Side.entry"));
    }

    #[test]
    fn transition_from_exit_is_rejected() {
        let mut builder = GraphBuilder::<Log>::new();
        let root = builder.add(traced("Root"));
        let a = builder.add(StateBuilder::<Log>::new("A").parent(root).on_exit(|m| {
            m.data_mut().push("A.exit".into());
            let c = m.graph().find("C").unwrap();
            m.set_state(c);
        }));
        let b = builder.add(traced("B").parent(root));
        builder.add(traced("C").parent(root));
        let graph = builder.build().unwrap();
        let mut machine = Machine::new(&graph, Vec::new());
        machine.set_initial(a);
        machine.data_mut().clear();

        machine.set_state(b);

        assert_eq!(machine.current(), Some(b));
        assert_eq!(machine.data(), &["A.exit", "B.entry"]);
        assert_eq!(machine.last_violation(), Some(Violation::TransitionFromExit));
    }

    #[test]
    fn termination_from_exit_stops_transition() {
        let mut builder = GraphBuilder::<Log>::new();
        let root = builder.add(traced("Root"));
        let a = builder.add(StateBuilder::<Log>::new("A").parent(root).on_exit(|m| {
            m.data_mut().push("A.exit".into());
            m.set_terminate(5);
        }));
        let b = builder.add(traced("B").parent(root));
        let graph = builder.build().unwrap();
        let mut machine = Machine::new(&graph, Vec::new());
        machine.set_initial(a);
        machine.data_mut().clear();

        machine.set_state(b);

        assert_eq!(machine.current(), Some(a));
        assert_eq!(machine.data(), &["A.exit"]);
        assert_eq!(machine.run_state(), 5);
    }

    #[test]
    fn termination_from_entry_stops_entry_walk() {
        let mut builder = GraphBuilder::<Log>::new();
        let root = builder.add(StateBuilder::<Log>::new("Root").on_entry(|m| {
            m.data_mut().push("Root.entry".into());
            m.set_terminate(-1);
        }));
        let leaf = builder.add(traced("Leaf").parent(root));
        let graph = builder.build().unwrap();
        let mut machine = Machine::new(&graph, Vec::new());

        machine.set_initial(leaf);

        assert_eq!(machine.data(), &["Root.entry"]);
        assert_eq!(machine.run_state(), -1);
    }

    #[test]
    fn disjoint_target_is_rejected() {
        let mut builder = GraphBuilder::<Log>::new();
        let left = builder.add(traced("Left"));
        let right = builder.add(traced("Right"));
        let graph = builder.build().unwrap();
        let mut machine = Machine::new(&graph, Vec::new());
        machine.set_initial(left);
        machine.data_mut().clear();

        machine.set_state(right);

        assert_eq!(machine.current(), Some(left));
        assert!(machine.data().is_empty());
        assert_eq!(
            machine.last_violation(),
            Some(Violation::DisjointTarget {
                from: left,
                to: right,
            })
        );
    }

    #[test]
    fn set_state_before_initial_is_rejected() {
        let tree = tree();
        let mut machine = Machine::new(&tree.graph, Vec::new());

        machine.set_state(tree.idle);

        assert_eq!(machine.current(), None);
        assert!(machine.data().is_empty());
        assert_eq!(
            machine.last_violation(),
            Some(Violation::NotInitialized {
                op: Operation::SetState,
            })
        );
    }

    #[test]
    fn set_initial_revives_terminated_machine() {
        let tree = tree();
        let mut machine = started(&tree, tree.idle);
        machine.set_terminate(7);
        assert_eq!(machine.run_state(), 7);

        machine.set_initial(tree.root);

        assert!(!machine.is_terminated());
        assert_eq!(machine.current(), Some(tree.root));
        assert_eq!(machine.run_state(), 0);
    }
}
