//! Builder for declaring a single state.

use crate::core::{Action, StateDef, StateId};
use crate::engine::Machine;

/// Fluent declaration of one state: its name, links and actions.
///
/// # Example
///
/// ```
/// use hsm_engine::builder::{GraphBuilder, StateBuilder};
///
/// let mut graph = GraphBuilder::<u32>::new();
/// let root = graph.add(StateBuilder::<u32>::new("Root").on_entry(|m| *m.data_mut() += 1));
/// let idle = graph.add(StateBuilder::new("Idle").parent(root));
/// graph.set_initial(root, idle);
///
/// let graph = graph.build().unwrap();
/// assert_eq!(graph.len(), 2);
/// ```
pub struct StateBuilder<U> {
    name: &'static str,
    parent: Option<StateId>,
    initial: Option<StateId>,
    entry: Option<Action<U>>,
    run: Option<Action<U>>,
    exit: Option<Action<U>>,
}

impl<U> StateBuilder<U> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            parent: None,
            initial: None,
            entry: None,
            run: None,
            exit: None,
        }
    }

    /// Nest this state inside `parent`.
    pub fn parent(mut self, parent: StateId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Default child entered when this state is targeted.
    ///
    /// Children are usually declared after their parent; use
    /// [`GraphBuilder::set_initial`](super::GraphBuilder::set_initial) in that
    /// case.
    pub fn initial(mut self, child: StateId) -> Self {
        self.initial = Some(child);
        self
    }

    pub fn on_entry<F>(mut self, action: F) -> Self
    where
        F: for<'g> Fn(&mut Machine<'g, U>) + Send + Sync + 'static,
    {
        self.entry = Some(Box::new(action));
        self
    }

    pub fn on_run<F>(mut self, action: F) -> Self
    where
        F: for<'g> Fn(&mut Machine<'g, U>) + Send + Sync + 'static,
    {
        self.run = Some(Box::new(action));
        self
    }

    pub fn on_exit<F>(mut self, action: F) -> Self
    where
        F: for<'g> Fn(&mut Machine<'g, U>) + Send + Sync + 'static,
    {
        self.exit = Some(Box::new(action));
        self
    }

    pub(crate) fn build(self) -> StateDef<U> {
        StateDef {
            name: self.name,
            entry: self.entry,
            run: self.run,
            exit: self.exit,
            parent: self.parent,
            initial: self.initial,
        }
    }
}
