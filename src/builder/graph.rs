//! Builder for constructing and validating state graphs.

use crate::builder::error::{GraphError, GraphErrors};
use crate::builder::state::StateBuilder;
use crate::core::{StateDef, StateGraph, StateId};
use std::collections::HashMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<GraphError>>;

/// Collects state declarations and turns them into a [`StateGraph`].
///
/// Handles are issued in declaration order as states are added, so a state
/// can name any previously added state as its parent.
pub struct GraphBuilder<U> {
    states: Vec<StateDef<U>>,
    unknown: Vec<StateId>,
}

impl<U> GraphBuilder<U> {
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            unknown: Vec::new(),
        }
    }

    /// Add a state and return its handle.
    pub fn add(&mut self, state: StateBuilder<U>) -> StateId {
        let id = StateId(self.states.len());
        self.states.push(state.build());
        id
    }

    /// Set the default child of an already added state.
    pub fn set_initial(&mut self, state: StateId, child: StateId) -> &mut Self {
        match self.states.get_mut(state.0) {
            Some(def) => def.initial = Some(child),
            None => self.unknown.push(state),
        }
        self
    }

    /// Validate every declaration and build the graph.
    ///
    /// All problems are accumulated: the error lists every dangling
    /// reference, parent cycle, misplaced initial state and duplicate name.
    pub fn build(self) -> Result<StateGraph<U>, GraphErrors> {
        if self.states.is_empty() {
            return Err(GraphError::Empty.into());
        }

        let mut checks: Vec<Check> = Vec::new();

        for &state in &self.unknown {
            checks.push(Validation::fail(GraphError::UnknownState { state }));
        }

        for index in 0..self.states.len() {
            let id = StateId(index);
            checks.push(self.check_parent(id));
            checks.push(self.check_initial(id));
        }

        checks.extend(self.check_names());

        match Validation::all_vec(checks) {
            Validation::Success(_) => Ok(StateGraph::from_states(self.states)),
            Validation::Failure(errors) => Err(GraphErrors::new(errors.iter().cloned().collect())),
        }
    }

    fn check_parent(&self, id: StateId) -> Check {
        let state = &self.states[id.0];
        let Some(parent) = state.parent else {
            return Validation::success(());
        };

        if parent.0 >= self.states.len() {
            return Validation::fail(GraphError::DanglingParent {
                state: state.name,
                parent,
            });
        }

        if self.chain_reaches(parent, id) {
            Validation::fail(GraphError::ParentCycle { state: state.name })
        } else {
            Validation::success(())
        }
    }

    fn check_initial(&self, id: StateId) -> Check {
        let state = &self.states[id.0];
        let Some(initial) = state.initial else {
            return Validation::success(());
        };

        let Some(target) = self.states.get(initial.0) else {
            return Validation::fail(GraphError::DanglingInitial {
                state: state.name,
                initial,
            });
        };

        // Strict descent also rules out cycles through `initial`.
        if initial != id && self.chain_reaches(initial, id) {
            Validation::success(())
        } else {
            Validation::fail(GraphError::InitialNotDescendant {
                state: state.name,
                initial: target.name,
            })
        }
    }

    fn check_names(&self) -> Vec<Check> {
        let mut counts: HashMap<&'static str, usize> = HashMap::new();
        let mut order = Vec::new();
        for state in &self.states {
            let count = counts.entry(state.name).or_insert(0);
            if *count == 0 {
                order.push(state.name);
            }
            *count += 1;
        }

        order
            .into_iter()
            .filter_map(|name| {
                let count = counts[&name];
                (count > 1).then(|| Validation::fail(GraphError::DuplicateName { name, count }))
            })
            .collect()
    }

    /// Whether `target` is on the parent chain starting at `from`, `from`
    /// included. Bounded by the number of states so cycles terminate.
    fn chain_reaches(&self, from: StateId, target: StateId) -> bool {
        let mut cursor = Some(from);
        for _ in 0..=self.states.len() {
            match cursor {
                Some(id) if id == target => return true,
                Some(id) => cursor = self.states.get(id.0).and_then(|s| s.parent),
                None => return false,
            }
        }
        false
    }
}

impl<U> Default for GraphBuilder<U> {
    fn default() -> Self {
        Self::new()
    }
}
