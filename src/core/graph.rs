//! The static state graph and the ancestry navigation over it.
//!
//! The graph only stores bottom-up links (`parent`), so every top-down walk
//! the engine needs is expressed through [`StateGraph::direct_child_on_path`].
//! All functions here are pure: they inspect the graph and never run actions.

use super::state::{StateDef, StateId};
use std::fmt;

/// Arena of state descriptors, built once by
/// [`GraphBuilder`](crate::builder::GraphBuilder) and immutable afterwards.
///
/// A built graph is always well formed: parent links are acyclic and every
/// `initial` link points at a strict descendant of the state declaring it.
pub struct StateGraph<U> {
    states: Vec<StateDef<U>>,
}

impl<U> StateGraph<U> {
    pub(crate) fn from_states(states: Vec<StateDef<U>>) -> Self {
        Self { states }
    }

    /// Number of states in the graph.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Whether `id` refers to a state of this graph.
    pub fn contains(&self, id: StateId) -> bool {
        id.0 < self.states.len()
    }

    /// Descriptor of `id`, or `None` if it does not belong to this graph.
    pub fn get(&self, id: StateId) -> Option<&StateDef<U>> {
        self.states.get(id.0)
    }

    /// Descriptor of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued for this graph.
    pub fn state(&self, id: StateId) -> &StateDef<U> {
        &self.states[id.0]
    }

    /// Diagnostic name of `id`, or `"<unknown>"` for a foreign handle.
    pub fn name_of(&self, id: StateId) -> &'static str {
        self.get(id).map_or("<unknown>", StateDef::name)
    }

    /// Handle of the state declared with `name`.
    pub fn find(&self, name: &str) -> Option<StateId> {
        self.states
            .iter()
            .position(|state| state.name == name)
            .map(StateId)
    }

    /// All handles, in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = StateId> + '_ {
        (0..self.states.len()).map(StateId)
    }

    /// States without a parent.
    pub fn roots(&self) -> impl Iterator<Item = StateId> + '_ {
        self.ids().filter(|&id| self.state(id).is_root())
    }

    /// Direct children of `id`, in declaration order.
    pub fn children_of(&self, id: StateId) -> impl Iterator<Item = StateId> + '_ {
        self.ids()
            .filter(move |&child| self.state(child).parent == Some(id))
    }

    pub fn parent_of(&self, id: StateId) -> Option<StateId> {
        self.get(id).and_then(StateDef::parent)
    }

    /// Walks from `id` up to its root, `id` included.
    pub fn ancestors(&self, id: StateId) -> Ancestors<'_, U> {
        Ancestors {
            graph: self,
            next: Some(id),
        }
    }

    /// True iff `ancestor` appears in `state`'s parent chain, `state`
    /// itself included.
    pub fn has_ancestor(&self, state: StateId, ancestor: StateId) -> bool {
        self.ancestors(state).any(|id| id == ancestor)
    }

    /// The single step downward from `ancestor` toward `leaf`: the state on
    /// `leaf`'s parent chain whose parent is `ancestor`.
    ///
    /// `ancestor = None` stands for "above the root" and yields the root of
    /// `leaf`. Returns `None` when `ancestor` is not a strict ancestor of
    /// `leaf`.
    pub fn direct_child_on_path(&self, leaf: StateId, ancestor: Option<StateId>) -> Option<StateId> {
        self.ancestors(leaf)
            .find(|&id| self.state(id).parent == ancestor)
    }

    /// Top of the tree containing `id`.
    pub fn root_of(&self, id: StateId) -> StateId {
        // `ancestors` always yields at least `id` itself
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Least common ancestor used as the transition boundary.
    ///
    /// Walks `source`'s strict ancestors and returns the first one that is
    /// either the parent of `dest` or an ancestor of `dest`. Returns `None`
    /// when the two states live in disjoint trees.
    pub fn lca_of(&self, source: StateId, dest: StateId) -> Option<StateId> {
        let dest_parent = self.state(dest).parent;
        self.ancestors(source)
            .skip(1)
            .find(|&ancestor| Some(ancestor) == dest_parent || self.has_ancestor(dest, ancestor))
    }

    /// Follows `initial` links from `id` down to the state that has none.
    pub fn resolve_leaf(&self, id: StateId) -> StateId {
        let mut leaf = id;
        while let Some(next) = self.state(leaf).initial {
            leaf = next;
        }
        leaf
    }

    /// Number of strict ancestors of `id`; roots have depth 0.
    pub fn depth_of(&self, id: StateId) -> usize {
        self.ancestors(id).count() - 1
    }

    /// Names along the path from the root down to `id`, joined with `/`.
    pub fn path_name(&self, id: StateId) -> String {
        let mut names: Vec<&str> = self.ancestors(id).map(|a| self.state(a).name).collect();
        names.reverse();
        names.join("/")
    }
}

impl<U> fmt::Debug for StateGraph<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.states.iter()).finish()
    }
}

/// Iterator over a state and its ancestors, leaf to root.
pub struct Ancestors<'a, U> {
    graph: &'a StateGraph<U>,
    next: Option<StateId>,
}

impl<U> Iterator for Ancestors<'_, U> {
    type Item = StateId;

    fn next(&mut self) -> Option<StateId> {
        let id = self.next?;
        self.next = self.graph.state(id).parent;
        Some(id)
    }
}
