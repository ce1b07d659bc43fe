//! The machine instance: a borrowed graph, its context and the user data.

use crate::core::{Phase, StateGraph, StateId};
use crate::engine::context::Context;
use crate::enforcement::{MachineConfig, Violation};
use std::fmt;
use tracing::warn;

/// One running instance of a state graph.
///
/// The graph is borrowed, so any number of machines can share one graph.
/// `U` is the data the actions operate on; actions reach it through
/// [`data`](Self::data) and [`data_mut`](Self::data_mut).
///
/// Every operation takes `&mut self` and runs to completion before
/// returning. Driving one machine from several threads needs external
/// synchronisation such as a `Mutex`.
pub struct Machine<'g, U> {
    pub(crate) graph: &'g StateGraph<U>,
    pub(crate) ctx: Context,
    pub(crate) config: MachineConfig,
    data: U,
}

impl<'g, U> Machine<'g, U> {
    /// Create an uninitialised machine with the default configuration.
    ///
    /// Nothing runs until [`set_initial`](Self::set_initial) is called.
    pub fn new(graph: &'g StateGraph<U>, data: U) -> Self {
        Self::with_config(graph, data, MachineConfig::default())
    }

    pub fn with_config(graph: &'g StateGraph<U>, data: U, config: MachineConfig) -> Self {
        Self::from_parts(graph, data, config, Context::default())
    }

    pub(crate) fn from_parts(
        graph: &'g StateGraph<U>,
        data: U,
        config: MachineConfig,
        ctx: Context,
    ) -> Self {
        Self {
            graph,
            ctx,
            config,
            data,
        }
    }

    pub fn graph(&self) -> &'g StateGraph<U> {
        self.graph
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn config(&self) -> MachineConfig {
        self.config
    }

    pub fn data(&self) -> &U {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut U {
        &mut self.data
    }

    pub fn into_data(self) -> U {
        self.data
    }

    /// Active leaf state.
    pub fn current(&self) -> Option<StateId> {
        self.ctx.current
    }

    /// Name of the active leaf state.
    pub fn current_name(&self) -> Option<&'static str> {
        self.ctx.current.map(|id| self.graph.name_of(id))
    }

    pub fn previous(&self) -> Option<StateId> {
        self.ctx.previous
    }

    /// State whose action is executing; useful inside actions shared by
    /// several states.
    pub fn executing(&self) -> Option<StateId> {
        self.ctx.executing
    }

    pub fn phase(&self) -> Phase {
        self.ctx.phase
    }

    pub fn is_terminated(&self) -> bool {
        self.ctx.is_terminated()
    }

    pub fn terminate_val(&self) -> Option<i32> {
        self.ctx.terminate
    }

    pub fn last_violation(&self) -> Option<Violation> {
        self.ctx.last_violation
    }

    /// Take the recorded violation, leaving none behind.
    pub fn take_violation(&mut self) -> Option<Violation> {
        self.ctx.last_violation.take()
    }

    pub fn transition_count(&self) -> u64 {
        self.ctx.transitions
    }

    /// Whether `state` is active: the current leaf or one of its ancestors.
    pub fn is_in(&self, state: StateId) -> bool {
        self.ctx
            .current
            .is_some_and(|current| self.graph.contains(state) && self.graph.has_ancestor(current, state))
    }

    /// Log a rejected call and remember it. The call itself has no effect.
    pub(crate) fn reject(&mut self, violation: Violation) {
        let state = self
            .ctx
            .executing
            .or(self.ctx.current)
            .map(|id| self.graph.name_of(id));
        warn!(
            op = %violation.operation(),
            state = ?state,
            phase = %self.ctx.phase,
            "rejected call: {violation}"
        );
        if self.config.record_violations {
            self.ctx.last_violation = Some(violation);
        }
    }
}

impl<U: fmt::Debug> fmt::Debug for Machine<'_, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("current", &self.current_name())
            .field("context", &self.ctx)
            .field("config", &self.config)
            .field("data", &self.data)
            .finish()
    }
}
