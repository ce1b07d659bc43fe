//! Errors reported while building a state graph.

use crate::core::StateId;
use std::fmt;
use thiserror::Error;

/// A single structural problem found in a graph declaration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("State graph is empty. Add at least one state before .build()")]
    Empty,

    #[error("State '{state}' names parent {parent}, which was never declared")]
    DanglingParent { state: &'static str, parent: StateId },

    #[error("State '{state}' names initial state {initial}, which was never declared")]
    DanglingInitial {
        state: &'static str,
        initial: StateId,
    },

    #[error("State '{state}' is its own ancestor")]
    ParentCycle { state: &'static str },

    #[error("Initial state '{initial}' of '{state}' is not one of its descendants")]
    InitialNotDescendant {
        state: &'static str,
        initial: &'static str,
    },

    #[error("State name '{name}' is declared {count} times")]
    DuplicateName { name: &'static str, count: usize },

    #[error("Initial state assigned to {state}, which was never declared")]
    UnknownState { state: StateId },
}

/// Every problem found while validating a graph declaration.
///
/// Validation does not stop at the first problem; all of them are reported
/// together. The list is never empty.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub struct GraphErrors {
    errors: Vec<GraphError>,
}

impl GraphErrors {
    pub(crate) fn new(errors: Vec<GraphError>) -> Self {
        debug_assert!(!errors.is_empty());
        Self { errors }
    }

    pub fn errors(&self) -> &[GraphError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GraphError> {
        self.errors.iter()
    }
}

impl fmt::Display for GraphErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid state graph ({} problem(s))", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl From<GraphError> for GraphErrors {
    fn from(error: GraphError) -> Self {
        Self::new(vec![error])
    }
}
