//! Core data model of the engine.
//!
//! This module contains the pure parts of the state machine:
//! - State descriptors and handles
//! - The immutable state graph and its ancestry navigation
//! - The dispatch phase used by the reentrancy rules
//!
//! Nothing in this module runs user actions.

mod graph;
mod phase;
mod state;

pub use graph::{Ancestors, StateGraph};
pub use phase::Phase;
pub use state::{Action, Hook, StateDef, StateId};
