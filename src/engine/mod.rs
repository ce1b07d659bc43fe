//! The dispatch engine.
//!
//! A [`Machine`] pairs a borrowed [`StateGraph`](crate::core::StateGraph)
//! with a [`Context`] and the user data. Entry and exit walks, run dispatch
//! and transitions are implemented as `Machine` methods, one file per
//! concern.

mod context;
mod executor;
mod machine;
mod run;
mod transition;

pub use context::Context;
pub use machine::Machine;
