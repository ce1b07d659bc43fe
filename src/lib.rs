//! hsm-engine: a hierarchical state machine dispatch engine
//!
//! States form a tree. Each state may carry entry, run and exit actions, a
//! parent and a default child. A [`Machine`] tracks the active leaf of a
//! shared, immutable [`StateGraph`] and executes the actions in a
//! deterministic order whenever it is started, run or told to change state.
//!
//! # Core Concepts
//!
//! - **Graph**: States declared through [`GraphBuilder`] and validated once
//! - **Machine**: Per-instance context plus the user data actions work on
//! - **Run dispatch**: The leaf's run action first, then bubbling to ancestors
//! - **Transitions**: Exit up to the least common ancestor, enter down to the
//!   resolved leaf
//! - **Enforcement**: Calls that would corrupt an in-flight walk are rejected
//!   and reported as a [`Violation`]
//!
//! # Example
//!
//! ```rust
//! use hsm_engine::{GraphBuilder, Machine, StateBuilder};
//!
//! type Log = Vec<&'static str>;
//!
//! let mut builder = GraphBuilder::<Log>::new();
//! let root = builder.add(StateBuilder::new("Root"));
//! let idle = builder.add(
//!     StateBuilder::<Log>::new("Idle")
//!         .parent(root)
//!         .on_exit(|m| m.data_mut().push("Idle.exit")),
//! );
//! let active = builder.add(StateBuilder::new("Active").parent(root));
//! let running = builder.add(
//!     StateBuilder::<Log>::new("Running")
//!         .parent(active)
//!         .on_entry(|m| m.data_mut().push("Running.entry"))
//!         .on_run(|m| m.set_handled()),
//! );
//! builder.set_initial(active, running);
//! let graph = builder.build().unwrap();
//!
//! let mut machine = Machine::new(&graph, Vec::new());
//! machine.set_initial(idle);
//! machine.set_state(active);
//!
//! assert_eq!(machine.current(), Some(running));
//! assert_eq!(machine.data(), &["Idle.exit", "Running.entry"]);
//! assert_eq!(machine.run_state(), 0);
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod enforcement;
pub mod engine;

// Re-export commonly used types
pub use builder::{GraphBuilder, GraphError, GraphErrors, StateBuilder};
pub use checkpoint::{Checkpoint, CheckpointError};
pub use core::{Hook, Phase, StateGraph, StateId};
pub use enforcement::{ConfigBuilder, MachineConfig, RunPhasePolicy, Violation};
pub use engine::{Context, Machine};
