//! Builder API for declaring state graphs.
//!
//! States are declared one at a time with [`StateBuilder`] and collected by a
//! [`GraphBuilder`], which validates the whole declaration once and produces
//! an immutable [`StateGraph`](crate::core::StateGraph).
//!
//! # Example
//!
//! ```
//! use hsm_engine::builder::{GraphBuilder, StateBuilder};
//!
//! type Log = Vec<&'static str>;
//!
//! let mut builder = GraphBuilder::<Log>::new();
//! let root = builder.add(StateBuilder::new("Root"));
//! let idle = builder.add(StateBuilder::new("Idle").parent(root));
//! let active = builder.add(
//!     StateBuilder::<Log>::new("Active")
//!         .parent(root)
//!         .on_entry(|m| m.data_mut().push("Active.entry")),
//! );
//! builder.set_initial(root, idle);
//!
//! let graph = builder.build().unwrap();
//! assert_eq!(graph.find("Active"), Some(active));
//! ```

pub mod error;
pub mod graph;
pub mod state;

pub use error::{GraphError, GraphErrors};
pub use graph::GraphBuilder;
pub use state::StateBuilder;
