//! Reentrancy enforcement for calls made from inside actions.
//!
//! Actions run on the engine's stack and may call back into it. Some of those
//! calls cannot be honoured consistently: a transition requested while states
//! are being exited would be lost, and by default a run action may neither
//! transition nor terminate. Such calls are rejected as a [`Violation`]: the
//! call becomes a no-op, a warning is logged and the violation is kept on the
//! machine for inspection.
//!
//! # Example
//!
//! ```rust
//! use hsm_engine::enforcement::{ConfigBuilder, MachineConfig, RunPhasePolicy};
//!
//! let config: MachineConfig = ConfigBuilder::new()
//!     .run_phase(RunPhasePolicy::Permit)
//!     .build();
//! assert_eq!(config.run_phase, RunPhasePolicy::Permit);
//! ```

pub mod builder;
pub mod config;
pub mod rules;
pub mod violations;

// Re-export commonly used types
pub use builder::ConfigBuilder;
pub use config::{MachineConfig, RunPhasePolicy};
pub use violations::{Operation, Violation};
