//! Checkpoint and resume functionality for machines.
//!
//! A checkpoint records where a machine is, never what its actions do: states
//! are stored by name and the user data is left to the caller. Resuming
//! against a graph that declares the same names restores the machine without
//! running any action.

use crate::core::{Phase, StateGraph, StateId};
use crate::engine::{Context, Machine};
use crate::enforcement::MachineConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a machine's position.
/// Does NOT include actions or user data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Name of the active leaf state
    pub current: String,

    /// Name of the leaf active before the last transition
    pub previous: Option<String>,

    /// Termination value, if the machine was terminated
    pub terminate_val: Option<i32>,

    /// Transitions committed since the last `set_initial`
    pub transitions: u64,
}

impl Checkpoint {
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        serde_json::from_str(json).map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
    }

    /// Compact binary encoding.
    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
    }
}

impl<'g, U> Machine<'g, U> {
    /// Snapshot the machine's position.
    ///
    /// `None` before `set_initial` and while an action is executing: in the
    /// middle of a walk `current` may name a leaf whose entry action has not
    /// run yet.
    pub fn checkpoint(&self) -> Option<Checkpoint> {
        if self.ctx.phase.in_action() {
            return None;
        }
        let current = self.ctx.current?;
        Some(Checkpoint {
            version: CHECKPOINT_VERSION,
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            current: self.graph.name_of(current).to_string(),
            previous: self.ctx.previous.map(|id| self.graph.name_of(id).to_string()),
            terminate_val: self.ctx.terminate,
            transitions: self.ctx.transitions,
        })
    }

    /// Rebuild a machine from `checkpoint` without running any action.
    ///
    /// The current state must name a leaf of `graph` (a state without a
    /// default child); it is not re-entered. A terminated checkpoint resumes
    /// as a terminated machine.
    pub fn resume(
        graph: &'g StateGraph<U>,
        data: U,
        config: MachineConfig,
        checkpoint: &Checkpoint,
    ) -> Result<Self, CheckpointError> {
        if checkpoint.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: checkpoint.version,
                supported: CHECKPOINT_VERSION,
            });
        }

        let current = lookup(graph, &checkpoint.current)?;
        if graph.state(current).has_initial() {
            return Err(CheckpointError::NotALeaf {
                name: checkpoint.current.clone(),
            });
        }
        let previous = checkpoint
            .previous
            .as_deref()
            .map(|name| lookup(graph, name))
            .transpose()?;

        debug!(
            checkpoint = %checkpoint.id,
            state = %checkpoint.current,
            "resuming machine"
        );
        let ctx = Context {
            current: Some(current),
            previous,
            executing: Some(current),
            terminate: checkpoint.terminate_val,
            phase: Phase::Idle,
            transitions: checkpoint.transitions,
            ..Context::default()
        };
        Ok(Self::from_parts(graph, data, config, ctx))
    }
}

fn lookup<U>(graph: &StateGraph<U>, name: &str) -> Result<StateId, CheckpointError> {
    graph.find(name).ok_or_else(|| CheckpointError::UnknownState {
        name: name.to_string(),
    })
}
