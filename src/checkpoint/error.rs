//! Why saving or resuming a checkpoint can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckpointError {
    /// The encoder (JSON or bincode) refused the checkpoint.
    #[error("could not encode checkpoint: {0}")]
    SerializationFailed(String),

    /// The input is not a checkpoint in the expected encoding.
    #[error("could not decode checkpoint: {0}")]
    DeserializationFailed(String),

    #[error("checkpoint format {found} cannot be resumed, expected {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// A state recorded by name is missing from the graph being resumed.
    #[error("checkpoint names state '{name}', which the graph does not declare")]
    UnknownState { name: String },

    /// The recorded current state has a default child in this graph, so the
    /// machine could not have been resting in it.
    #[error("checkpointed state '{name}' is not a leaf of this graph")]
    NotALeaf { name: String },
}
