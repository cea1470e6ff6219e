//! Error types for the diff crate.

use std::path::PathBuf;

use crate::script::EditKind;

/// Errors raised when an edit script does not fit the sequence it is applied to.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ApplyError {
    /// A delete edit refers to an index past the end of the source sequence.
    #[error("delete index {index} out of range for sequence of length {len}")]
    DeleteOutOfRange { index: usize, len: usize },

    /// A delete edit names an element that differs from the source sequence.
    #[error("delete at index {index} does not match the source element")]
    DeleteMismatch { index: usize },

    /// An insert edit refers to a position past the end of the target sequence.
    #[error("insert index {index} out of range for target of length {len}")]
    InsertOutOfRange { index: usize, len: usize },

    /// Two edits of the same kind claim the same index.
    #[error("duplicate {kind} edit at index {index}")]
    DuplicateIndex { kind: EditKind, index: usize },
}

/// Errors that can occur while loading witnesses, configuration, or
/// building distance matrices.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A witness or configuration file could not be read.
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`crate::DiffConfig`].
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// An edit script could not be applied.
    #[error("apply error: {0}")]
    Apply(#[from] ApplyError),

    /// A distance matrix needs at least two witnesses.
    #[error("distance matrix needs at least two witnesses, got {0}")]
    NotEnoughWitnesses(usize),

    /// Two witnesses share a siglum.
    #[error("duplicate siglum: {0}")]
    DuplicateSiglum(String),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
