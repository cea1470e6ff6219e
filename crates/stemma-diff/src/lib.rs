//! Sequence alignment for stemmatic comparison.
//!
//! Computes longest common subsequences between two sequences and turns the
//! resulting alignment into edit scripts of deletion/insertion hunks. On top
//! of the generic engine sit text witnesses, configurable token
//! normalization, and pairwise distance matrices for tree building.
//!
//! # Key Types
//!
//! - [`MatchVector`] -- Per-position alignment of A against B
//! - [`EditScript`] / [`Hunk`] / [`Edit`] -- Hunks of deletions and insertions
//! - [`Witness`] / [`Tokenizer`] / [`Normalization`] -- Tokenized transcriptions
//! - [`DiffConfig`] -- Tokenizer, normalization, and rendering settings
//! - [`DistanceMatrix`] -- Pairwise indel distances, PHYLIP output
//!
//! ```
//! use stemma_diff::{diff, EditKind};
//!
//! let a = ["in", "principio", "erat", "verbum"];
//! let b = ["in", "principio", "erat", "sermo"];
//! let script = diff(&a, &b);
//!
//! assert_eq!(script.len(), 1);
//! assert_eq!(script.hunks[0].edits[0].kind, EditKind::Delete);
//! assert_eq!(script.apply(&a).unwrap(), b);
//! ```

pub mod config;
pub mod distance;
pub mod error;
pub mod lcs;
pub mod script;
pub mod traverse;
pub mod witness;

pub use config::DiffConfig;
pub use distance::DistanceMatrix;
pub use error::{ApplyError, DiffError, DiffResult};
pub use lcs::{
    longest_common_subsequence, longest_common_subsequence_by_key,
    try_longest_common_subsequence_by_key, MatchVector,
};
pub use script::{diff, diff_by_key, try_diff_by_key, Edit, EditKind, EditScript, Hunk};
pub use traverse::{traverse, Step};
pub use witness::{Normalization, Tokenizer, Witness};
