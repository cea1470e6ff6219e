//! Edit scripts: hunks of deletions and insertions between two sequences.
//!
//! An [`EditScript`] borrows the sequences it was computed from. Matched
//! elements are not stored; they are the unchanged backbone between hunks.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;
use std::ops::Range;

use serde::Serialize;
use tracing::debug;

use crate::error::ApplyError;
use crate::lcs::{
    longest_common_subsequence, longest_common_subsequence_by_key,
    try_longest_common_subsequence_by_key, MatchVector,
};
use crate::traverse::{traverse, Step};

/// Whether an edit removes an element of A or adds an element of B.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    Delete,
    Insert,
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditKind::Delete => f.write_str("delete"),
            EditKind::Insert => f.write_str("insert"),
        }
    }
}

/// A single deletion (indexing A) or insertion (indexing B).
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Edit<'a, T> {
    pub kind: EditKind,
    pub index: usize,
    pub element: &'a T,
}

impl<T> Clone for Edit<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Edit<'_, T> {}

/// A maximal run of edits between two consecutive matches.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Hunk<'a, T> {
    /// Position in A where the hunk begins (first index after the preceding match).
    pub a_start: usize,
    /// Position in B where the hunk begins.
    pub b_start: usize,
    /// Deletions in A order followed by insertions in B order.
    pub edits: Vec<Edit<'a, T>>,
}

impl<'a, T> Hunk<'a, T> {
    fn open(a_start: usize, b_start: usize) -> Self {
        Self {
            a_start,
            b_start,
            edits: Vec::new(),
        }
    }

    /// Deletions of this hunk, in A order.
    pub fn deletions(&self) -> impl Iterator<Item = &Edit<'a, T>> {
        self.edits.iter().filter(|e| e.kind == EditKind::Delete)
    }

    /// Insertions of this hunk, in B order.
    pub fn insertions(&self) -> impl Iterator<Item = &Edit<'a, T>> {
        self.edits.iter().filter(|e| e.kind == EditKind::Insert)
    }

    /// Indices of A removed by this hunk.
    pub fn a_range(&self) -> Range<usize> {
        self.a_start..self.a_start + self.deletions().count()
    }

    /// Indices of B added by this hunk.
    pub fn b_range(&self) -> Range<usize> {
        self.b_start..self.b_start + self.insertions().count()
    }
}

/// The ordered hunks transforming A into B.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct EditScript<'a, T> {
    pub hunks: Vec<Hunk<'a, T>>,
}

impl<'a, T> Default for EditScript<'a, T> {
    fn default() -> Self {
        Self { hunks: Vec::new() }
    }
}

impl<'a, T> EditScript<'a, T> {
    /// Group classified steps into hunks, resolving indices against `a` and `b`.
    pub fn from_steps(steps: &[Step], a: &'a [T], b: &'a [T]) -> Self {
        let mut hunks = Vec::new();
        let mut current = Hunk::open(0, 0);

        for step in steps {
            match *step {
                Step::Match { a: i, b: j } => {
                    let finished = std::mem::replace(&mut current, Hunk::open(i + 1, j + 1));
                    if !finished.edits.is_empty() {
                        hunks.push(finished);
                    }
                }
                Step::Delete(i) => current.edits.push(Edit {
                    kind: EditKind::Delete,
                    index: i,
                    element: &a[i],
                }),
                Step::Insert(j) => current.edits.push(Edit {
                    kind: EditKind::Insert,
                    index: j,
                    element: &b[j],
                }),
            }
        }
        if !current.edits.is_empty() {
            hunks.push(current);
        }

        Self { hunks }
    }

    /// Build the script for a precomputed alignment of `a` against `b`.
    pub fn from_matches(matches: &MatchVector, a: &'a [T], b: &'a [T]) -> Self {
        let script = Self::from_steps(&traverse(matches, b.len()), a, b);
        debug!(
            hunks = script.len(),
            deletions = script.deletions(),
            insertions = script.insertions(),
            "edit script built"
        );
        script
    }

    /// Returns `true` if the two sequences were equal.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Number of hunks.
    pub fn len(&self) -> usize {
        self.hunks.len()
    }

    /// All edits in hunk order.
    pub fn iter(&self) -> impl Iterator<Item = &Edit<'a, T>> {
        self.hunks.iter().flat_map(|h| &h.edits)
    }

    /// Total number of elements deleted from A.
    pub fn deletions(&self) -> usize {
        self.iter().filter(|e| e.kind == EditKind::Delete).count()
    }

    /// Total number of elements inserted from B.
    pub fn insertions(&self) -> usize {
        self.iter().filter(|e| e.kind == EditKind::Insert).count()
    }
}

impl<T: Clone + PartialEq> EditScript<'_, T> {
    /// Apply the script to `source`, reconstructing the target sequence.
    ///
    /// Fails if a deletion does not fit `source` or if the insertions cannot
    /// be placed in a target of the resulting length.
    pub fn apply(&self, source: &[T]) -> Result<Vec<T>, ApplyError> {
        let mut deleted = vec![false; source.len()];
        let mut inserts: BTreeMap<usize, &T> = BTreeMap::new();

        for edit in self.iter() {
            match edit.kind {
                EditKind::Delete => {
                    let slot = deleted
                        .get_mut(edit.index)
                        .ok_or(ApplyError::DeleteOutOfRange {
                            index: edit.index,
                            len: source.len(),
                        })?;
                    if *slot {
                        return Err(ApplyError::DuplicateIndex {
                            kind: edit.kind,
                            index: edit.index,
                        });
                    }
                    if source[edit.index] != *edit.element {
                        return Err(ApplyError::DeleteMismatch { index: edit.index });
                    }
                    *slot = true;
                }
                EditKind::Insert => {
                    if inserts.insert(edit.index, edit.element).is_some() {
                        return Err(ApplyError::DuplicateIndex {
                            kind: edit.kind,
                            index: edit.index,
                        });
                    }
                }
            }
        }

        let kept = deleted.iter().filter(|d| !**d).count();
        let len = kept + inserts.len();
        if let Some((&index, _)) = inserts.last_key_value() {
            if index >= len {
                return Err(ApplyError::InsertOutOfRange { index, len });
            }
        }

        let mut survivors = source
            .iter()
            .zip(&deleted)
            .filter(|(_, gone)| !**gone)
            .map(|(element, _)| element);
        let mut target = Vec::with_capacity(len);
        for pos in 0..len {
            let element = match inserts.get(&pos) {
                Some(inserted) => *inserted,
                // Every position not claimed by an insert is filled by exactly
                // one survivor, since the counts add up to `len`.
                None => match survivors.next() {
                    Some(kept) => kept,
                    None => break,
                },
            };
            target.push(element.clone());
        }
        Ok(target)
    }
}

/// Diff `a` against `b`, comparing elements directly.
pub fn diff<'a, T: Hash + Eq>(a: &'a [T], b: &'a [T]) -> EditScript<'a, T> {
    EditScript::from_matches(&longest_common_subsequence(a, b), a, b)
}

/// Diff `a` against `b`, comparing the keys produced by `key`.
pub fn diff_by_key<'a, T, K, F>(a: &'a [T], b: &'a [T], key: F) -> EditScript<'a, T>
where
    K: Hash + Eq,
    F: FnMut(&T) -> K,
{
    EditScript::from_matches(&longest_common_subsequence_by_key(a, b, key), a, b)
}

/// Like [`diff_by_key`] with a fallible key function.
pub fn try_diff_by_key<'a, T, K, E, F>(
    a: &'a [T],
    b: &'a [T],
    key: F,
) -> Result<EditScript<'a, T>, E>
where
    K: Hash + Eq,
    F: FnMut(&T) -> Result<K, E>,
{
    let matches = try_longest_common_subsequence_by_key(a, b, key)?;
    Ok(EditScript::from_matches(&matches, a, b))
}
