//! Longest common subsequence over keyed sequences.
//!
//! Uses the threshold technique of Hunt and Szymanski: for every achievable
//! subsequence length the smallest B-index ending such a subsequence is kept
//! in a sorted array, and each candidate match is placed by binary search.
//! Common leading and trailing runs are matched up front so the quadratic
//! worst case only applies to the region that actually differs.

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;
use tracing::{debug, trace};

/// Per-position alignment of sequence A against sequence B.
///
/// Entry `i` is `Some(j)` when `A[i]` is matched to `B[j]`. Defined pairs are
/// strictly increasing in both coordinates.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MatchVector(Vec<Option<usize>>);

impl MatchVector {
    fn unset(len: usize) -> Self {
        Self(vec![None; len])
    }

    /// Length of sequence A.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if sequence A was empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The B-index matched to `A[i]`, if any.
    pub fn get(&self, i: usize) -> Option<usize> {
        self.0.get(i).copied().flatten()
    }

    /// Number of matched pairs, i.e. the LCS length.
    pub fn matched(&self) -> usize {
        self.0.iter().filter(|m| m.is_some()).count()
    }

    /// Matched `(a, b)` index pairs in increasing order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, m)| m.map(|j| (i, j)))
    }

    /// The raw per-position entries.
    pub fn as_slice(&self) -> &[Option<usize>] {
        &self.0
    }

    /// Dice-style similarity `2·|LCS| / (n + m)`, where `b_len` is the length
    /// of sequence B. Two empty sequences are fully similar.
    pub fn similarity(&self, b_len: usize) -> f64 {
        let total = self.len() + b_len;
        if total == 0 {
            return 1.0;
        }
        (2 * self.matched()) as f64 / total as f64
    }
}

/// One step of a candidate chain: the match `(a, b)` and the link that
/// precedes it in the chain.
struct Link {
    prev: Option<usize>,
    a: usize,
    b: usize,
}

/// Working state of a single LCS computation.
#[derive(Default)]
struct Thresholds {
    /// `ends[k]` is the smallest B-index ending a common subsequence of
    /// length `k + 1`. Strictly increasing.
    ends: Vec<usize>,
    /// Arena of every link ever recorded.
    links: Vec<Link>,
    /// `heads[k]` is the arena slot of the chain ending at `ends[k]`.
    heads: Vec<usize>,
}

impl Thresholds {
    fn place(&mut self, a: usize, b: usize) {
        let k = match self.ends.binary_search(&b) {
            Ok(_) => return,
            Err(k) => k,
        };
        let prev = k.checked_sub(1).map(|p| self.heads[p]);
        self.links.push(Link { prev, a, b });
        let id = self.links.len() - 1;

        if k == self.ends.len() {
            self.ends.push(b);
            self.heads.push(id);
        } else {
            self.ends[k] = b;
            self.heads[k] = id;
        }
    }

    fn len(&self) -> usize {
        self.ends.len()
    }

    fn write_chain(&self, out: &mut [Option<usize>]) {
        let mut cursor = self.heads.last().copied();
        while let Some(id) = cursor {
            let link = &self.links[id];
            out[link.a] = Some(link.b);
            cursor = link.prev;
        }
    }
}

/// Align two key sequences.
fn align_keys<K: Hash + Eq>(a: &[K], b: &[K]) -> MatchVector {
    let mut matches = MatchVector::unset(a.len());

    let mut start = 0;
    while start < a.len() && start < b.len() && a[start] == b[start] {
        matches.0[start] = Some(start);
        start += 1;
    }

    let (mut a_end, mut b_end) = (a.len(), b.len());
    while a_end > start && b_end > start && a[a_end - 1] == b[b_end - 1] {
        a_end -= 1;
        b_end -= 1;
        matches.0[a_end] = Some(b_end);
    }

    // Walking B backwards leaves every bucket in descending order.
    let mut buckets: HashMap<&K, Vec<usize>> = HashMap::new();
    for j in (start..b_end).rev() {
        buckets.entry(&b[j]).or_default().push(j);
    }

    let mut thresholds = Thresholds::default();
    for i in start..a_end {
        if let Some(candidates) = buckets.get(&a[i]) {
            for &j in candidates {
                thresholds.place(i, j);
            }
        }
    }
    trace!(
        middle = thresholds.len(),
        links = thresholds.links.len(),
        "threshold pass complete"
    );
    thresholds.write_chain(&mut matches.0);

    debug!(
        a_len = a.len(),
        b_len = b.len(),
        prefix = start,
        suffix = a.len() - a_end,
        length = matches.matched(),
        "longest common subsequence computed"
    );
    matches
}

/// Compute the longest common subsequence of `a` and `b`, comparing elements
/// directly.
pub fn longest_common_subsequence<T: Hash + Eq>(a: &[T], b: &[T]) -> MatchVector {
    align_keys(a, b)
}

/// Compute the longest common subsequence of `a` and `b`, comparing the keys
/// produced by `key`.
///
/// `key` is called exactly once per element and must be deterministic.
pub fn longest_common_subsequence_by_key<T, K, F>(a: &[T], b: &[T], mut key: F) -> MatchVector
where
    K: Hash + Eq,
    F: FnMut(&T) -> K,
{
    let a_keys: Vec<K> = a.iter().map(&mut key).collect();
    let b_keys: Vec<K> = b.iter().map(&mut key).collect();
    align_keys(&a_keys, &b_keys)
}

/// Like [`longest_common_subsequence_by_key`] with a fallible key function.
///
/// The first error returned by `key` is handed back unchanged.
pub fn try_longest_common_subsequence_by_key<T, K, E, F>(
    a: &[T],
    b: &[T],
    mut key: F,
) -> Result<MatchVector, E>
where
    K: Hash + Eq,
    F: FnMut(&T) -> Result<K, E>,
{
    let a_keys = a.iter().map(&mut key).collect::<Result<Vec<K>, E>>()?;
    let b_keys = b.iter().map(&mut key).collect::<Result<Vec<K>, E>>()?;
    Ok(align_keys(&a_keys, &b_keys))
}
