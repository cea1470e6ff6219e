//! Classify every position of A and B as matched, deleted, or inserted.

use crate::lcs::MatchVector;

/// A single classified position produced by [`traverse`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// `A[a]` and `B[b]` are aligned.
    Match { a: usize, b: usize },
    /// `A[index]` has no counterpart in B.
    Delete(usize),
    /// `B[index]` has no counterpart in A.
    Insert(usize),
}

/// Walk A in order, driven by `matches`, emitting steps for both sequences.
///
/// Inside a gap between two matches every deletion from A precedes every
/// insertion from B. Unmatched tails of B are flushed after A is exhausted.
pub fn traverse(matches: &MatchVector, b_len: usize) -> Vec<Step> {
    let mut steps = Vec::with_capacity(matches.len().max(b_len));
    let mut next_b = 0;

    for (i, slot) in matches.as_slice().iter().enumerate() {
        match *slot {
            Some(j) => {
                steps.extend((next_b..j).map(Step::Insert));
                steps.push(Step::Match { a: i, b: j });
                next_b = j + 1;
            }
            None => steps.push(Step::Delete(i)),
        }
    }
    steps.extend((next_b..b_len).map(Step::Insert));
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lcs::longest_common_subsequence;

    #[test]
    fn empty_inputs_produce_no_steps() {
        let m = longest_common_subsequence::<u8>(&[], &[]);
        assert!(traverse(&m, 0).is_empty());
    }

    #[test]
    fn deletions_precede_insertions_in_a_gap() {
        let a = ["a", "x", "b"];
        let b = ["a", "y", "z", "b"];
        let m = longest_common_subsequence(&a, &b);
        assert_eq!(
            traverse(&m, b.len()),
            vec![
                Step::Match { a: 0, b: 0 },
                Step::Delete(1),
                Step::Insert(1),
                Step::Insert(2),
                Step::Match { a: 2, b: 3 },
            ]
        );
    }

    #[test]
    fn trailing_insertions_are_flushed() {
        let a = ["a"];
        let b = ["a", "b", "c"];
        let m = longest_common_subsequence(&a, &b);
        assert_eq!(
            traverse(&m, b.len()),
            vec![Step::Match { a: 0, b: 0 }, Step::Insert(1), Step::Insert(2)]
        );
    }

    #[test]
    fn every_position_appears_once() {
        let a: Vec<char> = "ABCABBA".chars().collect();
        let b: Vec<char> = "CBABAC".chars().collect();
        let steps = traverse(&longest_common_subsequence(&a, &b), b.len());

        let mut seen_a = vec![0; a.len()];
        let mut seen_b = vec![0; b.len()];
        for step in steps {
            match step {
                Step::Match { a, b } => {
                    seen_a[a] += 1;
                    seen_b[b] += 1;
                }
                Step::Delete(i) => seen_a[i] += 1,
                Step::Insert(j) => seen_b[j] += 1,
            }
        }
        assert!(seen_a.iter().all(|&n| n == 1));
        assert!(seen_b.iter().all(|&n| n == 1));
    }
}
