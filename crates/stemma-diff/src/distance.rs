//! Pairwise witness distances for stemmatic tree building.
//!
//! The distance between two witnesses is the number of tokens that have to
//! be deleted or inserted to turn one into the other, `n + m - 2·|LCS|`.
//! Matrices can be written in the PHYLIP square format read by distance
//! tree builders such as FITCH.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::config::DiffConfig;
use crate::error::{DiffError, DiffResult};
use crate::witness::Witness;

/// Width of the name column in PHYLIP files.
const PHYLIP_NAME_WIDTH: usize = 10;

/// A symmetric distance matrix with a zero diagonal.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DistanceMatrix {
    pub sigla: Vec<String>,
    /// Token count of each witness, parallel to `sigla`.
    pub lengths: Vec<usize>,
    pub distances: Vec<Vec<f64>>,
    /// Whether distances have been divided by the combined witness length.
    pub normalized: bool,
}

impl DistanceMatrix {
    /// Compute indel distances between every pair of `witnesses`.
    pub fn compute(witnesses: &[Witness], config: &DiffConfig) -> DiffResult<Self> {
        if witnesses.len() < 2 {
            return Err(DiffError::NotEnoughWitnesses(witnesses.len()));
        }
        let mut seen = HashSet::new();
        for w in witnesses {
            if !seen.insert(w.siglum.as_str()) {
                return Err(DiffError::DuplicateSiglum(w.siglum.clone()));
            }
        }

        let n = witnesses.len();
        let mut distances = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in i + 1..n {
                let (a, b) = (&witnesses[i], &witnesses[j]);
                let common = config.align(a, b).matched();
                let d = (a.len() + b.len() - 2 * common) as f64;
                distances[i][j] = d;
                distances[j][i] = d;
            }
        }
        debug!(witnesses = n, pairs = n * (n - 1) / 2, "distance matrix computed");

        Ok(Self {
            sigla: witnesses.iter().map(|w| w.siglum.clone()).collect(),
            lengths: witnesses.iter().map(Witness::len).collect(),
            distances,
            normalized: false,
        })
    }

    /// Divide each distance by the combined length of the pair, giving values
    /// in `[0, 1]`. A pair of empty witnesses has distance zero.
    pub fn normalized(&self) -> Self {
        if self.normalized {
            return self.clone();
        }
        let distances = self
            .distances
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .map(|(j, d)| match self.lengths[i] + self.lengths[j] {
                        0 => 0.0,
                        total => d / total as f64,
                    })
                    .collect()
            })
            .collect();
        Self {
            distances,
            normalized: true,
            ..self.clone()
        }
    }

    pub fn len(&self) -> usize {
        self.sigla.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sigla.is_empty()
    }

    /// Distance between the witnesses named `a` and `b`.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.sigla.iter().position(|s| s == a)?;
        let j = self.sigla.iter().position(|s| s == b)?;
        Some(self.distances[i][j])
    }

    /// Names for the PHYLIP name column, one per witness.
    ///
    /// Sigla are reduced to printable ASCII without PHYLIP delimiters and cut
    /// to ten bytes. A name already taken by an earlier row gets a numeric
    /// suffix inside the ten-byte field.
    pub fn phylip_names(&self) -> Vec<String> {
        let mut taken = HashSet::new();
        let mut names = Vec::with_capacity(self.len());
        for siglum in &self.sigla {
            let base: String = siglum
                .chars()
                .map(phylip_char)
                .take(PHYLIP_NAME_WIDTH)
                .collect();
            let mut name = base.clone();
            let mut n = 1;
            while taken.contains(&name) {
                let suffix = n.to_string();
                let keep = PHYLIP_NAME_WIDTH.saturating_sub(suffix.len()).min(base.len());
                name = format!("{}{suffix}", &base[..keep]);
                n += 1;
            }
            taken.insert(name.clone());
            names.push(name);
        }
        names
    }

    /// Render in PHYLIP square format, names padded to ten bytes.
    pub fn to_phylip(&self) -> String {
        let rows: String = self
            .phylip_names()
            .iter()
            .zip(&self.distances)
            .map(|(name, row)| {
                let cells: String = row.iter().map(|d| format!(" {d:.6}")).collect();
                format!("{name:<width$}{cells}\n", width = PHYLIP_NAME_WIDTH)
            })
            .collect();
        format!("{:>5}\n{rows}", self.len())
    }
}

/// Characters PHYLIP readers accept in a name; everything else becomes `_`.
fn phylip_char(ch: char) -> char {
    if ch.is_ascii_graphic() && !"()[]:;,".contains(ch) {
        ch
    } else {
        '_'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn witnesses(config: &DiffConfig) -> Vec<Witness> {
        vec![
            config.witness("A", "in principio erat verbum"),
            config.witness("B", "in principio erat sermo"),
            config.witness("C", "principio erat verbum"),
        ]
    }

    #[test]
    fn indel_distances_are_symmetric() {
        let config = DiffConfig::strict();
        let matrix = DistanceMatrix::compute(&witnesses(&config), &config).unwrap();
        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix.get("A", "A"), Some(0.0));
        assert_eq!(matrix.get("A", "B"), Some(2.0));
        assert_eq!(matrix.get("A", "C"), Some(1.0));
        assert_eq!(matrix.get("B", "C"), Some(3.0));
        assert_eq!(matrix.get("C", "B"), Some(3.0));
        assert_eq!(matrix.get("A", "Z"), None);
    }

    #[test]
    fn normalization_divides_by_combined_length() {
        let config = DiffConfig::strict();
        let matrix = DistanceMatrix::compute(&witnesses(&config), &config)
            .unwrap()
            .normalized();
        assert!(matrix.normalized);
        assert_eq!(matrix.get("A", "B"), Some(0.25));
        assert_eq!(matrix.normalized(), matrix);
    }

    #[test]
    fn empty_witnesses_have_zero_normalized_distance() {
        let config = DiffConfig::strict();
        let ws = vec![config.witness("A", ""), config.witness("B", "")];
        let matrix = DistanceMatrix::compute(&ws, &config).unwrap().normalized();
        assert_eq!(matrix.get("A", "B"), Some(0.0));
    }

    #[test]
    fn rejects_single_witness() {
        let config = DiffConfig::strict();
        let ws = vec![config.witness("A", "x")];
        let err = DistanceMatrix::compute(&ws, &config).unwrap_err();
        assert!(matches!(err, DiffError::NotEnoughWitnesses(1)));
    }

    #[test]
    fn rejects_duplicate_sigla() {
        let config = DiffConfig::strict();
        let ws = vec![config.witness("A", "x"), config.witness("A", "y")];
        let err = DistanceMatrix::compute(&ws, &config).unwrap_err();
        assert!(matches!(err, DiffError::DuplicateSiglum(s) if s == "A"));
    }

    #[test]
    fn phylip_layout() {
        let config = DiffConfig::strict();
        let ws = vec![
            config.witness("Paris_lat_2000", "a b"),
            config.witness("Vat", "a c"),
        ];
        let phylip = DistanceMatrix::compute(&ws, &config).unwrap().to_phylip();
        let lines: Vec<&str> = phylip.lines().collect();
        assert_eq!(lines[0], "    2");
        assert_eq!(lines[1], "Paris_lat_ 0.000000 2.000000");
        assert_eq!(lines[2], "Vat        2.000000 0.000000");
    }

    #[test]
    fn truncated_sigla_stay_distinct() {
        let config = DiffConfig::strict();
        let ws = vec![
            config.witness("Paris_lat_2000", "a b"),
            config.witness("Paris_lat_2001", "a c"),
            config.witness("Paris_lat1", "a d"),
        ];
        let matrix = DistanceMatrix::compute(&ws, &config).unwrap();
        assert_eq!(
            matrix.phylip_names(),
            vec!["Paris_lat_", "Paris_lat1", "Paris_lat2"]
        );

        let phylip = matrix.to_phylip();
        let names: Vec<&str> = phylip.lines().skip(1).map(|l| &l[..10]).collect();
        assert_ne!(names[0], names[1]);
        assert_ne!(names[1], names[2]);
    }

    #[test]
    fn non_ascii_sigla_keep_columns_aligned() {
        let config = DiffConfig::strict();
        let ws = vec![
            config.witness("Æthelwold", "a"),
            config.witness("St Gall (a)", "a"),
        ];
        let matrix = DistanceMatrix::compute(&ws, &config).unwrap();
        assert_eq!(matrix.phylip_names(), vec!["_thelwold", "St_Gall__a"]);
        for line in matrix.to_phylip().lines().skip(1) {
            assert!(line.is_ascii());
            assert_eq!(&line[10..11], " ");
            assert_eq!(line.len(), 10 + 2 * " 0.000000".len());
        }
    }
}
