use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DiffError, DiffResult};
use crate::lcs::{longest_common_subsequence, longest_common_subsequence_by_key, MatchVector};
use crate::script::{diff, diff_by_key, EditScript};
use crate::witness::{Normalization, Tokenizer, Witness};

/// Configuration for comparing text witnesses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// How transcriptions are split into tokens.
    pub tokenizer: Tokenizer,
    /// Number of unchanged tokens shown around each hunk when rendering.
    pub context: usize,
    /// How tokens are normalized before comparison.
    pub normalization: Normalization,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            tokenizer: Tokenizer::Words,
            context: 3,
            normalization: Normalization::default(),
        }
    }
}

impl DiffConfig {
    /// Exact comparison: every orthographic difference is a variant.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Ignore case, punctuation, and spacing.
    pub fn lenient() -> Self {
        Self {
            normalization: Normalization::all(),
            ..Default::default()
        }
    }

    /// Parse a configuration from TOML. Missing fields take their defaults.
    pub fn from_toml_str(s: &str) -> DiffResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: &Path) -> DiffResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| DiffError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Tokenize `text` with the configured tokenizer.
    pub fn witness(&self, siglum: impl Into<String>, text: &str) -> Witness {
        Witness::new(siglum, text, self.tokenizer)
    }

    /// Read and tokenize a witness file with the configured tokenizer.
    pub fn load_witness(&self, path: &Path) -> DiffResult<Witness> {
        Witness::load(path, self.tokenizer)
    }

    /// Align two witnesses under the configured normalization.
    pub fn align(&self, a: &Witness, b: &Witness) -> MatchVector {
        if self.normalization.is_identity() {
            longest_common_subsequence(&a.tokens, &b.tokens)
        } else {
            longest_common_subsequence_by_key(&a.tokens, &b.tokens, |t: &String| self.normalization.key(t))
        }
    }

    /// Edit script turning witness `a` into witness `b`.
    pub fn diff_witnesses<'w>(&self, a: &'w Witness, b: &'w Witness) -> EditScript<'w, String> {
        if self.normalization.is_identity() {
            diff(&a.tokens, &b.tokens)
        } else {
            diff_by_key(&a.tokens, &b.tokens, |t: &String| self.normalization.key(t))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_strict_words() {
        let config = DiffConfig::default();
        assert_eq!(config, DiffConfig::strict());
        assert_eq!(config.tokenizer, Tokenizer::Words);
        assert_eq!(config.context, 3);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config = DiffConfig::from_toml_str(
            r#"
            tokenizer = "lines"

            [normalization]
            case_fold = true
            "#,
        )
        .unwrap();
        assert_eq!(config.tokenizer, Tokenizer::Lines);
        assert!(config.normalization.case_fold);
        assert!(!config.normalization.strip_punctuation);
        assert_eq!(config.context, 3);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = DiffConfig::from_toml_str("tokenizer = \"sentences\"").unwrap_err();
        assert!(matches!(err, DiffError::Config(_)));
    }

    #[test]
    fn toml_roundtrip() {
        let config = DiffConfig::lenient();
        let text = toml::to_string(&config).unwrap();
        assert_eq!(DiffConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stemma.toml");
        std::fs::write(&path, "context = 1\n").unwrap();
        assert_eq!(DiffConfig::load(&path).unwrap().context, 1);
    }

    #[test]
    fn lenient_config_ignores_orthography() {
        let a = DiffConfig::lenient().witness("A", "Fratres, carissimi. Hodie");
        let b = DiffConfig::lenient().witness("B", "fratres carissimi hodie");

        assert!(DiffConfig::lenient().diff_witnesses(&a, &b).is_empty());
        assert_eq!(DiffConfig::lenient().align(&a, &b).matched(), 3);

        let strict = DiffConfig::strict().diff_witnesses(&a, &b);
        assert_eq!(strict.deletions(), 3);
        assert_eq!(strict.insertions(), 3);
    }

    #[test]
    fn witness_diff_reconstructs_target_tokens() {
        let config = DiffConfig::strict();
        let a = config.witness("A", "in principio erat verbum et verbum erat apud deum");
        let b = config.witness("B", "in principio erat sermo et sermo erat apud deum");
        let script = config.diff_witnesses(&a, &b);
        assert_eq!(script.len(), 2);
        assert_eq!(script.apply(&a.tokens).unwrap(), b.tokens);
    }
}
