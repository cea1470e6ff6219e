//! Text witnesses: tokenized transcriptions of one text, named by siglum.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DiffError, DiffResult};

/// How a transcription is split into comparable tokens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tokenizer {
    /// Whitespace-separated words.
    #[default]
    Words,
    /// One token per line.
    Lines,
    /// One token per Unicode scalar value.
    Chars,
}

impl Tokenizer {
    /// Split `text` into owned tokens.
    pub fn tokenize(self, text: &str) -> Vec<String> {
        match self {
            Tokenizer::Words => text.split_whitespace().map(str::to_owned).collect(),
            Tokenizer::Lines => text.lines().map(str::to_owned).collect(),
            Tokenizer::Chars => text.chars().map(String::from).collect(),
        }
    }
}

/// Rules turning a token into its comparison key.
///
/// Orthographic variation between manuscripts (capitals, punctuation,
/// spacing) usually should not count as a textual variant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Normalization {
    /// Compare tokens case-insensitively.
    pub case_fold: bool,
    /// Drop every character that is neither alphanumeric nor whitespace.
    pub strip_punctuation: bool,
    /// Trim the token and collapse internal whitespace runs to one space.
    pub collapse_whitespace: bool,
}

impl Normalization {
    /// All rules enabled.
    pub fn all() -> Self {
        Self {
            case_fold: true,
            strip_punctuation: true,
            collapse_whitespace: true,
        }
    }

    /// Returns `true` if no rule is enabled, so keys equal tokens.
    pub fn is_identity(&self) -> bool {
        !(self.case_fold || self.strip_punctuation || self.collapse_whitespace)
    }

    /// The comparison key of `token`.
    pub fn key(&self, token: &str) -> String {
        let collapsed;
        let source = if self.collapse_whitespace {
            collapsed = token.split_whitespace().collect::<Vec<_>>().join(" ");
            collapsed.as_str()
        } else {
            token
        };

        let mut key = String::with_capacity(source.len());
        for ch in source.chars() {
            if self.strip_punctuation && !(ch.is_alphanumeric() || ch.is_whitespace()) {
                continue;
            }
            if self.case_fold {
                key.extend(ch.to_lowercase());
            } else {
                key.push(ch);
            }
        }
        key
    }
}

/// A named, tokenized transcription.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Witness {
    pub siglum: String,
    pub tokens: Vec<String>,
}

impl Witness {
    /// Tokenize `text` as the witness `siglum`.
    pub fn new(siglum: impl Into<String>, text: &str, tokenizer: Tokenizer) -> Self {
        Self {
            siglum: siglum.into(),
            tokens: tokenizer.tokenize(text),
        }
    }

    /// Read a witness from a UTF-8 file; the siglum is the file stem.
    pub fn load(path: &Path, tokenizer: Tokenizer) -> DiffResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| DiffError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let siglum = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(siglum, &text, tokenizer))
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn word_tokens_ignore_spacing() {
        let tokens = Tokenizer::Words.tokenize("  Fratres\tcarissimi \n hodie ");
        assert_eq!(tokens, vec!["Fratres", "carissimi", "hodie"]);
    }

    #[test]
    fn line_and_char_tokens() {
        assert_eq!(Tokenizer::Lines.tokenize("a b\nc\n"), vec!["a b", "c"]);
        assert_eq!(Tokenizer::Chars.tokenize("æb"), vec!["æ", "b"]);
    }

    #[test]
    fn identity_normalization_keeps_token() {
        let norm = Normalization::default();
        assert!(norm.is_identity());
        assert_eq!(norm.key("Deus,"), "Deus,");
    }

    #[test]
    fn full_normalization() {
        let norm = Normalization::all();
        assert_eq!(norm.key("Deus,"), "deus");
        assert_eq!(norm.key("  In   Principio. "), "in principio");
        assert_eq!(norm.key("ÆTERNUS"), "æternus");
    }

    #[test]
    fn punctuation_only_token_becomes_empty() {
        let norm = Normalization {
            strip_punctuation: true,
            ..Default::default()
        };
        assert_eq!(norm.key("·:·"), "");
    }

    #[test]
    fn load_uses_file_stem_as_siglum() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Paris_lat_2000.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "sermo beati augustini").unwrap();

        let witness = Witness::load(&path, Tokenizer::Words).unwrap();
        assert_eq!(witness.siglum, "Paris_lat_2000");
        assert_eq!(witness.len(), 3);
    }

    #[test]
    fn load_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        let err = Witness::load(&path, Tokenizer::Words).unwrap_err();
        assert!(matches!(err, DiffError::Io { .. }));
        assert!(err.to_string().contains("missing.txt"));
    }

    #[test]
    fn tokenizer_names_are_lowercase() {
        let json = serde_json::to_string(&Tokenizer::Lines).unwrap();
        assert_eq!(json, "\"lines\"");
    }
}
