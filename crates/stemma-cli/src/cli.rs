use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use stemma_diff::Tokenizer;

#[derive(Parser)]
#[command(
    name = "stemma",
    about = "Align text witnesses and measure their distance",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with tokenizer and normalization settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub tokenizer: Option<TokenizerArg>,

    #[arg(long, global = true)]
    pub ignore_case: bool,

    #[arg(long, global = true)]
    pub ignore_punctuation: bool,

    /// Unchanged tokens shown around each hunk
    #[arg(long, global = true)]
    pub context: Option<usize>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum TokenizerArg {
    Words,
    Lines,
    Chars,
}

impl From<TokenizerArg> for Tokenizer {
    fn from(arg: TokenizerArg) -> Self {
        match arg {
            TokenizerArg::Words => Tokenizer::Words,
            TokenizerArg::Lines => Tokenizer::Lines,
            TokenizerArg::Chars => Tokenizer::Chars,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the hunks turning one witness into another
    Diff(PairArgs),
    /// Show the longest common subsequence of two witnesses
    Lcs(PairArgs),
    /// Print the pairwise distance matrix of several witnesses
    Matrix(MatrixArgs),
}

#[derive(Args)]
pub struct PairArgs {
    pub a: PathBuf,
    pub b: PathBuf,
}

#[derive(Args)]
pub struct MatrixArgs {
    #[arg(required = true, num_args = 2..)]
    pub files: Vec<PathBuf>,
    /// Divide distances by the combined witness length
    #[arg(long)]
    pub normalized: bool,
}
