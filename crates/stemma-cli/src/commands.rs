use anyhow::Context;
use colored::Colorize;
use serde_json::json;
use stemma_diff::{DiffConfig, DistanceMatrix, EditScript, MatchVector, Witness};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    tracing::debug!(?config, "resolved configuration");
    let out = match &cli.command {
        Command::Diff(args) => cmd_diff(&config, &cli.format, args)?,
        Command::Lcs(args) => cmd_lcs(&config, &cli.format, args)?,
        Command::Matrix(args) => cmd_matrix(&config, &cli.format, args)?,
    };
    print!("{out}");
    Ok(())
}

/// Start from the config file (or defaults) and apply command-line overrides.
fn resolve_config(cli: &Cli) -> anyhow::Result<DiffConfig> {
    let mut config = match &cli.config {
        Some(path) => DiffConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DiffConfig::default(),
    };
    if let Some(tokenizer) = cli.tokenizer {
        config.tokenizer = tokenizer.into();
    }
    if let Some(context) = cli.context {
        config.context = context;
    }
    if cli.ignore_case {
        config.normalization.case_fold = true;
    }
    if cli.ignore_punctuation {
        config.normalization.strip_punctuation = true;
    }
    Ok(config)
}

fn load_pair(config: &DiffConfig, args: &PairArgs) -> anyhow::Result<(Witness, Witness)> {
    Ok((config.load_witness(&args.a)?, config.load_witness(&args.b)?))
}

fn cmd_diff(config: &DiffConfig, format: &OutputFormat, args: &PairArgs) -> anyhow::Result<String> {
    let (a, b) = load_pair(config, args)?;
    let script = config.diff_witnesses(&a, &b);
    let out = match format {
        OutputFormat::Json => {
            let out = json!({ "a": a.siglum, "b": b.siglum, "hunks": script.hunks });
            format!("{}\n", serde_json::to_string_pretty(&out)?)
        }
        OutputFormat::Text if script.is_empty() => {
            format!("{} {} and {} agree.\n", "✓".green().bold(), a.siglum.bold(), b.siglum.bold())
        }
        OutputFormat::Text => format!(
            "{} {}\n{} {}\n{}{} hunks, {} deleted, {} inserted\n",
            "---".red(),
            a.siglum.bold(),
            "+++".green(),
            b.siglum.bold(),
            render_hunks(&a, &script, config.context),
            script.len(),
            script.deletions().to_string().red(),
            script.insertions().to_string().green()
        ),
    };
    Ok(out)
}

/// Render hunks with up to `context` unchanged tokens of `a` on each side.
fn render_hunks(a: &Witness, script: &EditScript<'_, String>, context: usize) -> String {
    let mut out = String::new();
    // Tokens of `a` before this index have already been printed or deleted.
    let mut shown = 0;
    for (n, hunk) in script.hunks.iter().enumerate() {
        let (removed, added) = (hunk.a_range(), hunk.b_range());
        let header = format!(
            "@@ -{},{} +{},{} @@",
            hunk.a_start + 1,
            removed.len(),
            hunk.b_start + 1,
            added.len()
        );
        out.push_str(&format!("{}\n", header.cyan()));

        let lead = hunk.a_start.saturating_sub(context).max(shown);
        for token in &a.tokens[lead..hunk.a_start] {
            out.push_str(&format!("  {token}\n"));
        }
        for edit in hunk.deletions() {
            out.push_str(&format!("{}\n", format!("- {}", edit.element).red()));
        }
        for edit in hunk.insertions() {
            out.push_str(&format!("{}\n", format!("+ {}", edit.element).green()));
        }

        // Trailing context stops where the next hunk's leading context begins.
        let limit = script.hunks.get(n + 1).map_or(a.len(), |next| {
            next.a_start.saturating_sub(context).max(removed.end)
        });
        let end = (removed.end + context).min(limit);
        for token in &a.tokens[removed.end..end] {
            out.push_str(&format!("  {token}\n"));
        }
        shown = end;
    }
    out
}

fn cmd_lcs(config: &DiffConfig, format: &OutputFormat, args: &PairArgs) -> anyhow::Result<String> {
    let (a, b) = load_pair(config, args)?;
    let matches = config.align(&a, &b);
    let out = match format {
        OutputFormat::Json => {
            let out = json!({
                "a": a.siglum,
                "b": b.siglum,
                "length": matches.matched(),
                "similarity": matches.similarity(b.len()),
                "matches": matches,
            });
            format!("{}\n", serde_json::to_string_pretty(&out)?)
        }
        OutputFormat::Text => render_alignment(&a, &b, &matches),
    };
    Ok(out)
}

fn render_alignment(a: &Witness, b: &Witness, matches: &MatchVector) -> String {
    let mut out = format!(
        "LCS length {} of {}/{} tokens, similarity {:.4}\n",
        matches.matched().to_string().bold(),
        a.len(),
        b.len(),
        matches.similarity(b.len())
    );
    for (i, j) in matches.pairs() {
        out.push_str(&format!(
            "  {:>5} {:>5}  {}\n",
            i + 1,
            j + 1,
            a.tokens[i].yellow()
        ));
    }
    out
}

fn cmd_matrix(
    config: &DiffConfig,
    format: &OutputFormat,
    args: &MatrixArgs,
) -> anyhow::Result<String> {
    let witnesses = args
        .files
        .iter()
        .map(|path| config.load_witness(path))
        .collect::<Result<Vec<_>, _>>()?;
    let mut matrix = DistanceMatrix::compute(&witnesses, config)?;
    if args.normalized {
        matrix = matrix.normalized();
    }
    let out = match format {
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&matrix)?),
        OutputFormat::Text => matrix.to_phylip(),
    };
    Ok(out)
}
