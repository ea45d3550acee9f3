use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{bail, Context};
use deepcmp_diff::{CompareOptions, Comparator, PathFormat};
use deepcmp_types::Value;
use tracing::debug;

use crate::cli::Cli;
use crate::report;

/// Compare the two documents named on the command line and print the result.
///
/// Returns whether they were equal.
pub fn run_command(cli: &Cli) -> anyhow::Result<bool> {
    if cli.left == "-" && cli.right == "-" {
        bail!("stdin can supply only one of the two documents");
    }

    let options = resolve_options(cli)?;
    let left = load_document(&cli.left)?;
    let right = load_document(&cli.right)?;
    debug!(left = %cli.left, right = %cli.right, ?options, "comparing documents");

    let result = Comparator::new(options).compare(&left, &right);

    let mut stdout = io::stdout().lock();
    report::write_report(&mut stdout, &result, cli.format)?;
    Ok(result.equal)
}

/// Settings from the config file, if any, overridden by command-line flags.
pub fn resolve_options(cli: &Cli) -> anyhow::Result<CompareOptions> {
    let mut options = match &cli.config {
        Some(path) => load_config(path)?,
        None => CompareOptions::default(),
    };
    if cli.loose {
        options.strict = false;
    }
    if cli.quiet {
        options.verbose = false;
    }
    if let Some(name) = &cli.path_format {
        options.path_format = name.parse::<PathFormat>()?;
    }
    Ok(options)
}

fn load_config(path: &Path) -> anyhow::Result<CompareOptions> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    CompareOptions::from_toml_str(&text).with_context(|| format!("in config {}", path.display()))
}

fn load_document(source: &str) -> anyhow::Result<Value> {
    let text = if source == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        buf
    } else {
        fs::read_to_string(source).with_context(|| format!("reading {source}"))?
    };
    serde_json::from_str(&text).with_context(|| format!("parsing {source} as JSON"))
}
