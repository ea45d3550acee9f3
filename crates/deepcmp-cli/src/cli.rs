use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "deepcmp",
    about = "deepcmp: deep structural comparison of JSON documents",
    version,
)]
pub struct Cli {
    /// First document, or `-` for stdin
    pub left: String,

    /// Second document, or `-` for stdin
    pub right: String,

    /// Treat values that are equal after coercion as equal ("2" == 2)
    #[arg(long)]
    pub loose: bool,

    /// Only report whether the documents are equal
    #[arg(short, long)]
    pub quiet: bool,

    /// Location style: structured (["a"][0]) or dot (a.0)
    #[arg(long)]
    pub path_format: Option<String>,

    /// TOML file with strict / verbose / path_format settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// Debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
