//! cascade cli interface

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Change the work directory
    ///
    /// Can be specified multiple times. Note that all
    /// paths on the way to the final path must exist.
    ///
    /// This is equivalent to running { cd <directory>; cascade ... }
    #[clap(short = 'C', long = "directory", global(true))]
    pub directory: Vec<PathBuf>,

    /// Directory containing the documents
    #[clap(short = 'd', long = "documents", global(true), default_value = ".")]
    pub documents: PathBuf,

    /// Maximum number of nested documents in one inheritance path
    #[clap(long = "max-depth", global(true), default_value_t = cascade::chain::DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a document with all of its ancestors merged in
    #[command(alias = "resolve")]
    Get(GetCommand),

    /// Print the merge order of a document, most basal document first
    Chain(ChainCommand),

    /// List available documents
    List,
}

#[derive(Parser, Debug)]
pub struct GetCommand {
    #[clap(flatten)]
    pub output: OutputArgs,

    /// Document name
    pub name: String,
}

#[derive(Parser, Debug)]
pub struct ChainCommand {
    /// Document name
    pub name: String,
}

#[derive(Parser, Debug)]
pub struct OutputArgs {
    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum OutputFormat {
    Json,
    #[default]
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}
