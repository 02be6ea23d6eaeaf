//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Paginated list executor CLI
#[derive(Parser, Debug)]
#[command(name = "pagewalk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Operation definition file (YAML)
    #[arg(short, long, global = true)]
    pub definition: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a list operation from the definition file
    List {
        /// Operation name
        operation: String,

        /// Operation parameter as NAME=VALUE (repeatable)
        #[arg(short, long = "param", value_name = "NAME=VALUE")]
        params: Vec<String>,

        #[command(flatten)]
        paging: PagingArgs,

        /// Emit the operation's first parameter instead of page data
        #[arg(long)]
        pass_thru: bool,
    },

    /// List the operations of the definition file
    Operations,

    /// Validate the definition file
    Validate,

    /// List objects in an S3 bucket
    #[cfg(feature = "aws")]
    S3 {
        /// Bucket name
        #[arg(long)]
        bucket: String,

        /// Key prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Grouping delimiter
        #[arg(long)]
        delimiter: Option<String>,

        /// Keys per page
        #[arg(long)]
        max_keys: Option<i32>,

        /// Region (defaults to the environment's region)
        #[arg(long)]
        region: Option<String>,

        /// Endpoint of an S3-compatible service
        #[arg(long)]
        endpoint_url: Option<String>,

        #[command(flatten)]
        paging: PagingArgs,
    },
}

/// Paging and selection flags shared by list commands
#[derive(Args, Debug, Clone, Default)]
pub struct PagingArgs {
    /// Continue from a cursor returned by an earlier run (fetches one page)
    #[arg(long)]
    pub next_token: Option<String>,

    /// Fetch a single page
    #[arg(long)]
    pub no_auto_iteration: bool,

    /// What to emit: '*', '^Parameter' or a dotted path
    #[arg(long)]
    pub select: Option<String>,

    /// Stop after this many pages
    #[arg(long)]
    pub max_pages: Option<usize>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one document per line)
    Json,
    /// Indented JSON
    Pretty,
}
