//! CLI module
//!
//! Command-line interface for running list operations.
//!
//! # Commands
//!
//! - `list` - Run an operation from a definition file, following cursors
//! - `operations` - List the operations of a definition file
//! - `validate` - Validate a definition file
//! - `s3` - List objects in an S3 bucket (feature `aws`)

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, PagingArgs};
pub use runner::{parse_params, Runner};
