// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # pagewalk
//!
//! Drives cursor-paginated list operations to completion, streaming one
//! projected value per page as soon as the page arrives.
//!
//! ## Features
//!
//! - **Automatic paging**: follows continuation cursors until the service
//!   stops returning one
//! - **Caller-controlled paging**: supply a cursor or opt out of iteration
//!   and get exactly one page, plus the cursor to continue from
//! - **Selection**: emit whole pages, a dotted path, or a bound parameter
//! - **YAML operations**: describe JSON-over-HTTP list endpoints
//!   declaratively
//! - **S3**: `ListObjectsV2` through the AWS SDK (feature `aws`)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagewalk::loader::{bind_operation, load_definition};
//! use pagewalk::output::{OutputOptions, Select};
//! use pagewalk::pagination::{PaginatedListExecutor, PagingControl};
//!
//! #[tokio::main]
//! async fn main() -> pagewalk::Result<()> {
//!     let def = load_definition("storage.yaml")?;
//!     let supplied = vec![("Bucket".to_string(), "photos".to_string())];
//!     let bound = bind_operation(&def, "ListObjects", &supplied)?;
//!     let items_path = bound.endpoint.items_path.clone();
//!     let (operation, params) = bound.into_operation()?;
//!
//!     let projection = OutputOptions::new()
//!         .resolve(&params)?
//!         .into_projection(items_path);
//!
//!     let mut pages = Vec::new();
//!     PaginatedListExecutor::new(&operation)
//!         .execute(
//!             operation.endpoint().request(),
//!             &PagingControl::new(),
//!             &projection,
//!             &params,
//!             &mut pages,
//!         )
//!         .await
//!         .into_result()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  PaginatedListExecutor                          │
//! │  set cursor → list() → project → emit → advance → repeat?       │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────┬────────────────┴──┬──────────────┬───────────────┐
//! │  Operation  │      HTTP         │    Output    │    Loader     │
//! ├─────────────┼───────────────────┼──────────────┼───────────────┤
//! │ HTTP list   │ GET/POST          │ Projection   │ YAML defs     │
//! │ S3 list     │ Opt-in retry      │ Select       │ Param binding │
//! │             │ Backoff           │ Sinks        │ Templates     │
//! └─────────────┴───────────────────┴──────────────┴───────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP transport with opt-in retry
pub mod http;

/// Cursor pagination executor
pub mod pagination;

/// Projections, selection and output sinks
pub mod output;

/// List operations (HTTP, S3)
pub mod operation;

/// YAML loader for operation definitions
pub mod loader;

/// Template interpolation
pub mod template;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use loader::{bind_operation, load_definition, load_definition_from_str, ApiDefinition};
pub use operation::{InvocationParams, ListOperation};
pub use output::{OutputOptions, OutputSink, Projection, Select};
pub use pagination::{InvocationOutcome, PaginatedListExecutor, PagingControl, Termination};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
