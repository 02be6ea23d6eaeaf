//! YAML Loader module
//!
//! Parse list-operation definitions from YAML files and bind caller
//! parameters to them.
//!
//! # Overview
//!
//! The loader module provides:
//! - `ApiDefinition` - a service and its list operations
//! - `OperationDefinition` - method, path, parameters, cursor and page size
//! - YAML parsing with validation
//! - `bind_operation` - caller parameters to a ready-to-run endpoint

mod bind;
mod parser;
mod types;

pub use bind::{bind_operation, http_config, BoundOperation};
pub use parser::{load_definition, load_definition_from_str};
pub use types::{
    ApiDefinition, CursorDefinition, HttpDefinition, OperationDefinition, PageSizeDefinition,
    ParameterDefinition,
};
