//! YAML parser for list-operation definitions
//!
//! Parses and validates definition files.

use crate::error::{Error, Result};
use crate::loader::types::{ApiDefinition, OperationDefinition};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load a definition from a YAML file
pub fn load_definition(path: impl AsRef<Path>) -> Result<ApiDefinition> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read definition file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let def = load_definition_from_str(&content)?;
    debug!(
        path = %path.display(),
        name = %def.name,
        operations = def.operations.len(),
        "Loaded definition"
    );
    Ok(def)
}

/// Load a definition from a YAML string
pub fn load_definition_from_str(yaml: &str) -> Result<ApiDefinition> {
    let def: ApiDefinition = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse definition YAML: {e}")))?;

    validate_definition(&def)?;
    Ok(def)
}

/// Validate a definition
fn validate_definition(def: &ApiDefinition) -> Result<()> {
    if def.name.is_empty() {
        return Err(Error::config("Definition name cannot be empty"));
    }

    if def.base_url.is_empty() {
        return Err(Error::config("Definition base_url cannot be empty"));
    }
    url::Url::parse(&def.base_url).map_err(|e| {
        Error::config(format!("Invalid base_url '{}': {e}", def.base_url))
    })?;

    if def.operations.is_empty() {
        return Err(Error::config("Definition must have at least one operation"));
    }

    let names: HashSet<_> = def
        .operations
        .iter()
        .map(|op| op.name.to_ascii_lowercase())
        .collect();
    if names.len() != def.operations.len() {
        return Err(Error::config("Duplicate operation names found"));
    }

    for operation in &def.operations {
        validate_operation(operation)?;
    }

    Ok(())
}

/// Validate an operation definition
fn validate_operation(op: &OperationDefinition) -> Result<()> {
    if op.name.is_empty() {
        return Err(Error::config("Operation name cannot be empty"));
    }

    if op.path.is_empty() {
        return Err(Error::config(format!(
            "Operation '{}' path cannot be empty",
            op.name
        )));
    }

    if op.cursor.param.is_empty() {
        return Err(Error::config(format!(
            "Operation '{}' cursor param cannot be empty",
            op.name
        )));
    }

    let mut seen = HashSet::new();
    for param in &op.parameters {
        if param.name.is_empty() {
            return Err(Error::config(format!(
                "Operation '{}' has a parameter with an empty name",
                op.name
            )));
        }
        if !seen.insert(param.name.to_ascii_lowercase()) {
            return Err(Error::config(format!(
                "Operation '{}' declares parameter '{}' more than once",
                op.name, param.name
            )));
        }
        if param.required && param.default.is_some() {
            return Err(Error::config(format!(
                "Operation '{}' parameter '{}' cannot be required and have a default",
                op.name, param.name
            )));
        }
    }

    if let Some(page_size) = &op.page_size {
        if page_size.value == 0 {
            return Err(Error::config(format!(
                "Operation '{}' page size must be greater than zero",
                op.name
            )));
        }
    }

    Ok(())
}
