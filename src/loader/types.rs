//! Loader types
//!
//! Declarative list-operation definitions for YAML parsing.

use crate::types::{BackoffType, CursorLocation, JsonValue, Method};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// API Definition
// ============================================================================

/// Top-level definition: one service and its list operations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ApiDefinition {
    /// Service name
    pub name: String,
    /// Base URL for all requests
    pub base_url: String,
    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpDefinition,
    /// Headers sent with every operation
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// List operations
    pub operations: Vec<OperationDefinition>,
}

impl ApiDefinition {
    /// Find an operation by name (ASCII case-insensitive)
    pub fn operation(&self, name: &str) -> Option<&OperationDefinition> {
        self.operations
            .iter()
            .find(|op| op.name.eq_ignore_ascii_case(name))
    }

    /// Operation names in declaration order
    pub fn operation_names(&self) -> Vec<&str> {
        self.operations.iter().map(|op| op.name.as_str()).collect()
    }
}

// ============================================================================
// HTTP Definition
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HttpDefinition {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Transport retries for throttling and server errors
    #[serde(default)]
    pub max_retries: u32,
    /// Backoff between transport retries
    #[serde(default)]
    pub backoff: BackoffType,
    /// Initial backoff in milliseconds
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,
    /// Maximum backoff in milliseconds
    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,
    /// User agent
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpDefinition {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            max_retries: 0,
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_ms: default_max_backoff(),
            user_agent: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_initial_backoff() -> u64 {
    100
}

fn default_max_backoff() -> u64 {
    20_000
}

// ============================================================================
// Operation Definition
// ============================================================================

/// One paged list operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OperationDefinition {
    /// Operation name
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
    /// HTTP method
    #[serde(default)]
    pub method: Method,
    /// URL path relative to `base_url` (can contain templates)
    pub path: String,
    /// Declared invocation parameters; the first one is the primary
    #[serde(default)]
    pub parameters: Vec<ParameterDefinition>,
    /// Query parameters (can contain templates)
    #[serde(default)]
    pub params: HashMap<String, String>,
    /// Operation-specific headers (can contain templates)
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// JSON request body (string values can contain templates)
    #[serde(default)]
    pub body: Option<JsonValue>,
    /// Continuation cursor configuration
    pub cursor: CursorDefinition,
    /// Page size parameter
    #[serde(default)]
    pub page_size: Option<PageSizeDefinition>,
    /// Dotted path of the result collection in each page
    #[serde(default)]
    pub items_path: Option<String>,
}

impl OperationDefinition {
    /// Declared parameter names in order
    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }
}

/// Declared invocation parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ParameterDefinition {
    /// Parameter name
    pub name: String,
    /// Must be bound on every invocation
    #[serde(default)]
    pub required: bool,
    /// Value used when the caller does not bind one
    #[serde(default)]
    pub default: Option<String>,
    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
}

/// Continuation cursor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CursorDefinition {
    /// Request parameter carrying the cursor
    pub param: String,
    /// Where the cursor goes on the request
    #[serde(default)]
    pub location: CursorLocation,
    /// Dotted path of the next cursor in the response (defaults to `param`)
    #[serde(default)]
    pub path: Option<String>,
}

impl CursorDefinition {
    /// Response path of the next cursor
    pub fn response_path(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.param)
    }
}

/// Page size configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PageSizeDefinition {
    /// Parameter name
    pub param: String,
    /// Items per page
    pub value: u32,
}
