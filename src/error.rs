//! Error types for pagewalk
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for pagewalk
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration / Argument Errors
    // ============================================================================
    /// Invalid or unreadable definition
    #[error("Configuration error: {message}")]
    Config {
        /// What is wrong
        message: String,
    },

    /// A required parameter was not bound
    #[error("Missing required parameter: {name}")]
    MissingParameter {
        /// Parameter name
        name: String,
    },

    /// A caller argument was rejected before any request
    #[error("Invalid argument '{argument}': {message}")]
    InvalidArgument {
        /// Argument name
        argument: String,
        /// Why it was rejected
        message: String,
    },

    /// Malformed YAML definition
    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Malformed JSON
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    /// Transport failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// Status code
        status: u16,
        /// Response body
        body: String,
    },

    /// HTTP 429
    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited {
        /// Delay before the next attempt
        retry_after_seconds: u64,
    },

    /// Request timed out
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout
        timeout_ms: u64,
    },

    /// Unparseable URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The endpoint host could not be resolved
    #[error("Name resolution failure attempting to reach '{endpoint}': {message}")]
    NameResolution {
        /// Host that failed to resolve
        endpoint: String,
        /// Guidance for the caller
        message: String,
    },

    // ============================================================================
    // Service Errors
    // ============================================================================
    /// Failure reported by the listing service
    #[error("{operation} failed: {message}")]
    Service {
        /// Operation name
        operation: String,
        /// Service message
        message: String,
    },

    /// A page could not be decoded
    #[error("Failed to decode page: {message}")]
    Decode {
        /// What could not be decoded
        message: String,
    },

    // ============================================================================
    // Output Errors
    // ============================================================================
    /// A sink rejected an emitted value
    #[error("Output error: {message}")]
    Output {
        /// Why the value was rejected
        message: String,
    },

    // ============================================================================
    // Template Errors
    // ============================================================================
    /// A template names a variable with no value
    #[error("Undefined variable in template: {variable}")]
    UndefinedVariable {
        /// Variable path(s)
        variable: String,
    },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    /// I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    /// Anything else
    #[error("{0}")]
    Other(String),

    /// Error from a foreign library
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing parameter error
    pub fn missing_parameter(name: impl Into<String>) -> Self {
        Self::MissingParameter { name: name.into() }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a service error for a named operation
    pub fn service(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Service {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a name resolution error
    pub fn name_resolution(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NameResolution {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Create an undefined variable error
    pub fn undefined_var(variable: impl Into<String>) -> Self {
        Self::UndefinedVariable {
            variable: variable.into(),
        }
    }

    /// Check if this error is rejected before any page is fetched
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidArgument { .. } | Error::MissingParameter { .. } | Error::Config { .. }
        )
    }

    /// Check if the transport may retry this error
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// Rewrite a DNS lookup failure into a [`Error::NameResolution`]
    ///
    /// Any other error is returned unchanged.
    pub fn normalize_name_resolution(self, endpoint: &str) -> Self {
        let is_dns = match &self {
            Error::Http(e) => is_name_resolution_failure(e),
            Error::Anyhow(e) => e.chain().any(is_name_resolution_failure),
            _ => false,
        };

        if is_dns {
            Error::name_resolution(
                endpoint,
                "the host name could not be resolved; check the endpoint or region and network connectivity",
            )
        } else {
            self
        }
    }
}

/// Check whether an error (or any of its sources) is a DNS lookup failure
pub fn is_name_resolution_failure(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        let text = e.to_string().to_lowercase();
        if text.contains("dns error")
            || text.contains("failed to lookup address")
            || text.contains("name or service not known")
            || text.contains("no such host")
        {
            return true;
        }
        current = e.source();
    }
    false
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for pagewalk
pub type Result<T> = std::result::Result<T, Error>;
