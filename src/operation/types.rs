//! Operation trait and invocation parameters

use crate::error::{Error, Result};
use crate::output::InvocationContext;
use crate::pagination::{CursorRequest, CursorResponse};
use crate::types::JsonValue;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// A paged list call against an external service
#[async_trait]
pub trait ListOperation: Send + Sync {
    /// Request carrying caller filters and the continuation cursor
    type Request: CursorRequest + Send + Sync;
    /// One page of results
    type Response: CursorResponse + Send;

    /// Operation name used in logs and error messages
    fn name(&self) -> &str;

    /// Fetch one page
    async fn list(&self, request: &Self::Request) -> Result<Self::Response>;

    /// Rewrite a fetch fault before it is reported
    fn normalize_fault(&self, err: Error) -> Error {
        err
    }
}

/// Parameters bound for one invocation
///
/// Declared parameter names keep their declaration order; the first one
/// is echoed by `pass_thru`. Name lookups ignore ASCII case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationParams {
    declared: Vec<String>,
    values: BTreeMap<String, String>,
}

impl InvocationParams {
    /// Create params for the given declared names
    pub fn new<I, S>(declared: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            declared: declared.into_iter().map(Into::into).collect(),
            values: BTreeMap::new(),
        }
    }

    /// Bind a value to a declared parameter
    pub fn bind(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let canonical = self.canonical(name).ok_or_else(|| {
            Error::invalid_argument(name, "not a parameter of this operation")
        })?;
        let canonical = canonical.to_string();
        self.values.insert(canonical, value.into());
        Ok(())
    }

    /// Bind a value, builder style
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Result<Self> {
        self.bind(name, value)?;
        Ok(self)
    }

    /// Bound value of a parameter
    pub fn get(&self, name: &str) -> Option<&str> {
        let canonical = self.canonical(name)?;
        self.values.get(canonical).map(String::as_str)
    }

    /// Whether a value was bound
    pub fn is_bound(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Declared parameter names
    pub fn declared(&self) -> &[String] {
        &self.declared
    }

    /// All declared parameters as a JSON object (unbound ones are empty strings)
    pub fn to_json(&self) -> JsonValue {
        let map = self
            .declared
            .iter()
            .map(|name| {
                let value = self.values.get(name).cloned().unwrap_or_default();
                (name.clone(), JsonValue::String(value))
            })
            .collect();
        JsonValue::Object(map)
    }

    fn canonical(&self, name: &str) -> Option<&str> {
        self.declared
            .iter()
            .find(|declared| declared.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }
}

impl InvocationContext for InvocationParams {
    fn parameter(&self, name: &str) -> Option<JsonValue> {
        let canonical = self.canonical(name)?;
        Some(
            self.values
                .get(canonical)
                .map_or(JsonValue::Null, |v| JsonValue::String(v.clone())),
        )
    }

    fn has_parameter(&self, name: &str) -> bool {
        self.canonical(name).is_some()
    }

    fn primary_parameter(&self) -> Option<&str> {
        self.declared.first().map(String::as_str)
    }
}
