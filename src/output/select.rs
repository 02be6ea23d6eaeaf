//! Selection expressions
//!
//! `Select` expressions choose what an invocation emits:
//! - `*` - the whole page
//! - `^Name` - the bound parameter `Name`, once, after paging
//! - `a.b.0.c` - a dotted path into the page
//!
//! Without an expression the operation's default path (its result
//! collection) is used.

use super::projection::Projection;
use crate::error::{Error, Result};
use crate::types::JsonValue;
use std::str::FromStr;

/// Bound parameters of one invocation, as seen by `^Name` selections
pub trait InvocationContext {
    /// Value of a parameter (`Null` when declared but unbound)
    fn parameter(&self, name: &str) -> Option<JsonValue>;

    /// Whether the operation declares a parameter with this name
    fn has_parameter(&self, name: &str) -> bool;

    /// Parameter echoed by `pass_thru`
    fn primary_parameter(&self) -> Option<&str>;
}

/// A page that can be viewed as JSON for selection
pub trait SelectableResponse {
    /// The whole page as JSON
    fn to_json(&self) -> JsonValue;

    /// Value at a dotted path inside the page
    fn select(&self, path: &str) -> Option<JsonValue> {
        select_path(&self.to_json(), path)
    }

    /// Result collection at the operation's default path
    ///
    /// Pages that decode their collection on arrival return it as-is.
    fn items(&self, path: &str) -> Option<JsonValue> {
        self.select(path)
    }
}

/// Parsed selection expression
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Select {
    /// The operation's default path
    #[default]
    Default,
    /// The whole page (`*`)
    All,
    /// A dotted path into the page
    Path(String),
    /// A bound parameter, emitted once after paging (`^Name`)
    Parameter(String),
}

impl FromStr for Select {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let expr = s.trim();
        if expr.is_empty() {
            return Err(Error::invalid_argument(
                "select",
                "expression cannot be empty",
            ));
        }
        if expr == "*" {
            return Ok(Self::All);
        }
        if let Some(name) = expr.strip_prefix('^') {
            let name = name.trim();
            if name.is_empty() {
                return Err(Error::invalid_argument(
                    "select",
                    "'^' must be followed by a parameter name",
                ));
            }
            return Ok(Self::Parameter(name.to_string()));
        }
        Ok(Self::Path(expr.to_string()))
    }
}

impl Select {
    /// Check if this selection runs once after paging
    pub fn is_parameter(&self) -> bool {
        matches!(self, Self::Parameter(_))
    }

    /// Build the projection for this selection
    pub fn into_projection<R, C>(self, default_path: Option<String>) -> Projection<R, C, JsonValue>
    where
        R: SelectableResponse + 'static,
        C: InvocationContext + ?Sized + 'static,
    {
        match self {
            Self::Default => match default_path {
                Some(path) => {
                    Projection::each_page(move |response: &R, _: &C| response.items(&path))
                }
                None => Self::All.into_projection(None),
            },
            Self::All => Projection::each_page(|response: &R, _: &C| Some(response.to_json())),
            Self::Path(path) => {
                Projection::each_page(move |response: &R, _: &C| response.select(&path))
            }
            Self::Parameter(name) => Projection::deferred(move |context: &C| context.parameter(&name)),
        }
    }
}

/// Caller output choices, validated before any page is fetched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Selection expression
    pub select: Option<String>,
    /// Echo the operation's primary parameter instead of page data
    pub pass_thru: bool,
}

impl OutputOptions {
    /// Create default output options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the selection expression
    #[must_use]
    pub fn with_select(mut self, select: impl Into<String>) -> Self {
        self.select = Some(select.into());
        self
    }

    /// Set pass-thru
    #[must_use]
    pub fn with_pass_thru(mut self, pass_thru: bool) -> Self {
        self.pass_thru = pass_thru;
        self
    }

    /// Resolve the options against the invocation's parameters
    pub fn resolve<C>(&self, context: &C) -> Result<Select>
    where
        C: InvocationContext + ?Sized,
    {
        let select = match (&self.select, self.pass_thru) {
            (Some(_), true) => {
                return Err(Error::invalid_argument(
                    "pass_thru",
                    "cannot be combined with select; use select '^<Parameter>' instead",
                ))
            }
            (Some(expr), false) => expr.parse::<Select>()?,
            (None, true) => {
                let name = context.primary_parameter().ok_or_else(|| {
                    Error::invalid_argument("pass_thru", "operation has no parameter to pass through")
                })?;
                Select::Parameter(name.to_string())
            }
            (None, false) => Select::Default,
        };

        if let Select::Parameter(name) = &select {
            if !context.has_parameter(name) {
                return Err(Error::invalid_argument(
                    "select",
                    format!("'{name}' is not a parameter of this operation"),
                ));
            }
        }

        Ok(select)
    }
}

/// Look up a dotted path (`$.` prefix optional, numeric parts index arrays)
pub fn lookup_path<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        current = match current {
            JsonValue::Object(map) => map.get(part)?,
            JsonValue::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Clone the value at a dotted path
pub fn select_path(value: &JsonValue, path: &str) -> Option<JsonValue> {
    lookup_path(value, path).cloned()
}
