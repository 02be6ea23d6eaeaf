//! Template interpolation for operation definitions
//!
//! Handles `{{ variable }}` interpolation in query parameters, headers,
//! paths and bodies. Two roots are available:
//! - `params.<Name>` - a bound invocation parameter
//! - `env.<NAME>` - a process environment variable

use crate::error::{Error, Result};
use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

/// Regex for matching template variables: {{ root.path }}
static TEMPLATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*)\s*\}\}")
        .expect("template pattern is a valid regex")
});

/// Context for template interpolation
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    /// Bound invocation parameters (unbound ones are empty strings)
    pub params: Value,
    /// Whether `env.*` lookups may read the process environment
    pub allow_env: bool,
}

impl TemplateContext {
    /// Create context with parameter values
    pub fn with_params(params: Value) -> Self {
        Self {
            params,
            allow_env: true,
        }
    }

    /// Get a value by path (e.g., "params.Bucket")
    pub fn get(&self, path: &str) -> Option<Value> {
        let (root, rest) = path.split_once('.').unwrap_or((path, ""));
        match root {
            "params" if rest.is_empty() => Some(self.params.clone()),
            "params" => get_nested_value(&self.params, rest).cloned(),
            "env" if self.allow_env && !rest.is_empty() => {
                std::env::var(rest).ok().map(Value::String)
            }
            _ => None,
        }
    }
}

/// Get a nested value from a JSON object by dotted path
fn get_nested_value<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, part| match current {
        Value::Object(map) => map.get(part),
        _ => None,
    })
}

/// Render a template string with the given context
pub fn render(template: &str, ctx: &TemplateContext) -> Result<String> {
    let mut errors = Vec::new();

    let rendered = TEMPLATE_REGEX.replace_all(template, |cap: &Captures<'_>| {
        let var_path = &cap[1];
        match ctx.get(var_path) {
            Some(value) => value_to_string(&value),
            None => {
                errors.push(var_path.to_string());
                String::new()
            }
        }
    });

    if errors.is_empty() {
        Ok(rendered.into_owned())
    } else {
        Err(Error::undefined_var(errors.join(", ")))
    }
}

/// Check if a string contains template variables
pub fn has_templates(s: &str) -> bool {
    TEMPLATE_REGEX.is_match(s)
}

/// Extract all variable names from a template
pub fn extract_variables(template: &str) -> Vec<String> {
    TEMPLATE_REGEX
        .captures_iter(template)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Convert a JSON value to a string for template substitution
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Render all string values (and object keys) in a JSON value
pub fn render_value(value: &Value, ctx: &TemplateContext) -> Result<Value> {
    match value {
        Value::String(s) if has_templates(s) => Ok(Value::String(render(s, ctx)?)),
        Value::Object(map) => {
            let mut new_map = serde_json::Map::new();
            for (k, v) in map {
                let new_key = if has_templates(k) {
                    render(k, ctx)?
                } else {
                    k.clone()
                };
                new_map.insert(new_key, render_value(v, ctx)?);
            }
            Ok(Value::Object(new_map))
        }
        Value::Array(arr) => {
            let new_arr: Result<Vec<Value>> = arr.iter().map(|v| render_value(v, ctx)).collect();
            Ok(Value::Array(new_arr?))
        }
        _ => Ok(value.clone()),
    }
}

/// Drop object fields whose value rendered to an empty string
pub fn prune_empty(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !matches!(v, Value::String(s) if s.is_empty()))
                .map(|(k, v)| (k, prune_empty(v)))
                .collect(),
        ),
        Value::Array(arr) => Value::Array(arr.into_iter().map(prune_empty).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ctx() -> TemplateContext {
        TemplateContext::with_params(json!({
            "Bucket": "photos",
            "Prefix": "",
            "MaxKeys": 100,
            "Recursive": true
        }))
    }

    #[test]
    fn test_simple_substitution() {
        let result = render("bucket={{ params.Bucket }}", &ctx()).unwrap();
        assert_eq!(result, "bucket=photos");
    }

    #[test]
    fn test_multiple_substitutions() {
        let result = render("/{{ params.Bucket }}/{{ params.Prefix }}", &ctx()).unwrap();
        assert_eq!(result, "/photos/");
    }

    #[test]
    fn test_nested_value() {
        let ctx = TemplateContext::with_params(json!({"Filter": {"Name": "tag"}}));
        let result = render("{{ params.Filter.Name }}", &ctx).unwrap();
        assert_eq!(result, "tag");
    }

    #[test]
    fn test_env_lookup() {
        std::env::set_var("PAGEWALK_TEMPLATE_TEST_TOKEN", "secret");
        let result = render("Bearer {{ env.PAGEWALK_TEMPLATE_TEST_TOKEN }}", &ctx()).unwrap();
        assert_eq!(result, "Bearer secret");
    }

    #[test]
    fn test_env_lookup_disabled() {
        std::env::set_var("PAGEWALK_TEMPLATE_TEST_DISABLED", "secret");
        let mut ctx = ctx();
        ctx.allow_env = false;
        assert!(render("{{ env.PAGEWALK_TEMPLATE_TEST_DISABLED }}", &ctx).is_err());
    }

    #[test]
    fn test_undefined_variable() {
        let result = render("{{ params.Missing }} {{ other.root }}", &ctx());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("params.Missing"));
        assert!(err.contains("other.root"));
    }

    #[test]
    fn test_no_templates() {
        let result = render("plain string without templates", &ctx()).unwrap();
        assert_eq!(result, "plain string without templates");
    }

    #[test]
    fn test_has_templates() {
        assert!(has_templates("{{ params.Bucket }}"));
        assert!(has_templates("prefix {{ var }} suffix"));
        assert!(!has_templates("no templates here"));
        assert!(!has_templates("{ not a template }"));
    }

    #[test]
    fn test_extract_variables() {
        let vars = extract_variables("{{ params.a }} and {{ env.B }}");
        assert_eq!(vars, vec!["params.a", "env.B"]);
    }

    #[test]
    fn test_number_and_bool_substitution() {
        let result = render(
            "max={{ params.MaxKeys }}&recursive={{ params.Recursive }}",
            &ctx(),
        )
        .unwrap();
        assert_eq!(result, "max=100&recursive=true");
    }

    #[test]
    fn test_whitespace_in_template() {
        assert_eq!(render("{{params.Bucket}}", &ctx()).unwrap(), "photos");
        assert_eq!(render("{{  params.Bucket  }}", &ctx()).unwrap(), "photos");
    }

    #[test]
    fn test_render_value_and_prune() {
        let input = json!({
            "Bucket": "{{ params.Bucket }}",
            "Prefix": "{{ params.Prefix }}",
            "Options": {"Tag": "{{ params.Prefix }}", "Fixed": "yes"},
            "Count": 3
        });

        let rendered = render_value(&input, &ctx()).unwrap();
        assert_eq!(
            prune_empty(rendered),
            json!({
                "Bucket": "photos",
                "Options": {"Fixed": "yes"},
                "Count": 3
            })
        );
    }
}
