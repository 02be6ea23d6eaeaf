//! Binding caller parameters to an operation definition
//!
//! Produces the statically typed [`ListEndpoint`] and [`InvocationParams`]
//! for one invocation. Every argument error is raised here, before any
//! request is sent.

use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use crate::loader::types::{ApiDefinition, HttpDefinition, OperationDefinition};
use crate::operation::{CursorSpec, HttpListOperation, InvocationParams, ListEndpoint, PageSize};
use crate::output::InvocationContext;
use crate::template::{extract_variables, prune_empty, render, render_value, TemplateContext};
use crate::types::StringMap;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// An operation definition with caller parameters applied
#[derive(Debug, Clone)]
pub struct BoundOperation {
    /// Request description
    pub endpoint: ListEndpoint,
    /// Bound parameters (after defaults)
    pub params: InvocationParams,
    /// Transport configuration
    pub http: HttpClientConfig,
}

impl BoundOperation {
    /// Build the HTTP list operation
    pub fn into_operation(self) -> Result<(HttpListOperation, InvocationParams)> {
        let client = HttpClient::with_config(self.http)?;
        Ok((HttpListOperation::new(client, self.endpoint), self.params))
    }
}

/// Bind `supplied` parameters to the named operation
pub fn bind_operation(
    api: &ApiDefinition,
    operation: &str,
    supplied: &[(String, String)],
) -> Result<BoundOperation> {
    let op = api.operation(operation).ok_or_else(|| {
        Error::invalid_argument(
            "operation",
            format!(
                "'{operation}' is not defined; available operations: {}",
                api.operation_names().join(", ")
            ),
        )
    })?;

    let params = bind_params(op, supplied)?;
    let ctx = TemplateContext::with_params(params.to_json());

    let url = build_url(&api.base_url, &op.path, &ctx)?;

    let api_headers = api.headers.iter().filter(|(name, value)| {
        let applies = uses_declared_params(value, &params);
        if !applies {
            debug!(
                operation = %op.name,
                header = %name,
                "Skipping API header that needs parameters this operation does not declare"
            );
        }
        applies
    });
    let query = render_map(&op.params, &ctx)?;
    let headers = render_map(api_headers.chain(&op.headers), &ctx)?;
    let body = match &op.body {
        Some(body) => Some(prune_empty(render_value(body, &ctx)?)),
        None => None,
    };

    let cursor = CursorSpec {
        param: op.cursor.param.clone(),
        location: op.cursor.location,
        response_path: op.cursor.response_path().to_string(),
    };

    let endpoint = ListEndpoint {
        name: op.name.clone(),
        url,
        method: op.method,
        query,
        headers,
        body,
        cursor,
        page_size: op.page_size.as_ref().map(|p| PageSize {
            param: p.param.clone(),
            value: p.value,
        }),
        items_path: op.items_path.clone(),
    };

    debug!(
        operation = %endpoint.name,
        url = %endpoint.url,
        query = ?endpoint.query,
        "Bound operation"
    );

    Ok(BoundOperation {
        endpoint,
        params,
        http: http_config(&api.http),
    })
}

/// Bind caller values, then fill defaults and check required parameters
fn bind_params(op: &OperationDefinition, supplied: &[(String, String)]) -> Result<InvocationParams> {
    let mut params = InvocationParams::new(op.parameter_names());
    for (name, value) in supplied {
        params.bind(name, value.as_str())?;
    }

    for declared in &op.parameters {
        if params.is_bound(&declared.name) {
            continue;
        }
        match &declared.default {
            Some(default) => params.bind(&declared.name, default.as_str())?,
            None if declared.required => {
                return Err(Error::missing_parameter(&declared.name));
            }
            None => {}
        }
    }

    Ok(params)
}

/// Render templated values, dropping the ones that render empty
fn render_map<'a, I>(entries: I, ctx: &TemplateContext) -> Result<StringMap>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut rendered = HashMap::new();
    for (key, value) in entries {
        let value = render(value, ctx)?;
        if !value.is_empty() {
            rendered.insert(key.clone(), value);
        }
    }
    Ok(rendered)
}

/// Whether every `params.*` variable in `template` is declared by the operation
fn uses_declared_params(template: &str, params: &InvocationParams) -> bool {
    extract_variables(template)
        .iter()
        .filter_map(|var| var.strip_prefix("params."))
        .filter_map(|path| path.split('.').next())
        .all(|name| params.has_parameter(name))
}

/// Append the rendered path to `base`, percent-encoding each segment
fn build_url(base: &str, path: &str, ctx: &TemplateContext) -> Result<String> {
    if path.starts_with("http://") || path.starts_with("https://") {
        return render(path, ctx);
    }

    let mut url = Url::parse(base)?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| Error::config(format!("base_url '{base}' cannot take a path")))?;
        segments.pop_if_empty();
        for segment in path.trim_start_matches('/').split('/') {
            segments.push(&render(segment, ctx)?);
        }
    }
    Ok(url.to_string())
}

/// Map the definition's transport settings onto the client config
pub fn http_config(def: &HttpDefinition) -> HttpClientConfig {
    let mut builder = HttpClientConfig::builder()
        .timeout(Duration::from_secs(def.timeout_secs))
        .max_retries(def.max_retries)
        .backoff(
            def.backoff,
            Duration::from_millis(def.initial_backoff_ms),
            Duration::from_millis(def.max_backoff_ms),
        );
    if let Some(agent) = &def.user_agent {
        builder = builder.user_agent(agent);
    }
    builder.build()
}
