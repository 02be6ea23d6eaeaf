//! JSON-over-HTTP list operation
//!
//! A [`ListEndpoint`] is the fully bound, statically typed description of
//! one list call. [`ListEndpoint::request`] maps it to the request template
//! the executor mutates page by page.

use super::types::ListOperation;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::output::{lookup_path, SelectableResponse};
use crate::pagination::{CursorRequest, CursorResponse};
use crate::types::{CursorLocation, JsonValue, Method, StringMap};
use async_trait::async_trait;

/// Where the cursor goes on requests and where it is found in responses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorSpec {
    /// Request parameter (or body field) carrying the cursor
    pub param: String,
    /// Placement of the cursor on the request
    pub location: CursorLocation,
    /// Dotted path of the next cursor in the response body
    pub response_path: String,
}

impl CursorSpec {
    /// Cursor sent as a query parameter
    pub fn query(param: impl Into<String>, response_path: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            location: CursorLocation::Query,
            response_path: response_path.into(),
        }
    }

    /// Cursor sent as a JSON body field
    pub fn body(param: impl Into<String>, response_path: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            location: CursorLocation::Body,
            response_path: response_path.into(),
        }
    }
}

/// Page size parameter sent with every request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSize {
    /// Parameter name
    pub param: String,
    /// Items per page
    pub value: u32,
}

/// Bound configuration of one HTTP list call
#[derive(Debug, Clone, PartialEq)]
pub struct ListEndpoint {
    /// Operation name
    pub name: String,
    /// Absolute URL
    pub url: String,
    /// HTTP method
    pub method: Method,
    /// Filter query parameters
    pub query: StringMap,
    /// Request headers
    pub headers: StringMap,
    /// JSON body (POST-style list calls)
    pub body: Option<JsonValue>,
    /// Cursor placement
    pub cursor: CursorSpec,
    /// Optional page size
    pub page_size: Option<PageSize>,
    /// Dotted path of the result collection in the response body
    pub items_path: Option<String>,
}

impl ListEndpoint {
    /// Create an endpoint with no filters
    pub fn new(name: impl Into<String>, url: impl Into<String>, cursor: CursorSpec) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            method: Method::GET,
            query: StringMap::new(),
            headers: StringMap::new(),
            body: None,
            cursor,
            page_size: None,
            items_path: None,
        }
    }

    /// Set the HTTP method
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Add a filter query parameter
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add a header
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the JSON body
    #[must_use]
    pub fn with_body(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// Set the page size parameter
    #[must_use]
    pub fn with_page_size(mut self, param: impl Into<String>, value: u32) -> Self {
        self.page_size = Some(PageSize {
            param: param.into(),
            value,
        });
        self
    }

    /// Set the result collection path
    #[must_use]
    pub fn with_items_path(mut self, path: impl Into<String>) -> Self {
        self.items_path = Some(path.into());
        self
    }

    /// Host name of the endpoint, for error messages
    pub fn host(&self) -> String {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(String::from))
            .unwrap_or_else(|| self.url.clone())
    }

    /// Build the request template (no cursor yet)
    pub fn request(&self) -> ListRequest {
        let mut query = self.query.clone();
        let mut body = self.body.clone();

        if let Some(page_size) = &self.page_size {
            match self.cursor.location {
                CursorLocation::Query => {
                    query.insert(page_size.param.clone(), page_size.value.to_string());
                }
                CursorLocation::Body => {
                    insert_body_field(
                        &mut body,
                        &page_size.param,
                        JsonValue::from(page_size.value),
                    );
                }
            }
        }

        ListRequest {
            query,
            headers: self.headers.clone(),
            body,
            cursor_param: self.cursor.param.clone(),
            cursor_location: self.cursor.location,
            cursor: None,
        }
    }
}

/// Request template for one page
#[derive(Debug, Clone, PartialEq)]
pub struct ListRequest {
    /// Filter query parameters
    pub query: StringMap,
    /// Request headers
    pub headers: StringMap,
    /// JSON body
    pub body: Option<JsonValue>,
    cursor_param: String,
    cursor_location: CursorLocation,
    cursor: Option<String>,
}

impl ListRequest {
    /// Cursor currently set on the request
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Transport config for this page, cursor included
    pub fn to_request_config(&self) -> RequestConfig {
        let mut config = RequestConfig::new();
        config.query = self.query.clone();
        config.headers = self.headers.clone();
        let mut body = self.body.clone();

        if let Some(cursor) = &self.cursor {
            match self.cursor_location {
                CursorLocation::Query => {
                    config.query.insert(self.cursor_param.clone(), cursor.clone());
                }
                CursorLocation::Body => {
                    insert_body_field(
                        &mut body,
                        &self.cursor_param,
                        JsonValue::String(cursor.clone()),
                    );
                }
            }
        }

        config.body = body;
        config
    }
}

impl CursorRequest for ListRequest {
    fn set_cursor(&mut self, cursor: Option<&str>) {
        self.cursor = cursor.map(String::from);
    }
}

/// One decoded page
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage {
    /// Raw response body
    pub body: JsonValue,
    /// Result collection
    pub items: Vec<JsonValue>,
    /// Cursor for the following page
    pub next_cursor: Option<String>,
}

impl ListPage {
    /// Decode a page from a response body
    pub fn from_body(body: JsonValue, cursor_path: &str, items_path: Option<&str>) -> Self {
        let next_cursor = lookup_path(&body, cursor_path).and_then(cursor_string);

        let items = match items_path {
            Some(path) => match lookup_path(&body, path) {
                Some(JsonValue::Array(items)) => items.clone(),
                Some(JsonValue::Null) | None => Vec::new(),
                Some(other) => vec![other.clone()],
            },
            None => match &body {
                JsonValue::Array(items) => items.clone(),
                _ => Vec::new(),
            },
        };

        Self {
            body,
            items,
            next_cursor,
        }
    }
}

impl CursorResponse for ListPage {
    fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }
}

impl SelectableResponse for ListPage {
    fn to_json(&self) -> JsonValue {
        self.body.clone()
    }

    fn select(&self, path: &str) -> Option<JsonValue> {
        lookup_path(&self.body, path).cloned()
    }

    fn items(&self, _path: &str) -> Option<JsonValue> {
        Some(JsonValue::Array(self.items.clone()))
    }
}

/// List operation calling a JSON HTTP endpoint
#[derive(Debug)]
pub struct HttpListOperation {
    client: HttpClient,
    endpoint: ListEndpoint,
}

impl HttpListOperation {
    /// Create an operation for an endpoint
    pub fn new(client: HttpClient, endpoint: ListEndpoint) -> Self {
        Self { client, endpoint }
    }

    /// Get the endpoint
    pub fn endpoint(&self) -> &ListEndpoint {
        &self.endpoint
    }
}

#[async_trait]
impl ListOperation for HttpListOperation {
    type Request = ListRequest;
    type Response = ListPage;

    fn name(&self) -> &str {
        &self.endpoint.name
    }

    async fn list(&self, request: &ListRequest) -> Result<ListPage> {
        let config = request.to_request_config();
        let response = self
            .client
            .request(self.endpoint.method.into(), &self.endpoint.url, config)
            .await?;

        let body_text = response
            .text()
            .await
            .map_err(|e| Error::decode(format!("Failed to read response body: {e}")))?;
        let body: JsonValue = if body_text.trim().is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_str(&body_text)?
        };

        Ok(ListPage::from_body(
            body,
            &self.endpoint.cursor.response_path,
            self.endpoint.items_path.as_deref(),
        ))
    }

    fn normalize_fault(&self, err: Error) -> Error {
        err.normalize_name_resolution(&self.endpoint.host())
    }
}

/// Cursor values may be strings or numbers; empty strings mean none
fn cursor_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Set a top-level field on a JSON object body, creating the object if needed
fn insert_body_field(body: &mut Option<JsonValue>, key: &str, value: JsonValue) {
    let body = body.get_or_insert_with(|| JsonValue::Object(serde_json::Map::new()));
    if let JsonValue::Object(map) = body {
        map.insert(key.to_string(), value);
    }
}
