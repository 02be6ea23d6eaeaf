//! S3 `ListObjectsV2` as a list operation

use super::types::ListOperation;
use crate::error::{Error, Result};
use crate::output::{InvocationContext, SelectableResponse};
use crate::pagination::{CursorRequest, CursorResponse};
use crate::types::JsonValue;
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::DateTimeFormat;
use aws_sdk_s3::Client;
use serde::Serialize;

const PARAMETERS: [&str; 4] = ["Bucket", "Prefix", "Delimiter", "MaxKeys"];

/// Caller filters for `ListObjectsV2`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListObjectsParams {
    /// Bucket name
    pub bucket: String,
    /// Key prefix
    pub prefix: Option<String>,
    /// Grouping delimiter
    pub delimiter: Option<String>,
    /// Keys per page
    pub max_keys: Option<i32>,
}

impl ListObjectsParams {
    /// List a whole bucket
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Default::default()
        }
    }

    /// Request template for these filters
    pub fn request(&self) -> ListObjectsRequest {
        ListObjectsRequest {
            bucket: self.bucket.clone(),
            prefix: self.prefix.clone(),
            delimiter: self.delimiter.clone(),
            max_keys: self.max_keys,
            continuation_token: None,
        }
    }
}

impl InvocationContext for ListObjectsParams {
    fn parameter(&self, name: &str) -> Option<JsonValue> {
        let name = PARAMETERS
            .iter()
            .find(|declared| declared.eq_ignore_ascii_case(name))?;
        let value = match *name {
            "Bucket" => JsonValue::String(self.bucket.clone()),
            "Prefix" => self.prefix.clone().map_or(JsonValue::Null, JsonValue::String),
            "Delimiter" => self
                .delimiter
                .clone()
                .map_or(JsonValue::Null, JsonValue::String),
            _ => self.max_keys.map_or(JsonValue::Null, JsonValue::from),
        };
        Some(value)
    }

    fn has_parameter(&self, name: &str) -> bool {
        PARAMETERS.iter().any(|p| p.eq_ignore_ascii_case(name))
    }

    fn primary_parameter(&self) -> Option<&str> {
        Some(PARAMETERS[0])
    }
}

/// One `ListObjectsV2` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListObjectsRequest {
    bucket: String,
    prefix: Option<String>,
    delimiter: Option<String>,
    max_keys: Option<i32>,
    continuation_token: Option<String>,
}

impl ListObjectsRequest {
    /// Continuation token currently set
    pub fn continuation_token(&self) -> Option<&str> {
        self.continuation_token.as_deref()
    }
}

impl CursorRequest for ListObjectsRequest {
    fn set_cursor(&mut self, cursor: Option<&str>) {
        self.continuation_token = cursor.map(String::from);
    }
}

/// Object entry of a listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectSummary {
    /// Object key
    pub key: Option<String>,
    /// Size in bytes
    pub size: Option<i64>,
    /// Last modification time (RFC 3339)
    pub last_modified: Option<String>,
    /// Entity tag
    #[serde(rename = "ETag")]
    pub e_tag: Option<String>,
    /// Storage class
    pub storage_class: Option<String>,
}

/// One `ListObjectsV2` page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListObjectsPage {
    /// Objects on this page
    pub contents: Vec<ObjectSummary>,
    /// Grouped key prefixes (with a delimiter)
    pub common_prefixes: Vec<String>,
    /// Keys returned on this page
    pub key_count: Option<i32>,
    /// Whether more keys follow
    pub is_truncated: Option<bool>,
    /// Cursor for the following page
    pub next_continuation_token: Option<String>,
}

impl CursorResponse for ListObjectsPage {
    fn next_cursor(&self) -> Option<&str> {
        self.next_continuation_token.as_deref()
    }
}

impl SelectableResponse for ListObjectsPage {
    fn to_json(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }
}

/// S3 object listing
#[derive(Debug, Clone)]
pub struct S3ListObjects {
    client: Client,
    region: Option<String>,
}

impl S3ListObjects {
    /// Wrap an existing client
    pub fn new(client: Client) -> Self {
        let region = client.config().region().map(ToString::to_string);
        Self { client, region }
    }

    /// Build a client from the environment
    ///
    /// `region` overrides the default provider chain; `endpoint` points the
    /// client at an S3-compatible service (path-style addressing).
    pub async fn from_env(region: Option<String>, endpoint: Option<&str>) -> Self {
        let region = RegionProviderChain::first_try(region.map(Region::new)).or_default_provider();
        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region);
        if let Some(endpoint) = endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(endpoint.is_some())
            .build();
        Self::new(Client::from_conf(s3_config))
    }

    fn endpoint_description(&self) -> String {
        match &self.region {
            Some(region) => format!("s3.{region}.amazonaws.com"),
            None => "s3".to_string(),
        }
    }
}

#[async_trait]
impl ListOperation for S3ListObjects {
    type Request = ListObjectsRequest;
    type Response = ListObjectsPage;

    fn name(&self) -> &str {
        "ListObjectsV2"
    }

    async fn list(&self, request: &ListObjectsRequest) -> Result<ListObjectsPage> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(&request.bucket)
            .set_prefix(request.prefix.clone())
            .set_delimiter(request.delimiter.clone())
            .set_max_keys(request.max_keys)
            .set_continuation_token(request.continuation_token.clone())
            .send()
            .await
            .map_err(|e| {
                let message = DisplayErrorContext(&e).to_string();
                Error::Anyhow(anyhow::Error::new(e).context(message))
            })?;

        let contents = output
            .contents()
            .iter()
            .map(|object| ObjectSummary {
                key: object.key().map(String::from),
                size: object.size(),
                last_modified: object
                    .last_modified()
                    .and_then(|t| t.fmt(DateTimeFormat::DateTime).ok()),
                e_tag: object.e_tag().map(String::from),
                storage_class: object.storage_class().map(|c| c.as_str().to_string()),
            })
            .collect();

        let common_prefixes = output
            .common_prefixes()
            .iter()
            .filter_map(|p| p.prefix().map(String::from))
            .collect();

        Ok(ListObjectsPage {
            contents,
            common_prefixes,
            key_count: output.key_count(),
            is_truncated: output.is_truncated(),
            next_continuation_token: output.next_continuation_token().map(String::from),
        })
    }

    fn normalize_fault(&self, err: Error) -> Error {
        match err.normalize_name_resolution(&self.endpoint_description()) {
            Error::Anyhow(e) => Error::service(self.name(), format!("{e}")),
            other => other,
        }
    }
}
