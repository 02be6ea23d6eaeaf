//! List operations
//!
//! The upstream side of pagination: something that accepts a request with
//! a continuation cursor and returns one page.
//!
//! # Overview
//!
//! - [`ListOperation`] - trait implemented by every paged list call
//! - [`HttpListOperation`] - JSON-over-HTTP list endpoints described by a
//!   [`ListEndpoint`]
//! - `S3ListObjects` - S3 `ListObjectsV2` (feature `aws`)

mod http;
#[cfg(feature = "aws")]
mod s3;
mod types;

pub use http::{CursorSpec, HttpListOperation, ListEndpoint, ListPage, ListRequest, PageSize};
#[cfg(feature = "aws")]
pub use s3::{ListObjectsPage, ListObjectsParams, ListObjectsRequest, ObjectSummary, S3ListObjects};
pub use types::{InvocationParams, ListOperation};

#[cfg(test)]
mod tests;
