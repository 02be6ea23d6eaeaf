//! Pagination module
//!
//! Drives cursor-based list operations page by page.
//!
//! # Overview
//!
//! A list operation accepts a request carrying a continuation cursor and
//! returns a page carrying the next cursor. The [`PaginatedListExecutor`]
//! keeps calling the operation, forwarding each next cursor, until the
//! service stops returning one. Callers that supply their own starting
//! cursor (or opt out with `no_auto_iteration`) take over paging and get
//! exactly one page per invocation.
//!
//! Every page is projected and emitted to the output sink as soon as it
//! arrives. A failed fetch ends the invocation; pages already emitted stand.

mod executor;
mod types;

pub use executor::{ExecutorConfig, PaginatedListExecutor};
pub use types::{
    has_cursor, CursorRequest, CursorResponse, InvocationOutcome, PaginationState, PagingControl,
    Termination,
};
