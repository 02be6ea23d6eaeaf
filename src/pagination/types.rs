//! Pagination types and traits
//!
//! Cursor plumbing, paging control and invocation outcome shared by the
//! executor and every list operation.

use crate::error::{Error, Result};
use crate::types::OptionStringExt;

/// A request that carries a continuation cursor
pub trait CursorRequest {
    /// Replace the cursor sent with the next call (`None` means first page)
    fn set_cursor(&mut self, cursor: Option<&str>);
}

/// A page that may point at a following page
pub trait CursorResponse {
    /// Cursor for the following page, if the service returned one
    fn next_cursor(&self) -> Option<&str>;
}

/// Check whether a cursor signals more pages (absent and empty both mean no)
pub fn has_cursor(cursor: Option<&str>) -> bool {
    cursor.is_some_and(|c| !c.is_empty())
}

/// Caller-side paging choices for one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagingControl {
    /// Fetch a single page even when the service reports more
    pub no_auto_iteration: bool,
    /// Cursor to start from, as returned by an earlier invocation
    pub initial_cursor: Option<String>,
}

impl PagingControl {
    /// Automatic paging from the first page
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a cursor returned by an earlier invocation
    pub fn resume_from(cursor: impl Into<String>) -> Self {
        Self {
            no_auto_iteration: false,
            initial_cursor: Some(cursor.into()),
        }
    }

    /// Set the no-auto-iteration flag
    #[must_use]
    pub fn with_no_auto_iteration(mut self, no_auto_iteration: bool) -> Self {
        self.no_auto_iteration = no_auto_iteration;
        self
    }

    /// Set the starting cursor
    #[must_use]
    pub fn with_initial_cursor(mut self, cursor: Option<String>) -> Self {
        self.initial_cursor = cursor;
        self
    }

    /// Whether the caller supplied a starting cursor (an empty one counts)
    pub fn cursor_supplied(&self) -> bool {
        self.initial_cursor.is_some()
    }

    /// Whether the caller drives paging one page at a time
    pub fn user_controlling_paging(&self) -> bool {
        self.no_auto_iteration || self.cursor_supplied()
    }
}

/// Why an invocation stopped fetching pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The service returned no further cursor
    Exhausted,
    /// The caller controls paging and one page was fetched
    UserLimited,
    /// The configured page cap was reached
    PageLimit,
    /// A fetch or an emission failed
    Faulted,
}

impl Termination {
    /// Check if this is a clean end of data
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    /// Check if the invocation failed
    pub fn is_faulted(&self) -> bool {
        matches!(self, Self::Faulted)
    }
}

/// Tracks paging progress during one invocation
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Cursor to send with the next request
    pub cursor: Option<String>,
    /// Pages fetched successfully
    pub pages_fetched: usize,
    /// Values emitted to the sink
    pub emitted: usize,
}

impl PaginationState {
    /// Create state starting at the given cursor
    pub fn new(initial_cursor: Option<String>) -> Self {
        Self {
            cursor: initial_cursor.none_if_empty(),
            ..Default::default()
        }
    }

    /// Cursor to place on the outgoing request
    pub fn current_cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Adopt the cursor returned by the latest page
    pub fn advance(&mut self, next: Option<&str>) {
        self.cursor = next.filter(|c| !c.is_empty()).map(String::from);
    }

    /// Count a fetched page
    pub fn record_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Count an emitted value
    pub fn record_emission(&mut self) {
        self.emitted += 1;
    }

    /// Whether another page may exist
    pub fn has_more(&self) -> bool {
        has_cursor(self.current_cursor())
    }
}

/// Final status of one executor invocation
#[derive(Debug)]
pub struct InvocationOutcome {
    /// Why paging stopped
    pub termination: Termination,
    /// Pages fetched successfully
    pub pages_fetched: usize,
    /// Values emitted to the sink
    pub emitted: usize,
    /// Cursor to pass as `initial_cursor` to continue where this run stopped
    pub resume_cursor: Option<String>,
    /// The fault that ended the invocation
    pub fault: Option<Error>,
}

impl InvocationOutcome {
    pub(crate) fn from_state(
        termination: Termination,
        state: PaginationState,
        fault: Option<Error>,
    ) -> Self {
        Self {
            termination,
            pages_fetched: state.pages_fetched,
            emitted: state.emitted,
            resume_cursor: state.cursor,
            fault,
        }
    }

    /// Check if the invocation failed
    pub fn is_faulted(&self) -> bool {
        self.fault.is_some()
    }

    /// Whether the service reported more pages than were fetched
    pub fn has_more(&self) -> bool {
        has_cursor(self.resume_cursor.as_deref())
    }

    /// Turn a faulted outcome into its error
    pub fn into_result(mut self) -> Result<Self> {
        match self.fault.take() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}
