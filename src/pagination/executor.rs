//! Paginated list executor
//!
//! Runs a [`ListOperation`] repeatedly, following continuation cursors,
//! and streams one projected value per page into an [`OutputSink`].

use super::types::{
    CursorRequest, CursorResponse, InvocationOutcome, PaginationState, PagingControl, Termination,
};
use crate::error::Result;
use crate::operation::ListOperation;
use crate::output::{OutputSink, Projection};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Configuration for the executor
#[derive(Debug, Clone, Default)]
pub struct ExecutorConfig {
    /// Stop after this many pages even if the service reports more
    ///
    /// `None` follows cursors until the service stops returning one. A
    /// service that keeps returning the same cursor is then never left.
    /// At least one page is always fetched.
    pub max_pages: Option<usize>,
}

impl ExecutorConfig {
    /// Create a new executor config
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of pages fetched per invocation
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }
}

/// Drives a paged list operation until exhaustion or a single page
pub struct PaginatedListExecutor<'a, O: ?Sized> {
    operation: &'a O,
    config: ExecutorConfig,
}

impl<'a, O> PaginatedListExecutor<'a, O>
where
    O: ListOperation + ?Sized,
{
    /// Create an executor for an operation
    pub fn new(operation: &'a O) -> Self {
        Self {
            operation,
            config: ExecutorConfig::default(),
        }
    }

    /// Set executor configuration
    #[must_use]
    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the executor configuration
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Run one invocation
    ///
    /// `request` is the populated request template; its cursor field is
    /// overwritten before every call. Faults do not surface as `Err`: they
    /// end the loop and are reported on the returned outcome.
    pub async fn execute<C, T, S>(
        &self,
        mut request: O::Request,
        control: &PagingControl,
        projection: &Projection<O::Response, C, T>,
        context: &C,
        sink: &mut S,
    ) -> InvocationOutcome
    where
        C: ?Sized,
        S: OutputSink<T> + ?Sized,
    {
        let start = Instant::now();
        let operation = self.operation.name();
        let user_controlling_paging = control.user_controlling_paging();
        let deferred = projection.is_deferred();

        let mut state = PaginationState::new(control.initial_cursor.clone());
        let mut fault = None;

        debug!(
            operation,
            user_controlling_paging,
            deferred,
            cursor = ?state.cursor,
            "Starting paginated list"
        );

        let mut termination = loop {
            request.set_cursor(state.current_cursor());

            let page = state.pages_fetched + 1;
            debug!(operation, page, cursor = ?state.cursor, "Fetching page");

            let response = match self.operation.list(&request).await {
                Ok(response) => response,
                Err(e) => {
                    let e = self.operation.normalize_fault(e);
                    warn!(operation, page, error = %e, "Page fetch failed");
                    fault = Some(e);
                    break Termination::Faulted;
                }
            };
            state.record_page();

            if !deferred {
                if let Some(value) = projection.apply(Some(&response), context) {
                    if let Err(e) = sink.emit(value) {
                        warn!(operation, page, error = %e, "Failed to emit page");
                        fault = Some(e);
                        break Termination::Faulted;
                    }
                    state.record_emission();
                }
            }

            state.advance(response.next_cursor());

            if user_controlling_paging {
                break Termination::UserLimited;
            }
            if !state.has_more() {
                break Termination::Exhausted;
            }
            if let Some(max_pages) = self.config.max_pages {
                if state.pages_fetched >= max_pages {
                    warn!(
                        operation,
                        max_pages, "Page limit reached with more pages available"
                    );
                    break Termination::PageLimit;
                }
            }
        };

        if deferred && fault.is_none() {
            if let Some(value) = projection.apply(None, context) {
                match sink.emit(value) {
                    Ok(()) => state.record_emission(),
                    Err(e) => {
                        warn!(operation, error = %e, "Failed to emit selected parameter");
                        fault = Some(e);
                        termination = Termination::Faulted;
                    }
                }
            }
        }

        let elapsed_ms = start.elapsed().as_millis() as u64;
        info!(
            operation,
            pages = state.pages_fetched,
            emitted = state.emitted,
            termination = ?termination,
            elapsed_ms,
            "Completed paginated list"
        );

        InvocationOutcome::from_state(termination, state, fault)
    }

    /// Run one invocation, blocking the calling thread on every page
    ///
    /// Uses a private current-thread runtime, so it must not be called
    /// from inside an async context.
    pub fn execute_blocking<C, T, S>(
        &self,
        request: O::Request,
        control: &PagingControl,
        projection: &Projection<O::Response, C, T>,
        context: &C,
        sink: &mut S,
    ) -> Result<InvocationOutcome>
    where
        C: ?Sized,
        S: OutputSink<T> + ?Sized,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(runtime.block_on(self.execute(request, control, projection, context, sink)))
    }
}
