//! Output projection
//!
//! A projection maps a fetched page (plus the invocation context) to the
//! value written to the output sink.

use std::fmt;

/// When a projection runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    /// Once per fetched page, as the page arrives
    EachPage,
    /// Once after paging ends, with no page (parameter-select mode)
    Deferred,
}

/// Mapping from a page to an emitted value
///
/// Chosen once before paging starts and applied uniformly. Returning `None`
/// emits nothing for that page.
pub struct Projection<R, C: ?Sized, T> {
    mode: SelectMode,
    func: Box<dyn Fn(Option<&R>, &C) -> Option<T> + Send + Sync>,
}

impl<R, C, T> Projection<R, C, T>
where
    R: 'static,
    C: ?Sized + 'static,
    T: 'static,
{
    /// Project every page as it arrives
    pub fn each_page<F>(f: F) -> Self
    where
        F: Fn(&R, &C) -> Option<T> + Send + Sync + 'static,
    {
        Self {
            mode: SelectMode::EachPage,
            func: Box::new(move |response: Option<&R>, context: &C| {
                response.and_then(|r| f(r, context))
            }),
        }
    }

    /// Emit a single value computed from the context after paging ends
    pub fn deferred<F>(f: F) -> Self
    where
        F: Fn(&C) -> Option<T> + Send + Sync + 'static,
    {
        Self {
            mode: SelectMode::Deferred,
            func: Box::new(move |_: Option<&R>, context: &C| f(context)),
        }
    }

    /// Build a projection from a raw function and an explicit mode
    ///
    /// In [`SelectMode::Deferred`] the function is called with `None`.
    pub fn from_fn<F>(mode: SelectMode, f: F) -> Self
    where
        F: Fn(Option<&R>, &C) -> Option<T> + Send + Sync + 'static,
    {
        Self {
            mode,
            func: Box::new(f),
        }
    }
}

impl<R, C: ?Sized, T> Projection<R, C, T> {
    /// When this projection runs
    pub fn mode(&self) -> SelectMode {
        self.mode
    }

    /// Check if this projection runs once after paging
    pub fn is_deferred(&self) -> bool {
        self.mode == SelectMode::Deferred
    }

    /// Apply the projection
    pub fn apply(&self, response: Option<&R>, context: &C) -> Option<T> {
        (self.func)(response, context)
    }
}

impl<R, C: ?Sized, T> fmt::Debug for Projection<R, C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projection")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
