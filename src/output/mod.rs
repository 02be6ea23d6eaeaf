//! Output module
//!
//! Turns fetched pages into emitted values.
//!
//! # Overview
//!
//! This module provides:
//! - [`Projection`] - the function applied to each page (or once, after
//!   paging, in parameter-select mode)
//! - [`Select`] / [`OutputOptions`] - `*`, `^Parameter` and dotted-path
//!   selection expressions resolved into projections
//! - [`OutputSink`] - destinations for emitted values (vectors, closures,
//!   channels, JSON lines writers)

mod projection;
mod select;
mod sink;

pub use projection::{Projection, SelectMode};
pub use select::{
    lookup_path, select_path, InvocationContext, OutputOptions, Select, SelectableResponse,
};
pub use sink::{ChannelSink, FnSink, JsonLinesSink, OutputSink};
