//! Output sinks
//!
//! Destinations for values emitted by the executor. Each emission is
//! delivered as soon as its page is projected.

use crate::error::{Error, Result};
use crate::types::JsonValue;
use serde::Serialize;
use std::io::{self, Write};
use tokio::sync::mpsc;

/// Receives emitted values
pub trait OutputSink<T> {
    /// Deliver one value
    fn emit(&mut self, value: T) -> Result<()>;
}

impl<T> OutputSink<T> for Vec<T> {
    fn emit(&mut self, value: T) -> Result<()> {
        self.push(value);
        Ok(())
    }
}

/// Sink backed by a closure
pub struct FnSink<F>(F);

impl<F> FnSink<F> {
    /// Wrap a closure
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<T, F> OutputSink<T> for FnSink<F>
where
    F: FnMut(T) -> Result<()>,
{
    fn emit(&mut self, value: T) -> Result<()> {
        (self.0)(value)
    }
}

/// Sink forwarding values to a tokio channel
#[derive(Debug, Clone)]
pub struct ChannelSink<T> {
    sender: mpsc::UnboundedSender<T>,
}

impl<T> ChannelSink<T> {
    /// Wrap an existing sender
    pub fn new(sender: mpsc::UnboundedSender<T>) -> Self {
        Self { sender }
    }

    /// Create a sink and the receiver it feeds
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<T>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl<T> OutputSink<T> for ChannelSink<T> {
    fn emit(&mut self, value: T) -> Result<()> {
        self.sender
            .send(value)
            .map_err(|_| Error::output("output receiver was dropped"))
    }
}

/// Sink writing one JSON document per line
///
/// With `enumerate` on, an emitted array is written one element per line,
/// so a page's result collection streams as individual records.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    pretty: bool,
    enumerate: bool,
}

impl JsonLinesSink<io::Stdout> {
    /// Write to standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonLinesSink<W> {
    /// Write to the given writer
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: false,
            enumerate: true,
        }
    }

    /// Pretty-print each document
    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Write array elements individually
    #[must_use]
    pub fn enumerate(mut self, enumerate: bool) -> Self {
        self.enumerate = enumerate;
        self
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_document(&mut self, value: &JsonValue) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, value)?;
        } else {
            serde_json::to_writer(&mut self.writer, value)?;
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

impl<W: Write, T: Serialize> OutputSink<T> for JsonLinesSink<W> {
    fn emit(&mut self, value: T) -> Result<()> {
        match serde_json::to_value(value)? {
            JsonValue::Array(items) if self.enumerate => {
                for item in &items {
                    self.write_document(item)?;
                }
            }
            other => self.write_document(&other)?,
        }
        self.writer.flush()?;
        Ok(())
    }
}
