// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for structured logging.
//!
//! Each message is a small struct borrowing the values it reports. `Display`
//! renders the human readable line; [`StructuredLog::log`] emits it at the
//! message's level with the values attached as fields.
//!
//! * `engine` - run lifecycle and step execution events
//! * `catalog` - dataset I/O events
//! * `validation` - pipeline validation failures

use tracing::Span;

pub mod catalog;
pub mod engine;
pub mod validation;

/// A loggable event with structured fields.
pub trait StructuredLog {
    /// Emit the event at its level
    fn log(&self);

    /// A span carrying the same fields
    fn span(&self, name: &str) -> Span;
}
