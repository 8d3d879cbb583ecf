// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structured logging for the conduit.
//!
//! Log lines are produced from message structs that implement `Display` and
//! [`messages::StructuredLog`], instead of format strings scattered through the
//! engine. Messages are grouped by subsystem:
//!
//! * `messages::engine` - run lifecycle and step execution events
//! * `messages::catalog` - dataset loads, saves and releases
//! * `messages::validation` - pipeline validation failures
//!
//! # Usage
//!
//! ```rust
//! use the_conduit::observability::messages::engine::StepCompleted;
//! use the_conduit::observability::messages::StructuredLog;
//! use std::time::Duration;
//!
//! StepCompleted {
//!     step: "preprocess_companies",
//!     duration: Duration::from_millis(12),
//! }
//! .log();
//! ```

pub mod messages;

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level is `debug` with `verbose` and
/// `info` without. Calling this twice is harmless, the second call is ignored.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}
