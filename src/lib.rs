// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod catalog;    // artifact registry + datasets
pub mod config;     // settings, layered conf/, runtime
pub mod engine;     // runners
pub mod errors;     // error handling
pub mod observability;
pub mod pipeline;   // steps, assembly, filtering
pub mod project;    // scaffolding + info
pub mod steps;      // step function registry
pub mod traits;     // unified abstractions
pub mod viz;
