// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Project tooling: scaffolding new projects and pipelines, and reporting
//! what an installation and project provide.

mod info;
mod scaffold;

pub use info::{ProjectInfo, ProjectSummary};
pub use scaffold::{create_pipeline, create_project, DATA_LAYERS};
