// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod execution;
pub mod factory;
pub mod parallel;
mod release;
pub mod report;
pub mod sequential;

pub use factory::RunnerFactory;
pub use parallel::ParallelRunner;
pub use report::RunReport;
pub use sequential::SequentialRunner;
