pub mod dataset;
pub mod runner;
pub mod step;

pub use dataset::Dataset;
pub use runner::PipelineRunner;
pub use step::StepFunction;
