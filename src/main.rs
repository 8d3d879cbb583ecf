// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};

use the_conduit::config::consts::DEFAULT_PIPELINE;
use the_conduit::config::{find_project_root, RunnerSettings, Runtime, RuntimeBuilder, Strategy};
use the_conduit::engine::{RunReport, RunnerFactory};
use the_conduit::errors::FailureStrategy;
use the_conduit::observability::init_tracing;
use the_conduit::pipeline::RunFilter;
use the_conduit::project::{create_pipeline, create_project, ProjectInfo};
use the_conduit::viz::{render_dot, render_json};

/// Declarative, catalog-driven data pipelines
#[derive(Debug, Parser)]
#[command(name = "conduit", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a new project
    New {
        /// Project name; the directory is derived from it
        name: String,
        /// Directory to create the project in (default: current directory)
        #[arg(short, long)]
        directory: Option<PathBuf>,
    },
    /// Manage pipelines of a project
    #[command(subcommand)]
    Pipeline(PipelineCommand),
    /// Run a pipeline
    Run(RunCommand),
    /// Render a pipeline as a graph
    Viz(VizCommand),
    /// Inspect the data catalog
    #[command(subcommand)]
    Catalog(CatalogCommand),
    /// Show version, project and available functions
    Info(ProjectArgs),
}

#[derive(Debug, Subcommand)]
enum PipelineCommand {
    /// Scaffold a pipeline definition and its parameters file
    Create {
        name: String,
        #[command(flatten)]
        project: ProjectArgs,
    },
}

#[derive(Debug, Subcommand)]
enum CatalogCommand {
    /// List catalog entries, or the datasets a pipeline uses
    List(TargetArgs),
}

#[derive(Debug, Args)]
struct ProjectArgs {
    /// Project root (default: nearest directory containing conduit.toml)
    #[arg(short, long, env = "CONDUIT_PROJECT")]
    project: Option<PathBuf>,
}

/// Which project, environment and pipeline a command works on
#[derive(Debug, Args)]
struct TargetArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Configuration environment layered over conf/base
    #[arg(short, long, env = "CONDUIT_ENV")]
    env: Option<String>,

    /// Pipeline name
    #[arg(long)]
    pipeline: Option<String>,
}

#[derive(Debug, Args)]
struct RunCommand {
    #[command(flatten)]
    target: TargetArgs,

    /// Runner to use instead of the one in conduit.toml
    #[arg(long, value_enum)]
    runner: Option<RunnerArg>,

    /// Maximum concurrently running steps (parallel runner)
    #[arg(long)]
    max_concurrency: Option<usize>,

    /// Only run steps with any of these tags
    #[arg(long = "tags", value_delimiter = ',')]
    tags: Vec<String>,

    /// Only run these steps
    #[arg(long = "steps", value_delimiter = ',')]
    steps: Vec<String>,

    /// Run these steps and everything downstream
    #[arg(long, value_delimiter = ',')]
    from_steps: Vec<String>,

    /// Run these steps and everything upstream
    #[arg(long, value_delimiter = ',')]
    to_steps: Vec<String>,

    /// Run steps downstream of these artifacts
    #[arg(long, value_delimiter = ',')]
    from_inputs: Vec<String>,

    /// Run steps needed to produce these artifacts
    #[arg(long, value_delimiter = ',')]
    to_outputs: Vec<String>,

    /// Keep running independent steps after a failure
    #[arg(long)]
    continue_on_error: bool,
}

impl RunCommand {
    fn filter(&self) -> RunFilter {
        RunFilter {
            tags: self.tags.clone(),
            step_names: self.steps.clone(),
            from_steps: self.from_steps.clone(),
            to_steps: self.to_steps.clone(),
            from_inputs: self.from_inputs.clone(),
            to_outputs: self.to_outputs.clone(),
        }
    }
}

#[derive(Debug, Args)]
struct VizCommand {
    #[command(flatten)]
    target: TargetArgs,

    #[arg(long, value_enum, default_value_t = VizFormat::Dot)]
    format: VizFormat,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RunnerArg {
    Sequential,
    Parallel,
}

impl From<RunnerArg> for Strategy {
    fn from(arg: RunnerArg) -> Self {
        match arg {
            RunnerArg::Sequential => Strategy::Sequential,
            RunnerArg::Parallel => Strategy::Parallel,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum VizFormat {
    Dot,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::New { name, directory } => new_project(&name, directory),
        Command::Pipeline(PipelineCommand::Create { name, project }) => {
            let root = project_root(&project)?;
            let path = create_pipeline(&root, &name)?;
            println!("Created pipeline '{}' at {}", name, path.display());
            Ok(())
        }
        Command::Run(command) => run(command).await,
        Command::Viz(command) => viz(command),
        Command::Catalog(CatalogCommand::List(target)) => list_catalog(target),
        Command::Info(project) => {
            let info = ProjectInfo::gather(project.project.as_deref())?;
            println!("{}", info);
            Ok(())
        }
    }
}

fn new_project(name: &str, directory: Option<PathBuf>) -> Result<()> {
    let parent = match directory {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    let root = create_project(&parent, name)?;
    println!("Created project '{}' at {}", name, root.display());
    println!("Add pipelines with: conduit pipeline create <name> --project {}", root.display());
    Ok(())
}

/// Explicit `--project`, else the nearest enclosing project
fn project_root(args: &ProjectArgs) -> Result<PathBuf> {
    if let Some(root) = &args.project {
        return Ok(root.clone());
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    find_project_root(&cwd).with_context(|| {
        format!(
            "No conduit.toml found in {} or any parent directory",
            cwd.display()
        )
    })
}

fn load_runtime(target: &TargetArgs) -> Result<Runtime> {
    let root = project_root(&target.project)?;
    let runtime = RuntimeBuilder::from_project(&root, target.env.as_deref())
        .with_context(|| format!("Failed to load project at {}", root.display()))?;
    Ok(runtime)
}

fn pipeline_name(target: &TargetArgs) -> &str {
    target.pipeline.as_deref().unwrap_or(DEFAULT_PIPELINE)
}

async fn run(command: RunCommand) -> Result<()> {
    let runtime = load_runtime(&command.target)?;
    let name = pipeline_name(&command.target);
    let pipeline = runtime.pipelines.get(name)?.filter(&command.filter())?;

    let runner = if command.runner.is_some() || command.max_concurrency.is_some() {
        RunnerFactory::from_settings(&RunnerSettings {
            strategy: command
                .runner
                .map(Strategy::from)
                .unwrap_or(runtime.settings.runner.strategy),
            max_concurrency: command
                .max_concurrency
                .or(runtime.settings.runner.max_concurrency),
            failure_strategy: runtime.failure_strategy,
        })
    } else {
        runtime.runner
    };
    let failure_strategy = if command.continue_on_error {
        FailureStrategy::ContinueOnError
    } else {
        runtime.failure_strategy
    };

    let report = runner
        .run_with_strategy(&pipeline, runtime.catalog, failure_strategy)
        .await?;
    print_report(name, &report);

    if !report.is_success() {
        bail!(
            "Pipeline '{}' finished with {} failed and {} skipped step(s)",
            name,
            report.failed.len(),
            report.skipped.len()
        );
    }
    Ok(())
}

fn print_report(name: &str, report: &RunReport) {
    println!(
        "Pipeline '{}': {} completed in {:?}",
        name,
        report.completed.len(),
        report.total_duration()
    );
    for (step, reason) in &report.failed {
        println!("  failed  {}: {}", step, reason);
    }
    for step in &report.skipped {
        println!("  skipped {}", step);
    }
    for (artifact, data) in &report.free_outputs {
        println!("  output  {} ({}, {})", artifact, data.kind(), data.size_hint());
    }
}

fn viz(command: VizCommand) -> Result<()> {
    let runtime = load_runtime(&command.target)?;
    let name = pipeline_name(&command.target);
    let pipeline = runtime.pipelines.get(name)?;

    let rendered = match command.format {
        VizFormat::Dot => render_dot(pipeline, name),
        VizFormat::Json => render_json(pipeline)?,
    };
    write_output(command.output.as_deref(), &rendered)
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn list_catalog(target: TargetArgs) -> Result<()> {
    let runtime = load_runtime(&target)?;
    let mut catalog = runtime.catalog.clone();

    let Some(name) = target.pipeline.as_deref() else {
        for (artifact, description) in catalog.describe() {
            println!("{}: {}", artifact, description);
        }
        for pattern in catalog.patterns() {
            println!("{}: (pattern)", pattern);
        }
        return Ok(());
    };

    let pipeline = runtime.pipelines.get(name)?;
    for artifact in pipeline.datasets() {
        if catalog.resolve(&artifact)? {
            let description = catalog.describe().get(&artifact).cloned().unwrap_or_default();
            println!("{}: {}", artifact, description);
        } else {
            println!("{}: memory (default)", artifact);
        }
    }
    Ok(())
}
