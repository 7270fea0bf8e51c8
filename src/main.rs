//! LangBench - Application Entry Point
//!
//! `langbench run` executes the benchmark matrix, `langbench charts`
//! renders the charts of the last run.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use langbench::{
    benchmark::{BenchmarkRunner, SystemShell},
    charts::{self, ChartGenerator},
    config::{self, FailurePolicy},
    AppError, Config,
};

#[derive(Parser, Debug)]
#[command(name = "langbench", about = "Benchmark language implementations and chart the results")]
struct Cli {
    /// Results file (overrides BENCH_RESULTS_PATH)
    #[arg(long, global = true)]
    results: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build and time every selected task
    Run {
        /// Only the first three sizes of every task
        #[arg(long)]
        small: bool,
        /// abort | continue
        #[arg(long)]
        policy: Option<FailurePolicy>,
        /// Comma-separated, ordered language allow-list
        #[arg(long)]
        languages: Option<String>,
        /// Comma-separated task allow-list
        #[arg(long)]
        tasks: Option<String>,
    },
    /// Render one chart per (kind, task) from the results file
    Charts {
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(results) = cli.results {
        config.runner.results_path = results.clone();
        config.charts.results_path = results;
    }

    match cli.command {
        Command::Run {
            small,
            policy,
            languages,
            tasks,
        } => {
            let mut runner_config = config.runner;
            runner_config.small |= small;
            if let Some(policy) = policy {
                runner_config.failure_policy = policy;
            }
            if let Some(languages) = languages {
                runner_config.languages = config::parse_languages(&languages)?;
            }
            if let Some(tasks) = tasks {
                runner_config.tasks = Some(config::parse_list(&tasks));
            }

            tracing::info!("Starting benchmark run...");
            let runner = BenchmarkRunner::new(runner_config, Arc::new(SystemShell));
            match runner.run().await {
                Ok(_) => Ok(ExitCode::SUCCESS),
                Err(e @ AppError::CommandFailed { .. }) => {
                    if let Some((stdout, stderr)) = e.captured_output() {
                        println!("{}", stdout);
                        println!("{}", stderr);
                    }
                    tracing::error!("{}", e);
                    Ok(ExitCode::FAILURE)
                }
                Err(e) => Err(e.into()),
            }
        }
        Command::Charts { output_dir } => {
            let mut chart_config = config.charts;
            if let Some(output_dir) = output_dir {
                chart_config.output_dir = output_dir;
            }

            tracing::info!("Generating charts...");
            let generator = ChartGenerator::new(chart_config);
            let handles = generator.generate_from_file().await?;
            let failed = charts::wait_all(handles).await;

            if failed > 0 {
                tracing::error!("{} chart(s) failed to render", failed);
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
