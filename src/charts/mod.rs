//! Chart generation from a persisted results file
//!
//! One line chart per `(kind, task)`, one line per language. Each chart is
//! rendered on its own blocking task; the generator schedules them all
//! without waiting for any of them.

pub mod render;
pub mod series;

use std::path::PathBuf;

use futures::future::join_all;
use tokio::fs;
use tokio::task::JoinHandle;

use crate::benchmark::metrics::load_results;
use crate::config::ChartConfig;
use crate::error::{AppError, AppResult};
use crate::models::BenchResult;

pub use series::{build_charts, ChartData, Series};

/// Handle to one scheduled chart render
pub type RenderHandle = JoinHandle<AppResult<PathBuf>>;

/// Chart generator
pub struct ChartGenerator {
    config: ChartConfig,
}

impl ChartGenerator {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    /// Compute chart data without rendering anything
    pub fn prepare(&self, results: &[BenchResult]) -> AppResult<Vec<ChartData>> {
        build_charts(results, &self.config.y_ceilings)
    }

    /// Read the configured results file and schedule every chart.
    pub async fn generate_from_file(&self) -> AppResult<Vec<RenderHandle>> {
        let results = load_results(&self.config.results_path).await?;
        tracing::info!(
            path = %self.config.results_path.display(),
            count = results.len(),
            "Loaded results"
        );
        self.generate(&results).await
    }

    /// Schedule one render task per chart and return immediately.
    pub async fn generate(&self, results: &[BenchResult]) -> AppResult<Vec<RenderHandle>> {
        let output_dir = &self.config.output_dir;
        fs::create_dir_all(output_dir)
            .await
            .map_err(|e| AppError::io(output_dir, e))?;

        let (width, height) = (self.config.width, self.config.height);

        let handles: Vec<RenderHandle> = self
            .prepare(results)?
            .into_iter()
            .map(|chart| {
                let path = output_dir.join(chart.file_name());
                tracing::debug!(chart = %chart.name, series = chart.series.len(), "Scheduling chart");
                tokio::task::spawn_blocking(move || -> AppResult<PathBuf> {
                    render::render_chart(&chart, &path, width, height)?;
                    Ok(path)
                })
            })
            .collect();

        Ok(handles)
    }
}

/// Wait for scheduled renders, logging each outcome.
///
/// Returns the number of charts that failed.
pub async fn wait_all(handles: Vec<RenderHandle>) -> usize {
    let mut failed = 0;
    for outcome in join_all(handles).await {
        match outcome {
            Ok(Ok(path)) => println!("Generated: {}", path.display()),
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Chart rendering failed");
                failed += 1;
            }
            Err(e) => {
                tracing::error!(error = %e, "Chart task panicked");
                failed += 1;
            }
        }
    }
    failed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_results_schedule_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let generator = ChartGenerator::new(ChartConfig {
            output_dir: dir.path().join("image"),
            ..Default::default()
        });

        let handles = generator.generate(&[]).await.unwrap();
        assert!(handles.is_empty());
        assert!(dir.path().join("image").is_dir());
        assert_eq!(wait_all(handles).await, 0);
    }

    #[tokio::test]
    async fn test_missing_results_file() {
        let dir = tempfile::tempdir().unwrap();
        let generator = ChartGenerator::new(ChartConfig {
            results_path: dir.path().join("results.json"),
            output_dir: dir.path().join("image"),
            ..Default::default()
        });
        assert!(generator.generate_from_file().await.is_err());
    }
}
