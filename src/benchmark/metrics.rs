//! Measurement collection and the persisted results file

use std::path::Path;

use tokio::fs;

use crate::error::{AppError, AppResult};
use crate::models::BenchResult;

/// Append-only accumulator for one run of the matrix.
///
/// Nothing is written until [`MetricsCollector::save`] is called, so a run
/// aborted by the strict policy leaves no results file behind.
#[derive(Debug, Default)]
pub struct MetricsCollector {
    results: Vec<BenchResult>,
}

impl MetricsCollector {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            results: Vec::new(),
        }
    }

    /// Record one measurement
    pub fn add_result(&mut self, result: BenchResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[BenchResult] {
        &self.results
    }

    /// Number of measurements recorded
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Measurements that hit the infinite sentinel
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.elapsed.is_finite()).count()
    }

    /// Write every measurement as one pretty-printed JSON array,
    /// overwriting any previous file.
    pub async fn save(&self, path: &Path) -> AppResult<()> {
        save_results(path, &self.results).await
    }
}

pub async fn save_results(path: &Path, results: &[BenchResult]) -> AppResult<()> {
    let json = serde_json::to_string_pretty(results)?;
    fs::write(path, json)
        .await
        .map_err(|e| AppError::io(path, e))?;
    tracing::info!(path = %path.display(), count = results.len(), "Results written");
    Ok(())
}

pub async fn load_results(path: &Path) -> AppResult<Vec<BenchResult>> {
    let json = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::io(path, e))?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Elapsed, Kind, Language};

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");

        let mut collector = MetricsCollector::new();
        collector.add_result(BenchResult::new(Kind::Runtime, "list_fold", Language::Haskell, 1, Elapsed::from_secs(0.5)));
        collector.add_result(BenchResult::new(Kind::Runtime, "list_fold", Language::Haskell, 2, Elapsed::INFINITE));
        assert_eq!(collector.failed_count(), 1);

        collector.save(&path).await.unwrap();
        let loaded = load_results(&path).await.unwrap();
        assert_eq!(loaded, collector.results());
    }

    #[tokio::test]
    async fn test_save_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        std::fs::write(&path, "stale content that is longer than an empty array").unwrap();

        MetricsCollector::new().save(&path).await.unwrap();
        assert_eq!(load_results(&path).await.unwrap(), Vec::<BenchResult>::new());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_results(&dir.path().join("missing.json")).await.unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));
    }
}
