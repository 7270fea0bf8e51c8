//! Benchmark runner - Orchestrates the benchmark matrix
//!
//! For every selected (language, kind, task) the runner cleans leftover
//! artifacts, builds the task once, measures it over its size range and
//! cleans again. Execution is strictly sequential: one external process at
//! a time.

use std::sync::Arc;

use chrono::TimeDelta;

use crate::config::{FailurePolicy, RunnerConfig};
use crate::error::AppResult;
use crate::models::{BenchResult, Elapsed, TaskSpec};
use crate::utils::time::{format_duration, now_utc};

use super::languages::Entry;
use super::metrics::MetricsCollector;
use super::shell::Shell;
use super::workspace::Workspace;

/// Outcome of a completed matrix run
#[derive(Debug)]
pub struct RunSummary {
    pub measurements: usize,
    pub failed: usize,
    pub duration: TimeDelta,
}

/// Benchmark runner over the static language catalog
pub struct BenchmarkRunner {
    config: RunnerConfig,
    workspace: Workspace,
}

impl BenchmarkRunner {
    /// Create a new benchmark runner
    pub fn new(config: RunnerConfig, shell: Arc<dyn Shell>) -> Self {
        let workspace = Workspace::new(
            config.template_dir.clone(),
            config.work_dir.clone(),
            shell,
            config.failure_policy,
        );

        Self { config, workspace }
    }

    /// Entries selected by the language allow-list, in run order
    pub fn entries(&self) -> Vec<Entry> {
        self.config
            .languages
            .iter()
            .flat_map(|language| Entry::for_language(*language))
            .collect()
    }

    /// Run the whole matrix and write the results file once at the end.
    pub async fn run(&self) -> AppResult<RunSummary> {
        let started = now_utc();
        let collector = self.run_matrix().await?;
        collector.save(&self.config.results_path).await?;

        let summary = RunSummary {
            measurements: collector.len(),
            failed: collector.failed_count(),
            duration: now_utc() - started,
        };

        tracing::info!(
            measurements = summary.measurements,
            failed = summary.failed,
            "Benchmark matrix finished in {}",
            format_duration(summary.duration)
        );

        Ok(summary)
    }

    /// Run the whole matrix, keeping every measurement in memory.
    pub async fn run_matrix(&self) -> AppResult<MetricsCollector> {
        let entries = self.entries();
        tracing::info!(
            entries = entries.len(),
            small = self.config.small,
            policy = %self.config.failure_policy,
            "Starting benchmark matrix"
        );

        // Leftovers of any language can collide with the shared `main.*` names.
        for entry in Entry::ALL {
            self.clean(*entry).await?;
        }

        let mut collector = MetricsCollector::new();

        for entry in &entries {
            for task in entry.tasks() {
                if !self.config.includes_task(task.name) {
                    tracing::debug!(task = task.name, language = %entry.language(), "Task not selected, skipping");
                    continue;
                }

                self.clean(*entry).await?;
                let outcome = self.run_task(*entry, task, &mut collector).await;
                if let Err(e) = outcome {
                    if let Err(clean_err) = entry.clean(&self.workspace).await {
                        tracing::warn!(error = %clean_err, "Cleanup after failure also failed");
                    }
                    return Err(e);
                }
                self.clean(*entry).await?;
            }
        }

        Ok(collector)
    }

    /// Build one task and measure it over its size range.
    async fn run_task(&self, entry: Entry, task: &TaskSpec, collector: &mut MetricsCollector) -> AppResult<()> {
        tracing::info!(
            kind = %entry.kind(),
            task = task.name,
            language = %entry.language(),
            "Building task"
        );

        let built = match entry.build(&self.workspace, task.name).await {
            Ok(()) => true,
            Err(e) if self.config.failure_policy == FailurePolicy::Continue => {
                tracing::warn!(
                    task = task.name,
                    language = %entry.language(),
                    error = %e,
                    "Build failed, recording every size as infinite"
                );
                false
            }
            Err(e) => return Err(e),
        };

        for size in task.sizes(self.config.small) {
            let elapsed = if built {
                if size == task.min_size {
                    // warm-up, discarded
                    self.measure(entry, task, size).await?;
                }
                self.measure(entry, task, size).await?
            } else {
                Elapsed::INFINITE
            };

            let result = BenchResult::new(entry.kind(), task.name, entry.language(), size, elapsed);
            println!("{}", result);
            collector.add_result(result);
        }

        Ok(())
    }

    /// Remove an entry's artifacts. Under the tolerant policy a failed
    /// removal is logged and the run goes on.
    async fn clean(&self, entry: Entry) -> AppResult<()> {
        match entry.clean(&self.workspace).await {
            Ok(()) => Ok(()),
            Err(e) if self.config.failure_policy == FailurePolicy::Continue => {
                tracing::warn!(language = %entry.language(), kind = %entry.kind(), error = %e, "Cleanup failed");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// One bench invocation with the failure policy applied to every error,
    /// not only to the timed command.
    async fn measure(&self, entry: Entry, task: &TaskSpec, size: u32) -> AppResult<Elapsed> {
        match entry.bench(&self.workspace, task.name, size).await {
            Ok(elapsed) => Ok(elapsed),
            Err(e) if self.config.failure_policy == FailurePolicy::Continue => {
                tracing::warn!(task = task.name, size, error = %e, "Benchmark step failed");
                Ok(Elapsed::INFINITE)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::benchmark::shell::CommandOutput;
    use crate::error::AppError;
    use crate::models::{Kind, Language};

    /// Records commands; any command containing `fail_on` exits non-zero.
    struct ScriptedShell {
        commands: Mutex<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl ScriptedShell {
        fn new(fail_on: Option<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                commands: Mutex::new(Vec::new()),
                fail_on,
            })
        }

        fn commands(&self) -> Vec<String> {
            self.commands.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Shell for ScriptedShell {
        async fn run(&self, command: &str, _cwd: &Path) -> AppResult<CommandOutput> {
            self.commands.lock().unwrap().push(command.to_string());
            let failed = self.fail_on.is_some_and(|pattern| command.contains(pattern));
            Ok(CommandOutput {
                success: !failed,
                exit_code: Some(if failed { 1 } else { 0 }),
                stdout: String::new(),
                stderr: if failed { "error".to_string() } else { String::new() },
            })
        }
    }

    fn haskell_config(dir: &Path, tasks: &[&str], small: bool, policy: FailurePolicy) -> RunnerConfig {
        std::fs::create_dir_all(dir.join("Runtime")).unwrap();
        for task in ["list_fold", "tree_fold"] {
            std::fs::write(dir.join(format!("Runtime/{}.hs", task)), "main = pure ()").unwrap();
        }
        RunnerConfig {
            languages: vec![Language::Haskell],
            tasks: Some(tasks.iter().map(|t| t.to_string()).collect()),
            small,
            failure_policy: policy,
            template_dir: dir.to_path_buf(),
            work_dir: dir.to_path_buf(),
            results_path: dir.join("results.json"),
        }
    }

    fn bench_commands(commands: &[String]) -> Vec<String> {
        commands
            .iter()
            .filter(|c| c.starts_with("./main.bin"))
            .cloned()
            .collect()
    }

    #[tokio::test]
    async fn test_sizes_ascend_with_single_warm_up() {
        let dir = tempfile::tempdir().unwrap();
        let shell = ScriptedShell::new(None);
        let runner = BenchmarkRunner::new(
            haskell_config(dir.path(), &["tree_fold"], false, FailurePolicy::Abort),
            shell.clone(),
        );

        let collector = runner.run_matrix().await.unwrap();

        let sizes: Vec<u32> = collector.results().iter().map(|r| r.size).collect();
        assert_eq!(sizes, (26..=32).collect::<Vec<_>>());
        assert!(collector.results().iter().all(|r| r.kind == Kind::Runtime && r.task == "tree_fold"));

        let runs = bench_commands(&shell.commands());
        assert_eq!(runs.len(), 8);
        assert_eq!(runs[0], "./main.bin 26");
        assert_eq!(runs[1], "./main.bin 26");
        assert_eq!(runs[7], "./main.bin 32");
    }

    #[tokio::test]
    async fn test_small_mode_and_task_filter() {
        let dir = tempfile::tempdir().unwrap();
        let shell = ScriptedShell::new(None);
        let runner = BenchmarkRunner::new(
            haskell_config(dir.path(), &["list_fold"], true, FailurePolicy::Abort),
            shell.clone(),
        );

        let collector = runner.run_matrix().await.unwrap();
        let sizes: Vec<u32> = collector.results().iter().map(|r| r.size).collect();
        assert_eq!(sizes, vec![1, 2, 3]);
        assert_eq!(
            shell.commands().iter().filter(|c| c.starts_with("ghc")).count(),
            1
        );
    }

    #[tokio::test]
    async fn test_artifacts_cleaned_after_task() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.o"), "stale").unwrap();
        let runner = BenchmarkRunner::new(
            haskell_config(dir.path(), &["list_fold"], true, FailurePolicy::Abort),
            ScriptedShell::new(None),
        );

        runner.run_matrix().await.unwrap();
        assert!(!dir.path().join("main.hs").exists());
        assert!(!dir.path().join("main.o").exists());
    }

    /// Leaves a `main.o` behind on every run and notes whether one was
    /// present when `ghc` started.
    #[derive(Default)]
    struct LeftoverShell {
        stale_at_build: Mutex<Vec<bool>>,
    }

    #[async_trait]
    impl Shell for LeftoverShell {
        async fn run(&self, command: &str, cwd: &Path) -> AppResult<CommandOutput> {
            if command.starts_with("ghc") {
                self.stale_at_build.lock().unwrap().push(cwd.join("main.o").exists());
            } else {
                std::fs::write(cwd.join("main.o"), "leftover").unwrap();
            }
            Ok(CommandOutput {
                success: true,
                exit_code: Some(0),
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn test_each_build_starts_clean() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.o"), "stale").unwrap();
        let shell = Arc::new(LeftoverShell::default());
        let runner = BenchmarkRunner::new(
            haskell_config(dir.path(), &["list_fold", "tree_fold"], true, FailurePolicy::Abort),
            shell.clone(),
        );

        runner.run_matrix().await.unwrap();
        assert_eq!(*shell.stale_at_build.lock().unwrap(), vec![false, false]);
    }

    #[tokio::test]
    async fn test_pre_clean_covers_unselected_languages() {
        let dir = tempfile::tempdir().unwrap();
        for leftover in ["main.agdai", "main.check.hvm", "main.c"] {
            std::fs::write(dir.path().join(leftover), "stale").unwrap();
        }
        let runner = BenchmarkRunner::new(
            haskell_config(dir.path(), &["list_fold"], true, FailurePolicy::Abort),
            ScriptedShell::new(None),
        );

        runner.run_matrix().await.unwrap();
        for leftover in ["main.agdai", "main.check.hvm", "main.c"] {
            assert!(!dir.path().join(leftover).exists(), "{} survived", leftover);
        }
    }

    #[tokio::test]
    async fn test_cleanup_failure_follows_policy() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where an artifact is expected cannot be removed as a file
        std::fs::create_dir(dir.path().join("main.hi")).unwrap();

        let tolerant = BenchmarkRunner::new(
            haskell_config(dir.path(), &["list_fold"], true, FailurePolicy::Continue),
            ScriptedShell::new(None),
        );
        let collector = tolerant.run_matrix().await.unwrap();
        assert_eq!(collector.len(), 3);
        assert_eq!(collector.failed_count(), 0);

        let strict = BenchmarkRunner::new(
            haskell_config(dir.path(), &["list_fold"], true, FailurePolicy::Abort),
            ScriptedShell::new(None),
        );
        assert!(matches!(strict.run_matrix().await, Err(AppError::Io { .. })));
    }

    #[tokio::test]
    async fn test_strict_policy_aborts_on_bench_failure() {
        let dir = tempfile::tempdir().unwrap();
        let shell = ScriptedShell::new(Some("./main.bin 2"));
        let runner = BenchmarkRunner::new(
            haskell_config(dir.path(), &["list_fold", "tree_fold"], true, FailurePolicy::Abort),
            shell.clone(),
        );

        let err = runner.run().await.unwrap_err();
        assert!(matches!(err, AppError::CommandFailed { .. }));
        assert!(!dir.path().join("results.json").exists());
        assert!(!shell.commands().iter().any(|c| c.contains("./main.bin 26")));
        assert!(!dir.path().join("main.hs").exists());
    }

    #[tokio::test]
    async fn test_tolerant_policy_records_infinite_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let shell = ScriptedShell::new(Some("./main.bin 2"));
        let runner = BenchmarkRunner::new(
            haskell_config(dir.path(), &["list_fold", "tree_fold"], true, FailurePolicy::Continue),
            shell.clone(),
        );

        let summary = runner.run().await.unwrap();
        assert_eq!(summary.measurements, 6);

        let results = crate::benchmark::metrics::load_results(&dir.path().join("results.json"))
            .await
            .unwrap();
        let infinite: Vec<(&str, u32)> = results
            .iter()
            .filter(|r| !r.elapsed.is_finite())
            .map(|r| (r.task.as_str(), r.size))
            .collect();
        // "./main.bin 2" also matches the tree_fold sizes 26, 27 and 28
        assert_eq!(
            infinite,
            vec![("list_fold", 2), ("tree_fold", 26), ("tree_fold", 27), ("tree_fold", 28)]
        );
        assert_eq!(summary.failed, 4);
    }

    #[tokio::test]
    async fn test_tolerant_build_failure_fills_range() {
        let dir = tempfile::tempdir().unwrap();
        let shell = ScriptedShell::new(Some("ghc"));
        let runner = BenchmarkRunner::new(
            haskell_config(dir.path(), &["list_fold"], true, FailurePolicy::Continue),
            shell.clone(),
        );

        let collector = runner.run_matrix().await.unwrap();
        assert_eq!(collector.len(), 3);
        assert_eq!(collector.failed_count(), 3);
        assert!(bench_commands(&shell.commands()).is_empty());
    }

    #[tokio::test]
    async fn test_missing_template_is_fatal_in_strict_mode() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunnerConfig {
            languages: vec![Language::Agda],
            tasks: Some(vec!["nat_exp".to_string()]),
            template_dir: PathBuf::from(dir.path()),
            work_dir: PathBuf::from(dir.path()),
            results_path: dir.path().join("results.json"),
            ..Default::default()
        };
        let runner = BenchmarkRunner::new(config, ScriptedShell::new(None));
        assert!(matches!(
            runner.run_matrix().await,
            Err(AppError::TemplateNotFound(_))
        ));
    }

    #[test]
    fn test_entries_follow_language_order() {
        let config = RunnerConfig {
            languages: vec![Language::Agda, Language::Kind2],
            ..Default::default()
        };
        let runner = BenchmarkRunner::new(config, ScriptedShell::new(None));
        assert_eq!(
            runner.entries(),
            vec![Entry::AgdaChecker, Entry::Kind2Runtime, Entry::Kind2Checker]
        );
    }
}
