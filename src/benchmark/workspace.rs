//! Working directory, template access and timed execution
//!
//! Language entries never touch the filesystem or spawn processes
//! directly; they go through a [`Workspace`], which owns the template
//! root, the artifact directory, the shell and the failure policy.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::fs;

use crate::config::FailurePolicy;
use crate::error::{AppError, AppResult};
use crate::models::Elapsed;

use super::shell::{CommandOutput, Shell};

pub struct Workspace {
    template_dir: PathBuf,
    work_dir: PathBuf,
    shell: Arc<dyn Shell>,
    policy: FailurePolicy,
}

impl Workspace {
    pub fn new(
        template_dir: impl Into<PathBuf>,
        work_dir: impl Into<PathBuf>,
        shell: Arc<dyn Shell>,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            template_dir: template_dir.into(),
            work_dir: work_dir.into(),
            shell,
            policy,
        }
    }

    /// Read a template, relative to the template root.
    pub async fn load(&self, relative: &str) -> AppResult<String> {
        let path = self.template_dir.join(relative);
        match fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(AppError::TemplateNotFound(path)),
            Err(e) => Err(AppError::io(path, e)),
        }
    }

    /// Write an artifact into the working directory, replacing any previous one.
    pub async fn save(&self, name: &str, text: &str) -> AppResult<()> {
        let path = self.work_dir.join(name);
        fs::write(&path, text)
            .await
            .map_err(|e| AppError::io(path, e))
    }

    /// Delete an artifact. A missing file is not an error.
    pub async fn remove(&self, name: &str) -> AppResult<()> {
        let path = self.work_dir.join(name);
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::trace!(file = %path.display(), "Removed artifact");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::io(path, e)),
        }
    }

    pub async fn remove_all(&self, names: &[&str]) -> AppResult<()> {
        for name in names {
            self.remove(name).await?;
        }
        Ok(())
    }

    /// Run an untimed step. Any non-zero exit is an error.
    pub async fn exec(&self, command: &str) -> AppResult<CommandOutput> {
        let output = self.shell.run(command, &self.work_dir).await?;
        if !output.success {
            return Err(output.into_error(command));
        }
        Ok(output)
    }

    /// Run a timed step and return its wall-clock time.
    ///
    /// The measurement includes process startup. On a non-zero exit the
    /// failure policy decides between an error and the infinite sentinel.
    pub async fn bench(&self, command: &str) -> AppResult<Elapsed> {
        let start = Instant::now();
        let output = self.shell.run(command, &self.work_dir).await?;
        let elapsed = start.elapsed();

        if output.success {
            return Ok(Elapsed::from(elapsed));
        }

        match self.policy {
            FailurePolicy::Abort => Err(output.into_error(command)),
            FailurePolicy::Continue => {
                tracing::warn!(
                    command = %command,
                    exit_code = ?output.exit_code,
                    "Benchmark command failed, recording infinite time"
                );
                Ok(Elapsed::INFINITE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::shell::MockShell;

    fn failing_shell() -> Arc<dyn Shell> {
        let mut shell = MockShell::new();
        shell.expect_run().returning(|_, _| {
            Ok(CommandOutput {
                success: false,
                exit_code: Some(1),
                stdout: "partial".to_string(),
                stderr: "boom".to_string(),
            })
        });
        Arc::new(shell)
    }

    #[tokio::test]
    async fn test_bench_tolerant_returns_infinite() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::new(dir.path(), dir.path(), failing_shell(), FailurePolicy::Continue);
        let elapsed = ws.bench("./main.bin 3").await.unwrap();
        assert_eq!(elapsed, Elapsed::INFINITE);
    }

    #[tokio::test]
    async fn test_bench_strict_propagates_output() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::new(dir.path(), dir.path(), failing_shell(), FailurePolicy::Abort);
        let err = ws.bench("./main.bin 3").await.unwrap_err();
        assert_eq!(err.captured_output(), Some(("partial", "boom")));
    }

    #[tokio::test]
    async fn test_exec_fails_regardless_of_policy() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::new(dir.path(), dir.path(), failing_shell(), FailurePolicy::Continue);
        assert!(matches!(
            ws.exec("ghc -O2 main.hs -o main.bin").await,
            Err(AppError::CommandFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_bench_success_is_finite() {
        let mut shell = MockShell::new();
        shell.expect_run().times(1).returning(|_, _| {
            Ok(CommandOutput {
                success: true,
                exit_code: Some(0),
                ..Default::default()
            })
        });
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::new(dir.path(), dir.path(), Arc::new(shell), FailurePolicy::Abort);
        let elapsed = ws.bench("true").await.unwrap();
        assert!(elapsed.is_finite());
        assert!(elapsed.secs() >= 0.0);
    }

    #[tokio::test]
    async fn test_remove_missing_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::new(dir.path(), dir.path(), failing_shell(), FailurePolicy::Abort);
        ws.save("main.hs", "main = pure ()").await.unwrap();
        ws.remove("main.hs").await.unwrap();
        ws.remove("main.hs").await.unwrap();
        assert!(!dir.path().join("main.hs").exists());
    }

    #[tokio::test]
    async fn test_load_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::new(dir.path(), dir.path(), failing_shell(), FailurePolicy::Abort);
        assert!(matches!(
            ws.load("Runtime/list_fold.hs").await,
            Err(AppError::TemplateNotFound(_))
        ));
    }
}
