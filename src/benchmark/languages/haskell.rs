//! Haskell handler (GHC-compiled runtime benchmarks)

use crate::benchmark::workspace::Workspace;
use crate::constants::template_dirs;
use crate::error::AppResult;
use crate::models::{Elapsed, TaskSpec};

pub const RUNTIME_TASKS: &[TaskSpec] = &[
    TaskSpec::new("list_fold", 1, 64),
    TaskSpec::new("tree_fold", 26, 32),
];

const RUNTIME_ARTIFACTS: &[&str] = &["main.hs", "main.hi", "main.o", "main.bin"];

pub async fn build_runtime(ws: &Workspace, task: &str) -> AppResult<()> {
    let source = ws.load(&format!("{}/{}.hs", template_dirs::RUNTIME, task)).await?;
    ws.save("main.hs", &source).await?;
    ws.exec("ghc -O2 main.hs -o main.bin").await?;
    Ok(())
}

pub async fn bench_runtime(ws: &Workspace, size: u32) -> AppResult<Elapsed> {
    ws.bench(&format!("./main.bin {}", size)).await
}

pub async fn clean_runtime(ws: &Workspace) -> AppResult<()> {
    ws.remove_all(RUNTIME_ARTIFACTS).await
}
