//! Kind2 handler
//!
//! Runtime benchmarks compile Kind2 through HVM to C and time the native
//! binary. Checker benchmarks generate an HVM checker program for a
//! synthesized input and time the HVM run of that checker.

use crate::benchmark::template;
use crate::benchmark::workspace::Workspace;
use crate::constants::{repeat_markers, template_dirs};
use crate::error::AppResult;
use crate::models::{Elapsed, TaskSpec};

pub const RUNTIME_TASKS: &[TaskSpec] = &[
    TaskSpec::new("list_fold", 1, 64),
    TaskSpec::new("tree_fold", 26, 32),
];

pub const CHECKER_TASKS: &[TaskSpec] = &[
    TaskSpec::new("nat_exp", 10, 14),
    TaskSpec::new("nat_exp_church", 16, 24),
    TaskSpec::new("tree_fold", 16, 24),
    TaskSpec::new("tree_fold_church", 16, 24),
];

const RUNTIME_ARTIFACTS: &[&str] = &["main.kind2", "main.c", "main.hvm", "main.bin"];
const CHECKER_ARTIFACTS: &[&str] = &["Base.kind2", "main.kind2", "main.check.hvm"];

pub async fn build_runtime(ws: &Workspace, task: &str) -> AppResult<()> {
    let source = ws.load(&format!("{}/{}.kind2", template_dirs::RUNTIME, task)).await?;
    ws.save("main.kind2", &source).await?;
    ws.exec("kind2 to-hvm main.kind2 >> main.hvm").await?;
    ws.exec("hvm compile main.hvm").await?;
    ws.exec("clang -O2 main.c -o main.bin").await?;
    Ok(())
}

pub async fn bench_runtime(ws: &Workspace, size: u32) -> AppResult<Elapsed> {
    ws.bench(&format!("./main.bin {} 2>/dev/null", size)).await
}

pub async fn clean_runtime(ws: &Workspace) -> AppResult<()> {
    ws.remove_all(RUNTIME_ARTIFACTS).await
}

pub async fn build_checker(ws: &Workspace) -> AppResult<()> {
    let base = ws.load(&format!("{}/Base.kind2", template_dirs::CHECKER)).await?;
    ws.save("Base.kind2", &base).await
}

/// Materialize the checker input for `size`, generate the checker, and
/// time only the HVM run.
pub async fn bench_checker(ws: &Workspace, task: &str, size: u32) -> AppResult<Elapsed> {
    let code = ws.load(&format!("{}/{}.kind2", template_dirs::CHECKER, task)).await?;
    let code = template::expand(
        &code,
        &[
            ("Size = Base.N1", format!("Size = Base.N{}", size)),
            ("Size = Base.Church.N1", format!("Size = Base.Church.N{}", size)),
        ],
        repeat_markers::KIND2,
        size,
    )?;
    ws.save("main.kind2", &code).await?;
    ws.exec("kind2 gen-checker main.kind2").await?;
    ws.bench("hvm --memory-size 12G run main.check.hvm 2>/dev/null").await
}

pub async fn clean_checker(ws: &Workspace) -> AppResult<()> {
    ws.remove_all(CHECKER_ARTIFACTS).await
}
