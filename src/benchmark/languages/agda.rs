//! Agda handler (type-checking benchmarks)

use crate::benchmark::template;
use crate::benchmark::workspace::Workspace;
use crate::constants::{repeat_markers, template_dirs};
use crate::error::AppResult;
use crate::models::{Elapsed, TaskSpec};

pub const CHECKER_TASKS: &[TaskSpec] = &[
    TaskSpec::new("nat_exp", 10, 14),
    TaskSpec::new("nat_exp_church", 16, 24),
    TaskSpec::new("tree_fold", 16, 24),
    TaskSpec::new("tree_fold_church", 16, 24),
];

const CHECKER_ARTIFACTS: &[&str] = &["main.agda", "Base.agda", "main.agdai", "Base.agdai"];

pub async fn build_checker(ws: &Workspace) -> AppResult<()> {
    let base = ws.load(&format!("{}/Base.agda", template_dirs::CHECKER)).await?;
    ws.save("Base.agda", &base).await
}

pub async fn bench_checker(ws: &Workspace, task: &str, size: u32) -> AppResult<Elapsed> {
    let code = ws.load(&format!("{}/{}.agda", template_dirs::CHECKER, task)).await?;
    let code = template::expand(
        &code,
        &[
            ("Size = Base.N1", format!("Size = Base.N{}", size)),
            ("Size = Base.Church-N1", format!("Size = Base.Church-N{}", size)),
        ],
        repeat_markers::AGDA,
        size,
    )?;
    ws.save("main.agda", &code).await?;
    ws.bench("agda -i src main.agda").await
}

pub async fn clean_checker(ws: &Workspace) -> AppResult<()> {
    ws.remove_all(CHECKER_ARTIFACTS).await
}
