//! Language-specific handlers for building, benchmarking and cleaning
//!
//! Each (language, kind) pair is one [`Entry`] variant. Adding a language
//! means adding a variant, and every match below forces it to be wired up.

pub mod agda;
pub mod haskell;
pub mod kind2;

use crate::error::AppResult;
use crate::models::{Elapsed, Kind, Language, TaskSpec};

use super::workspace::Workspace;

/// One benchmark entry of the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entry {
    HaskellRuntime,
    Kind2Runtime,
    Kind2Checker,
    AgdaChecker,
}

impl Entry {
    /// The whole catalog, in run order within each language
    pub const ALL: &'static [Entry] = &[
        Entry::HaskellRuntime,
        Entry::Kind2Runtime,
        Entry::Kind2Checker,
        Entry::AgdaChecker,
    ];

    /// Entries of one language, in catalog order
    pub fn for_language(language: Language) -> impl Iterator<Item = Entry> {
        Self::ALL
            .iter()
            .copied()
            .filter(move |entry| entry.language() == language)
    }

    pub fn language(&self) -> Language {
        match self {
            Entry::HaskellRuntime => Language::Haskell,
            Entry::Kind2Runtime | Entry::Kind2Checker => Language::Kind2,
            Entry::AgdaChecker => Language::Agda,
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Entry::HaskellRuntime | Entry::Kind2Runtime => Kind::Runtime,
            Entry::Kind2Checker | Entry::AgdaChecker => Kind::Checker,
        }
    }

    pub fn tasks(&self) -> &'static [TaskSpec] {
        match self {
            Entry::HaskellRuntime => haskell::RUNTIME_TASKS,
            Entry::Kind2Runtime => kind2::RUNTIME_TASKS,
            Entry::Kind2Checker => kind2::CHECKER_TASKS,
            Entry::AgdaChecker => agda::CHECKER_TASKS,
        }
    }

    /// Remove every artifact this entry may leave behind.
    pub async fn clean(&self, ws: &Workspace) -> AppResult<()> {
        match self {
            Entry::HaskellRuntime => haskell::clean_runtime(ws).await,
            Entry::Kind2Runtime => kind2::clean_runtime(ws).await,
            Entry::Kind2Checker => kind2::clean_checker(ws).await,
            Entry::AgdaChecker => agda::clean_checker(ws).await,
        }
    }

    /// Prepare `task` once before its size loop.
    pub async fn build(&self, ws: &Workspace, task: &str) -> AppResult<()> {
        match self {
            Entry::HaskellRuntime => haskell::build_runtime(ws, task).await,
            Entry::Kind2Runtime => kind2::build_runtime(ws, task).await,
            Entry::Kind2Checker => kind2::build_checker(ws).await,
            Entry::AgdaChecker => agda::build_checker(ws).await,
        }
    }

    /// Run `task` at `size` once and return the measured time.
    pub async fn bench(&self, ws: &Workspace, task: &str, size: u32) -> AppResult<Elapsed> {
        match self {
            Entry::HaskellRuntime => haskell::bench_runtime(ws, size).await,
            Entry::Kind2Runtime => kind2::bench_runtime(ws, size).await,
            Entry::Kind2Checker => kind2::bench_checker(ws, task, size).await,
            Entry::AgdaChecker => agda::bench_checker(ws, task, size).await,
        }
    }
}
