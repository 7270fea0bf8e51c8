//! Benchmark execution engine
//!
//! The runner walks a static catalog of language entries. Each entry knows
//! how to clean, build and bench its tasks; all file and process access
//! goes through a [`Workspace`]:
//!
//! 1. Clean leftover artifacts
//! 2. Build the task (template copy plus external toolchain)
//! 3. Bench every size in ascending order, warming up on the first one
//! 4. Clean again
//!
//! Measurements are collected in memory and written once at the end.

pub mod languages;
pub mod metrics;
pub mod runner;
pub mod shell;
pub mod template;
pub mod workspace;

pub use languages::Entry;
pub use metrics::MetricsCollector;
pub use runner::{BenchmarkRunner, RunSummary};
pub use shell::{CommandOutput, Shell, SystemShell};
pub use workspace::Workspace;
