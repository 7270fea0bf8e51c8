//! Domain models

pub mod result;
pub mod task;

pub use result::{BenchResult, Elapsed};
pub use task::{Kind, Language, TaskSpec};
