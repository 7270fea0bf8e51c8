//! LangBench - Cross-language benchmark harness
//!
//! This library drives a fixed matrix of language implementations of small
//! computational tasks and charts how they compare.
//!
//! # Stages
//!
//! - **Runner**: cleans, builds and times every selected (language, kind,
//!   task) over an ascending range of sizes, then writes all measurements
//!   to a JSON results file in one go.
//! - **Chart Generator**: reads the results file and renders one line chart
//!   per (kind, task), one line per language.
//!
//! The two stages communicate only through the results file.

pub mod benchmark;
pub mod charts;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
