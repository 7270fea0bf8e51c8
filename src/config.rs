//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! Configuration is loaded once at startup and handed to the runner and the
//! chart generator as an explicit value.

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_CHART_HEIGHT, DEFAULT_CHART_OUTPUT_DIR, DEFAULT_CHART_WIDTH,
    DEFAULT_FAILURE_POLICY, DEFAULT_LANGUAGES, DEFAULT_LOG_FILTER, DEFAULT_RESULTS_PATH,
    DEFAULT_TEMPLATE_DIR, DEFAULT_WORK_DIR,
};
use crate::models::Language;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub runner: RunnerConfig,
    pub charts: ChartConfig,
    pub rust_log: String,
}

/// What to do when an external command fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Print the captured output and stop the whole run
    #[default]
    Abort,
    /// Record an infinite time and keep going
    Continue,
}

impl FromStr for FailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" | "strict" => Ok(FailurePolicy::Abort),
            "continue" | "tolerant" => Ok(FailurePolicy::Continue),
            _ => Err(ConfigError::InvalidValue("BENCH_FAILURE_POLICY".to_string())),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Abort => f.write_str("abort"),
            FailurePolicy::Continue => f.write_str("continue"),
        }
    }
}

/// Benchmark matrix configuration
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Languages to run, in order
    pub languages: Vec<Language>,
    /// Task allow-list; `None` runs every task
    pub tasks: Option<Vec<String>>,
    /// Benchmark only the first three sizes of every task
    pub small: bool,
    pub failure_policy: FailurePolicy,
    /// Root of the `Runtime/` and `Checker/` template directories
    pub template_dir: PathBuf,
    /// Where transient sources, objects and binaries are written
    pub work_dir: PathBuf,
    pub results_path: PathBuf,
}

/// Chart rendering configuration
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub results_path: PathBuf,
    pub output_dir: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Fixed time-axis ceilings by chart name
    pub y_ceilings: BTreeMap<String, f64>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            runner: RunnerConfig::from_env()?,
            charts: ChartConfig::from_env()?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}

impl RunnerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            languages: parse_languages(
                &env::var("BENCH_LANGUAGES").unwrap_or_else(|_| DEFAULT_LANGUAGES.to_string()),
            )?,
            tasks: env::var("BENCH_TASKS").ok().map(|v| parse_list(&v)),
            small: parse_bool(
                "BENCH_SMALL",
                &env::var("BENCH_SMALL").unwrap_or_else(|_| "false".to_string()),
            )?,
            failure_policy: env::var("BENCH_FAILURE_POLICY")
                .unwrap_or_else(|_| DEFAULT_FAILURE_POLICY.to_string())
                .parse()?,
            template_dir: PathBuf::from(
                env::var("BENCH_TEMPLATE_DIR").unwrap_or_else(|_| DEFAULT_TEMPLATE_DIR.to_string()),
            ),
            work_dir: PathBuf::from(
                env::var("BENCH_WORK_DIR").unwrap_or_else(|_| DEFAULT_WORK_DIR.to_string()),
            ),
            results_path: results_path_from_env(),
        })
    }

    /// Whether `task` passes the allow-list
    pub fn includes_task(&self, task: &str) -> bool {
        self.tasks
            .as_ref()
            .is_none_or(|tasks| tasks.iter().any(|t| t == task))
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            languages: Language::ALL.to_vec(),
            tasks: None,
            small: false,
            failure_policy: FailurePolicy::default(),
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            work_dir: PathBuf::from(DEFAULT_WORK_DIR),
            results_path: PathBuf::from(DEFAULT_RESULTS_PATH),
        }
    }
}

impl ChartConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            results_path: results_path_from_env(),
            output_dir: PathBuf::from(
                env::var("CHART_OUTPUT_DIR").unwrap_or_else(|_| DEFAULT_CHART_OUTPUT_DIR.to_string()),
            ),
            width: env::var("CHART_WIDTH")
                .unwrap_or_else(|_| DEFAULT_CHART_WIDTH.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("CHART_WIDTH".to_string()))?,
            height: env::var("CHART_HEIGHT")
                .unwrap_or_else(|_| DEFAULT_CHART_HEIGHT.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("CHART_HEIGHT".to_string()))?,
            y_ceilings: parse_ceilings(&env::var("CHART_Y_CEILINGS").unwrap_or_default())?,
        })
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            results_path: PathBuf::from(DEFAULT_RESULTS_PATH),
            output_dir: PathBuf::from(DEFAULT_CHART_OUTPUT_DIR),
            width: DEFAULT_CHART_WIDTH,
            height: DEFAULT_CHART_HEIGHT,
            y_ceilings: BTreeMap::new(),
        }
    }
}

fn results_path_from_env() -> PathBuf {
    PathBuf::from(env::var("BENCH_RESULTS_PATH").unwrap_or_else(|_| DEFAULT_RESULTS_PATH.to_string()))
}

/// Parse `name=secs,name=secs` into chart ceilings
pub fn parse_ceilings(value: &str) -> Result<BTreeMap<String, f64>, ConfigError> {
    let mut ceilings = BTreeMap::new();
    for item in parse_list(value) {
        let invalid = || ConfigError::InvalidValue(format!("CHART_Y_CEILINGS ({})", item));
        let (name, secs) = item.split_once('=').ok_or_else(invalid)?;
        let secs: f64 = secs.trim().parse().map_err(|_| invalid())?;
        if !secs.is_finite() || secs <= 0.0 {
            return Err(invalid());
        }
        ceilings.insert(name.trim().to_string(), secs);
    }
    Ok(ceilings)
}

/// Split a comma-separated list, dropping empty items
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse an ordered language allow-list, keeping the first occurrence of duplicates
pub fn parse_languages(value: &str) -> Result<Vec<Language>, ConfigError> {
    let mut languages = Vec::new();
    for item in parse_list(value) {
        let language: Language = item
            .parse()
            .map_err(|_| ConfigError::InvalidValue(format!("BENCH_LANGUAGES ({})", item)))?;
        if !languages.contains(&language) {
            languages.push(language);
        }
    }
    Ok(languages)
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue(name.to_string())),
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
