//! Benchmark identity models: kinds, languages and task size ranges

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Benchmarking mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Measures program execution speed
    Runtime,
    /// Measures type-checking / proof-checking speed
    Checker,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Runtime => "runtime",
            Kind::Checker => "checker",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Benchmarked language implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Haskell,
    Kind2,
    Agda,
}

impl Language {
    /// All known languages, in catalog order
    pub const ALL: &'static [Language] = &[Language::Haskell, Language::Kind2, Language::Agda];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Haskell => "haskell",
            Language::Kind2 => "kind2",
            Language::Agda => "agda",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Language::ALL
            .iter()
            .copied()
            .find(|lang| lang.as_str() == wanted)
            .ok_or_else(|| AppError::Configuration(format!("Unsupported language: {}", s)))
    }
}

/// A named task with its inclusive range of problem sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpec {
    pub name: &'static str,
    pub min_size: u32,
    pub max_size: u32,
}

impl TaskSpec {
    pub const fn new(name: &'static str, min_size: u32, max_size: u32) -> Self {
        Self {
            name,
            min_size,
            max_size,
        }
    }

    /// Sizes to benchmark, ascending.
    ///
    /// Small mode keeps at most three sizes starting at the minimum; the
    /// range never leaves `[min_size, max_size]`.
    pub fn sizes(&self, small: bool) -> RangeInclusive<u32> {
        let max = if small {
            self.max_size
                .min(self.min_size.saturating_add(crate::constants::SMALL_MODE_EXTRA_SIZES))
        } else {
            self.max_size
        };
        self.min_size..=max
    }
}
