//! Measurement models and their persisted encoding

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::task::{Kind, Language};

/// Wall-clock time of one measured execution, in seconds.
///
/// A failed execution under the tolerant policy is recorded as
/// [`Elapsed::INFINITE`]. JSON has no infinity, so the sentinel is written
/// as `null`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Elapsed(f64);

impl Elapsed {
    pub const INFINITE: Elapsed = Elapsed(f64::INFINITY);

    pub fn from_secs(secs: f64) -> Self {
        Self(secs)
    }

    pub fn secs(&self) -> f64 {
        self.0
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
}

impl From<Duration> for Elapsed {
    fn from(duration: Duration) -> Self {
        Self(duration.as_secs_f64())
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_finite() {
            write!(f, "{:.3}s", self.0)
        } else {
            f.write_str("inf")
        }
    }
}

impl Serialize for Elapsed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_finite() {
            serializer.serialize_f64(self.0)
        } else {
            serializer.serialize_none()
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawElapsed {
    Seconds(Option<f64>),
    Text(String),
}

impl<'de> Deserialize<'de> for Elapsed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawElapsed::deserialize(deserializer)? {
            RawElapsed::Seconds(Some(secs)) => Ok(Elapsed(secs)),
            RawElapsed::Seconds(None) => Ok(Elapsed::INFINITE),
            RawElapsed::Text(text) => match text.as_str() {
                "Infinity" | "inf" | "+inf" => Ok(Elapsed::INFINITE),
                other => other
                    .parse::<f64>()
                    .map(Elapsed)
                    .map_err(|_| serde::de::Error::custom(format!("invalid elapsed time: {}", other))),
            },
        }
    }
}

/// Persisted row layout: `[kind, task, language, size, elapsed]`
type ResultRow = (Kind, String, Language, u32, Elapsed);

/// One measurement of one task at one size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ResultRow", into = "ResultRow")]
pub struct BenchResult {
    pub kind: Kind,
    pub task: String,
    pub language: Language,
    pub size: u32,
    pub elapsed: Elapsed,
}

impl BenchResult {
    pub fn new(kind: Kind, task: impl Into<String>, language: Language, size: u32, elapsed: Elapsed) -> Self {
        Self {
            kind,
            task: task.into(),
            language,
            size,
            elapsed,
        }
    }

    /// Name of the chart this measurement belongs to
    pub fn chart_name(&self) -> String {
        format!("{}_{}", self.kind, self.task)
    }
}

impl From<ResultRow> for BenchResult {
    fn from((kind, task, language, size, elapsed): ResultRow) -> Self {
        Self {
            kind,
            task,
            language,
            size,
            elapsed,
        }
    }
}

impl From<BenchResult> for ResultRow {
    fn from(result: BenchResult) -> Self {
        (result.kind, result.task, result.language, result.size, result.elapsed)
    }
}

/// Progress line: `kind | task | language | size | seconds`
impl fmt::Display for BenchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {} | {}",
            self.kind, self.task, self.language, self.size, self.elapsed
        )
    }
}
