//! Grouping of measurements into per-chart series

use std::collections::BTreeMap;

use crate::constants::MAX_CHART_LABELS;
use crate::error::{AppError, AppResult};
use crate::models::{BenchResult, Language};

/// Display colour of each language's line
pub fn language_color(language: Language) -> &'static str {
    match language {
        Language::Agda => "pink",
        Language::Haskell => "purple",
        Language::Kind2 => "gray",
    }
}

/// Timings of one language within one chart, in encounter order
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub language: Language,
    pub color: &'static str,
    /// Size of the first measurement seen for this language
    pub first_size: u32,
    /// One value per consecutive size; the first value is always zero
    pub data: Vec<f64>,
}

impl Series {
    fn new(language: Language, first_size: u32) -> Self {
        Self {
            language,
            color: language_color(language),
            first_size,
            data: Vec::new(),
        }
    }

    /// Append a timing. The first point is replaced by zero to hide the
    /// skew of the first measurement.
    fn push(&mut self, secs: f64) {
        if self.data.is_empty() {
            self.data.push(0.0);
        } else {
            self.data.push(secs);
        }
    }

    /// Size of the last point, assuming a stride of one
    pub fn last_size(&self) -> u32 {
        let steps = u32::try_from(self.data.len().saturating_sub(1)).unwrap_or(u32::MAX);
        self.first_size.saturating_add(steps)
    }

    /// `(label index, value)` pairs for a chart whose labels start at `label_start`
    pub fn points(&self, label_start: u32) -> impl Iterator<Item = (usize, f64)> + '_ {
        let offset = (self.first_size - label_start) as usize;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, value)| (offset + i, *value))
    }
}

/// Everything needed to draw one chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    /// `<kind>_<task>`
    pub name: String,
    /// Consecutive sizes covering every series
    pub labels: Vec<String>,
    /// Size of the first label
    pub label_start: u32,
    pub series: Vec<Series>,
    /// Top of the time axis
    pub y_max: f64,
}

impl ChartData {
    pub fn file_name(&self) -> String {
        format!("{}.png", self.name)
    }
}

/// Group measurements by `(kind, task)` and then by language.
///
/// Charts and series keep the order in which they were first seen.
/// Series whose size ranges differ are aligned on their own sizes and the
/// labels span all of them. The axis maximum comes from `ceilings` when
/// the chart has an entry there, otherwise from the largest finite value.
///
/// A chart whose sizes span more than [`MAX_CHART_LABELS`] values is
/// rejected.
pub fn build_charts(results: &[BenchResult], ceilings: &BTreeMap<String, f64>) -> AppResult<Vec<ChartData>> {
    let mut grouped: Vec<(String, Vec<Series>)> = Vec::new();

    for result in results {
        let name = result.chart_name();
        let index = match grouped.iter().position(|(n, _)| *n == name) {
            Some(index) => index,
            None => {
                grouped.push((name, Vec::new()));
                grouped.len() - 1
            }
        };

        let series = &mut grouped[index].1;
        let position = match series.iter().position(|s| s.language == result.language) {
            Some(position) => position,
            None => {
                series.push(Series::new(result.language, result.size));
                series.len() - 1
            }
        };
        series[position].push(result.elapsed.secs());
    }

    grouped
        .into_iter()
        .map(|(name, series)| {
            let label_start = series.iter().map(|s| s.first_size).min().unwrap_or(0);
            let label_end = series.iter().map(Series::last_size).max().unwrap_or(label_start);
            let span = u64::from(label_end - label_start) + 1;
            if span > MAX_CHART_LABELS {
                return Err(AppError::Chart(format!(
                    "{} spans sizes {}..={}, more than {} labels",
                    name, label_start, label_end, MAX_CHART_LABELS
                )));
            }
            let labels = (label_start..=label_end).map(|size| size.to_string()).collect();

            let y_max = ceilings.get(&name).copied().unwrap_or_else(|| {
                series
                    .iter()
                    .flat_map(|s| s.data.iter().copied())
                    .filter(|v| v.is_finite())
                    .fold(0.0, f64::max)
            });

            Ok(ChartData {
                name,
                labels,
                label_start,
                series,
                y_max,
            })
        })
        .collect()
}
