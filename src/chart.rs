//! Terminal charts fed from aggregation results.

use crate::error::{Result, ReviewError};
use std::fmt::Write as _;
use std::str::FromStr;
use tracing::warn;

const BAR_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Share of a whole per category.
    Pie,
    /// Magnitude per category.
    Bar,
}

impl FromStr for ChartKind {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pie" => Ok(Self::Pie),
            "bar" => Ok(Self::Bar),
            _ => {
                warn!(kind = s, "Rejected chart type");
                Err(ReviewError::UnsupportedChart(s.to_string()))
            }
        }
    }
}

/// A chart with labels, values and optional legend of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    kind: ChartKind,
    title: String,
    labels: Vec<String>,
    values: Vec<f64>,
    legend: Option<Vec<String>>,
}

impl ChartRequest {
    pub fn new(
        kind: ChartKind,
        title: impl Into<String>,
        labels: Vec<String>,
        values: Vec<f64>,
        legend: Option<Vec<String>>,
    ) -> Result<Self> {
        let title = title.into();
        let misaligned = |other: usize, what: &'static str| ReviewError::MisalignedChart {
            title: title.clone(),
            labels: labels.len(),
            other,
            what,
        };
        if values.len() != labels.len() {
            return Err(misaligned(values.len(), "values"));
        }
        if let Some(legend) = &legend {
            if legend.len() != labels.len() {
                return Err(misaligned(legend.len(), "legend entries"));
            }
        }
        Ok(Self {
            kind,
            title,
            labels,
            values,
            legend,
        })
    }

    /// Build from `(label, value)` pairs as the aggregation queries return them.
    pub fn from_pairs<V>(kind: ChartKind, title: impl Into<String>, pairs: Vec<(String, V)>) -> Self
    where
        V: Into<f64>,
    {
        let (labels, values): (Vec<String>, Vec<f64>) =
            pairs.into_iter().map(|(l, v)| (l, v.into())).unzip();
        Self {
            kind,
            title: title.into(),
            labels,
            values,
            legend: None,
        }
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn legend(&self) -> Option<&[String]> {
        self.legend.as_deref()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        let _ = writeln!(out, "{}", "=".repeat(self.title.chars().count()));
        let names: Vec<&str> = match &self.legend {
            // A legend names the slices when the labels are bare numbers.
            Some(legend) => legend.iter().map(String::as_str).collect(),
            None => self.labels.iter().map(String::as_str).collect(),
        };
        let width = names.iter().map(|n| n.chars().count()).max().unwrap_or(0);
        match self.kind {
            ChartKind::Bar => {
                let max = self.values.iter().copied().fold(0.0_f64, f64::max);
                for (name, value) in names.iter().zip(&self.values) {
                    let _ = writeln!(
                        out,
                        "{:<width$} | {} {}",
                        name,
                        bar(*value, max),
                        value
                    );
                }
            }
            ChartKind::Pie => {
                let total: f64 = self.values.iter().copied().filter(|v| *v > 0.0).sum();
                for (name, value) in names.iter().zip(&self.values) {
                    let share = if total > 0.0 { value.max(0.0) / total } else { 0.0 };
                    let _ = writeln!(
                        out,
                        "{:<width$} | {:>5.1}% {} ({})",
                        name,
                        share * 100.0,
                        bar(share, 1.0),
                        value
                    );
                }
            }
        }
        out
    }
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let cells = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(cells.min(BAR_WIDTH))
}
