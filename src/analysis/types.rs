//! Types for the question-answering pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dataset::CellValue;

// ============================================================================
// Query Intent
// ============================================================================

/// What kind of answer a question asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryIntent {
    /// Overview of one locality
    #[default]
    SingleArea,
    /// Side-by-side comparison of several localities
    Compare,
    /// Recent price movement of one locality
    PriceGrowth,
    /// Demand history of one locality
    DemandTrend,
}

impl QueryIntent {
    pub const ALL: [QueryIntent; 4] = [
        Self::SingleArea,
        Self::Compare,
        Self::PriceGrowth,
        Self::DemandTrend,
    ];

    /// Wire name of the intent.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleArea => "single_area",
            Self::Compare => "compare",
            Self::PriceGrowth => "price_growth",
            Self::DemandTrend => "demand_trend",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SingleArea => "Area Overview",
            Self::Compare => "Comparison",
            Self::PriceGrowth => "Price Growth",
            Self::DemandTrend => "Demand Trend",
        }
    }
}

impl fmt::Display for QueryIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryIntent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|intent| intent.as_str() == s)
            .ok_or_else(|| format!("unknown query type: {}", s))
    }
}

// ============================================================================
// Trend
// ============================================================================

/// Direction of change between two rounded values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Increased,
    Decreased,
    Stable,
}

impl Trend {
    pub fn between(start: i64, end: i64) -> Self {
        if end > start {
            Self::Increased
        } else if end < start {
            Self::Decreased
        } else {
            Self::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increased => "increased",
            Self::Decreased => "decreased",
            Self::Stable => "remained stable",
        }
    }
}

/// Round to the nearest integer, ties to even.
pub fn round_value(value: f64) -> i64 {
    value.round_ties_even() as i64
}

// ============================================================================
// Payloads
// ============================================================================

/// Time-series chart payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    /// Years, ascending
    pub labels: Vec<CellValue>,
    /// One series per resolved column role
    pub datasets: Vec<ChartSeries>,
}

/// A single chart series; values are unrounded and `None` where missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub label: String,
    pub data: Vec<Option<f64>>,
}

/// A table row restricted to the displayed columns, in column order.
pub type TableRow = Map<String, Value>;

/// A complete answer to a question.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub query_type: QueryIntent,
    pub locations: Vec<String>,
    pub summary: String,
    pub chart_data: ChartData,
    pub table_data: Vec<TableRow>,
}

/// Result of running the pipeline on a question.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The question was answered (possibly with an explanatory summary only).
    Answer(AnalysisResult),
    /// No known locality was mentioned.
    NoLocation {
        query_type: QueryIntent,
        available: Vec<String>,
    },
}
