//! Cell values as read from the source file.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

/// A single dataset cell.
///
/// Serializes untagged, so numbers stay JSON numbers and missing cells
/// become `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// ISO-8601 date or datetime text
    DateTime(String),
}

impl CellValue {
    /// Infer a typed value from raw delimited-text input.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        if let Ok(n) = trimmed.parse::<i64>() {
            return Self::Int(n);
        }
        if let Ok(n) = trimmed.parse::<f64>() {
            return Self::Float(n);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => Self::Text(raw.to_string()),
        }
    }

    /// True for empty cells and NaN.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Float(n) => n.is_nan(),
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Numeric view of the cell, if it holds a usable number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    /// Ordering used when sorting rows by a column.
    ///
    /// Numbers sort numerically and before text; missing values sort last.
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self.is_missing(), other.is_missing()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => {}
        }

        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.to_string().cmp(&other.to_string()),
        }
    }

    /// Value equality across representations (`2021` matches `2021.0`).
    pub fn same_value(&self, other: &Self) -> bool {
        !self.is_missing() && !other.is_missing() && self.sort_cmp(other) == Ordering::Equal
    }

    /// JSON representation used in table payloads and prompts.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Empty => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(n) => serde_json::Value::from(*n),
            Self::Float(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Text(s) | Self::DateTime(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(n) if n.is_nan() => Ok(()),
            Self::Float(n) => write!(f, "{}", n),
            Self::Text(s) | Self::DateTime(s) => f.write_str(s),
        }
    }
}
