//! Aggregation and summary engine.
//!
//! For a classified question and its matched localities, filters the dataset
//! to the relevant rows (year ascending) and builds the summary text, chart
//! series, and table excerpt. A configured [`Summarizer`] may supply the
//! summary text; when it has nothing, a deterministic summary is built from
//! the data.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::classifier::IntentClassifier;
use super::columns::ColumnRoles;
use super::locations::extract_locations;
use super::types::*;
use crate::dataset::{CellValue, Dataset, DatasetSchema};
use crate::summarizer::Summarizer;

/// Rows kept for a price growth answer.
const PRICE_GROWTH_WINDOW: usize = 4;
/// Placeholder for a missing price in the price growth listing.
const MISSING_VALUE: &str = "n/a";

const SINGLE_AREA_ROLE: &str = "You are a real estate analyst.";
const COMPARE_ROLE: &str = "You are a real estate comparison expert.";
const PRICE_GROWTH_ROLE: &str = "You are a real estate data analyst.";
const DEMAND_TREND_ROLE: &str = "You are a demand trend analyst.";

/// Message returned when a comparison names fewer than two localities.
pub const NEED_TWO_LOCATIONS: &str = "I need at least two locations to compare.";
/// Message returned when no compared locality has data for the latest year.
pub const NO_COMPARABLE_DATA: &str = "No comparable data found.";

/// Answers questions against a dataset.
pub struct AnalysisEngine {
    classifier: IntentClassifier,
    summarizer: Arc<dyn Summarizer>,
    schema: DatasetSchema,
}

/// One locality's rows, sorted by year.
struct AreaRows<'a> {
    dataset: &'a Dataset,
    rows: Vec<&'a [CellValue]>,
}

impl<'a> AreaRows<'a> {
    fn collect(dataset: &'a Dataset, schema: &DatasetSchema, area: &str) -> Self {
        let mut rows = dataset.rows_where(&schema.location_column, area);
        let year = dataset.column_index(&schema.year_column);
        rows.sort_by(|a, b| match year {
            Some(idx) => a[idx].sort_cmp(&b[idx]),
            None => std::cmp::Ordering::Equal,
        });
        Self { dataset, rows }
    }

    fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn keep_last(mut self, n: usize) -> Self {
        let skip = self.rows.len().saturating_sub(n);
        self.rows.drain(..skip);
        self
    }

    fn values(&self, column: &str) -> Vec<CellValue> {
        self.rows
            .iter()
            .map(|row| self.dataset.cell(row, column).cloned().unwrap_or(CellValue::Empty))
            .collect()
    }

    /// First and last non-missing numeric values of a column.
    fn endpoints(&self, column: &str) -> Option<(f64, f64)> {
        let numbers: Vec<f64> = self
            .rows
            .iter()
            .filter_map(|row| self.dataset.cell(row, column).and_then(CellValue::as_f64))
            .collect();
        Some((*numbers.first()?, *numbers.last()?))
    }

    fn records_json(&self) -> String {
        records_value(self.dataset, &self.rows).to_string()
    }
}

impl AnalysisEngine {
    /// Create an engine with the given summarizer and column names.
    pub fn new(summarizer: Arc<dyn Summarizer>, schema: DatasetSchema) -> Self {
        Self {
            classifier: IntentClassifier::new(),
            summarizer,
            schema,
        }
    }

    pub fn schema(&self) -> &DatasetSchema {
        &self.schema
    }

    /// Answer a free-text question.
    pub async fn analyze(&self, message: &str, dataset: &Dataset) -> Outcome {
        let query_type = self.classifier.classify(message);
        let locations = extract_locations(message, dataset, &self.schema.location_column);

        tracing::debug!(
            query_type = %query_type,
            locations = ?locations,
            "Classified question"
        );

        if locations.is_empty() && query_type != QueryIntent::Compare {
            return Outcome::NoLocation {
                query_type,
                available: dataset.distinct_values(&self.schema.location_column),
            };
        }

        let area = locations.first().map(String::as_str).unwrap_or_default();
        let roles = ColumnRoles::resolve(dataset.columns());

        let summary = match query_type {
            QueryIntent::SingleArea => self.summarize_single(area, dataset, &roles).await,
            QueryIntent::Compare => self.summarize_compare(&locations, dataset, &roles).await,
            QueryIntent::PriceGrowth => self.summarize_price_growth(area, dataset, &roles).await,
            QueryIntent::DemandTrend => self.summarize_demand_trend(area, dataset, &roles).await,
        };

        let (chart_data, table_data) = match query_type {
            QueryIntent::Compare => (ChartData::default(), Vec::new()),
            _ => (
                self.chart_data(area, dataset, &roles),
                self.table_data(area, dataset, &roles),
            ),
        };

        Outcome::Answer(AnalysisResult {
            query_type,
            locations,
            summary,
            chart_data,
            table_data,
        })
    }

    // ========================================================================
    // Summaries
    // ========================================================================

    /// Overview of one locality.
    pub async fn summarize_single(
        &self,
        area: &str,
        dataset: &Dataset,
        roles: &ColumnRoles,
    ) -> String {
        let rows = AreaRows::collect(dataset, &self.schema, area);
        if rows.is_empty() {
            return format!("I don't have data for {}.", area);
        }

        let prompt = |records: String| {
            format!(
                "Give a short real-estate analysis for locality '{}' based on:\n{}",
                area, records
            )
        };
        if let Some(text) = self
            .generate(SINGLE_AREA_ROLE, || prompt(rows.records_json()))
            .await
        {
            return text;
        }

        let years = rows.values(&self.schema.year_column);
        let first_year = years.first().map(ToString::to_string).unwrap_or_default();
        let last_year = years.last().map(ToString::to_string).unwrap_or_default();

        let mut parts = vec![format!(
            "Analysis for {} from {} to {}:",
            area, first_year, last_year
        )];

        if let Some((start, end)) = roles.price.as_deref().and_then(|c| rows.endpoints(c)) {
            parts.push(change_sentence("Prices have", start, end));
        }
        if let Some((start, end)) = roles.demand.as_deref().and_then(|c| rows.endpoints(c)) {
            parts.push(change_sentence("Demand has", start, end));
        }

        parts.join(" ")
    }

    /// Latest-year price comparison across localities.
    pub async fn summarize_compare(
        &self,
        areas: &[String],
        dataset: &Dataset,
        roles: &ColumnRoles,
    ) -> String {
        if areas.len() < 2 {
            return NEED_TWO_LOCATIONS.to_string();
        }

        let build_prompt = || {
            let per_area: Map<String, Value> = areas
                .iter()
                .map(|area| {
                    let rows = dataset.rows_where(&self.schema.location_column, area);
                    (area.clone(), records_value(dataset, &rows))
                })
                .collect();
            format!(
                "Compare real-estate data for these areas:\n{}",
                Value::Object(per_area)
            )
        };
        if let Some(text) = self.generate(COMPARE_ROLE, build_prompt).await {
            return text;
        }

        let (Some(price), Some(latest)) = (
            roles.price.as_deref(),
            dataset.max_value(&self.schema.year_column),
        ) else {
            return NO_COMPARABLE_DATA.to_string();
        };

        let snippets: Vec<String> = areas
            .iter()
            .filter_map(|area| {
                let row = dataset
                    .rows_where(&self.schema.location_column, area)
                    .into_iter()
                    .find(|row| {
                        dataset
                            .cell(row, &self.schema.year_column)
                            .is_some_and(|year| year.same_value(latest))
                    })?;
                let value = dataset.cell(row, price)?.as_f64()?;
                Some(format!("{}: ~{}", area, round_value(value)))
            })
            .collect();

        if snippets.is_empty() {
            NO_COMPARABLE_DATA.to_string()
        } else {
            snippets.join(" | ")
        }
    }

    /// Prices over the most recent years of one locality.
    pub async fn summarize_price_growth(
        &self,
        area: &str,
        dataset: &Dataset,
        roles: &ColumnRoles,
    ) -> String {
        let rows = AreaRows::collect(dataset, &self.schema, area).keep_last(PRICE_GROWTH_WINDOW);
        let Some(price) = roles.price.as_deref().filter(|_| !rows.is_empty()) else {
            return format!("No price data for {}.", area);
        };

        let prompt = || {
            format!(
                "Analyze the price growth trend for {} using this yearly data:\n{}",
                area,
                rows.records_json()
            )
        };
        if let Some(text) = self.generate(PRICE_GROWTH_ROLE, prompt).await {
            return text;
        }

        let pairs: Vec<String> = rows
            .values(&self.schema.year_column)
            .iter()
            .zip(rows.values(price))
            .map(|(year, value)| {
                if value.is_missing() {
                    format!("{}: {}", year, MISSING_VALUE)
                } else {
                    format!("{}: {}", year, value)
                }
            })
            .collect();

        format!("Price growth for {}: {}", area, pairs.join(", "))
    }

    /// Direction of demand over the full history of one locality.
    pub async fn summarize_demand_trend(
        &self,
        area: &str,
        dataset: &Dataset,
        roles: &ColumnRoles,
    ) -> String {
        let rows = AreaRows::collect(dataset, &self.schema, area);
        let no_data = || format!("No demand trend data for {}.", area);
        let Some(demand) = roles.demand.as_deref().filter(|_| !rows.is_empty()) else {
            return no_data();
        };

        let prompt = || {
            format!(
                "Analyze demand trend for {} using:\n{}",
                area,
                rows.records_json()
            )
        };
        if let Some(text) = self.generate(DEMAND_TREND_ROLE, prompt).await {
            return text;
        }

        match rows.endpoints(demand) {
            Some((start, end)) => {
                let trend = Trend::between(round_value(start), round_value(end));
                format!("Demand for {} has {}.", area, trend.as_str())
            }
            None => no_data(),
        }
    }

    // ========================================================================
    // Chart and Table
    // ========================================================================

    /// Year-ordered series for each resolved role.
    pub fn chart_data(&self, area: &str, dataset: &Dataset, roles: &ColumnRoles) -> ChartData {
        let rows = AreaRows::collect(dataset, &self.schema, area);

        let datasets = roles
            .labeled()
            .filter(|(_, column)| dataset.has_column(column))
            .map(|(label, column)| ChartSeries {
                label: label.to_string(),
                data: rows.values(column).iter().map(CellValue::as_f64).collect(),
            })
            .collect();

        ChartData {
            labels: rows.values(&self.schema.year_column),
            datasets,
        }
    }

    /// Year-ordered rows restricted to the displayed columns.
    pub fn table_data(&self, area: &str, dataset: &Dataset, roles: &ColumnRoles) -> Vec<TableRow> {
        let rows = AreaRows::collect(dataset, &self.schema, area);

        let mut columns: Vec<String> = Vec::new();
        let candidates = [
            Some(self.schema.year_column.as_str()),
            Some("city"),
            Some(self.schema.location_column.as_str()),
            roles.price.as_deref(),
            roles.demand.as_deref(),
        ];
        for column in candidates.into_iter().flatten() {
            if dataset.has_column(column) && !columns.iter().any(|c| c == column) {
                columns.push(column.to_string());
            }
        }

        rows.rows
            .iter()
            .map(|row| dataset.project_json(row, &columns))
            .collect()
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Ask the summarizer for text, building the prompt only if it is enabled.
    async fn generate<F>(&self, system: &str, prompt: F) -> Option<String>
    where
        F: FnOnce() -> String,
    {
        if !self.summarizer.is_enabled() {
            return None;
        }
        let prompt = prompt();
        self.summarizer
            .summarize(system, &prompt)
            .await
            .filter(|text| !text.trim().is_empty())
    }
}

fn change_sentence(subject: &str, start: f64, end: f64) -> String {
    let (start, end) = (round_value(start), round_value(end));
    format!(
        "• {} {} from {} to {}.",
        subject,
        Trend::between(start, end).as_str(),
        start,
        end
    )
}

/// Rows as a JSON array of records over all columns.
fn records_value(dataset: &Dataset, rows: &[&[CellValue]]) -> Value {
    Value::Array(
        rows.iter()
            .map(|row| Value::Object(dataset.record_json(row)))
            .collect(),
    )
}
