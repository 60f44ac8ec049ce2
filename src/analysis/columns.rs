//! Column role resolution.
//!
//! Source files name their measure columns differently, so the price and
//! demand columns are located by substring. The first matching column in
//! dataset order wins.

/// Label of the price series in chart payloads.
pub const PRICE_LABEL: &str = "Average Price";
/// Label of the demand series in chart payloads.
pub const DEMAND_LABEL: &str = "Demand";

/// Price and demand columns found in a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRoles {
    pub price: Option<String>,
    pub demand: Option<String>,
}

impl ColumnRoles {
    /// Resolve both roles from the full column list.
    pub fn resolve<S: AsRef<str>>(columns: &[S]) -> Self {
        Self {
            price: price_column(columns),
            demand: demand_column(columns),
        }
    }

    /// Resolved roles paired with their chart labels, price first.
    pub fn labeled(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [(PRICE_LABEL, &self.price), (DEMAND_LABEL, &self.demand)]
            .into_iter()
            .filter_map(|(label, column)| column.as_deref().map(|c| (label, c)))
    }
}

/// First column containing both "flat" and "weighted".
pub fn price_column<S: AsRef<str>>(columns: &[S]) -> Option<String> {
    columns
        .iter()
        .map(AsRef::as_ref)
        .find(|c| c.contains("flat") && c.contains("weighted"))
        .map(str::to_string)
}

/// First column containing "demand" or "total_sales".
pub fn demand_column<S: AsRef<str>>(columns: &[S]) -> Option<String> {
    columns
        .iter()
        .map(AsRef::as_ref)
        .find(|c| c.contains("demand") || c.contains("total_sales"))
        .map(str::to_string)
}
