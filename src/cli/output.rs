//! Output formatting for CLI commands.
//!
//! This module handles formatting output as either JSON or human-readable text.

use std::path::Path;

use anyhow::Result;
use realty::analysis::{AnalysisResult, Outcome};
use realty::api::NO_LOCATION_MESSAGE;

/// Print the answer to a question.
pub fn print_outcome(outcome: &Outcome, json: bool) -> Result<()> {
    match outcome {
        Outcome::Answer(result) if json => {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
        Outcome::Answer(result) => print_answer(result),
        Outcome::NoLocation { available, .. } if json => {
            let body = serde_json::json!({
                "error": NO_LOCATION_MESSAGE,
                "locations_available": available,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Outcome::NoLocation { available, .. } => {
            println!("{}", NO_LOCATION_MESSAGE);
            println!("Known locations: {}", available.join(", "));
        }
    }
    Ok(())
}

fn print_answer(result: &AnalysisResult) {
    println!("Query type: {}", result.query_type.display_name());
    if !result.locations.is_empty() {
        println!("Locations: {}", result.locations.join(", "));
    }
    println!("\n{}\n", result.summary);

    for series in &result.chart_data.datasets {
        let points: Vec<String> = result
            .chart_data
            .labels
            .iter()
            .zip(&series.data)
            .map(|(year, value)| match value {
                Some(v) => format!("{}={}", year, v),
                None => format!("{}=-", year),
            })
            .collect();
        println!("{}: {}", series.label, points.join(", "));
    }

    if !result.table_data.is_empty() {
        println!("\n{} table rows", result.table_data.len());
    }
}

/// Print the known localities.
pub fn print_locations(locations: &[String], json: bool) -> Result<()> {
    if json {
        let body = serde_json::json!({
            "locations": locations,
            "total": locations.len(),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else if locations.is_empty() {
        println!("No locations found.");
    } else {
        println!("Found {} locations:\n", locations.len());
        for location in locations {
            println!("  {}", location);
        }
    }
    Ok(())
}

/// Print the export result.
pub fn print_export(area: &str, rows: usize, path: Option<&Path>, json: bool) -> Result<()> {
    let path = path.map(|p| p.display().to_string());
    if json {
        let body = serde_json::json!({
            "area": area,
            "rows": rows,
            "output": path,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else if let Some(path) = path {
        println!("Exported {} rows for {} to {}", rows, area, path);
    }
    Ok(())
}
