//! CLI command handlers.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use realty::{ApiState, Config};

use super::output;

/// Run the ask command: answer one question and print the result.
pub async fn run_ask(config: Config, message: String, json_output: bool) -> Result<()> {
    if message.trim().is_empty() {
        bail!("Message text is required");
    }

    let state = ApiState::from_config(&config);
    let dataset = state.dataset().await?;
    let outcome = state.engine.analyze(&message, &dataset).await;

    output::print_outcome(&outcome, json_output)
}

/// Run the locations command.
pub async fn run_locations(config: Config, json_output: bool) -> Result<()> {
    let state = ApiState::from_config(&config);
    let dataset = state.dataset().await?;
    let locations = dataset.distinct_values(&state.engine.schema().location_column);

    output::print_locations(&locations, json_output)
}

/// Run the export command: write one locality's rows as CSV.
///
/// Writes to `output` when given, otherwise to stdout.
pub async fn run_export(
    config: Config,
    area: String,
    output_path: Option<PathBuf>,
    json_output: bool,
) -> Result<()> {
    let state = ApiState::from_config(&config);
    let dataset = state.dataset().await?;

    let rows = dataset.rows_where_ignore_case(&state.engine.schema().location_column, &area);
    if rows.is_empty() {
        bail!("No data found for {}", area);
    }
    let csv = dataset.to_csv(&rows)?;

    match output_path {
        Some(path) => {
            tokio::fs::write(&path, csv)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            output::print_export(&area, rows.len(), Some(&path), json_output)
        }
        None => {
            print!("{}", csv);
            Ok(())
        }
    }
}

/// Load the dataset ahead of the first request.
///
/// A failure is only logged; requests retry the load and report it.
pub async fn warm_cache(state: &Arc<ApiState>) {
    match state.dataset().await {
        Ok(dataset) => tracing::info!(
            rows = dataset.len(),
            columns = dataset.columns().len(),
            "Dataset ready"
        ),
        Err(e) => tracing::error!("Dataset not loaded at startup: {}", e),
    }
}
