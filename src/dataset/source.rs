//! Dataset accessors: the process-wide lazily loaded table and injected tables.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use super::loader::load_dataset;
use super::table::{normalize_column_name, Dataset};
use crate::config::DatasetConfig;
use crate::error::Result;

/// Names of the columns every query depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSchema {
    pub location_column: String,
    pub year_column: String,
}

impl Default for DatasetSchema {
    fn default() -> Self {
        Self {
            location_column: "final_location".to_string(),
            year_column: "year".to_string(),
        }
    }
}

impl DatasetSchema {
    pub fn from_config(config: &DatasetConfig) -> Self {
        Self {
            location_column: normalize_column_name(&config.location_column),
            year_column: normalize_column_name(&config.year_column),
        }
    }
}

/// Read-only access to the dataset.
pub trait DatasetSource: Send + Sync {
    /// Return the dataset, loading it on first use if necessary.
    fn dataset(&self) -> Result<Arc<Dataset>>;
}

/// A dataset loaded from disk on first access and kept for the process lifetime.
///
/// The first successful load is stored and never replaced. A failed load is
/// not cached, so the next access tries again.
pub struct CachedDataset {
    path: PathBuf,
    sheet: Option<String>,
    schema: DatasetSchema,
    cell: OnceLock<Arc<Dataset>>,
}

impl CachedDataset {
    pub fn new(path: impl Into<PathBuf>, sheet: Option<String>, schema: DatasetSchema) -> Self {
        Self {
            path: path.into(),
            sheet,
            schema,
            cell: OnceLock::new(),
        }
    }

    pub fn from_config(config: &DatasetConfig) -> Self {
        Self::new(
            config.resolved_path(),
            config.sheet.clone(),
            DatasetSchema::from_config(config),
        )
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    fn load(&self) -> Result<Dataset> {
        let dataset = load_dataset(&self.path, self.sheet.as_deref())?;
        dataset.require_columns(&[
            self.schema.location_column.as_str(),
            self.schema.year_column.as_str(),
        ])?;
        Ok(dataset)
    }
}

impl DatasetSource for CachedDataset {
    fn dataset(&self) -> Result<Arc<Dataset>> {
        if let Some(dataset) = self.cell.get() {
            return Ok(Arc::clone(dataset));
        }

        let loaded = Arc::new(self.load()?);
        // Concurrent first loads all succeed; whichever stores first is kept.
        if self.cell.set(Arc::clone(&loaded)).is_ok() {
            tracing::info!(
                path = %self.path.display(),
                rows = loaded.len(),
                columns = loaded.columns().len(),
                "Dataset loaded"
            );
        }
        Ok(self.cell.get().cloned().unwrap_or(loaded))
    }
}

/// A dataset supplied by the caller.
#[derive(Debug, Clone)]
pub struct StaticDataset(Arc<Dataset>);

impl StaticDataset {
    pub fn new(dataset: Dataset) -> Self {
        Self(Arc::new(dataset))
    }
}

impl DatasetSource for StaticDataset {
    fn dataset(&self) -> Result<Arc<Dataset>> {
        Ok(Arc::clone(&self.0))
    }
}
