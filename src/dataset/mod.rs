//! Market dataset access.
//!
//! The dataset is a single table read from a workbook (`xlsx`, `xls`, `xlsb`,
//! `ods`) or a delimited text file (`csv`, `tsv`). Column names are
//! normalized once at load and the table is never mutated afterwards.
//!
//! - [`CachedDataset`]: loads lazily from disk and keeps the first successful
//!   load for the process lifetime.
//! - [`StaticDataset`]: wraps a table built in memory.

mod loader;
mod source;
mod table;
mod value;

pub use loader::{load_dataset, DatasetFormat};
pub use source::{CachedDataset, DatasetSchema, DatasetSource, StaticDataset};
pub use table::{normalize_column_name, Dataset};
pub use value::CellValue;
