//! Realty: natural-language questions over real-estate market data.
//!
//! Loads a spreadsheet of yearly per-locality price and demand figures and
//! answers free-text questions about it over HTTP, with chart series, a table
//! excerpt and a short summary for each answer.

pub mod analysis;
pub mod api;
pub mod config;
pub mod dataset;
pub mod error;
pub mod summarizer;

pub use analysis::{
    AnalysisEngine, AnalysisResult, ChartData, ChartSeries, ColumnRoles, IntentClassifier,
    Outcome, QueryIntent,
};
pub use api::{create_router, run_http, ApiState};
pub use config::Config;
pub use dataset::{
    load_dataset, CachedDataset, CellValue, Dataset, DatasetSchema, DatasetSource, StaticDataset,
};
pub use error::{ConfigError, DatasetError, RealtyError, Result, SummarizerError};
pub use summarizer::{create_summarizer, ChatCompletionSummarizer, DisabledSummarizer, Summarizer};
