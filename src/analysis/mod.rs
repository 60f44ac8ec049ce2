//! Question answering over the property-market dataset.
//!
//! A question flows through three steps:
//!
//! 1. [`IntentClassifier`] picks a [`QueryIntent`] from keywords.
//! 2. [`extract_locations`] finds the dataset localities it mentions.
//! 3. [`AnalysisEngine`] filters the matching rows and builds the summary,
//!    chart series and table excerpt.

mod classifier;
mod columns;
mod engine;
mod locations;
mod types;

pub use classifier::IntentClassifier;
pub use columns::{demand_column, price_column, ColumnRoles, DEMAND_LABEL, PRICE_LABEL};
pub use engine::{AnalysisEngine, NEED_TWO_LOCATIONS, NO_COMPARABLE_DATA};
pub use locations::extract_locations;
pub use types::*;
