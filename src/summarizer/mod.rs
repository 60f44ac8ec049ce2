//! Optional generated summaries.
//!
//! - [`ChatCompletionSummarizer`]: calls an OpenAI-compatible chat
//!   completion endpoint once per request.
//! - [`DisabledSummarizer`]: always unavailable; used when summaries are
//!   turned off or no credential is configured.
//!
//! Backend failures are logged and reported as unavailable, never returned.

mod openai;
mod traits;

pub use openai::ChatCompletionSummarizer;
pub use traits::{DisabledSummarizer, Summarizer};

use std::sync::Arc;

use crate::config::SummarizerConfig;

/// Create a summarizer from configuration.
pub fn create_summarizer(config: &SummarizerConfig) -> Arc<dyn Summarizer> {
    if !config.enabled {
        tracing::info!("Generated summaries disabled by configuration");
        return Arc::new(DisabledSummarizer);
    }

    match ChatCompletionSummarizer::from_config(config) {
        Ok(summarizer) => {
            tracing::info!(model = %config.model, "Generated summaries enabled");
            Arc::new(summarizer)
        }
        Err(e) => {
            tracing::warn!("Generated summaries unavailable: {}", e);
            Arc::new(DisabledSummarizer)
        }
    }
}
