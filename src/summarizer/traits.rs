//! Summarizer trait definitions.

use async_trait::async_trait;

/// An optional text-generation capability.
///
/// Implementations make at most one attempt per call and report any failure
/// as `None`; callers always have a deterministic fallback.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Generate text for `prompt` under the given system role.
    async fn summarize(&self, system: &str, prompt: &str) -> Option<String>;

    /// Whether calls can produce text at all. Callers may skip building
    /// prompts when this is false.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Summarizer that never produces text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSummarizer;

#[async_trait]
impl Summarizer for DisabledSummarizer {
    async fn summarize(&self, _system: &str, _prompt: &str) -> Option<String> {
        None
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
