/// Text-completion backends
///
/// Day analysis and recommendation generation both go through a single
/// prompt-in, text-out call. Nothing is streamed and no conversation state is
/// kept between calls; whatever the second prompt needs is embedded in it.
use crate::error::AppResult;

pub mod gemini;

pub use gemini::GeminiClient;

/// Trait for LLM text-completion services
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends one prompt and returns the full response text
    async fn complete(&self, prompt: &str) -> AppResult<String>;

    /// Client name for logging and debugging
    fn name(&self) -> &'static str;
}
