//! LLM provider implementations

use async_trait::async_trait;

pub mod gemini;

// Re-export for convenience
pub use gemini::GeminiClient;

/// Anything that turns a prompt into completion text.
///
/// The tool adapter only talks to this trait, so tests can swap the
/// network client for a scripted one.
#[async_trait]
pub trait Completer: Send + Sync
{   async fn complete(&self, prompt: String)
      -> Result<String, crate::error::Error>;
}
