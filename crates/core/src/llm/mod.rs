pub mod anthropic;
pub mod error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Anthropic,
}

#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    fn provider(&self) -> Provider;

    /// Sends one user message and returns the reply text as-is.
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}
