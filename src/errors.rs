use thiserror::Error;

/// Error taxonomy for the bot and the ingestion CLI.
///
/// The user-facing path (handlers, orchestrator) absorbs these into a fixed
/// apology string at the outermost boundary; the ingestion CLI propagates
/// them and exits non-zero.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("unsupported model: {0}")]
    UnsupportedModel(String),
    #[error("retrieval failed: {0}")]
    Retrieval(String),
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("ingestion failed: {0}")]
    Ingestion(String),
    #[error("slack api error: {0}")]
    Slack(String),
}

impl BotError {
    pub fn retrieval<E: std::fmt::Display>(err: E) -> Self {
        BotError::Retrieval(err.to_string())
    }

    pub fn inference<E: std::fmt::Display>(err: E) -> Self {
        BotError::Inference(err.to_string())
    }

    pub fn ingestion<E: std::fmt::Display>(err: E) -> Self {
        BotError::Ingestion(err.to_string())
    }
}
