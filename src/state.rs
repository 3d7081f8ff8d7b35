use std::sync::Arc;

use crate::bedrock::{BedrockAgentClient, BedrockRuntimeClient};
use crate::config::BotConfig;
use crate::errors::BotError;
use crate::orchestrator::Orchestrator;
use crate::slack::{PostMessage, SlackClient};

/// Application state shared across event handlers.
///
/// All clients are stateless handles; handlers clone what they need and
/// never coordinate with each other.
#[derive(Clone)]
pub struct AppState {
    pub config: BotConfig,
    pub chat: Arc<dyn PostMessage>,
    pub orchestrator: Orchestrator,
}

impl AppState {
    pub fn initialize(config: BotConfig) -> Result<Self, BotError> {
        let retrieval = Arc::new(BedrockAgentClient::new(&config));
        let inference = Arc::new(BedrockRuntimeClient::new(&config)?);
        let chat: Arc<dyn PostMessage> =
            Arc::new(SlackClient::new(config.slack_bot_token.clone()));
        let orchestrator = Orchestrator::new(retrieval, inference);

        Ok(Self {
            config,
            chat,
            orchestrator,
        })
    }
}
