use std::env;

use crate::errors::BotError;

/// Model used when `AWS_LLM_MODEL_ID` is not set.
pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-sonnet-20240229-v1:0";

/// AWS credentials for SigV4 request signing.
#[derive(Debug, Clone)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl AwsCredentials {
    pub fn from_env() -> Result<Self, BotError> {
        Ok(Self {
            access_key_id: require_var("AWS_ACCESS_KEY_ID")?,
            secret_access_key: require_var("AWS_SECRET_ACCESS_KEY")?,
            session_token: env::var("AWS_SESSION_TOKEN").ok(),
        })
    }
}

/// Startup configuration, read once from the environment.
///
/// Passed explicitly into each client constructor so tests can build one by
/// hand instead of reaching for process globals.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub credentials: AwsCredentials,
    pub region: String,
    pub knowledge_base_id: String,
    pub model_id: String,
    pub slack_bot_token: String,
    pub slack_signing_secret: String,
    pub port: u16,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, BotError> {
        let slack = SlackConfig::from_env()?;
        Ok(Self {
            credentials: AwsCredentials::from_env()?,
            region: require_var("AWS_REGION")?,
            knowledge_base_id: require_var("AWS_KNOWLEDGE_BASE_ID")?,
            model_id: model_id_from_env(),
            slack_bot_token: slack.bot_token,
            slack_signing_secret: slack.signing_secret,
            port: env::var("PORT")
                .ok()
                .and_then(|val| val.parse::<u16>().ok())
                .unwrap_or(3000),
        })
    }
}

/// Slack-side settings, split out so the ingestion CLI can skip them.
#[derive(Debug, Clone)]
pub struct SlackConfig {
    pub bot_token: String,
    pub signing_secret: String,
}

impl SlackConfig {
    pub fn from_env() -> Result<Self, BotError> {
        Ok(Self {
            bot_token: require_var("SLACK_BOT_TOKEN")?,
            signing_secret: require_var("SLACK_SIGNING_SECRET")?,
        })
    }
}

/// Subset of [`BotConfig`] the ingestion CLI needs: credentials, region and
/// knowledge base, no Slack surface.
#[derive(Debug, Clone)]
pub struct IngestionConfig {
    pub credentials: AwsCredentials,
    pub region: String,
    pub knowledge_base_id: String,
}

impl IngestionConfig {
    pub fn from_env() -> Result<Self, BotError> {
        Ok(Self {
            credentials: AwsCredentials::from_env()?,
            region: require_var("AWS_REGION")?,
            knowledge_base_id: require_var("AWS_KNOWLEDGE_BASE_ID")?,
        })
    }
}

fn model_id_from_env() -> String {
    env::var("AWS_LLM_MODEL_ID")
        .ok()
        .filter(|val| !val.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_MODEL_ID.to_string())
}

fn require_var(name: &str) -> Result<String, BotError> {
    env::var(name).map_err(|_| BotError::Config(format!("{} environment variable not set", name)))
}
