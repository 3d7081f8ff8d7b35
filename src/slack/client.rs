//! Outbound Slack Web API client (`chat.postMessage`).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::errors::BotError;

/// Seam for posting messages, so handlers can be tested without Slack.
#[async_trait]
pub trait PostMessage: Send + Sync {
    /// Post `text` into `channel`, threaded under `thread_ts`.
    async fn post(&self, channel: &str, thread_ts: &str, text: &str) -> Result<(), BotError>;
}

#[derive(Clone)]
pub struct SlackClient {
    client: Client,
    bot_token: String,
}

impl SlackClient {
    pub fn new(bot_token: String) -> Self {
        Self {
            client: Client::new(),
            bot_token,
        }
    }
}

#[async_trait]
impl PostMessage for SlackClient {
    async fn post(&self, channel: &str, thread_ts: &str, text: &str) -> Result<(), BotError> {
        let response = self
            .client
            .post("https://slack.com/api/chat.postMessage")
            .bearer_auth(&self.bot_token)
            .json(&json!({
                "channel": channel,
                "thread_ts": thread_ts,
                "text": text,
            }))
            .send()
            .await
            .map_err(|e| BotError::Slack(format!("chat.postMessage failed: {}", e)))?;

        // Slack reports API-level failures in the body with HTTP 200.
        let payload: Value = response
            .json()
            .await
            .map_err(|e| BotError::Slack(format!("chat.postMessage response unreadable: {}", e)))?;
        if payload["ok"].as_bool() != Some(true) {
            let reason = payload["error"].as_str().unwrap_or("unknown");
            return Err(BotError::Slack(format!(
                "chat.postMessage rejected: {}",
                reason
            )));
        }

        Ok(())
    }
}
