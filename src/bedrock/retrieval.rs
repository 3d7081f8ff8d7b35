//! Bedrock knowledge-base Retrieve client.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::sign;
use crate::config::{AwsCredentials, BotConfig};
use crate::errors::BotError;

/// A text fragment returned by the knowledge base, in service order.
#[derive(Debug, Clone)]
pub struct RetrievedPassage {
    pub text: String,
    /// Relevance score as reported by the service, when present.
    pub score: Option<f64>,
}

/// Seam for the knowledge-base lookup.
///
/// Zero matches is `Ok(vec![])`; only transport or service failures are
/// errors, so the orchestrator can tell the two apart.
#[async_trait]
pub trait RetrievePassages: Send + Sync {
    async fn retrieve(&self, question: &str) -> Result<Vec<RetrievedPassage>, BotError>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RetrieveResponse {
    #[serde(default)]
    retrieval_results: Vec<RetrievalResult>,
}

#[derive(Deserialize)]
struct RetrievalResult {
    content: RetrievalContent,
    score: Option<f64>,
}

#[derive(Deserialize)]
struct RetrievalContent {
    #[serde(default)]
    text: String,
}

/// Retrieve over the Bedrock agent-runtime REST API.
#[derive(Clone)]
pub struct BedrockAgentClient {
    client: Client,
    credentials: AwsCredentials,
    region: String,
    knowledge_base_id: String,
}

impl BedrockAgentClient {
    pub fn new(config: &BotConfig) -> Self {
        Self {
            client: Client::new(),
            credentials: config.credentials.clone(),
            region: config.region.clone(),
            knowledge_base_id: config.knowledge_base_id.clone(),
        }
    }

    fn host(&self) -> String {
        format!("bedrock-agent-runtime.{}.amazonaws.com", self.region)
    }
}

#[async_trait]
impl RetrievePassages for BedrockAgentClient {
    async fn retrieve(&self, question: &str) -> Result<Vec<RetrievedPassage>, BotError> {
        let body = serde_json::to_vec(&json!({
            "retrievalQuery": { "text": question },
        }))
        .map_err(BotError::retrieval)?;

        let host = self.host();
        let path = format!("/knowledgebases/{}/retrieve", self.knowledge_base_id);
        let signed = sign::sign_post(
            &self.credentials,
            &self.region,
            "bedrock",
            &host,
            &path,
            &body,
            &[],
            Utc::now(),
        );

        let url = format!("https://{}{}", host, sign::encode_path(&path));
        let response = sign::apply(self.client.post(&url), &signed, &self.credentials)
            .body(body)
            .send()
            .await
            .map_err(BotError::retrieval)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(BotError::Retrieval(format!(
                "Retrieve returned HTTP {}: {}",
                status, text
            )));
        }

        let payload: RetrieveResponse = response.json().await.map_err(BotError::retrieval)?;

        Ok(payload
            .retrieval_results
            .into_iter()
            .map(|result| RetrievedPassage {
                text: result.content.text,
                score: result.score,
            })
            .collect())
    }
}
