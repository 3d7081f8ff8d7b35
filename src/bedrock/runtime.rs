//! Bedrock runtime (InvokeModel) client.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;

use super::payload::{build_prompt, build_request, parse_response, ModelFamily};
use super::sign;
use crate::config::{AwsCredentials, BotConfig};
use crate::errors::BotError;

/// Seam for the LLM inference call, so the orchestrator can be exercised
/// with fakes.
#[async_trait]
pub trait InferModel: Send + Sync {
    /// Ask the model `question`, optionally grounded in retrieved `context`.
    async fn invoke(&self, question: &str, context: Option<&str>) -> Result<String, BotError>;
}

/// InvokeModel over the Bedrock runtime REST API.
#[derive(Clone)]
pub struct BedrockRuntimeClient {
    client: Client,
    credentials: AwsCredentials,
    region: String,
    model_id: String,
    family: ModelFamily,
}

impl BedrockRuntimeClient {
    /// Build a client for the configured model.
    ///
    /// The model family is resolved here, once; an unsupported model id is
    /// rejected at startup instead of on the first question.
    pub fn new(config: &BotConfig) -> Result<Self, BotError> {
        let family = ModelFamily::from_model_id(&config.model_id)?;
        Ok(Self {
            client: Client::new(),
            credentials: config.credentials.clone(),
            region: config.region.clone(),
            model_id: config.model_id.clone(),
            family,
        })
    }

    fn host(&self) -> String {
        format!("bedrock-runtime.{}.amazonaws.com", self.region)
    }
}

#[async_trait]
impl InferModel for BedrockRuntimeClient {
    async fn invoke(&self, question: &str, context: Option<&str>) -> Result<String, BotError> {
        let prompt = build_prompt(question, context);
        let body = serde_json::to_vec(&build_request(self.family, &prompt))
            .map_err(BotError::inference)?;

        let host = self.host();
        let path = format!("/model/{}/invoke", self.model_id);
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
            .header("Accept", "application/json")
            .body(body)
            .send()
            .await
            .map_err(BotError::inference)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(BotError::Inference(format!(
                "InvokeModel returned HTTP {}: {}",
                status, text
            )));
        }

        let bytes = response.bytes().await.map_err(BotError::inference)?;
        parse_response(self.family, &bytes)
    }
}
