//! Knowledge-base document ingestion.
//!
//! Builds the single-document ingestion payload and sends it as a signed
//! POST to the agent-runtime `/ingestDocument` endpoint, the same wire call
//! the upload CLI has always made.

use std::path::Path;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::{json, Map, Value};

use super::sign;
use crate::config::IngestionConfig;
use crate::errors::BotError;

const INGEST_TARGET: &str = "BedrockAgentRuntime.IngestDocument";

/// A document ready for ingestion: raw text plus merged metadata.
#[derive(Debug, Clone)]
pub struct IngestionRecord {
    pub text: String,
    pub metadata: Map<String, Value>,
}

impl IngestionRecord {
    /// Build a record from file contents and caller-supplied metadata.
    ///
    /// Injects `source` (the file's base name) and `uploadedAt` (RFC 3339
    /// timestamp of invocation); injected keys win over caller keys.
    pub fn new(
        file_path: &Path,
        text: String,
        caller_metadata: Map<String, Value>,
        uploaded_at: DateTime<Utc>,
    ) -> Self {
        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_path.display().to_string());

        let mut metadata = caller_metadata;
        metadata.insert("source".to_string(), json!(file_name));
        metadata.insert("uploadedAt".to_string(), json!(uploaded_at.to_rfc3339()));

        Self { text, metadata }
    }

    fn to_request_body(&self, knowledge_base_id: &str) -> Value {
        json!({
            "knowledgeBaseId": knowledge_base_id,
            "documents": [{
                "content": { "text": self.text },
                "metadata": self.metadata,
            }],
        })
    }
}

/// Client for the ingestion endpoint.
pub struct IngestionClient {
    client: Client,
    config: IngestionConfig,
}

impl IngestionClient {
    pub fn new(config: IngestionConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Send one document, returning the parsed response body.
    pub async fn ingest(&self, record: &IngestionRecord) -> Result<Value, BotError> {
        let body = serde_json::to_vec(&record.to_request_body(&self.config.knowledge_base_id))
            .map_err(BotError::ingestion)?;

        let host = format!("bedrock-agent-runtime.{}.amazonaws.com", self.config.region);
        let path = "/ingestDocument";
        let signed = sign::sign_post(
            &self.config.credentials,
            &self.config.region,
            "bedrock",
            &host,
            path,
            &body,
            &[("x-amz-target", INGEST_TARGET)],
            Utc::now(),
        );

        let url = format!("https://{}{}", host, path);
        let response = sign::apply(self.client.post(&url), &signed, &self.config.credentials)
            .header("X-Amz-Target", INGEST_TARGET)
            .body(body)
            .send()
            .await
            .map_err(BotError::ingestion)?;

        let status = response.status();
        let text = response.text().await.map_err(BotError::ingestion)?;
        if !status.is_success() {
            return Err(BotError::Ingestion(format!(
                "HTTP Status: {}, Body: {}",
                status.as_u16(),
                text
            )));
        }

        serde_json::from_str(&text).map_err(BotError::ingestion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_merges_caller_metadata_with_injected_fields() {
        let mut caller = Map::new();
        caller.insert("category".to_string(), json!("compute"));

        let record = IngestionRecord::new(
            Path::new("./docs/ec2.txt"),
            "EC2 info".to_string(),
            caller,
            Utc::now(),
        );

        assert_eq!(record.metadata["category"], "compute");
        assert_eq!(record.metadata["source"], "ec2.txt");
        let uploaded_at = record.metadata["uploadedAt"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(uploaded_at).is_ok());
    }

    #[test]
    fn injected_fields_override_caller_keys() {
        let mut caller = Map::new();
        caller.insert("source".to_string(), json!("spoofed"));

        let record =
            IngestionRecord::new(Path::new("notes.md"), "text".to_string(), caller, Utc::now());

        assert_eq!(record.metadata["source"], "notes.md");
    }

    #[test]
    fn request_body_wraps_one_document() {
        let record = IngestionRecord::new(
            Path::new("ec2.txt"),
            "EC2 info".to_string(),
            Map::new(),
            Utc::now(),
        );

        let body = record.to_request_body("KB123");
        assert_eq!(body["knowledgeBaseId"], "KB123");
        let documents = body["documents"].as_array().unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0]["content"]["text"], "EC2 info");
        assert_eq!(documents[0]["metadata"]["source"], "ec2.txt");
    }
}
