//! Request/response schemas for the Bedrock model families we support.
//!
//! Bedrock's InvokeModel API takes an opaque JSON body whose shape depends
//! on the model vendor. The model id is resolved into a [`ModelFamily`] once
//! at client construction; the builder and parser then match on the enum
//! instead of re-scanning the id string.

use serde_json::{json, Value};

use crate::errors::BotError;

/// Token cap applied to every generation request.
const MAX_OUTPUT_TOKENS: u32 = 1000;

/// Returned when a response body does not carry the expected answer field.
pub const UNRECOGNIZED_FORMAT: &str = "Response format not recognized";

/// A group of models sharing one request/response JSON schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    /// Anthropic Claude models (`anthropic.*`).
    Anthropic,
    /// Amazon Titan text models (`amazon.titan-*`).
    Titan,
}

impl ModelFamily {
    /// Resolve a Bedrock model id into its family.
    ///
    /// Any id matching neither family is a hard error; there is no generic
    /// fallback schema.
    pub fn from_model_id(model_id: &str) -> Result<Self, BotError> {
        if model_id.contains("anthropic") {
            Ok(ModelFamily::Anthropic)
        } else if model_id.contains("amazon.titan") {
            Ok(ModelFamily::Titan)
        } else {
            Err(BotError::UnsupportedModel(model_id.to_string()))
        }
    }
}

/// Build the prompt sent to the model.
///
/// With context, the model is framed as answering from the supplied
/// passages; without, from general knowledge.
pub fn build_prompt(question: &str, context: Option<&str>) -> String {
    match context {
        Some(context) => format!(
            "Human: I need information about AWS. Here's some context:\n{}\n\n\
             Answer this question concisely:\n{}\n\nAssistant:",
            context, question
        ),
        None => format!(
            "Human: Answer this AWS-related question concisely:\n{}\n\nAssistant:",
            question
        ),
    }
}

/// Build the family-specific InvokeModel request body.
pub fn build_request(family: ModelFamily, prompt: &str) -> Value {
    match family {
        ModelFamily::Anthropic => json!({
            "anthropic_version": "bedrock-2023-05-31",
            "max_tokens": MAX_OUTPUT_TOKENS,
            "messages": [{ "role": "user", "content": prompt }],
        }),
        ModelFamily::Titan => json!({
            "inputText": prompt,
            "textGenerationConfig": {
                "maxTokenCount": MAX_OUTPUT_TOKENS,
                "stopSequences": [],
                "temperature": 0.7,
                "topP": 0.9,
            },
        }),
    }
}

/// Extract the answer text from a family-specific InvokeModel response body.
///
/// A malformed body is an error (the transport succeeded but the payload is
/// unusable); a well-formed body missing the answer field yields the
/// [`UNRECOGNIZED_FORMAT`] sentinel so callers still get a string.
pub fn parse_response(family: ModelFamily, body: &[u8]) -> Result<String, BotError> {
    let payload: Value = serde_json::from_slice(body).map_err(BotError::inference)?;

    let answer = match family {
        ModelFamily::Anthropic => payload["content"][0]["text"].as_str(),
        ModelFamily::Titan => payload["results"][0]["outputText"].as_str(),
    };

    Ok(answer.unwrap_or(UNRECOGNIZED_FORMAT).to_string())
}
