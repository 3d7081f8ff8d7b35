//! Upload a local document into the Bedrock knowledge base.
//!
//! Usage: `upload-document <file-path> [metadata-json]`
//!
//! Unlike the bot, this is a one-shot batch path: every failure prints a
//! diagnostic and exits non-zero so calling scripts can tell.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use serde_json::{Map, Value};

use bedrock_slackbot::bedrock::{IngestionClient, IngestionRecord};
use bedrock_slackbot::config::IngestionConfig;
use bedrock_slackbot::errors::BotError;

#[derive(Parser)]
#[command(
    name = "upload-document",
    about = "Upload a document to the Bedrock knowledge base",
    after_help = "Example: upload-document ./docs/ec2.txt '{\"category\":\"compute\"}'"
)]
struct Args {
    /// Path to the UTF-8 text file to upload.
    file_path: PathBuf,
    /// Optional metadata as a JSON object string.
    metadata_json: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Scripts key off exit code 1 for every failure, including bad usage
    // (clap's default usage-error code is 2).
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
        Err(help) => {
            let _ = help.print();
            return ExitCode::SUCCESS;
        }
    };

    match run(args).await {
        Ok(response) => {
            println!("Document uploaded successfully!");
            println!(
                "Response: {}",
                serde_json::to_string_pretty(&response).unwrap_or_else(|_| response.to_string())
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error uploading document: {}", err);
            print_hint(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<Value, BotError> {
    // Metadata is validated before anything touches the network.
    let metadata = parse_metadata(args.metadata_json.as_deref())?;

    let text = std::fs::read_to_string(&args.file_path).map_err(|e| {
        BotError::Config(format!("cannot read {}: {}", args.file_path.display(), e))
    })?;

    let config = IngestionConfig::from_env()?;
    let record = IngestionRecord::new(&args.file_path, text, metadata, Utc::now());

    println!(
        "Uploading document: {}",
        record.metadata["source"].as_str().unwrap_or_default()
    );

    IngestionClient::new(config).ingest(&record).await
}

fn parse_metadata(raw: Option<&str>) -> Result<Map<String, Value>, BotError> {
    let Some(raw) = raw else {
        return Ok(Map::new());
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(BotError::Config(
            "metadata must be a JSON object".to_string(),
        )),
        Err(err) => Err(BotError::Config(format!(
            "error parsing metadata JSON: {}",
            err
        ))),
    }
}

fn print_hint(err: &BotError) {
    let message = err.to_string();
    if message.contains("AccessDenied") {
        eprintln!("Make sure your IAM user has sufficient permissions for Bedrock Knowledge Bases.");
    } else if message.contains("ResourceNotFound") {
        eprintln!("Knowledge base not found. Check AWS_KNOWLEDGE_BASE_ID.");
    }
}
