use std::fs;

use chrono::{DateTime, Utc};
use serde_json::{json, Map};

use bedrock_slackbot::bedrock::IngestionRecord;

#[test]
fn record_built_from_a_real_file_carries_contents_and_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ec2.txt");
    fs::write(&path, "EC2 info").unwrap();

    let mut metadata = Map::new();
    metadata.insert("category".to_string(), json!("compute"));

    let text = fs::read_to_string(&path).unwrap();
    let record = IngestionRecord::new(&path, text, metadata, Utc::now());

    assert_eq!(record.text, "EC2 info");
    assert_eq!(record.metadata["category"], "compute");
    assert_eq!(record.metadata["source"], "ec2.txt");
    let uploaded_at = record.metadata["uploadedAt"].as_str().unwrap();
    assert!(DateTime::parse_from_rfc3339(uploaded_at).is_ok());
}
