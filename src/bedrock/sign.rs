//! AWS Signature Version 4 signing for Bedrock REST requests.
//!
//! Bedrock's runtime endpoints are plain HTTPS + JSON, so requests are
//! signed directly with HMAC-SHA256 (`hmac` + `sha2`) rather than pulling in
//! the full AWS SDK. All Bedrock calls are POSTs with a JSON body and no
//! query string, which keeps the canonical request simple.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::config::AwsCredentials;

type HmacSha256 = Hmac<Sha256>;

/// A request signed and ready to send: the Authorization header plus the
/// amz headers that participated in the signature.
pub struct SignedHeaders {
    pub authorization: String,
    pub amz_date: String,
    pub content_sha256: String,
}

/// Sign a Bedrock POST request per SigV4.
///
/// `extra_headers` are additional headers to include in the signature
/// (e.g. `x-amz-target` for the ingestion API); names must be lowercase.
pub fn sign_post(
    creds: &AwsCredentials,
    region: &str,
    service: &str,
    host: &str,
    path: &str,
    body: &[u8],
    extra_headers: &[(&str, &str)],
    now: DateTime<Utc>,
) -> SignedHeaders {
    let date_stamp = now.format("%Y%m%d").to_string();
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();

    let payload_hash = hex_sha256(body);

    let mut headers: Vec<(String, String)> = vec![
        ("content-type".to_string(), "application/json".to_string()),
        ("host".to_string(), host.to_string()),
        ("x-amz-content-sha256".to_string(), payload_hash.clone()),
        ("x-amz-date".to_string(), amz_date.clone()),
    ];
    for (name, value) in extra_headers {
        headers.push((name.to_string(), value.to_string()));
    }
    if let Some(ref token) = creds.session_token {
        headers.push(("x-amz-security-token".to_string(), token.clone()));
    }
    headers.sort_by(|a, b| a.0.cmp(&b.0));

    let signed_headers: String = headers
        .iter()
        .map(|(k, _)| k.as_str())
        .collect::<Vec<_>>()
        .join(";");

    let canonical_headers: String = headers
        .iter()
        .map(|(k, v)| format!("{}:{}\n", k, v))
        .collect();

    let canonical_uri = encode_path(path);
    let canonical_request = format!(
        "POST\n{}\n\n{}\n{}\n{}",
        canonical_uri, canonical_headers, signed_headers, payload_hash
    );

    let credential_scope = format!("{}/{}/{}/aws4_request", date_stamp, region, service);
    let string_to_sign = format!(
        "AWS4-HMAC-SHA256\n{}\n{}\n{}",
        amz_date,
        credential_scope,
        hex_sha256(canonical_request.as_bytes())
    );

    let signing_key = derive_signing_key(&creds.secret_access_key, &date_stamp, region, service);
    let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

    let authorization = format!(
        "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
        creds.access_key_id, credential_scope, signed_headers, signature
    );

    SignedHeaders {
        authorization,
        amz_date,
        content_sha256: payload_hash,
    }
}

/// Attach the SigV4 headers to a reqwest builder.
pub fn apply(
    builder: reqwest::RequestBuilder,
    signed: &SignedHeaders,
    creds: &AwsCredentials,
) -> reqwest::RequestBuilder {
    let mut builder = builder
        .header("Authorization", &signed.authorization)
        .header("Content-Type", "application/json")
        .header("x-amz-content-sha256", &signed.content_sha256)
        .header("x-amz-date", &signed.amz_date);
    if let Some(ref token) = creds.session_token {
        builder = builder.header("x-amz-security-token", token);
    }
    builder
}

/// URI-encode each path segment per RFC 3986, preserving the separators.
///
/// Bedrock model ids contain `:` and `.`, which must be percent-encoded in
/// the canonical URI (and in the request path itself).
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(uri_encode)
        .collect::<Vec<_>>()
        .join("/")
}

fn uri_encode(s: &str) -> String {
    let mut result = String::new();
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(byte as char);
            }
            _ => {
                result.push_str(&format!("%{:02X}", byte));
            }
        }
    }
    result
}

fn hex_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

fn hex_hmac_sha256(key: &[u8], data: &[u8]) -> String {
    hex::encode(hmac_sha256(key, data))
}

/// kDate = HMAC("AWS4" + secret, dateStamp); kRegion = HMAC(kDate, region);
/// kService = HMAC(kRegion, service); kSigning = HMAC(kService, "aws4_request")
fn derive_signing_key(secret_key: &str, date_stamp: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(
        format!("AWS4{}", secret_key).as_bytes(),
        date_stamp.as_bytes(),
    );
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // Signing-key derivation vector from the AWS SigV4 documentation.
    #[test]
    fn signing_key_matches_aws_reference_vector() {
        let key = derive_signing_key(
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            "20120215",
            "us-east-1",
            "iam",
        );
        assert_eq!(
            hex::encode(key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    #[test]
    fn model_path_segments_are_percent_encoded() {
        let path = encode_path("/model/anthropic.claude-3-sonnet-20240229-v1:0/invoke");
        assert_eq!(
            path,
            "/model/anthropic.claude-3-sonnet-20240229-v1%3A0/invoke"
        );
    }

    #[test]
    fn signature_is_deterministic_for_fixed_inputs() {
        let creds = AwsCredentials {
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string(),
            session_token: None,
        };
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();

        let first = sign_post(
            &creds,
            "us-east-1",
            "bedrock",
            "bedrock-runtime.us-east-1.amazonaws.com",
            "/model/amazon.titan-text-express-v1/invoke",
            br#"{"inputText":"hi"}"#,
            &[],
            now,
        );
        let second = sign_post(
            &creds,
            "us-east-1",
            "bedrock",
            "bedrock-runtime.us-east-1.amazonaws.com",
            "/model/amazon.titan-text-express-v1/invoke",
            br#"{"inputText":"hi"}"#,
            &[],
            now,
        );

        assert_eq!(first.authorization, second.authorization);
        assert!(first.authorization.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"));
        assert!(first
            .authorization
            .contains("SignedHeaders=content-type;host;x-amz-content-sha256;x-amz-date,"));
    }

    #[test]
    fn session_token_joins_the_signed_headers() {
        let creds = AwsCredentials {
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "secret".to_string(),
            session_token: Some("token".to_string()),
        };
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();

        let signed = sign_post(
            &creds,
            "us-east-1",
            "bedrock",
            "bedrock-agent-runtime.us-east-1.amazonaws.com",
            "/ingestDocument",
            b"{}",
            &[("x-amz-target", "BedrockAgentRuntime.IngestDocument")],
            now,
        );

        assert!(signed.authorization.contains("x-amz-security-token"));
        assert!(signed.authorization.contains("x-amz-target"));
    }
}
