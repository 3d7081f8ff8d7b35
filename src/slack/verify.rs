//! Slack request signature verification.
//!
//! Slack signs every Events API request with
//! `v0=HMAC-SHA256(signing_secret, "v0:{timestamp}:{body}")` and sends the
//! signature and timestamp as headers. Requests older than five minutes are
//! rejected to limit replay.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const VERSION: &str = "v0";
const MAX_SKEW_SECS: i64 = 60 * 5;

/// Check a request signature against the signing secret.
///
/// `now` is the current Unix time in seconds, passed in for testability.
pub fn verify_signature(
    signing_secret: &str,
    timestamp: &str,
    body: &str,
    signature: &str,
    now: i64,
) -> bool {
    let Ok(ts) = timestamp.parse::<i64>() else {
        return false;
    };
    if (now - ts).abs() > MAX_SKEW_SECS {
        return false;
    }

    let Some(signature_hex) = signature.strip_prefix("v0=") else {
        return false;
    };
    let Ok(signature_bytes) = hex::decode(signature_hex) else {
        return false;
    };

    let base = format!("{}:{}:{}", VERSION, timestamp, body);
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(base.as_bytes());
    mac.verify_slice(&signature_bytes).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";

    fn sign(timestamp: &str, body: &str) -> String {
        let base = format!("v0:{}:{}", timestamp, body);
        let mut mac = HmacSha256::new_from_slice(SECRET.as_bytes()).unwrap();
        mac.update(base.as_bytes());
        format!("v0={}", hex::encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn valid_signature_passes() {
        let ts = "1700000000";
        let body = r#"{"type":"url_verification"}"#;
        let sig = sign(ts, body);
        assert!(verify_signature(SECRET, ts, body, &sig, 1_700_000_010));
    }

    #[test]
    fn tampered_body_fails() {
        let ts = "1700000000";
        let sig = sign(ts, "original");
        assert!(!verify_signature(SECRET, ts, "tampered", &sig, 1_700_000_010));
    }

    #[test]
    fn stale_timestamp_fails() {
        let ts = "1700000000";
        let body = "{}";
        let sig = sign(ts, body);
        assert!(!verify_signature(SECRET, ts, body, &sig, 1_700_000_000 + 600));
    }

    #[test]
    fn garbage_timestamp_fails() {
        assert!(!verify_signature(SECRET, "not-a-number", "{}", "v0=00", 0));
    }

    #[test]
    fn flipped_signature_byte_fails() {
        let ts = "1700000000";
        let body = "{}";
        let mut sig = sign(ts, body);
        let last = if sig.ends_with('0') { '1' } else { '0' };
        sig.pop();
        sig.push(last);
        assert!(!verify_signature(SECRET, ts, body, &sig, 1_700_000_010));
    }

    #[test]
    fn missing_version_prefix_fails() {
        let ts = "1700000000";
        let body = "{}";
        let sig = sign(ts, body);
        let bare = sig.trim_start_matches("v0=");
        assert!(!verify_signature(SECRET, ts, body, bare, 1_700_000_010));
    }

    #[test]
    fn non_hex_signature_fails() {
        let ts = "1700000000";
        assert!(!verify_signature(SECRET, ts, "{}", "v0=zzzz", 1_700_000_010));
    }
}
