//! HMAC-SHA256 signatures for inbound gateway notifications.
//!
//! The gateway signs each notification it delivers:
//! - Signature is computed over: `{msg_id}.{timestamp}.{payload}`
//! - The signature is base64-encoded HMAC-SHA256, sent as `v1,{base64}`
//! - Headers carry the inputs: `webhook-id`, `webhook-timestamp`, `webhook-signature`
//!
//! This matches the Standard Webhooks scheme, see <https://www.standardwebhooks.com/>.
//! Verification happens before the notification body is parsed; timestamp
//! freshness is enforced by the caller.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64_STANDARD};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Prefix for webhook secrets
pub const SECRET_PREFIX: &str = "whsec_";

/// Verify a notification signature.
///
/// `signature` is the `webhook-signature` header value, `msg_id` and
/// `timestamp` come from the `webhook-id` and `webhook-timestamp` headers,
/// and `payload` is the raw request body.
///
/// Returns `true` only for a well-formed `v1,` signature that matches the
/// secret. Comparison is constant-time.
pub fn verify_signature(msg_id: &str, timestamp: i64, payload: &str, signature: &str, secret: &str) -> bool {
    let Some(sig_value) = signature.strip_prefix("v1,") else {
        return false;
    };

    let Some(expected) = sign_payload(msg_id, timestamp, payload, secret) else {
        return false;
    };
    let Some(expected_value) = expected.strip_prefix("v1,") else {
        return false;
    };

    constant_time_eq(sig_value.as_bytes(), expected_value.as_bytes())
}

/// Sign a notification payload.
///
/// Returns the signature in format `v1,{base64-hmac-sha256}`, or `None` if
/// the secret is not a valid `whsec_` secret. Used by tests and by gateway
/// simulators; the service itself only verifies.
pub fn sign_payload(msg_id: &str, timestamp: i64, payload: &str, secret: &str) -> Option<String> {
    let secret_bytes = decode_secret(secret)?;

    let signed_content = format!("{}.{}.{}", msg_id, timestamp, payload);

    let mut mac = HmacSha256::new_from_slice(&secret_bytes).ok()?;
    mac.update(signed_content.as_bytes());
    let signature = mac.finalize().into_bytes();

    Some(format!("v1,{}", BASE64_STANDARD.encode(signature)))
}

/// Extract the raw secret bytes from a `whsec_` prefixed secret.
///
/// Returns `None` if the secret doesn't have the correct prefix or invalid base64.
pub fn decode_secret(secret: &str) -> Option<Vec<u8>> {
    let encoded = secret.strip_prefix(SECRET_PREFIX)?;
    BASE64_STANDARD.decode(encoded).ok()
}

/// Generate a new webhook secret.
///
/// Returns a `whsec_` prefixed base64-encoded 32-byte random secret, suitable
/// for registering with the gateway operator.
pub fn generate_secret() -> String {
    use rand::Rng;

    let mut secret_bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut secret_bytes);

    format!("{}{}", SECRET_PREFIX, BASE64_STANDARD.encode(secret_bytes))
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secret() {
        let secret = generate_secret();
        assert!(secret.starts_with(SECRET_PREFIX));

        // Should be able to decode
        let decoded = decode_secret(&secret);
        assert!(decoded.is_some());
        assert_eq!(decoded.unwrap().len(), 32);
    }

    #[test]
    fn test_decode_secret_invalid_prefix() {
        assert!(decode_secret("invalid_secret").is_none());
    }

    #[test]
    fn test_decode_secret_invalid_base64() {
        assert!(decode_secret("whsec_not-valid-base64!!!").is_none());
    }

    #[test]
    fn test_sign_and_verify() {
        let secret = generate_secret();
        let msg_id = "ntf_123";
        let timestamp = 1704067200; // 2024-01-01 00:00:00 UTC
        let payload = r#"{"applicationId":"APP_000123","status":"REGISTERED"}"#;

        let signature = sign_payload(msg_id, timestamp, payload, &secret).expect("should sign");
        assert!(signature.starts_with("v1,"));

        // Verify should pass
        assert!(verify_signature(msg_id, timestamp, payload, &signature, &secret));

        // Wrong payload should fail
        assert!(!verify_signature(msg_id, timestamp, "wrong", &signature, &secret));

        // Wrong timestamp should fail
        assert!(!verify_signature(msg_id, timestamp + 1, payload, &signature, &secret));

        // Wrong msg_id should fail
        assert!(!verify_signature("wrong", timestamp, payload, &signature, &secret));

        // Wrong secret should fail
        let other_secret = generate_secret();
        assert!(!verify_signature(msg_id, timestamp, payload, &signature, &other_secret));
    }

    #[test]
    fn test_verify_invalid_signature_format() {
        let secret = generate_secret();
        assert!(!verify_signature("id", 123, "payload", "invalid", &secret));
        assert!(!verify_signature("id", 123, "payload", "v2,abc", &secret));
    }

    #[test]
    fn test_signature_deterministic() {
        let secret = "whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw";
        let msg_id = "ntf_p5jXN8AQM9LWM0D4loKWxJek";
        let timestamp = 1614265330;
        let payload = r#"{"subscriberId": "tel:94771234567"}"#;

        let signature = sign_payload(msg_id, timestamp, payload, secret).expect("should sign");
        let signature2 = sign_payload(msg_id, timestamp, payload, secret).expect("should sign");
        assert_eq!(signature, signature2);

        assert!(verify_signature(msg_id, timestamp, payload, &signature, secret));
    }
}
