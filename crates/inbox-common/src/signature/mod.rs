//! Webhook signature primitives
//!
//! Signatures are HMACs over the exact raw request bytes. Meta-family
//! providers send `X-Hub-Signature-256: sha256=<hex>` (preferred) or the
//! legacy `X-Hub-Signature: sha1=<hex>`. All comparisons are constant-time.

use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;
type HmacSha1 = Hmac<Sha1>;

/// A parsed `X-Hub-Signature(-256)` header value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubSignature<'a> {
    Sha256(&'a str),
    Sha1(&'a str),
}

/// Parse a signature header of the form `sha256=<hex>` or `sha1=<hex>`
#[must_use]
pub fn parse_hub_signature(header: &str) -> Option<HubSignature<'_>> {
    let header = header.trim();
    if let Some(hex_digest) = header.strip_prefix("sha256=") {
        Some(HubSignature::Sha256(hex_digest))
    } else {
        header.strip_prefix("sha1=").map(HubSignature::Sha1)
    }
}

/// Compute the hex HMAC-SHA256 of a payload (used when signing callbacks)
#[must_use]
pub fn sign_sha256(secret: &[u8], payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a hex HMAC-SHA256 digest in constant time
#[must_use]
pub fn verify_sha256(secret: &[u8], payload: &[u8], hex_digest: &str) -> bool {
    let Ok(expected) = hex::decode(hex_digest) else {
        return false;
    };
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(payload);
    mac.verify_slice(&expected).is_ok()
}

/// Verify a hex HMAC-SHA1 digest in constant time (legacy header)
#[must_use]
pub fn verify_sha1(secret: &[u8], payload: &[u8], hex_digest: &str) -> bool {
    let Ok(expected) = hex::decode(hex_digest) else {
        return false;
    };
    let mut mac = HmacSha1::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(payload);
    mac.verify_slice(&expected).is_ok()
}

/// Verify a raw webhook body against a `X-Hub-Signature(-256)` header value
#[must_use]
pub fn verify_hub_signature(secret: &str, payload: &[u8], header: &str) -> bool {
    match parse_hub_signature(header) {
        Some(HubSignature::Sha256(digest)) => verify_sha256(secret.as_bytes(), payload, digest),
        Some(HubSignature::Sha1(digest)) => verify_sha1(secret.as_bytes(), payload, digest),
        None => false,
    }
}

/// Constant-time equality for shared-secret header comparison
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-app-secret";
    const BODY: &[u8] = br#"{"object":"whatsapp_business_account","entry":[]}"#;

    #[test]
    fn test_sha256_roundtrip() {
        let digest = sign_sha256(SECRET.as_bytes(), BODY);
        assert!(verify_sha256(SECRET.as_bytes(), BODY, &digest));
        assert!(!verify_sha256(b"other-secret", BODY, &digest));
        assert!(!verify_sha256(SECRET.as_bytes(), b"tampered", &digest));
    }

    #[test]
    fn test_hub_header_parsing() {
        assert_eq!(
            parse_hub_signature("sha256=abcdef"),
            Some(HubSignature::Sha256("abcdef"))
        );
        assert_eq!(parse_hub_signature("sha1=0011"), Some(HubSignature::Sha1("0011")));
        assert_eq!(parse_hub_signature("md5=nope"), None);
        assert_eq!(parse_hub_signature(""), None);
    }

    #[test]
    fn test_verify_hub_signature_sha256() {
        let header = format!("sha256={}", sign_sha256(SECRET.as_bytes(), BODY));
        assert!(verify_hub_signature(SECRET, BODY, &header));
        assert!(!verify_hub_signature(SECRET, BODY, "sha256=deadbeef"));
        assert!(!verify_hub_signature(SECRET, BODY, "sha256=not-hex"));
    }

    #[test]
    fn test_verify_hub_signature_sha1() {
        // sha1 remains accepted for providers still sending the legacy header
        let mut mac = HmacSha1::new_from_slice(SECRET.as_bytes()).unwrap();
        mac.update(BODY);
        let header = format!("sha1={}", hex::encode(mac.finalize().into_bytes()));
        assert!(verify_hub_signature(SECRET, BODY, &header));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"secret", b"secret"));
        assert!(!constant_time_eq(b"secret", b"secreT"));
        assert!(!constant_time_eq(b"secret", b"longer-secret"));
        assert!(constant_time_eq(b"", b""));
    }
}
