pub mod viabill;

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// SHA-256 over the `#`-joined field list, hex encoded. Every chained
/// signature in the gateway protocol (checkout and callback, each with its
/// own field order) goes through here; the caller appends the secret and any
/// trailing marker as ordinary fields.
pub(crate) fn chained_sha256(fields: &[&str]) -> String {
    let mut hasher = Sha256::new();

    hasher.update(fields.join("#").as_bytes());

    hex::encode(hasher.finalize())
}

/// HMAC-SHA256 of a raw request body, hex encoded. Used for the direct
/// server-to-gateway API calls, not for the hosted-checkout signatures.
pub(crate) fn sign_body_256(secret: &str, body: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");

    mac.update(body.as_bytes());

    hex::encode(mac.finalize().into_bytes())
}

#[derive(Error, Debug)]
pub enum SignatureError {
    #[error("Missing config value: {0}")]
    MissingConfig(&'static str),

    #[error("Missing field: {field:?}")]
    FieldMissing { field: String },

    #[error("Invalid signature: expected {expected:?}, received {received:?}")]
    InvalidSignature { expected: String, received: String },
}

#[cfg(test)]
mod tests {
    use crate::pay_services::{chained_sha256, sign_body_256};

    #[test]
    fn test_body_signing() {
        let body = "test payload";
        let secret = "example";

        assert_eq!(
            sign_body_256(secret, body),
            "72e89538b91a1d73f5b2720b924c72e6c40dd8e06ff6872ccbcedd0d4f145ffa"
        );
    }

    #[test]
    fn test_chained_signature_is_deterministic() {
        let fields = ["TX1", "100.00", "DKK", "secret"];

        assert_eq!(chained_sha256(&fields), chained_sha256(&fields));
    }

    #[test]
    fn test_chained_signature_depends_on_every_field() {
        let base = chained_sha256(&["TX1", "100.00", "DKK", "secret"]);

        assert_ne!(base, chained_sha256(&["TX2", "100.00", "DKK", "secret"]));
        assert_ne!(base, chained_sha256(&["TX1", "100.01", "DKK", "secret"]));
        assert_ne!(base, chained_sha256(&["TX1", "100.00", "EUR", "secret"]));
        assert_ne!(base, chained_sha256(&["TX1", "100.00", "DKK", "other"]));
    }
}
