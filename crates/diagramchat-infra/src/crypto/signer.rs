//! HMAC-SHA256 signing for session cookie values.
//!
//! A signed token has the form `<value>.<hex signature>`. Verification is
//! constant-time via the hmac crate's `verify_slice`.

use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies opaque string values with a shared secret.
#[derive(Clone)]
pub struct SessionSigner {
    keyed: HmacSha256,
}

impl SessionSigner {
    pub fn new(secret: &SecretString) -> Result<Self, InvalidLength> {
        let keyed = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())?;
        Ok(Self { keyed })
    }

    /// Produce `value.signature`.
    pub fn sign(&self, value: &str) -> String {
        let signature = hex_encode(&self.mac_for(value).finalize().into_bytes());
        format!("{value}.{signature}")
    }

    /// Return the embedded value if the token's signature matches.
    pub fn verify(&self, token: &str) -> Option<String> {
        let (value, signature_hex) = token.rsplit_once('.')?;
        if value.is_empty() {
            return None;
        }
        let expected = hex_decode(signature_hex).ok()?;
        self.mac_for(value).verify_slice(&expected).ok()?;
        Some(value.to_string())
    }

    fn mac_for(&self, value: &str) -> HmacSha256 {
        let mut mac = self.keyed.clone();
        mac.update(value.as_bytes());
        mac
    }
}

/// Decode a hex string to bytes.
fn hex_decode(hex: &str) -> Result<Vec<u8>, ()> {
    if hex.len() % 2 != 0 || !hex.is_ascii() {
        return Err(());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ()))
        .collect()
}

/// Encode bytes to a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer(secret: &str) -> SessionSigner {
        SessionSigner::new(&SecretString::from(secret.to_string())).unwrap()
    }

    #[test]
    fn test_sign_then_verify() {
        let s = signer("key");
        let token = s.sign("0190c6f2-7a1b-7c3d-8e4f-123456789abc");
        assert_eq!(
            s.verify(&token).as_deref(),
            Some("0190c6f2-7a1b-7c3d-8e4f-123456789abc")
        );
    }

    #[test]
    fn test_signature_is_hex_sha256() {
        let token = signer("key").sign("abc");
        let (_, sig) = token.rsplit_once('.').unwrap();
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tampered_value_rejected() {
        let s = signer("key");
        let token = s.sign("alice");
        let (_, sig) = token.rsplit_once('.').unwrap();
        assert!(s.verify(&format!("mallory.{sig}")).is_none());
    }

    #[test]
    fn test_other_secret_rejected() {
        let token = signer("one").sign("abc");
        assert!(signer("two").verify(&token).is_none());
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let s = signer("key");
        assert!(s.verify("").is_none());
        assert!(s.verify("no-signature").is_none());
        assert!(s.verify("abc.zz").is_none());
        assert!(s.verify("abc.abc").is_none());
        assert!(s.verify("abc.é0").is_none());
        assert!(s.verify(&s.sign("")).is_none());
    }

    #[test]
    fn test_hex_roundtrip() {
        let bytes = vec![0x00, 0x7f, 0xff, 0x10];
        assert_eq!(hex_decode(&hex_encode(&bytes)).unwrap(), bytes);
    }
}
