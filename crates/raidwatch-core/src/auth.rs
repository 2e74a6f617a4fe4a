//! Request digests.
//!
//! Two schemes, chosen by command privilege:
//! - ordinary commands: HMAC-SHA256 over the content bytes keyed by the
//!   account password;
//! - control commands (`disconnect`, `reconnect`): Ed25519 signature with the
//!   process-wide control key.
//!
//! Both are rendered as uppercase hex.

use ed25519_dalek::{Signer, SigningKey, SECRET_KEY_LENGTH};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{Result, RaidwatchError};
use crate::protocol::Command;

type HmacSha256 = Hmac<Sha256>;

/// Computes the digest attached to every outbound request.
pub struct DigestSigner {
    control_key: SigningKey,
}

impl DigestSigner {
    pub fn new(control_key: SigningKey) -> Self {
        Self { control_key }
    }

    /// Parse the control key from a hex-encoded 32-byte Ed25519 seed.
    pub fn from_hex(control_key_hex: &str) -> Result<Self> {
        let raw = hex::decode(control_key_hex.trim())
            .map_err(|e| RaidwatchError::InvalidKey(format!("control key is not hex: {e}")))?;
        let len = raw.len();
        let seed: [u8; SECRET_KEY_LENGTH] = raw.try_into().map_err(|_| {
            RaidwatchError::InvalidKey(format!(
                "control key decoded to {len} bytes (expected {SECRET_KEY_LENGTH})"
            ))
        })?;
        Ok(Self::new(SigningKey::from_bytes(&seed)))
    }

    /// Public half of the control key, for the server-side trust setup.
    pub fn control_public_key_hex(&self) -> String {
        hex::encode_upper(self.control_key.verifying_key().to_bytes())
    }

    /// Digest for `content` under the scheme selected by `command`.
    pub fn digest(&self, command: Command, content: &[u8], password: &str) -> Result<String> {
        if command.is_privileged() {
            Ok(self.control_digest(content))
        } else {
            client_digest(content, password.as_bytes())
        }
    }

    pub fn control_digest(&self, content: &[u8]) -> String {
        hex::encode_upper(self.control_key.sign(content).to_bytes())
    }
}

/// HMAC-SHA256 of `content` keyed by `secret`.
pub fn client_digest(content: &[u8], secret: &[u8]) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| RaidwatchError::InvalidKey(format!("hmac key rejected: {e}")))?;
    mac.update(content);
    Ok(hex::encode_upper(mac.finalize().into_bytes()))
}
