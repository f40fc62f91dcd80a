use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use rand::rngs::OsRng;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use x25519_dalek::{PublicKey, StaticSecret};

use crate::error::CoreError;

/// Where keypairs come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeySource {
    /// Ask the remote keys service.
    #[default]
    Remote,
    /// Generate an X25519 keypair in-process.
    Local,
}

/// A WireGuard keypair, both halves base64 encoded.
///
/// The private half is kept behind [`SecretString`] so it never shows up in
/// `Debug` output or logs.
#[derive(Debug, Clone)]
pub struct Keypair {
    public_key: String,
    private_key: SecretString,
}

impl Keypair {
    /// Build a keypair from already-encoded halves. Both must be non-empty.
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Result<Self, CoreError> {
        let public_key = public_key.into();
        let private_key = private_key.into();
        if public_key.trim().is_empty() || private_key.trim().is_empty() {
            return Err(CoreError::KeyFetch {
                reason: "keypair has an empty half".into(),
                status: None,
                transient: false,
            });
        }
        Ok(Self {
            public_key,
            private_key: SecretString::from(private_key),
        })
    }

    /// Generate a fresh X25519 keypair from the OS random source.
    pub fn generate() -> Self {
        let secret = StaticSecret::random_from_rng(OsRng);
        let public = PublicKey::from(&secret);
        Self {
            public_key: BASE64.encode(public.as_bytes()),
            private_key: SecretString::from(BASE64.encode(secret.to_bytes())),
        }
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// The private key in plain text, for the config formatters.
    pub(crate) fn expose_private(&self) -> &str {
        self.private_key.expose_secret()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_are_32_bytes() {
        let keys = Keypair::generate();
        let public = BASE64.decode(keys.public_key()).unwrap();
        let private = BASE64.decode(keys.expose_private()).unwrap();
        assert_eq!(public.len(), 32);
        assert_eq!(private.len(), 32);
    }

    #[test]
    fn generated_public_key_matches_private() {
        let keys = Keypair::generate();
        let private: [u8; 32] = BASE64
            .decode(keys.expose_private())
            .unwrap()
            .try_into()
            .unwrap();
        let derived = PublicKey::from(&StaticSecret::from(private));
        assert_eq!(BASE64.encode(derived.as_bytes()), keys.public_key());
    }

    #[test]
    fn debug_output_hides_private_key() {
        let keys = Keypair::new("PUBKEY", "PRIVKEY").unwrap();
        let dbg = format!("{keys:?}");
        assert!(dbg.contains("PUBKEY"));
        assert!(!dbg.contains("PRIVKEY"));
    }

    #[test]
    fn rejects_empty_halves() {
        assert!(Keypair::new("", "priv").is_err());
        assert!(Keypair::new("pub", "  ").is_err());
    }
}
