//! Authentication keypair.
//!
//! # Security Constraints
//! - Used only to sign auth challenges, never transactions
//! - Secret bytes are never logged

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{read_keypair_file, Keypair, Signature, Signer};
use std::path::Path;

use crate::auth::AuthError;

/// Environment variable holding a base58-encoded secret key.
pub const KEYPAIR_ENV: &str = "BUNDLE_RELAY_KEYPAIR";

/// Keypair that proves identity to the relay's auth service.
pub struct AuthKeypair {
    keypair: Keypair,
}

impl AuthKeypair {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }

    /// Load a solana-keygen JSON keypair file.
    pub fn from_file(path: &Path) -> Result<Self, AuthError> {
        let keypair = read_keypair_file(path).map_err(|e| {
            AuthError::Keypair(format!("failed to read {}: {}", path.display(), e))
        })?;
        Ok(Self { keypair })
    }

    /// Parse a base58-encoded 64-byte secret key.
    pub fn from_base58(encoded: &str) -> Result<Self, AuthError> {
        let bytes = bs58::decode(encoded.trim())
            .into_vec()
            .map_err(|e| AuthError::Keypair(format!("invalid base58 secret: {}", e)))?;
        let keypair = Keypair::from_bytes(&bytes)
            .map_err(|e| AuthError::Keypair(format!("invalid secret key bytes: {}", e)))?;
        Ok(Self { keypair })
    }

    /// Read the secret from `BUNDLE_RELAY_KEYPAIR`.
    pub fn from_env() -> Result<Self, AuthError> {
        let encoded = std::env::var(KEYPAIR_ENV)
            .map_err(|_| AuthError::Keypair(format!("{} is not set", KEYPAIR_ENV)))?;
        Self::from_base58(&encoded)
    }

    /// File path if given, environment otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, AuthError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::from_env(),
        }
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    pub fn sign_challenge(&self, challenge: &str) -> Result<Signature, AuthError> {
        self.keypair
            .try_sign_message(challenge.as_bytes())
            .map_err(|e| AuthError::Sign(e.to_string()))
    }
}

impl std::fmt::Debug for AuthKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthKeypair")
            .field("pubkey", &self.pubkey())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base58_round_trip() {
        let keypair = Keypair::new();
        let encoded = bs58::encode(keypair.to_bytes()).into_string();
        let loaded = AuthKeypair::from_base58(&encoded).unwrap();
        assert_eq!(loaded.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_invalid_secret() {
        assert!(matches!(
            AuthKeypair::from_base58("not-base58-0OIl"),
            Err(AuthError::Keypair(_))
        ));
        let short = bs58::encode([1u8; 10]).into_string();
        assert!(AuthKeypair::from_base58(&short).is_err());
    }

    #[test]
    fn test_signature_verifies() {
        let keypair = AuthKeypair::new(Keypair::new());
        let challenge = format!("{}-nonce", keypair.pubkey());
        let signature = keypair.sign_challenge(&challenge).unwrap();
        assert!(signature.verify(keypair.pubkey().as_ref(), challenge.as_bytes()));
    }

    #[test]
    fn test_missing_file() {
        let result = AuthKeypair::from_file(Path::new("/nonexistent/id.json"));
        assert!(matches!(result, Err(AuthError::Keypair(_))));
    }

    #[test]
    fn test_debug_shows_only_pubkey() {
        let keypair = Keypair::new();
        let secret = bs58::encode(keypair.to_bytes()).into_string();
        let auth = AuthKeypair::new(keypair);
        let debug = format!("{:?}", auth);
        assert!(!debug.contains(&secret));
        assert!(debug.contains(&auth.pubkey().to_string()));
    }
}
