//! Auth service seam.

use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::time::SystemTime;

use crate::error::TransportError;

/// Role requested during the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Relayer,
    Searcher,
    Validator,
    ShredstreamSubscriber,
}

/// A token issued by the auth service.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub expires_at: SystemTime,
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: Token,
    pub refresh: Token,
}

/// Challenge-response auth operations.
#[async_trait]
pub trait AuthTransport: Send + Sync {
    /// Server nonce bound to `pubkey`.
    async fn generate_auth_challenge(
        &self,
        role: Role,
        pubkey: &Pubkey,
    ) -> Result<String, TransportError>;

    /// Exchange the signed `"<pubkey>-<challenge>"` string for tokens.
    async fn generate_auth_tokens(
        &self,
        challenge: &str,
        client_pubkey: &Pubkey,
        signed_challenge: &Signature,
    ) -> Result<TokenPair, TransportError>;

    /// New access token for a refresh token.
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<Token, TransportError>;
}
