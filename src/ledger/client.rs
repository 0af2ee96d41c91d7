//! Ledger JSON-RPC client.
//!
//! # Responsibilities
//! - Fetch the latest blockhash for transaction construction
//! - Query signature statuses for confirmation tracking
//! - Simulate bundles on a bundle-aware validator RPC

use async_trait::async_trait;
use serde_json::json;
use solana_sdk::hash::Hash;
use solana_sdk::signature::Signature;
use std::str::FromStr;

use crate::bundle::Bundle;
use crate::config::LedgerConfig;
use crate::error::TransportError;
use crate::jsonrpc::JsonRpcClient;
use crate::ledger::types::{
    Commitment, LatestBlockhash, RpcBlockhash, RpcContextual, SignatureStatus,
    SimulateBundleConfig, SimulatedBundle,
};

/// Ledger queries the reconciler depends on.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Latest blockhash at the client's configured commitment.
    async fn get_latest_blockhash(&self) -> Result<LatestBlockhash, TransportError>;

    /// One nullable status per signature, in request order.
    async fn get_signature_statuses(
        &self,
        signatures: &[Signature],
    ) -> Result<Vec<Option<SignatureStatus>>, TransportError>;
}

/// JSON-RPC ledger client.
#[derive(Clone)]
pub struct LedgerClient {
    rpc: JsonRpcClient,
    commitment: Commitment,
}

impl LedgerClient {
    /// Create a client from configuration.
    pub fn new(config: &LedgerConfig) -> Result<Self, TransportError> {
        let rpc = JsonRpcClient::new(&config.rpc_url, config.request_timeout())?;
        tracing::debug!(rpc_url = %config.rpc_url, commitment = %config.commitment, "Ledger client initialized");
        Ok(Self {
            rpc,
            commitment: config.commitment,
        })
    }

    /// Simulate a bundle with `simulateBundle`.
    ///
    /// The pre/post account capture lists must each match the bundle length;
    /// mismatches are rejected before any request is sent.
    pub async fn simulate_bundle(
        &self,
        bundle: &Bundle,
        config: &SimulateBundleConfig,
    ) -> Result<RpcContextual<SimulatedBundle>, TransportError> {
        let len = bundle.len();
        if config.pre_execution_accounts_configs.len() != len
            || config.post_execution_accounts_configs.len() != len
        {
            return Err(TransportError::Config(
                "pre/post execution account config length must match bundle length".to_string(),
            ));
        }

        let params = json!([
            { "encodedTransactions": bundle.encoded_transactions() },
            config,
        ]);
        self.rpc.call("simulateBundle", params).await
    }
}

#[async_trait]
impl LedgerRpc for LedgerClient {
    async fn get_latest_blockhash(&self) -> Result<LatestBlockhash, TransportError> {
        let params = json!([{ "commitment": self.commitment.as_str() }]);
        let response: RpcContextual<RpcBlockhash> =
            self.rpc.call("getLatestBlockhash", params).await?;

        let blockhash = Hash::from_str(&response.value.blockhash).map_err(|e| {
            TransportError::Decode(format!(
                "invalid blockhash '{}': {}",
                response.value.blockhash, e
            ))
        })?;
        Ok(LatestBlockhash {
            blockhash,
            last_valid_block_height: response.value.last_valid_block_height,
        })
    }

    async fn get_signature_statuses(
        &self,
        signatures: &[Signature],
    ) -> Result<Vec<Option<SignatureStatus>>, TransportError> {
        let encoded: Vec<String> = signatures.iter().map(|s| s.to_string()).collect();
        let params = json!([encoded, { "searchTransactionHistory": false }]);
        let response: RpcContextual<Vec<Option<SignatureStatus>>> =
            self.rpc.call("getSignatureStatuses", params).await?;

        if response.value.len() != signatures.len() {
            return Err(TransportError::Decode(format!(
                "requested {} signature statuses, received {}",
                signatures.len(),
                response.value.len()
            )));
        }
        Ok(response.value)
    }
}

impl std::fmt::Debug for LedgerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerClient")
            .field("rpc", &self.rpc)
            .field("commitment", &self.commitment)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::assemble;
    use solana_sdk::pubkey::Pubkey;
    use solana_sdk::signature::{Keypair, Signer};
    use solana_sdk::system_instruction;
    use solana_sdk::transaction::Transaction;

    fn signed_transfer() -> Transaction {
        let payer = Keypair::new();
        Transaction::new_signed_with_payer(
            &[system_instruction::transfer(&payer.pubkey(), &Pubkey::new_unique(), 1)],
            Some(&payer.pubkey()),
            &[&payer],
            Hash::default(),
        )
    }

    #[tokio::test]
    async fn test_simulate_rejects_mismatched_configs() {
        let client = LedgerClient::new(&LedgerConfig::default()).unwrap();
        let bundle = assemble(&[signed_transfer(), signed_transfer()]).unwrap();

        let result = client
            .simulate_bundle(&bundle, &SimulateBundleConfig::without_accounts(1))
            .await;
        assert!(matches!(result, Err(TransportError::Config(_))));
    }

    #[test]
    fn test_client_debug_hides_nothing_sensitive() {
        let client = LedgerClient::new(&LedgerConfig::default()).unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("api.mainnet-beta.solana.com"));
    }
}
