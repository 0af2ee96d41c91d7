//! Block-engine JSON-RPC client.
//!
//! # Responsibilities
//! - `sendBundle`, `getTipAccounts` and `getInflightBundleStatuses` on `/api/v1/bundles`
//! - `sendTransaction` on `/api/v1/transactions`
//! - Append the configured `uuid` to every call

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::json;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::str::FromStr;

use crate::bundle::Bundle;
use crate::config::BlockEngineConfig;
use crate::error::TransportError;
use crate::jsonrpc::{CallOptions, JsonRpcClient};
use crate::relay::transport::{BundleRelay, InflightStatusSource};
use crate::relay::types::{InflightBundleStatuses, RelayAck, SentTransaction};

const BUNDLES_PATH: &str = "/api/v1/bundles";
const TRANSACTIONS_PATH: &str = "/api/v1/transactions";

/// Block-engine relay over HTTP JSON-RPC.
#[derive(Clone)]
pub struct BlockEngineClient {
    rpc: JsonRpcClient,
    uuid: Option<String>,
}

impl BlockEngineClient {
    pub fn new(config: &BlockEngineConfig) -> Result<Self, TransportError> {
        let rpc = JsonRpcClient::new(&config.url, config.request_timeout())?;
        tracing::debug!(
            url = %config.url,
            uuid_set = config.uuid.is_some(),
            "Block engine client initialized"
        );
        Ok(Self {
            rpc,
            uuid: config.uuid.clone(),
        })
    }

    fn options(&self, path: &str, authorization: Option<&str>) -> CallOptions {
        let mut options = CallOptions::at(path).with_authorization(authorization);
        if let Some(uuid) = &self.uuid {
            options = options.with_query("uuid", uuid.as_str());
        }
        options
    }
}

#[async_trait]
impl BundleRelay for BlockEngineClient {
    async fn send_bundle(
        &self,
        bundle: &Bundle,
        authorization: Option<&str>,
    ) -> Result<RelayAck, TransportError> {
        let params = json!([bundle.encoded_transactions(), { "encoding": "base64" }]);
        let response = self
            .rpc
            .call_with::<_, String>("sendBundle", params, &self.options(BUNDLES_PATH, authorization))
            .await?;

        Ok(RelayAck {
            bundle_id: Some(response.result.clone()),
            acknowledgement: response.result,
        })
    }

    async fn get_tip_accounts(
        &self,
        authorization: Option<&str>,
    ) -> Result<Vec<Pubkey>, TransportError> {
        let response = self
            .rpc
            .call_with::<_, Vec<String>>(
                "getTipAccounts",
                json!([]),
                &self.options(BUNDLES_PATH, authorization),
            )
            .await?;

        response
            .result
            .iter()
            .map(|account| {
                Pubkey::from_str(account).map_err(|e| {
                    TransportError::Decode(format!("invalid tip account '{}': {}", account, e))
                })
            })
            .collect()
    }

    async fn send_transaction(
        &self,
        wire: &[u8],
        bundle_only: bool,
        authorization: Option<&str>,
    ) -> Result<SentTransaction, TransportError> {
        let mut options = self.options(TRANSACTIONS_PATH, authorization);
        if bundle_only {
            options = options.with_query("bundleOnly", "true");
        }
        let params = json!([STANDARD.encode(wire), { "encoding": "base64" }]);
        let response = self
            .rpc
            .call_with::<_, String>("sendTransaction", params, &options)
            .await?;

        let signature = Signature::from_str(&response.result).map_err(|e| {
            TransportError::Decode(format!("invalid signature '{}': {}", response.result, e))
        })?;
        Ok(SentTransaction {
            signature,
            bundle_id: response.bundle_id,
        })
    }
}

#[async_trait]
impl InflightStatusSource for BlockEngineClient {
    async fn get_inflight_bundle_statuses(
        &self,
        bundle_ids: &[String],
        authorization: Option<&str>,
    ) -> Result<InflightBundleStatuses, TransportError> {
        let response = self
            .rpc
            .call_with(
                "getInflightBundleStatuses",
                json!([bundle_ids]),
                &self.options(BUNDLES_PATH, authorization),
            )
            .await?;
        Ok(response.result)
    }
}

impl std::fmt::Debug for BlockEngineClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockEngineClient")
            .field("rpc", &self.rpc)
            .field("uuid_set", &self.uuid.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_uuid() {
        let config = BlockEngineConfig {
            uuid: Some("secret-uuid".to_string()),
            ..BlockEngineConfig::default()
        };
        let client = BlockEngineClient::new(&config).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret-uuid"));
        assert!(debug.contains("uuid_set: true"));
    }

    #[test]
    fn test_options_carry_uuid() {
        let config = BlockEngineConfig {
            uuid: Some("u-1".to_string()),
            ..BlockEngineConfig::default()
        };
        let client = BlockEngineClient::new(&config).unwrap();
        let options = client.options(BUNDLES_PATH, Some("Bearer t"));
        assert_eq!(options.query, vec![("uuid".to_string(), "u-1".to_string())]);
        assert_eq!(options.authorization.as_deref(), Some("Bearer t"));
    }
}
