//! Ledger-side status types.

use serde::{Deserialize, Serialize};
use solana_sdk::hash::Hash;
use std::fmt;

/// Confirmation level, ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of one transaction signature as reported by `getSignatureStatuses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    /// Slot the transaction was processed in.
    pub slot: u64,
    /// Confirmations so far; `None` once rooted.
    pub confirmations: Option<u64>,
    /// Execution error, if the transaction failed.
    #[serde(default)]
    pub err: Option<serde_json::Value>,
    /// Cluster confirmation level.
    #[serde(default)]
    pub confirmation_status: Option<Commitment>,
}

impl SignatureStatus {
    /// Effective confirmation level.
    ///
    /// Older nodes omit `confirmationStatus`; a missing confirmation count
    /// then means the slot is rooted.
    pub fn commitment(&self) -> Commitment {
        match (self.confirmation_status, self.confirmations) {
            (Some(level), _) => level,
            (None, None) => Commitment::Finalized,
            (None, Some(_)) => Commitment::Processed,
        }
    }

    /// Whether this status reached at least `required`.
    pub fn satisfies(&self, required: Commitment) -> bool {
        self.commitment() >= required
    }
}

/// Every signature has a status at or above `required`.
pub fn all_confirmed(statuses: &[Option<SignatureStatus>], required: Commitment) -> bool {
    !statuses.is_empty()
        && statuses
            .iter()
            .all(|status| status.as_ref().is_some_and(|s| s.satisfies(required)))
}

/// Response of `getLatestBlockhash`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestBlockhash {
    pub blockhash: Hash,
    pub last_valid_block_height: u64,
}

/// Wire form of a `getLatestBlockhash` value.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RpcBlockhash {
    pub blockhash: String,
    pub last_valid_block_height: u64,
}

/// `{context, value}` wrapper used by most ledger methods.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RpcContextual<T> {
    pub context: RpcContext,
    pub value: T,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RpcContext {
    pub slot: u64,
}

/// Account capture requested around each simulated transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionAccountsConfig {
    pub encoding: String,
    pub addresses: Vec<String>,
}

impl ExecutionAccountsConfig {
    /// Capture nothing.
    pub fn none() -> Self {
        Self {
            encoding: "base64".to_string(),
            addresses: Vec::new(),
        }
    }
}

/// Pre/post account capture settings for `simulateBundle`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateBundleConfig {
    pub pre_execution_accounts_configs: Vec<ExecutionAccountsConfig>,
    pub post_execution_accounts_configs: Vec<ExecutionAccountsConfig>,
}

impl SimulateBundleConfig {
    /// No account capture for a bundle of `len` transactions.
    pub fn without_accounts(len: usize) -> Self {
        Self {
            pre_execution_accounts_configs: vec![ExecutionAccountsConfig::none(); len],
            post_execution_accounts_configs: vec![ExecutionAccountsConfig::none(); len],
        }
    }
}

/// Per-transaction simulation output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulatedTransaction {
    pub err: Option<serde_json::Value>,
    pub logs: Option<Vec<String>>,
    pub pre_execution_accounts: Option<Vec<serde_json::Value>>,
    pub post_execution_accounts: Option<Vec<serde_json::Value>>,
    pub units_consumed: Option<u64>,
    pub return_data: Option<serde_json::Value>,
}

/// Value of a `simulateBundle` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedBundle {
    /// `"succeeded"` or `{"failed": {...}}`.
    pub summary: serde_json::Value,
    pub transaction_results: Vec<SimulatedTransaction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(level: Option<Commitment>, confirmations: Option<u64>) -> SignatureStatus {
        SignatureStatus {
            slot: 10,
            confirmations,
            err: None,
            confirmation_status: level,
        }
    }

    #[test]
    fn test_commitment_ordering() {
        assert!(Commitment::Processed < Commitment::Confirmed);
        assert!(Commitment::Confirmed < Commitment::Finalized);
    }

    #[test]
    fn test_satisfies() {
        let confirmed = status(Some(Commitment::Confirmed), Some(3));
        assert!(confirmed.satisfies(Commitment::Processed));
        assert!(confirmed.satisfies(Commitment::Confirmed));
        assert!(!confirmed.satisfies(Commitment::Finalized));

        assert!(status(None, None).satisfies(Commitment::Finalized));
        assert!(!status(None, Some(1)).satisfies(Commitment::Confirmed));
    }

    #[test]
    fn test_all_confirmed_requires_every_signature() {
        let ok = Some(status(Some(Commitment::Confirmed), Some(1)));
        assert!(all_confirmed(&[ok.clone(), ok.clone()], Commitment::Confirmed));
        assert!(!all_confirmed(&[ok.clone(), None], Commitment::Confirmed));
        assert!(!all_confirmed(&[], Commitment::Confirmed));
    }

    #[test]
    fn test_signature_status_wire_format() {
        let json = r#"{"slot":72,"confirmations":10,"err":null,"confirmationStatus":"confirmed"}"#;
        let parsed: SignatureStatus = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.slot, 72);
        assert_eq!(parsed.commitment(), Commitment::Confirmed);
    }

    #[test]
    fn test_simulate_config_lengths() {
        let config = SimulateBundleConfig::without_accounts(3);
        assert_eq!(config.pre_execution_accounts_configs.len(), 3);
        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("preExecutionAccountsConfigs").is_some());
    }
}
