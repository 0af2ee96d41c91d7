//! Shared mocks for integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::system_instruction;
use solana_sdk::transaction::Transaction;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use bundle_relay::auth::{AuthTransport, Role, Token, TokenPair};
use bundle_relay::bundle::Bundle;
use bundle_relay::ledger::types::RpcContext;
use bundle_relay::ledger::{Commitment, LatestBlockhash, LedgerRpc, SignatureStatus};
use bundle_relay::relay::types::{InflightBundleStatus, InflightStatus};
use bundle_relay::relay::{
    BundleRelay, BundleResultEvent, BundleResultSource, BundleResultStream, InflightBundleStatuses,
    InflightStatusSource, RelayAck, SentTransaction,
};
use bundle_relay::TransportError;

pub const BUNDLE_ID: &str = "bundle-1";

/// A signed one-instruction transfer.
pub fn signed_transfer(lamports: u64) -> Transaction {
    let payer = Keypair::new();
    Transaction::new_signed_with_payer(
        &[system_instruction::transfer(&payer.pubkey(), &Pubkey::new_unique(), lamports)],
        Some(&payer.pubkey()),
        &[&payer],
        Hash::new_unique(),
    )
}

pub fn confirmed(slot: u64) -> Option<SignatureStatus> {
    Some(SignatureStatus {
        slot,
        confirmations: Some(1),
        err: None,
        confirmation_status: Some(Commitment::Confirmed),
    })
}

pub fn processed(slot: u64) -> Option<SignatureStatus> {
    Some(SignatureStatus {
        slot,
        confirmations: Some(0),
        err: None,
        confirmation_status: Some(Commitment::Processed),
    })
}

/// Ordered record of transport calls across mocks.
pub type CallLog = Arc<Mutex<Vec<&'static str>>>;

/// Relay that acknowledges every bundle with [`BUNDLE_ID`].
pub struct MockRelay {
    pub log: CallLog,
    /// How long `send_bundle` takes before it answers.
    pub send_delay: Duration,
    pub bundles: Mutex<Vec<Bundle>>,
    pub authorizations: Mutex<Vec<Option<String>>>,
    pub tip_accounts: Vec<Pubkey>,
    pub sent_transaction: Mutex<Option<SentTransaction>>,
}

impl MockRelay {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            send_delay: Duration::ZERO,
            bundles: Mutex::new(Vec::new()),
            authorizations: Mutex::new(Vec::new()),
            tip_accounts: (0..8).map(|_| Pubkey::new_unique()).collect(),
            sent_transaction: Mutex::new(None),
        }
    }

    pub fn bundle_count(&self) -> usize {
        self.bundles.lock().unwrap().len()
    }
}

#[async_trait]
impl BundleRelay for MockRelay {
    async fn send_bundle(
        &self,
        bundle: &Bundle,
        authorization: Option<&str>,
    ) -> Result<RelayAck, TransportError> {
        self.log.lock().unwrap().push("send_bundle");
        if !self.send_delay.is_zero() {
            tokio::time::sleep(self.send_delay).await;
        }
        self.bundles.lock().unwrap().push(bundle.clone());
        self.authorizations
            .lock()
            .unwrap()
            .push(authorization.map(str::to_owned));
        Ok(RelayAck {
            acknowledgement: BUNDLE_ID.to_string(),
            bundle_id: Some(BUNDLE_ID.to_string()),
        })
    }

    async fn get_tip_accounts(
        &self,
        _authorization: Option<&str>,
    ) -> Result<Vec<Pubkey>, TransportError> {
        Ok(self.tip_accounts.clone())
    }

    async fn send_transaction(
        &self,
        _wire: &[u8],
        bundle_only: bool,
        _authorization: Option<&str>,
    ) -> Result<SentTransaction, TransportError> {
        assert!(bundle_only);
        self.log.lock().unwrap().push("send_transaction");
        self.sent_transaction
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| TransportError::Http("no transaction response scripted".to_string()))
    }
}

/// Result subscription that yields scripted events, then stays open.
pub struct ScriptedResults {
    pub log: CallLog,
    pub events: Mutex<Vec<Result<BundleResultEvent, TransportError>>>,
}

impl ScriptedResults {
    pub fn new(log: CallLog, events: Vec<Result<BundleResultEvent, TransportError>>) -> Self {
        Self {
            log,
            events: Mutex::new(events),
        }
    }
}

#[async_trait]
impl BundleResultSource for ScriptedResults {
    async fn subscribe_bundle_results(
        &self,
        _authorization: Option<&str>,
    ) -> Result<BundleResultStream, TransportError> {
        self.log.lock().unwrap().push("subscribe");
        let events = std::mem::take(&mut *self.events.lock().unwrap());
        Ok(stream::iter(events).chain(stream::pending()).boxed())
    }
}

/// Ledger that replays scripted answers, then reports every signature unseen.
pub struct ScriptedLedger {
    pub responses: Mutex<VecDeque<Result<Vec<Option<SignatureStatus>>, TransportError>>>,
    pub calls: AtomicUsize,
}

impl ScriptedLedger {
    pub fn new(responses: Vec<Result<Vec<Option<SignatureStatus>>, TransportError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn never_lands() -> Self {
        Self::new(Vec::new())
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerRpc for ScriptedLedger {
    async fn get_latest_blockhash(&self) -> Result<LatestBlockhash, TransportError> {
        Ok(LatestBlockhash {
            blockhash: Hash::new_unique(),
            last_valid_block_height: 100,
        })
    }

    async fn get_signature_statuses(
        &self,
        signatures: &[Signature],
    ) -> Result<Vec<Option<SignatureStatus>>, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(vec![None; signatures.len()]))
    }
}

/// Inflight status source replaying scripted statuses; repeats the last one.
pub struct ScriptedInflight {
    pub statuses: Mutex<VecDeque<InflightStatus>>,
    pub calls: AtomicUsize,
}

impl ScriptedInflight {
    pub fn new(statuses: Vec<InflightStatus>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InflightStatusSource for ScriptedInflight {
    async fn get_inflight_bundle_statuses(
        &self,
        bundle_ids: &[String],
        _authorization: Option<&str>,
    ) -> Result<InflightBundleStatuses, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut statuses = self.statuses.lock().unwrap();
        let status = if statuses.len() > 1 {
            statuses.pop_front()
        } else {
            statuses.front().copied()
        };

        let value = match status {
            Some(status) => bundle_ids
                .iter()
                .map(|id| InflightBundleStatus {
                    bundle_id: id.clone(),
                    status,
                    landed_slot: (status == InflightStatus::Landed).then_some(42),
                })
                .collect(),
            None => Vec::new(),
        };
        Ok(InflightBundleStatuses {
            context: RpcContext { slot: 42 },
            value,
        })
    }
}

/// Auth service issuing short-lived access tokens.
pub struct MockAuth {
    pub access_ttl: Duration,
    pub challenge: String,
    pub fail_challenge: bool,
    pub failing_refreshes: AtomicUsize,
    pub exchanges: Mutex<Vec<(String, Pubkey, Signature)>>,
    pub refresh_calls: Mutex<Vec<tokio::time::Instant>>,
}

impl MockAuth {
    pub fn new(access_ttl: Duration) -> Self {
        Self {
            access_ttl,
            challenge: "nonce-123".to_string(),
            fail_challenge: false,
            failing_refreshes: AtomicUsize::new(0),
            exchanges: Mutex::new(Vec::new()),
            refresh_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_calls.lock().unwrap().len()
    }

    fn token(&self, value: String) -> Token {
        Token {
            value,
            expires_at: SystemTime::now() + self.access_ttl,
        }
    }
}

#[async_trait]
impl AuthTransport for MockAuth {
    async fn generate_auth_challenge(
        &self,
        _role: Role,
        _pubkey: &Pubkey,
    ) -> Result<String, TransportError> {
        if self.fail_challenge {
            return Err(TransportError::Http("auth service unreachable".to_string()));
        }
        Ok(self.challenge.clone())
    }

    async fn generate_auth_tokens(
        &self,
        challenge: &str,
        client_pubkey: &Pubkey,
        signed_challenge: &Signature,
    ) -> Result<TokenPair, TransportError> {
        self.exchanges
            .lock()
            .unwrap()
            .push((challenge.to_string(), *client_pubkey, *signed_challenge));
        Ok(TokenPair {
            access: self.token("access-0".to_string()),
            refresh: Token {
                value: "refresh-token".to_string(),
                expires_at: SystemTime::now() + Duration::from_secs(86_400),
            },
        })
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> Result<Token, TransportError> {
        assert_eq!(refresh_token, "refresh-token");
        let count = {
            let mut calls = self.refresh_calls.lock().unwrap();
            calls.push(tokio::time::Instant::now());
            calls.len()
        };

        let remaining_failures = self.failing_refreshes.load(Ordering::SeqCst);
        if remaining_failures > 0 {
            self.failing_refreshes.fetch_sub(1, Ordering::SeqCst);
            return Err(TransportError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(self.token(format!("access-{}", count)))
    }
}
