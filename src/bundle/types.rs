//! Bundle data model.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::{Transaction, VersionedTransaction};
use std::net::IpAddr;
use thiserror::Error;

/// Largest bundle the relay accepts.
pub const MAX_BUNDLE_TRANSACTIONS: usize = 5;

/// Why a transaction could not be encoded for the wire.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("transaction has no signatures")]
    MissingSignature,

    #[error("fee payer signature is empty")]
    Unsigned,

    #[error("serialization failed: {0}")]
    Serialize(String),
}

/// A signed transaction that can be placed in a bundle.
pub trait BundleTransaction {
    /// Ordered signatures; index 0 is the fee payer.
    fn signatures(&self) -> &[Signature];

    /// Binary wire form.
    fn to_wire(&self) -> Result<Vec<u8>, EncodeError>;

    /// Fee-payer signature.
    fn fee_payer_signature(&self) -> Result<Signature, EncodeError> {
        match self.signatures().first() {
            None => Err(EncodeError::MissingSignature),
            Some(signature) if *signature == Signature::default() => Err(EncodeError::Unsigned),
            Some(signature) => Ok(*signature),
        }
    }
}

fn encode_signed<T: Serialize + BundleTransaction>(tx: &T) -> Result<Vec<u8>, EncodeError> {
    tx.fee_payer_signature()?;
    bincode::serialize(tx).map_err(|e| EncodeError::Serialize(e.to_string()))
}

impl BundleTransaction for Transaction {
    fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    fn to_wire(&self) -> Result<Vec<u8>, EncodeError> {
        encode_signed(self)
    }
}

impl BundleTransaction for VersionedTransaction {
    fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    fn to_wire(&self) -> Result<Vec<u8>, EncodeError> {
        encode_signed(self)
    }
}

/// Origin of a packet, when known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SenderMeta {
    pub addr: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketMeta {
    /// Length of `data` in bytes.
    pub size: usize,
    pub sender: Option<SenderMeta>,
}

/// One serialized transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub data: Vec<u8>,
    pub meta: PacketMeta,
}

impl Packet {
    pub fn new(data: Vec<u8>) -> Self {
        let size = data.len();
        Self {
            data,
            meta: PacketMeta { size, sender: None },
        }
    }
}

/// Ordered packets ready for submission. Packet order is execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    packets: Vec<Packet>,
    signatures: Vec<Signature>,
}

impl Bundle {
    pub(crate) fn new(packets: Vec<Packet>, signatures: Vec<Signature>) -> Self {
        Self { packets, signatures }
    }

    pub fn packets(&self) -> &[Packet] {
        &self.packets
    }

    /// Fee-payer signature of each transaction, in packet order.
    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    /// Base64 form of each packet, as the JSON-RPC methods expect.
    pub fn encoded_transactions(&self) -> Vec<String> {
        self.packets.iter().map(|p| STANDARD.encode(&p.data)).collect()
    }
}

/// Result of a successful submission; the join key for reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleSubmissionHandle {
    relay_acknowledgement: String,
    signatures: Vec<Signature>,
    relay_bundle_id: Option<String>,
}

impl BundleSubmissionHandle {
    pub fn new(
        relay_acknowledgement: impl Into<String>,
        signatures: Vec<Signature>,
        relay_bundle_id: Option<String>,
    ) -> Self {
        Self {
            relay_acknowledgement: relay_acknowledgement.into(),
            signatures,
            relay_bundle_id,
        }
    }

    pub fn relay_acknowledgement(&self) -> &str {
        &self.relay_acknowledgement
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn relay_bundle_id(&self) -> Option<&str> {
        self.relay_bundle_id.as_deref()
    }

    /// Whether a relay notification refers to this submission.
    pub fn matches(&self, bundle_id: &str) -> bool {
        match &self.relay_bundle_id {
            Some(id) => id == bundle_id,
            None => self.relay_acknowledgement == bundle_id,
        }
    }
}
