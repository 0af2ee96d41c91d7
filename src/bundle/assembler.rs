//! Transactions to packets.

use thiserror::Error;

use crate::bundle::types::{Bundle, BundleTransaction, EncodeError, Packet, MAX_BUNDLE_TRANSACTIONS};

/// Bundle assembly errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    #[error("bundle contains no transactions")]
    Empty,

    #[error("bundle has {count} transactions, maximum is {max}")]
    TooManyTransactions { count: usize, max: usize },

    #[error("{index}: error converting transaction to packet: {source}")]
    Encode {
        index: usize,
        #[source]
        source: EncodeError,
    },
}

/// Convert an ordered list of signed transactions into a [`Bundle`].
///
/// Packet `i` holds transaction `i`. Any encoding failure aborts the whole
/// bundle and reports the failing index.
pub fn assemble<T: BundleTransaction>(transactions: &[T]) -> Result<Bundle, AssemblyError> {
    if transactions.is_empty() {
        return Err(AssemblyError::Empty);
    }
    if transactions.len() > MAX_BUNDLE_TRANSACTIONS {
        return Err(AssemblyError::TooManyTransactions {
            count: transactions.len(),
            max: MAX_BUNDLE_TRANSACTIONS,
        });
    }

    let mut packets = Vec::with_capacity(transactions.len());
    let mut signatures = Vec::with_capacity(transactions.len());
    for (index, tx) in transactions.iter().enumerate() {
        let encode = |source| AssemblyError::Encode { index, source };
        signatures.push(tx.fee_payer_signature().map_err(encode)?);
        packets.push(Packet::new(tx.to_wire().map_err(encode)?));
    }

    tracing::trace!(transactions = packets.len(), "Bundle assembled");
    Ok(Bundle::new(packets, signatures))
}
