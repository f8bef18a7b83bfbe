use bitcoin::{
    Amount, OutPoint, Transaction,
    address::{Address, NetworkUnchecked},
    consensus,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A claim the funding address holds on a previous transaction's output.
///
/// The outpoint's txid follows the usual `bitcoin::Txid` convention: stored
/// and wire-serialized in little-endian byte order, displayed as the familiar
/// reversed (big-endian) hex string.
///
/// Fetched fresh from the chain-data source for every build; never cached
/// across requests and never mutated once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpendableOutput {
    outpoint: OutPoint,
    #[cfg_attr(feature = "serde", serde(with = "bitcoin::amount::serde::as_sat"))]
    value: Amount,
    prev_tx_raw: Vec<u8>,
}

impl SpendableOutput {
    /// Constructs a new instance from an outpoint, its value, and the full
    /// serialized bytes of the transaction it spends from.
    pub fn new(outpoint: OutPoint, value: Amount, prev_tx_raw: Vec<u8>) -> Self {
        Self {
            outpoint,
            value,
            prev_tx_raw,
        }
    }

    /// Gets the outpoint being spent.
    pub fn outpoint(&self) -> OutPoint {
        self.outpoint
    }

    /// Gets the value of the output being spent.
    pub fn value(&self) -> Amount {
        self.value
    }

    /// Gets the raw bytes of the previous transaction, used as signing
    /// context for the input spending this output.
    pub fn prev_tx_raw(&self) -> &[u8] {
        &self.prev_tx_raw
    }
}

/// The builder's sole input aggregate.
///
/// Everything here is plain data the caller has already resolved; the
/// assembler does not reach out to the network to fill gaps.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LockedTransactionRequest {
    /// Outputs funding the transaction, in input order.
    pub spendable_outputs: Vec<SpendableOutput>,

    /// Opaque (already encrypted) payload to embed in the carrier output.
    pub payload: Vec<u8>,

    /// Content type recorded in the carrier envelope header.
    pub content_type: String,

    /// Destination addresses, 1 to 3, distinct, in payout order. Network
    /// membership is checked against the build configuration.
    pub payout_addresses: Vec<Address<NetworkUnchecked>>,

    /// Consensus locktime value: a block height below 500,000,000 or a UNIX
    /// timestamp at or above it.
    pub locktime: u32,

    /// Fee rate in satoshis per virtual byte. Required; the assembler never
    /// substitutes a default.
    pub fee_rate_sat_vb: u64,
}

/// A chain-tip snapshot supplied by the caller's chain-data source.
///
/// Enables the advisory check that a locktime lies in the future. Without a
/// snapshot the assembler cannot observe the chain and only checks that the
/// locktime is nonzero and well-formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TipSnapshot {
    /// Best block height.
    pub height: u32,

    /// Median time past of the best block, as a UNIX timestamp.
    pub median_time: u32,
}

/// The builder's sole output aggregate: an unsigned transaction plus the
/// context a signer needs, and informational fee figures.
///
/// Constructed fresh per request and never mutated afterwards. Output 0 is
/// the zero-value carrier output; outputs 1..N pay out to the requested
/// addresses in order.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnsignedTransactionSkeleton {
    tx: Transaction,
    prev_txs: Vec<Vec<u8>>,
    #[cfg_attr(feature = "serde", serde(with = "bitcoin::amount::serde::as_sat"))]
    estimated_fee: Amount,
    estimated_vsize: usize,
}

impl UnsignedTransactionSkeleton {
    pub(crate) fn new(
        tx: Transaction,
        prev_txs: Vec<Vec<u8>>,
        estimated_fee: Amount,
        estimated_vsize: usize,
    ) -> Self {
        Self {
            tx,
            prev_txs,
            estimated_fee,
            estimated_vsize,
        }
    }

    /// Gets the unsigned transaction.
    pub fn unsigned_tx(&self) -> &Transaction {
        &self.tx
    }

    /// Gets the raw previous transaction backing the input at `index`, for
    /// use as signing context.
    pub fn prev_tx_raw(&self, index: usize) -> Option<&[u8]> {
        self.prev_txs.get(index).map(Vec::as_slice)
    }

    /// Gets the fee the assembler budgeted for, in full.
    ///
    /// Exactly `sum(inputs) - sum(outputs)` for the contained transaction.
    pub fn estimated_fee(&self) -> Amount {
        self.estimated_fee
    }

    /// Gets the virtual size estimate the fee was computed from.
    pub fn estimated_vsize(&self) -> usize {
        self.estimated_vsize
    }

    /// Serializes the unsigned transaction in standard wire format, suitable
    /// for any standard-compliant signer.
    pub fn to_wire_bytes(&self) -> Vec<u8> {
        consensus::encode::serialize(&self.tx)
    }

    /// Consumes the skeleton, returning the unsigned transaction.
    pub fn into_transaction(self) -> Transaction {
        self.tx
    }
}
