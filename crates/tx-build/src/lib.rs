//! Unsigned time-locked transaction assembly for timevault.
//!
//! Given already-fetched spendable outputs, an opaque payload, payout
//! addresses, a locktime, and a fee rate, this crate deterministically
//! produces an unsigned, value-conserving transaction skeleton whose first
//! output carries the payload in a `timevault-carrier-fmt` envelope. Every
//! input gets a non-final sequence number so the locktime is enforceable.
//!
//! The assembler is a pure, stateless, single-shot transform: it performs no
//! network I/O, holds no keys, and retains nothing between calls. Chain data
//! must be resolved up front (see [`oracle`]); signing and broadcasting are
//! the caller's collaborators and consume the returned skeleton.
//!
//! # Examples
//!
//! ```
//! use bitcoin::{Address, Amount, Network, OutPoint, PubkeyHash, Txid, hashes::Hash};
//! use timevault_tx_build::{BuildConfig, LockedTransactionRequest, SpendableOutput};
//!
//! let heir = Address::p2pkh(PubkeyHash::from_byte_array([0x11; 20]), Network::Regtest);
//! // Raw previous-transaction bytes elided; a real caller passes what the
//! // chain-data source returned.
//! let funding = SpendableOutput::new(
//!     OutPoint::new(Txid::all_zeros(), 0),
//!     Amount::from_sat(50_000),
//!     vec![],
//! );
//!
//! let request = LockedTransactionRequest {
//!     spendable_outputs: vec![funding],
//!     payload: b"hello".to_vec(),
//!     content_type: "text/plain".into(),
//!     payout_addresses: vec![heir.as_unchecked().clone()],
//!     locktime: 1_700_000_000,
//!     fee_rate_sat_vb: 2,
//! };
//!
//! let skeleton = BuildConfig::new(Network::Regtest)
//!     .build_transaction(&request)
//!     .unwrap();
//!
//! assert_eq!(skeleton.unsigned_tx().output[0].value, Amount::ZERO);
//! ```

/// Transaction assembly logic.
pub mod assemble;

/// Error types for transaction assembly.
pub mod error;

/// Chain-data source boundary.
pub mod oracle;

/// Request and skeleton types.
pub mod types;

pub use assemble::{BuildConfig, DUST_FLOOR_SAT, MAX_PAYOUT_ADDRESSES, TX_VERSION, estimate_vsize};
pub use error::{BuildError, BuildResult};
pub use oracle::{ChainDataSource, UtxoRef, collect_spendable_outputs};
pub use types::{
    LockedTransactionRequest, SpendableOutput, TipSnapshot, UnsignedTransactionSkeleton,
};

// Used by feature-gated serde tests; referenced here to keep the
// unused-dependency lint quiet when the feature is off.
#[cfg(test)]
use serde_json as _;
