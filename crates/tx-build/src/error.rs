use bitcoin::Network;
use thiserror::Error;
use timevault_carrier_fmt::errors::CarrierEncodeError;

/// Errors for assembling a time-locked transaction skeleton.
///
/// All variants are local, deterministic validation failures raised before
/// anything is constructed; a failed build leaves no partial state behind.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The request carried no spendable outputs.
    #[error("no spendable outputs supplied")]
    NoSpendableOutputs,

    /// The request carried no payout addresses.
    #[error("no payout addresses supplied")]
    NoPayoutAddresses,

    /// The request carried more payout addresses than supported.
    #[error("{0} payout addresses exceeds the supported maximum")]
    TooManyPayoutAddresses(usize),

    /// Two payout addresses resolve to the same output script.
    #[error("payout addresses must be distinct")]
    DuplicatePayoutAddress,

    /// A payout address does not belong to the configured network.
    #[error("payout address is not valid for {0}")]
    InvalidAddress(Network),

    /// The locktime is zero, or not past the supplied chain-tip snapshot.
    #[error("locktime {0} is not enforceable")]
    InvalidLocktime(u32),

    /// The fee rate must be a positive number of sats per virtual byte.
    #[error("fee rate must be positive")]
    ZeroFeeRate,

    /// Total input value overflows a satoshi counter.
    #[error("total input value overflows")]
    ValueOverflow,

    /// Inputs cannot cover the fee plus a dust-floor payout per address.
    #[error("insufficient funds: need {required} sat, have {available} sat")]
    InsufficientFunds {
        /// Minimum total input value the request needs.
        required: u64,
        /// Total input value actually supplied.
        available: u64,
    },

    /// The carrier payload failed to encode.
    #[error("carrier: {0}")]
    Carrier(#[from] CarrierEncodeError),
}

/// Wrapper result type for builds.
pub type BuildResult<T> = Result<T, BuildError>;
