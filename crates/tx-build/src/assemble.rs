use bitcoin::{
    Amount, Network, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Witness, absolute,
    transaction::Version,
};
use timevault_carrier_fmt::builder::build_carrier_script;

use crate::{
    error::{BuildError, BuildResult},
    types::{LockedTransactionRequest, TipSnapshot, UnsignedTransactionSkeleton},
};

/// Transaction version used for every skeleton.
pub const TX_VERSION: Version = Version::TWO;

/// Maximum number of payout addresses per transaction.
pub const MAX_PAYOUT_ADDRESSES: usize = 3;

/// Minimum relayable value for a payout output, in satoshis.
pub const DUST_FLOOR_SAT: u64 = 546;

/// Virtual size attributed to each input (legacy per-input weight).
const INPUT_VSIZE: usize = 148;

/// Virtual size attributed to each payout output.
const PAYOUT_OUTPUT_VSIZE: usize = 34;

/// Fixed per-transaction overhead (version, counts, locktime).
const TX_OVERHEAD_VSIZE: usize = 10;

/// Configuration threaded into every build.
///
/// Carries the network payout addresses are checked against and, optionally,
/// a chain-tip snapshot enabling the future-locktime check. There is no
/// ambient default; callers always state the network explicitly.
#[derive(Clone, Debug)]
pub struct BuildConfig {
    network: Network,
    tip: Option<TipSnapshot>,
}

impl BuildConfig {
    /// Constructs a new configuration for the given network.
    pub fn new(network: Network) -> Self {
        Self { network, tip: None }
    }

    /// Attaches a chain-tip snapshot, turning the advisory future-locktime
    /// check on.
    pub fn with_tip_snapshot(mut self, tip: TipSnapshot) -> Self {
        self.tip = Some(tip);
        self
    }

    /// Gets the configured network.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Assembles an unsigned, value-conserving, time-locked transaction
    /// skeleton from the request, or fails with the first validation problem
    /// found.
    ///
    /// Output 0 carries the payload at zero value; outputs 1..N split the
    /// post-fee input value evenly across the payout addresses, with the
    /// integer remainder absorbed by the last one. Every input is given a
    /// non-final sequence number, since a single final input would disable
    /// locktime enforcement for the whole transaction.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] naming the offending value; see the error
    /// type for the full taxonomy. Failures leave no partial state and are
    /// never retried internally.
    pub fn build_transaction(
        &self,
        request: &LockedTransactionRequest,
    ) -> BuildResult<UnsignedTransactionSkeleton> {
        if request.spendable_outputs.is_empty() {
            return Err(BuildError::NoSpendableOutputs);
        }
        if request.fee_rate_sat_vb == 0 {
            return Err(BuildError::ZeroFeeRate);
        }

        let payout_scripts = self.checked_payout_scripts(request)?;
        let lock_time = validate_locktime(request.locktime, self.tip.as_ref())?;
        let carrier_script = build_carrier_script(&request.payload, &request.content_type)?;

        let mut total_in: u64 = 0;
        for spendable in &request.spendable_outputs {
            total_in = total_in
                .checked_add(spendable.value().to_sat())
                .ok_or(BuildError::ValueOverflow)?;
        }

        let vsize = estimate_vsize(
            request.spendable_outputs.len(),
            payout_scripts.len(),
            carrier_script.len(),
        );
        let fee = (vsize as u64)
            .checked_mul(request.fee_rate_sat_vb)
            .ok_or(BuildError::ValueOverflow)?;

        let payout_count = payout_scripts.len() as u64;
        let required = fee
            .checked_add(payout_count * DUST_FLOOR_SAT)
            .ok_or(BuildError::ValueOverflow)?;
        if total_in < required {
            return Err(BuildError::InsufficientFunds {
                required,
                available: total_in,
            });
        }
        let distributable = total_in - fee;

        // Floor split; the last payout absorbs the remainder so the sum is
        // exact and value conservation holds to the satoshi.
        let share = distributable / payout_count;
        let last_share = distributable - (payout_count - 1) * share;

        let input: Vec<TxIn> = request
            .spendable_outputs
            .iter()
            .map(|spendable| TxIn {
                previous_output: spendable.outpoint(),
                script_sig: ScriptBuf::new(),
                sequence: Sequence::ENABLE_LOCKTIME_NO_RBF,
                witness: Witness::default(),
            })
            .collect();

        let mut output = Vec::with_capacity(payout_scripts.len() + 1);
        output.push(TxOut {
            value: Amount::ZERO,
            script_pubkey: carrier_script,
        });
        let last = payout_scripts.len() - 1;
        for (i, script_pubkey) in payout_scripts.into_iter().enumerate() {
            let sats = if i == last { last_share } else { share };
            output.push(TxOut {
                value: Amount::from_sat(sats),
                script_pubkey,
            });
        }

        let tx = Transaction {
            version: TX_VERSION,
            lock_time,
            input,
            output,
        };

        let prev_txs = request
            .spendable_outputs
            .iter()
            .map(|spendable| spendable.prev_tx_raw().to_vec())
            .collect();

        Ok(UnsignedTransactionSkeleton::new(
            tx,
            prev_txs,
            Amount::from_sat(fee),
            vsize,
        ))
    }

    /// Checks payout address count, network membership, and distinctness,
    /// returning the output scripts in payout order.
    fn checked_payout_scripts(
        &self,
        request: &LockedTransactionRequest,
    ) -> BuildResult<Vec<ScriptBuf>> {
        if request.payout_addresses.is_empty() {
            return Err(BuildError::NoPayoutAddresses);
        }
        if request.payout_addresses.len() > MAX_PAYOUT_ADDRESSES {
            return Err(BuildError::TooManyPayoutAddresses(
                request.payout_addresses.len(),
            ));
        }

        let mut scripts = Vec::with_capacity(request.payout_addresses.len());
        for address in &request.payout_addresses {
            let checked = address
                .clone()
                .require_network(self.network)
                .map_err(|_| BuildError::InvalidAddress(self.network))?;
            scripts.push(checked.script_pubkey());
        }

        for i in 0..scripts.len() {
            for j in (i + 1)..scripts.len() {
                if scripts[i] == scripts[j] {
                    return Err(BuildError::DuplicatePayoutAddress);
                }
            }
        }

        Ok(scripts)
    }
}

/// Estimates the virtual size of a skeleton with the given shape.
///
/// Uses a legacy per-input weight model: 148 vbytes per input, 34 per payout
/// output, 10 of fixed overhead, plus the carrier output's exact cost (8-byte
/// value, compact-size length prefix, script bytes). Pure; usable for fee
/// planning before the carrier script exists via
/// [`timevault_carrier_fmt::builder::encoded_script_size`].
pub fn estimate_vsize(
    input_count: usize,
    payout_count: usize,
    carrier_script_len: usize,
) -> usize {
    TX_OVERHEAD_VSIZE
        + input_count * INPUT_VSIZE
        + payout_count * PAYOUT_OUTPUT_VSIZE
        + 8
        + compact_size_len(carrier_script_len)
        + carrier_script_len
}

fn compact_size_len(n: usize) -> usize {
    if n < 0xfd {
        1
    } else if n <= 0xffff {
        3
    } else {
        5
    }
}

fn validate_locktime(
    locktime: u32,
    tip: Option<&TipSnapshot>,
) -> BuildResult<absolute::LockTime> {
    // Zero means "no lock", which defeats the purpose of this transaction.
    if locktime == 0 {
        return Err(BuildError::InvalidLocktime(locktime));
    }

    let lock_time = absolute::LockTime::from_consensus(locktime);

    if let Some(tip) = tip {
        let expired = match lock_time {
            absolute::LockTime::Blocks(height) => height.to_consensus_u32() <= tip.height,
            absolute::LockTime::Seconds(time) => time.to_consensus_u32() <= tip.median_time,
        };
        if expired {
            return Err(BuildError::InvalidLocktime(locktime));
        }
    }

    Ok(lock_time)
}
