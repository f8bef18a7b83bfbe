use bitcoin::{Address, Amount, Network, OutPoint, Txid};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::SpendableOutput;

/// An unspent output as reported by a chain-data source, before the raw
/// previous transaction has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UtxoRef {
    /// The unspent outpoint.
    pub outpoint: OutPoint,

    /// Its value.
    #[cfg_attr(feature = "serde", serde(with = "bitcoin::amount::serde::as_sat"))]
    pub value: Amount,
}

/// Read-only chain-data boundary the caller implements.
///
/// The assembler itself never touches the network; this trait is the
/// documented seam where the caller's chain access (an index, an RPC node, a
/// public API) plugs in. Results are treated as a snapshot taken at call
/// time and are not re-validated against the live chain.
pub trait ChainDataSource {
    /// Error type of the underlying source.
    type Error;

    /// Lists outputs the given address can spend.
    fn list_unspent(
        &self,
        address: &Address,
        network: Network,
    ) -> Result<Vec<UtxoRef>, Self::Error>;

    /// Fetches the full serialized bytes of a transaction.
    fn fetch_raw_transaction(
        &self,
        txid: &Txid,
        network: Network,
    ) -> Result<Vec<u8>, Self::Error>;
}

/// Resolves a funding address into ready-to-build [`SpendableOutput`]s,
/// pairing each unspent output with the raw bytes of the transaction that
/// created it.
///
/// Call this fresh for every build request; spendable outputs must not be
/// cached across requests since an output spent in the meantime would
/// invalidate the transaction.
///
/// # Errors
///
/// Propagates the source's own error unchanged.
pub fn collect_spendable_outputs<C: ChainDataSource>(
    chain: &C,
    address: &Address,
    network: Network,
) -> Result<Vec<SpendableOutput>, C::Error> {
    let refs = chain.list_unspent(address, network)?;

    let mut outputs = Vec::with_capacity(refs.len());
    for utxo in refs {
        let raw = chain.fetch_raw_transaction(&utxo.outpoint.txid, network)?;
        outputs.push(SpendableOutput::new(utxo.outpoint, utxo.value, raw));
    }

    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use bitcoin::{Network, PubkeyHash, hashes::Hash};

    use super::*;

    struct FakeChain {
        unspent: Vec<UtxoRef>,
        raw_txs: HashMap<Txid, Vec<u8>>,
    }

    impl ChainDataSource for FakeChain {
        type Error = String;

        fn list_unspent(
            &self,
            _address: &Address,
            _network: Network,
        ) -> Result<Vec<UtxoRef>, Self::Error> {
            Ok(self.unspent.clone())
        }

        fn fetch_raw_transaction(
            &self,
            txid: &Txid,
            _network: Network,
        ) -> Result<Vec<u8>, Self::Error> {
            self.raw_txs
                .get(txid)
                .cloned()
                .ok_or_else(|| format!("unknown tx {txid}"))
        }
    }

    fn txid(byte: u8) -> Txid {
        Txid::from_byte_array([byte; 32])
    }

    #[test]
    fn test_collect_pairs_utxos_with_raw_txs() {
        let chain = FakeChain {
            unspent: vec![
                UtxoRef {
                    outpoint: OutPoint::new(txid(1), 0),
                    value: Amount::from_sat(10_000),
                },
                UtxoRef {
                    outpoint: OutPoint::new(txid(2), 3),
                    value: Amount::from_sat(25_000),
                },
            ],
            raw_txs: HashMap::from([(txid(1), vec![0xaa; 60]), (txid(2), vec![0xbb; 90])]),
        };

        let address = Address::p2pkh(PubkeyHash::from_byte_array([7; 20]), Network::Regtest);
        let outputs = collect_spendable_outputs(&chain, &address, Network::Regtest).unwrap();

        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].value(), Amount::from_sat(10_000));
        assert_eq!(outputs[0].prev_tx_raw(), vec![0xaa; 60]);
        assert_eq!(outputs[1].outpoint(), OutPoint::new(txid(2), 3));
        assert_eq!(outputs[1].prev_tx_raw(), vec![0xbb; 90]);
    }

    #[test]
    fn test_collect_surfaces_source_errors() {
        let chain = FakeChain {
            unspent: vec![UtxoRef {
                outpoint: OutPoint::new(txid(9), 0),
                value: Amount::from_sat(1_000),
            }],
            raw_txs: HashMap::new(),
        };

        let address = Address::p2pkh(PubkeyHash::from_byte_array([7; 20]), Network::Regtest);
        let result = collect_spendable_outputs(&chain, &address, Network::Regtest);
        assert!(result.is_err());
    }
}
