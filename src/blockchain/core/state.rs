use crate::error::LedgerError;
use crate::transaction::{OutPoint, Transaction, TxOutput};
use std::collections::HashMap;

/// The set of unspent transaction outputs, keyed by (txid, output index).
/// An outpoint present in the map is spendable; spending removes it and
/// inserts the spending transaction's outputs in its place.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct UtxoState {
    pub utxos: HashMap<OutPoint, TxOutput>,
}

impl UtxoState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an unspent output. Returns None for unknown or already-spent
    /// outpoints.
    pub fn resolve(&self, outpoint: &OutPoint) -> Option<&TxOutput> {
        self.utxos.get(outpoint)
    }

    pub fn insert(&mut self, outpoint: OutPoint, output: TxOutput) {
        self.utxos.insert(outpoint, output);
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    /// Sum of unspent output values owned by the given public key.
    pub fn balance_of(&self, owner_public_key: &[u8]) -> u64 {
        self.utxos
            .values()
            .filter(|o| o.owner_public_key == owner_public_key)
            .map(|o| o.value)
            .sum()
    }

    /// Consume the transaction's inputs and record its outputs. Callers
    /// validate first and apply to a scratch copy, so a failure here never
    /// leaves a live state half-updated.
    pub fn apply_transaction(&mut self, tx: &Transaction) -> Result<(), LedgerError> {
        for input in &tx.inputs {
            let outpoint = input.outpoint();
            self.utxos.remove(&outpoint).ok_or_else(|| {
                LedgerError::UnknownUtxo(format!(
                    "Cannot spend unknown or spent output {}:{}",
                    hex::encode(outpoint.txid),
                    outpoint.index
                ))
            })?;
        }

        let txid = tx.hash();
        for (i, output) in tx.outputs.iter().enumerate() {
            self.utxos.insert(OutPoint::new(txid, i as u32), output.clone());
        }

        Ok(())
    }
}
