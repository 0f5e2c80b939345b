/// Validation logic for transactions separated from type definitions
use crate::blockchain::UtxoState;
use crate::error::LedgerError;
use crate::transaction::types::Transaction;
use std::collections::HashSet;

impl Transaction {
    /// Stateless structural checks: size bound, coinbase shape, signature
    /// presence. Does NOT touch the UTXO state - use validate_with_state()
    /// for that.
    pub fn validate_structure(&self) -> Result<(), LedgerError> {
        self.validate_size()?;

        if self.outputs.is_empty() {
            return Err(LedgerError::InvalidTransaction(
                "Transaction must have at least one output".to_string(),
            ));
        }

        if self.is_coinbase() {
            // The minting transaction carries no inputs and nothing to sign.
            return Ok(());
        }

        for (i, input) in self.inputs.iter().enumerate() {
            if input.signature.is_none() {
                return Err(LedgerError::InvalidTransaction(format!(
                    "Input {} is not signed",
                    i
                )));
            }
        }

        Ok(())
    }

    /// Full validation against the current UTXO state. Every input must
    /// resolve to an unspent output, its signature must verify against that
    /// output's owner key, and total output value must not exceed total
    /// input value (the difference is the implicit fee).
    pub fn validate_with_state(&self, state: &UtxoState) -> Result<(), LedgerError> {
        self.validate_structure()?;

        if self.is_coinbase() {
            return Ok(());
        }

        let message = self.signable_bytes();
        let mut seen_outpoints = HashSet::new();
        let mut input_total: u64 = 0;

        for (i, input) in self.inputs.iter().enumerate() {
            let outpoint = input.outpoint();

            if !seen_outpoints.insert(outpoint) {
                return Err(LedgerError::DoubleSpendDetected(format!(
                    "Output {}:{} is referenced twice within one transaction",
                    hex::encode(outpoint.txid),
                    outpoint.index
                )));
            }

            let source = state.resolve(&outpoint).ok_or_else(|| {
                LedgerError::UnknownUtxo(format!(
                    "Input {} references unknown or spent output {}:{}",
                    i,
                    hex::encode(outpoint.txid),
                    outpoint.index
                ))
            })?;

            let signature = input.signature.as_ref().ok_or_else(|| {
                LedgerError::InvalidTransaction(format!("Input {} is not signed", i))
            })?;

            // An empty owner key (the genesis placeholder) names no owner to
            // authenticate against; such an output is spendable by any signer.
            if !source.owner_public_key.is_empty()
                && !crate::crypto::signature_is_valid(&source.owner_public_key, &message, signature)
            {
                return Err(LedgerError::InvalidTransaction(format!(
                    "Input {} signature does not verify against the owner key of {}:{}",
                    i,
                    hex::encode(outpoint.txid),
                    outpoint.index
                )));
            }

            input_total = input_total.checked_add(source.value).ok_or_else(|| {
                LedgerError::InvalidTransaction("Input value overflow".to_string())
            })?;
        }

        let mut output_total: u64 = 0;
        for output in &self.outputs {
            output_total = output_total.checked_add(output.value).ok_or_else(|| {
                LedgerError::InvalidTransaction("Output value overflow".to_string())
            })?;
        }

        if output_total > input_total {
            return Err(LedgerError::InvalidTransaction(format!(
                "Outputs ({}) exceed inputs ({})",
                output_total, input_total
            )));
        }

        Ok(())
    }
}
