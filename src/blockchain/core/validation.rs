use crate::blockchain::core::chain::{Block, Blockchain};
use crate::error::LedgerError;
use std::collections::HashMap;

/// Structural validation of a candidate block against the chain tip.
///
/// Pure: never mutates the chain; appending is a separate step the caller
/// performs only after a passing result. The three checks run in a fixed
/// order so the most informative failure is reported first:
/// index continuity, then linkage, then hash integrity.
pub fn validate_candidate(chain: &Blockchain, candidate: &Block) -> Result<(), LedgerError> {
    let tip = chain.tip().ok_or_else(|| {
        LedgerError::InvalidBlock("Cannot validate a candidate against an empty chain".to_string())
    })?;

    let expected = tip.index + 1;
    if candidate.index != expected {
        return Err(LedgerError::DiscontinuousIndex {
            expected,
            got: candidate.index,
        });
    }

    if candidate.previous_hash != tip.hash {
        return Err(LedgerError::BrokenLink);
    }

    if candidate.compute_hash() != candidate.hash {
        return Err(LedgerError::HashMismatch);
    }

    Ok(())
}

/// Reject a block in which two transactions spend the same outpoint.
pub fn validate_no_double_spend(block: &Block) -> Result<(), LedgerError> {
    let mut seen_inputs = HashMap::new();
    for tx in &block.transactions {
        let tx_hash = tx.hash();
        for input in &tx.inputs {
            let outpoint = input.outpoint();
            if let Some(conflicting_tx_hash) = seen_inputs.get(&outpoint) {
                return Err(LedgerError::DoubleSpendDetected(format!(
                    "UTXO {}:{} is spent by both {} and {}",
                    hex::encode(outpoint.txid),
                    outpoint.index,
                    hex::encode(conflicting_tx_hash),
                    hex::encode(tx_hash)
                )));
            }
            seen_inputs.insert(outpoint, tx_hash);
        }
    }
    Ok(())
}
