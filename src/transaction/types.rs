/// Transaction types for the ledger
use crate::crypto::{KeyPair, Sha256Hash};
use crate::error::LedgerError;
use sha2::{Digest, Sha256};

/// Maximum transaction size in bytes (100KB) to prevent DoS
pub const MAX_TRANSACTION_SIZE: usize = 100_000;

/// Reference to one prior transaction output by (transaction digest, output index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct OutPoint {
    pub txid: Sha256Hash,
    pub index: u32,
}

impl OutPoint {
    pub fn new(txid: Sha256Hash, index: u32) -> Self {
        OutPoint { txid, index }
    }
}

/// Spend of one prior output. The signature is absent until signing;
/// once present it authorizes spending the referenced output.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TxInput {
    pub source_txid: Sha256Hash,
    pub output_index: u32,
    #[serde(with = "serde_bytes", default)]
    pub signature: Option<Vec<u8>>,
}

impl TxInput {
    pub fn new(source_txid: Sha256Hash, output_index: u32) -> Self {
        TxInput {
            source_txid,
            output_index,
            signature: None,
        }
    }

    pub fn outpoint(&self) -> OutPoint {
        OutPoint::new(self.source_txid, self.output_index)
    }
}

/// Newly created spendable value. Immutable once embedded in a transaction;
/// spent status is tracked externally by the UTXO state.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TxOutput {
    /// Amount in the smallest indivisible unit
    pub value: u64,
    /// Compressed secp256k1 public key of the recipient; empty for the
    /// genesis placeholder owner
    #[serde(with = "serde_bytes")]
    pub owner_public_key: Vec<u8>,
}

impl TxOutput {
    pub fn new(value: u64, owner_public_key: Vec<u8>) -> Self {
        TxOutput {
            value,
            owner_public_key,
        }
    }
}

/// A value transfer: an ordered set of inputs spending prior outputs and an
/// ordered set of new outputs. Input/output order participates in the
/// canonical serialization and therefore in the hash and signatures.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Transaction {
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
}

impl Transaction {
    /// Minting transaction: no inputs, a single output of `value` to
    /// `owner_public_key` (empty for the genesis placeholder owner).
    pub fn coinbase(value: u64, owner_public_key: Vec<u8>) -> Self {
        Transaction {
            inputs: vec![],
            outputs: vec![TxOutput::new(value, owner_public_key)],
        }
    }

    /// Spend of a single prior output into a recipient output plus a change
    /// output back to `change_key`. Change is `source_value - amount - fee`,
    /// computed with checked arithmetic; insufficient source value is an
    /// error at construction time rather than a silent wrap.
    pub fn transfer(
        source: OutPoint,
        source_value: u64,
        amount: u64,
        fee: u64,
        recipient_key: Vec<u8>,
        change_key: Vec<u8>,
    ) -> Result<Self, LedgerError> {
        let change = source_value
            .checked_sub(amount)
            .and_then(|rest| rest.checked_sub(fee))
            .ok_or_else(|| {
                LedgerError::InvalidTransaction(format!(
                    "Insufficient source value: {} cannot cover amount {} + fee {}",
                    source_value, amount, fee
                ))
            })?;

        Ok(Transaction {
            inputs: vec![TxInput::new(source.txid, source.index)],
            outputs: vec![
                TxOutput::new(amount, recipient_key),
                TxOutput::new(change, change_key),
            ],
        })
    }

    /// A transaction with zero inputs is only valid as the distinguished
    /// minting transaction.
    pub fn is_coinbase(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Canonical byte serialization of the transaction's unsigned content.
    ///
    /// For each input in order: 32-byte source txid, then the output index as
    /// a 4-byte big-endian integer. For each output in order: the owner key
    /// length as a 4-byte big-endian integer, the owner key bytes, then the
    /// value as an 8-byte big-endian integer. Signatures are excluded: every
    /// input signature is computed over these bytes and stored alongside,
    /// never fed back into its own digest. The length prefix keeps the
    /// encoding unambiguous for variable-width owner keys.
    pub fn signable_bytes(&self) -> Vec<u8> {
        let mut data = Vec::new();
        for input in &self.inputs {
            data.extend_from_slice(&input.source_txid);
            data.extend_from_slice(&input.output_index.to_be_bytes());
        }
        for output in &self.outputs {
            data.extend_from_slice(&(output.owner_public_key.len() as u32).to_be_bytes());
            data.extend_from_slice(&output.owner_public_key);
            data.extend_from_slice(&output.value.to_be_bytes());
        }
        data
    }

    /// Calculate the hash of this transaction (its id)
    pub fn hash(&self) -> Sha256Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.signable_bytes());
        hasher.finalize().into()
    }

    pub fn hash_str(&self) -> String {
        hex::encode(self.hash())
    }

    /// Sign a single input with the given key. Each input is signed
    /// independently: distinct inputs may be authorized by distinct keys.
    pub fn sign_input(&mut self, index: usize, keypair: &KeyPair) -> Result<(), LedgerError> {
        if index >= self.inputs.len() {
            return Err(LedgerError::InvalidTransaction(format!(
                "No input at index {} to sign (transaction has {})",
                index,
                self.inputs.len()
            )));
        }

        let message = self.signable_bytes();
        let signature = keypair.sign(&message)?;
        self.inputs[index].signature = Some(signature.to_vec());
        Ok(())
    }

    /// Sign every input with the same key.
    pub fn sign_all_inputs(&mut self, keypair: &KeyPair) -> Result<(), LedgerError> {
        let message = self.signable_bytes();
        let signature = keypair.sign(&message)?;
        for input in &mut self.inputs {
            input.signature = Some(signature.to_vec());
        }
        Ok(())
    }

    /// Validate transaction size to prevent DoS attacks
    pub fn validate_size(&self) -> Result<(), LedgerError> {
        let serialized = bincode::serialize(self)
            .map_err(|e| LedgerError::InvalidTransaction(format!("Serialization failed: {}", e)))?;

        if serialized.len() > MAX_TRANSACTION_SIZE {
            return Err(LedgerError::InvalidTransaction(format!(
                "Transaction too large: {} bytes (max: {})",
                serialized.len(),
                MAX_TRANSACTION_SIZE
            )));
        }
        Ok(())
    }
}
