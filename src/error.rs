//! Error types for the ledger

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Candidate block's index is not tip index + 1.
    DiscontinuousIndex { expected: u64, got: u64 },
    /// Candidate block's previous_hash does not match the tip's hash.
    BrokenLink,
    /// Candidate block's embedded hash is stale relative to its own content.
    HashMismatch,
    CryptoError(String),
    InvalidTransaction(String),
    InvalidBlock(String),
    DoubleSpendDetected(String),
    UnknownUtxo(String),
    IoError(String),
    BincodeError(String),
    ConfigError(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LedgerError::DiscontinuousIndex { expected, got } => {
                write!(
                    f,
                    "Discontinuous block index: expected {}, got {}",
                    expected, got
                )
            }
            LedgerError::BrokenLink => write!(f, "Broken block linkage"),
            LedgerError::HashMismatch => write!(f, "Block hash mismatch"),
            LedgerError::CryptoError(msg) => write!(f, "Cryptographic error: {}", msg),
            LedgerError::InvalidTransaction(msg) => write!(f, "Invalid transaction: {}", msg),
            LedgerError::InvalidBlock(msg) => write!(f, "Invalid block: {}", msg),
            LedgerError::DoubleSpendDetected(msg) => write!(f, "Double spend detected: {}", msg),
            LedgerError::UnknownUtxo(msg) => write!(f, "Unknown UTXO: {}", msg),
            LedgerError::IoError(msg) => write!(f, "IO error: {}", msg),
            LedgerError::BincodeError(msg) => write!(f, "Bincode error: {}", msg),
            LedgerError::ConfigError(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::IoError(err.to_string())
    }
}

impl From<Box<bincode::ErrorKind>> for LedgerError {
    fn from(err: Box<bincode::ErrorKind>) -> Self {
        LedgerError::BincodeError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, LedgerError>;
