//! Cryptographic primitives for the ledger

use crate::error::LedgerError;
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use secp256k1::{
    constants::{COMPACT_SIGNATURE_SIZE, PUBLIC_KEY_SIZE, SECRET_KEY_SIZE},
    ecdsa::Signature,
    All, Message, PublicKey, Secp256k1, SecretKey,
};
use sha2::{Digest, Sha256};

/// A thread-safe, lazily initialized Secp256k1 context.
/// This prevents repeated, unnecessary context creation.
static SECP256K1_CONTEXT: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

/// Fixed-size SHA-256 digest used for transaction ids and block hashes.
pub type Sha256Hash = [u8; 32];

/// Digest of all zeroes, used as the genesis block's previous-hash sentinel.
pub const ZERO_HASH: Sha256Hash = [0u8; 32];

/// Compute the SHA-256 digest of a byte slice.
pub fn sha256(bytes: &[u8]) -> Sha256Hash {
    Sha256::digest(bytes).into()
}

#[derive(Debug, Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generates a new random KeyPair using the OS random number generator.
    pub fn generate() -> Result<Self, LedgerError> {
        let secret_key = SecretKey::new(&mut OsRng);
        // Using the context from the static Lazy
        let public_key = PublicKey::from_secret_key(&SECP256K1_CONTEXT, &secret_key);

        Ok(KeyPair {
            secret_key,
            public_key,
        })
    }

    /// Creates a KeyPair from an existing SecretKey.
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let public_key = PublicKey::from_secret_key(&SECP256K1_CONTEXT, &secret_key);
        KeyPair {
            secret_key,
            public_key,
        }
    }

    /// Creates a KeyPair from raw secret key bytes.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        let secret_key = SecretKey::from_slice(bytes).map_err(|e| {
            if bytes.len() != SECRET_KEY_SIZE {
                LedgerError::CryptoError(format!(
                    "Secret key must be {} bytes, got {}",
                    SECRET_KEY_SIZE,
                    bytes.len()
                ))
            } else {
                LedgerError::CryptoError(format!("Invalid secret key bytes: {}", e))
            }
        })?;

        Ok(Self::from_secret_key(secret_key))
    }

    /// Returns the KeyPair's public key as a compressed byte array.
    /// This is the byte string stored in a transaction output's owner field.
    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.public_key.serialize()
    }

    /// Signs a message (which is first hashed using SHA-256) and returns the compact signature bytes.
    pub fn sign(&self, message: &[u8]) -> Result<[u8; COMPACT_SIGNATURE_SIZE], LedgerError> {
        let digest = Sha256::digest(message);

        let message = Message::from_digest_slice(&digest)
            .map_err(|e| LedgerError::CryptoError(format!("Failed to create message: {}", e)))?;

        // Using the context from the static Lazy
        let signature = SECP256K1_CONTEXT.sign_ecdsa(&message, &self.secret_key);

        let compact_sig_bytes: [u8; COMPACT_SIGNATURE_SIZE] = signature.serialize_compact();
        Ok(compact_sig_bytes)
    }
}

/// Verifies an ECDSA signature given the raw public key bytes, message, and signature bytes.
pub fn verify_signature(
    public_key_bytes: &[u8],
    message: &[u8],
    signature_bytes: &[u8],
) -> Result<(), LedgerError> {
    if public_key_bytes.len() != PUBLIC_KEY_SIZE {
        return Err(LedgerError::CryptoError(format!(
            "Public key must be exactly {} bytes (compressed), got {}",
            PUBLIC_KEY_SIZE,
            public_key_bytes.len()
        )));
    }
    if signature_bytes.len() != COMPACT_SIGNATURE_SIZE {
        return Err(LedgerError::CryptoError(format!(
            "Signature must be exactly {} bytes (compact), got {}",
            COMPACT_SIGNATURE_SIZE,
            signature_bytes.len()
        )));
    }

    let public_key = PublicKey::from_slice(public_key_bytes)
        .map_err(|e| LedgerError::CryptoError(format!("Invalid public key: {}", e)))?;

    // The message is hashed before verification, matching KeyPair::sign.
    let digest = Sha256::digest(message);

    let message = Message::from_digest_slice(&digest)
        .map_err(|e| LedgerError::CryptoError(format!("Failed to create message: {}", e)))?;

    let signature = Signature::from_compact(signature_bytes)
        .map_err(|e| LedgerError::CryptoError(format!("Invalid signature: {}", e)))?;

    SECP256K1_CONTEXT
        .verify_ecdsa(&message, &signature, &public_key)
        .map_err(|_| LedgerError::CryptoError("Signature verification failed".to_string()))
}

/// Boolean form of [`verify_signature`]: false for any malformed or
/// non-matching input, never an error. Used where verification is a
/// pure predicate rather than a failure to report.
pub fn signature_is_valid(public_key_bytes: &[u8], message: &[u8], signature_bytes: &[u8]) -> bool {
    verify_signature(public_key_bytes, message, signature_bytes).is_ok()
}
