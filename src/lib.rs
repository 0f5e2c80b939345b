//! utxo-ledger - a minimal append-only ledger of cryptographically linked
//! blocks carrying UTXO-model value transfers
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Ledger
//! - [`blockchain`] - Block structure, chain store, and validation
//! - [`transaction`] - Transaction types, canonical serialization, signing
//!
//! ## Cryptography
//! - [`crypto`] - SHA-256 hashing and secp256k1 signatures
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration for the demo binary
//! - [`error`] - Error types
//!
//! The chain grows only by appending blocks that pass validation: index
//! continuity, byte-exact linkage to the tip's hash, hash integrity over the
//! block's canonical serialization, and per-input signature checks against
//! the owner keys of the referenced unspent outputs. There is no consensus,
//! networking, or persistence; one process owns one chain for one run.

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod blockchain;
pub mod transaction;

// ============================================================================
// Cryptography
// ============================================================================
pub mod crypto;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
