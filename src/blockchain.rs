// Thin re-export module: implementation is in `blockchain/core.rs` to keep
// chain storage, UTXO state, and validation separable.

pub mod core;
pub use core::*;
