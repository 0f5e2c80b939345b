//! Transaction module split into types and validation for better modularity

pub mod types;
pub mod validation;

pub use types::*;
// validation module adds inherent impls; only types are re-exported publicly
