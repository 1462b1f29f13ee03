//! Account derivation
//!
//! The operator account is derived once at startup from a BIP-39 mnemonic
//! stored in a file. Key material lives only in memory.

mod mnemonic;

pub use mnemonic::{load_mnemonic, Account};
