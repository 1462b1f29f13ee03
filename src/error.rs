//! Error types for the ccnft crate
//!
//! Library operations return the typed [`Error`] so callers can tell a
//! contract-level revert apart from infrastructure failures. The binary
//! works in terms of `eyre` for ergonomic reporting.

pub use eyre::{eyre, Context, Report};

use alloy::primitives::TxHash;
use std::time::Duration;
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced while configuring the tool or driving a transaction.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad file, path or configuration value.
    #[error("config error: {0}")]
    Config(String),

    /// The mnemonic could not be turned into a signing key.
    #[error("key derivation error: {0}")]
    KeyDerivation(String),

    /// Connectivity or lookup failure while talking to the node.
    #[error("rpc error: {0}")]
    Rpc(String),

    /// The transaction was rejected before it entered the chain.
    #[error("submission error: {0}")]
    Submission(String),

    /// The transaction was mined but the contract rejected the call.
    #[error("transaction reverted, hash {hash}")]
    Reverted { hash: TxHash },

    /// The node stopped knowing about a broadcast transaction.
    #[error("transaction dropped from the mempool, hash {hash}")]
    Dropped { hash: TxHash },

    /// The configured confirmation deadline elapsed.
    #[error("transaction {hash} not confirmed after {waited:?}")]
    Timeout { hash: TxHash, waited: Duration },

    /// The caller's cancellation signal fired.
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    pub(crate) fn config(msg: impl std::fmt::Display) -> Self {
        Self::Config(msg.to_string())
    }

    pub(crate) fn rpc(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Rpc(format!("{context}: {err}"))
    }

    pub(crate) fn submission(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Submission(format!("{context}: {err}"))
    }

    /// Whether the chain executed the transaction and the contract rejected it
    pub fn is_revert(&self) -> bool {
        matches!(self, Self::Reverted { .. })
    }

    /// Hash of the transaction this error refers to, if one was broadcast
    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            Self::Reverted { hash } | Self::Dropped { hash } | Self::Timeout { hash, .. } => {
                Some(*hash)
            }
            _ => None,
        }
    }
}
