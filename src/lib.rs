//! ccnft: operator SDK for the CyberCar NFT contract
//!
//! Queries contract state (quotas, pause flag, phase) and submits privileged
//! calls (allow-lists, pause/unpause, phase changes) signed by an account
//! derived from a mnemonic.
//!
//! # Features
//!
//! - Read-only queries against the latest or a historical block
//! - Write calls driven to a final receipt, with revert detection
//! - Cancellation of any in-flight operation
//!
//! # Example
//!
//! ```rust,ignore
//! use ccnft::{CarClient, Config};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> eyre::Result<()> {
//!     let config = Config::from_file("config.json")?;
//!     let client = CarClient::connect_with_account(&config)?;
//!     let cancel = CancellationToken::new();
//!
//!     if client.pause(&cancel).await?.is_none() {
//!         println!("already paused");
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod addresses;
pub mod chain;
pub mod client;
pub mod config;
pub mod constants;
pub mod contracts;
pub mod error;
pub mod signer;
pub mod tx;
pub mod types;

// Re-export main types for convenience
pub use addresses::load_address_list;
pub use chain::{BlockContext, ChainFacts, ContractBinding, RpcChain, TxLookup};
pub use client::CarClient;
pub use config::{Config, ConfirmationConfig, LogConfig};
pub use error::{Error, Result};
pub use signer::Account;
pub use tx::{PollSettings, SubmittedTransaction, TxManager};
pub use types::{
    Phase, Quota, Receipt, ReceiptStatus, SigningContext, TransactionIntent, TxState, WriteCall,
};
