//! Chain collaborators consumed by the transaction lifecycle manager
//!
//! [`ChainFacts`] supplies the point-in-time parameters needed to build a
//! transaction and reports on transactions already submitted.
//! [`ContractBinding`] executes view calls and signs + broadcasts writes.
//! [`RpcChain`] implements both on top of an alloy HTTP provider.

mod rpc;

#[cfg(test)]
pub(crate) mod mock;

pub use rpc::RpcChain;

use crate::error::Result;
use crate::types::{Receipt, SigningContext, TransactionIntent};
use alloy::primitives::{Address, Bytes, TxHash};
use std::future::Future;

/// What a lookup by hash says about a submitted transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxLookup {
    /// Known to the node, not yet in a block
    Pending,
    /// Included in a block
    Included,
    /// The node does not know the hash
    NotFound,
}

/// Block a view call is evaluated at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockContext {
    #[default]
    Latest,
    Number(u64),
}

/// Point-in-time chain parameters and transaction lookups.
///
/// None of these results may be cached: the nonce and gas price change
/// between submissions.
pub trait ChainFacts: Send + Sync {
    /// Chain id used for replay protection
    fn chain_id(&self) -> impl Future<Output = Result<u64>> + Send;

    /// Next unused nonce for `address` at the latest block
    fn nonce_at(&self, address: Address) -> impl Future<Output = Result<u64>> + Send;

    /// Network-suggested gas price in wei
    fn suggest_gas_price(&self) -> impl Future<Output = Result<u128>> + Send;

    /// Number of the latest block
    fn block_number(&self) -> impl Future<Output = Result<u64>> + Send;

    /// Look a transaction up by hash
    fn transaction_by_hash(&self, hash: TxHash) -> impl Future<Output = Result<TxLookup>> + Send;

    /// Fetch the receipt of an included transaction
    fn transaction_receipt(&self, hash: TxHash) -> impl Future<Output = Result<Receipt>> + Send;
}

/// Typed access to the deployed contract
pub trait ContractBinding: Send + Sync {
    /// Execute a view call and return the raw ABI-encoded output
    fn call(
        &self,
        to: Address,
        data: Bytes,
        block: BlockContext,
    ) -> impl Future<Output = Result<Bytes>> + Send;

    /// Sign `intent` with `ctx` and broadcast it, returning the transaction hash
    fn transact(
        &self,
        ctx: &SigningContext,
        intent: &TransactionIntent,
    ) -> impl Future<Output = Result<TxHash>> + Send;
}
