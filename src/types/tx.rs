//! Transaction data model: intents, signing parameters and receipts

use crate::contracts::ICar;
use crate::types::Phase;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::sol_types::SolCall;
use std::fmt;

/// A write method of the contract together with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteCall {
    /// Grant mint quota during the whitelist phase
    AddWhitelist { addrs: Vec<Address>, amount: u8 },
    /// Grant claimable quota independent of minting
    AddAirdrop { addrs: Vec<Address>, amount: u8 },
    /// Grant reserve quota
    AddReserve { addrs: Vec<Address>, amount: u8 },
    Pause,
    Unpause,
    SetPhase(Phase),
}

impl WriteCall {
    /// Solidity method name
    pub fn method(&self) -> &'static str {
        match self {
            Self::AddWhitelist { .. } => "addWhitelist",
            Self::AddAirdrop { .. } => "addAirdrop",
            Self::AddReserve { .. } => "addReserve",
            Self::Pause => "pause",
            Self::Unpause => "unpause",
            Self::SetPhase(_) => "setPhase",
        }
    }

    /// ABI-encoded calldata
    pub fn abi_encode(&self) -> Bytes {
        let data = match self {
            Self::AddWhitelist { addrs, amount } => ICar::addWhitelistCall {
                addrs: addrs.clone(),
                amount: *amount,
            }
            .abi_encode(),
            Self::AddAirdrop { addrs, amount } => ICar::addAirdropCall {
                addrs: addrs.clone(),
                amount: *amount,
            }
            .abi_encode(),
            Self::AddReserve { addrs, amount } => ICar::addReserveCall {
                addrs: addrs.clone(),
                amount: *amount,
            }
            .abi_encode(),
            Self::Pause => ICar::pauseCall {}.abi_encode(),
            Self::Unpause => ICar::unpauseCall {}.abi_encode(),
            Self::SetPhase(phase) => ICar::setPhaseCall {
                newPhase: phase.0,
            }
            .abi_encode(),
        };
        Bytes::from(data)
    }
}

/// Request to invoke one write method on the contract.
///
/// Intents never transfer value; see [`TransactionIntent::value`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionIntent {
    contract: Address,
    call: WriteCall,
}

impl TransactionIntent {
    pub fn new(contract: Address, call: WriteCall) -> Self {
        Self { contract, call }
    }

    /// Target contract
    pub fn contract(&self) -> Address {
        self.contract
    }

    pub fn call(&self) -> &WriteCall {
        &self.call
    }

    pub fn method(&self) -> &'static str {
        self.call.method()
    }

    pub fn calldata(&self) -> Bytes {
        self.call.abi_encode()
    }

    /// Always zero: no method called by this tool is paid
    pub fn value(&self) -> U256 {
        U256::ZERO
    }
}

/// Parameters a transaction is signed with, fetched fresh for every submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningContext {
    /// Sending account
    pub from: Address,
    pub chain_id: u64,
    pub nonce: u64,
    /// Legacy gas price in wei
    pub gas_price: u128,
    pub gas_limit: u64,
    pub value: U256,
}

/// Execution status reported by a receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

/// Terminal outcome of a mined transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub status: ReceiptStatus,
    pub gas_used: u64,
    pub block_number: Option<u64>,
}

impl Receipt {
    pub fn is_success(&self) -> bool {
        self.status == ReceiptStatus::Success
    }
}

impl From<&alloy::rpc::types::TransactionReceipt> for Receipt {
    fn from(receipt: &alloy::rpc::types::TransactionReceipt) -> Self {
        Self {
            tx_hash: receipt.transaction_hash,
            status: if receipt.status() {
                ReceiptStatus::Success
            } else {
                ReceiptStatus::Reverted
            },
            gas_used: receipt.gas_used,
            block_number: receipt.block_number,
        }
    }
}

/// Lifecycle states of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    Building,
    Signed,
    Broadcast,
    Pending,
    Confirmed,
    Reverted,
    Dropped,
    Cancelled,
    Errored,
}

impl fmt::Display for TxState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Building => "building",
            Self::Signed => "signed",
            Self::Broadcast => "broadcast",
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Reverted => "reverted",
            Self::Dropped => "dropped",
            Self::Cancelled => "cancelled",
            Self::Errored => "errored",
        };
        f.write_str(s)
    }
}
