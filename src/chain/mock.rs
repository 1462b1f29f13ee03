//! Scripted in-memory chain used by unit tests

use super::{BlockContext, ChainFacts, ContractBinding, TxLookup};
use crate::contracts::ICar;
use crate::error::{Error, Result};
use crate::types::{Receipt, ReceiptStatus, SigningContext, TransactionIntent};
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::sol_types::SolCall;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Recorded interaction with the double
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    ChainId,
    Nonce(Address),
    GasPrice,
    BlockNumber,
    Transact(&'static str),
    Lookup(TxHash),
    Receipt(TxHash),
    Call(&'static str, BlockContext),
}

pub(crate) struct MockChain {
    pub chain_id: u64,
    pub nonce: u64,
    pub gas_price: u128,
    pub tx_hash: TxHash,
    pub receipt_status: ReceiptStatus,
    pub gas_used: u64,
    pub block_number: u64,

    pub fail_chain_id: bool,
    pub fail_nonce: bool,
    pub fail_gas_price: bool,
    pub fail_transact: bool,
    pub fail_receipt: bool,

    /// Lookup results in order; `default_lookup` once exhausted
    pub lookups: Mutex<VecDeque<Result<TxLookup>>>,
    pub default_lookup: TxLookup,

    pub paused: bool,
    pub phase: i8,
    pub total_supply: u64,
    pub owner: Address,
    pub mint_quotas: HashMap<Address, (u8, u8)>,
    pub airdrop_quotas: HashMap<Address, (u8, u8)>,
    /// Token owners; ids absent here make `ownerOf` fail
    pub owners: HashMap<u64, Address>,

    pub events: Mutex<Vec<Event>>,
    pub contexts: Mutex<Vec<SigningContext>>,
    pub intents: Mutex<Vec<TransactionIntent>>,
}

impl Default for MockChain {
    fn default() -> Self {
        Self {
            chain_id: 1,
            nonce: 0,
            gas_price: 1,
            tx_hash: TxHash::repeat_byte(0xab),
            receipt_status: ReceiptStatus::Success,
            gas_used: 21_000,
            block_number: 1_000,
            fail_chain_id: false,
            fail_nonce: false,
            fail_gas_price: false,
            fail_transact: false,
            fail_receipt: false,
            lookups: Mutex::new(VecDeque::new()),
            default_lookup: TxLookup::Included,
            paused: false,
            phase: 0,
            total_supply: 0,
            owner: Address::ZERO,
            mint_quotas: HashMap::new(),
            airdrop_quotas: HashMap::new(),
            owners: HashMap::new(),
            events: Mutex::new(Vec::new()),
            contexts: Mutex::new(Vec::new()),
            intents: Mutex::new(Vec::new()),
        }
    }
}

impl MockChain {
    pub fn with_lookups(self, lookups: impl IntoIterator<Item = TxLookup>) -> Self {
        *self.lookups.lock().unwrap() = lookups.into_iter().map(Ok).collect();
        self
    }

    pub fn push_lookup_error(&self, msg: &str) {
        self.lookups
            .lock()
            .unwrap()
            .push_back(Err(Error::Rpc(msg.to_string())));
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }

    pub fn transacts(&self) -> usize {
        self.count(|e| matches!(e, Event::Transact(_)))
    }

    pub fn receipts(&self) -> usize {
        self.count(|e| matches!(e, Event::Receipt(_)))
    }

    pub fn lookups_made(&self) -> usize {
        self.count(|e| matches!(e, Event::Lookup(_)))
    }

    pub fn contexts(&self) -> Vec<SigningContext> {
        self.contexts.lock().unwrap().clone()
    }

    pub fn intents(&self) -> Vec<TransactionIntent> {
        self.intents.lock().unwrap().clone()
    }

    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    fn submitted(&self) -> u64 {
        self.contexts.lock().unwrap().len() as u64
    }
}

impl ChainFacts for MockChain {
    async fn chain_id(&self) -> Result<u64> {
        self.record(Event::ChainId);
        if self.fail_chain_id {
            return Err(Error::Rpc("chain id: connection refused".into()));
        }
        Ok(self.chain_id)
    }

    async fn nonce_at(&self, address: Address) -> Result<u64> {
        self.record(Event::Nonce(address));
        if self.fail_nonce {
            return Err(Error::Rpc("nonce: connection refused".into()));
        }
        // Every accepted transaction advances the account nonce
        Ok(self.nonce + self.submitted())
    }

    async fn suggest_gas_price(&self) -> Result<u128> {
        self.record(Event::GasPrice);
        if self.fail_gas_price {
            return Err(Error::Rpc("gas price: connection refused".into()));
        }
        Ok(self.gas_price)
    }

    async fn block_number(&self) -> Result<u64> {
        self.record(Event::BlockNumber);
        Ok(self.block_number)
    }

    async fn transaction_by_hash(&self, hash: TxHash) -> Result<TxLookup> {
        self.record(Event::Lookup(hash));
        self.lookups
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(self.default_lookup))
    }

    async fn transaction_receipt(&self, hash: TxHash) -> Result<Receipt> {
        self.record(Event::Receipt(hash));
        if self.fail_receipt {
            return Err(Error::Rpc("receipt: connection reset".into()));
        }
        Ok(Receipt {
            tx_hash: hash,
            status: self.receipt_status,
            gas_used: self.gas_used,
            block_number: Some(100),
        })
    }
}

impl ContractBinding for MockChain {
    async fn call(&self, _to: Address, data: Bytes, block: BlockContext) -> Result<Bytes> {
        let selector: [u8; 4] = data
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| Error::Rpc("short calldata".into()))?;

        let decode_err = |e: alloy::sol_types::Error| Error::Rpc(e.to_string());
        let (name, out) = if selector == ICar::pausedCall::SELECTOR {
            ("paused", ICar::pausedCall::abi_encode_returns(&self.paused))
        } else if selector == ICar::phaseCall::SELECTOR {
            ("phase", ICar::phaseCall::abi_encode_returns(&self.phase))
        } else if selector == ICar::ownerCall::SELECTOR {
            ("owner", ICar::ownerCall::abi_encode_returns(&self.owner))
        } else if selector == ICar::totalSupplyCall::SELECTOR {
            let supply = U256::from(self.total_supply);
            ("totalSupply", ICar::totalSupplyCall::abi_encode_returns(&supply))
        } else if selector == ICar::mintQuotaCall::SELECTOR {
            let call = ICar::mintQuotaCall::abi_decode(&data).map_err(decode_err)?;
            let (minted, cap) = self.mint_quotas.get(&call.addr).copied().unwrap_or_default();
            let ret = ICar::mintQuotaReturn { minted, cap };
            ("mintQuota", ICar::mintQuotaCall::abi_encode_returns(&ret))
        } else if selector == ICar::airdropQuotaCall::SELECTOR {
            let call = ICar::airdropQuotaCall::abi_decode(&data).map_err(decode_err)?;
            let (minted, cap) = self.airdrop_quotas.get(&call.addr).copied().unwrap_or_default();
            let ret = ICar::airdropQuotaReturn { minted, cap };
            ("airdropQuota", ICar::airdropQuotaCall::abi_encode_returns(&ret))
        } else if selector == ICar::ownerOfCall::SELECTOR {
            let call = ICar::ownerOfCall::abi_decode(&data).map_err(decode_err)?;
            self.record(Event::Call("ownerOf", block));
            let id: u64 = call.tokenId.to();
            let owner = self
                .owners
                .get(&id)
                .ok_or_else(|| Error::Rpc(format!("execution reverted: token {id}")))?;
            return Ok(Bytes::from(ICar::ownerOfCall::abi_encode_returns(owner)));
        } else {
            return Err(Error::Rpc("unknown selector".into()));
        };
        self.record(Event::Call(name, block));
        Ok(Bytes::from(out))
    }

    async fn transact(&self, ctx: &SigningContext, intent: &TransactionIntent) -> Result<TxHash> {
        self.record(Event::Transact(intent.method()));
        if self.fail_transact {
            return Err(Error::Submission("replacement transaction underpriced".into()));
        }
        self.contexts.lock().unwrap().push(ctx.clone());
        self.intents.lock().unwrap().push(intent.clone());
        Ok(self.tx_hash)
    }
}
