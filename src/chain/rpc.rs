//! alloy HTTP implementation of the chain collaborators

use super::{BlockContext, ChainFacts, ContractBinding, TxLookup};
use crate::error::{Error, Result};
use crate::signer::Account;
use crate::types::{Receipt, SigningContext, TransactionIntent};
use alloy::eips::BlockId;
use alloy::network::{Ethereum, TransactionBuilder};
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::transports::http::reqwest::Url;
use std::sync::Arc;

/// Chain access over JSON-RPC
///
/// Built without the recommended fillers: nonce, gas price, gas limit and
/// chain id always come from the [`SigningContext`] the lifecycle manager
/// fetched right before submission. Only signing is delegated to the wallet.
#[derive(Clone)]
pub struct RpcChain {
    provider: Arc<dyn Provider<Ethereum>>,
    signer: Option<Address>,
}

impl RpcChain {
    /// Read-only connection; [`ContractBinding::transact`] will fail
    pub fn connect(url: Url) -> Self {
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .network::<Ethereum>()
            .connect_http(url);

        Self {
            provider: Arc::new(provider),
            signer: None,
        }
    }

    /// Connection that signs writes with `account`
    pub fn with_account(url: Url, account: &Account) -> Self {
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .network::<Ethereum>()
            .wallet(account.wallet())
            .connect_http(url);

        Self {
            provider: Arc::new(provider),
            signer: Some(account.address()),
        }
    }
}

impl ChainFacts for RpcChain {
    async fn chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| Error::rpc("Failed to get chain id", e))
    }

    async fn nonce_at(&self, address: Address) -> Result<u64> {
        self.provider
            .get_transaction_count(address)
            .block_id(BlockId::latest())
            .await
            .map_err(|e| Error::rpc("Failed to get nonce", e))
    }

    async fn suggest_gas_price(&self) -> Result<u128> {
        self.provider
            .get_gas_price()
            .await
            .map_err(|e| Error::rpc("Failed to get gas price", e))
    }

    async fn block_number(&self) -> Result<u64> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| Error::rpc("Failed to get block number", e))
    }

    async fn transaction_by_hash(&self, hash: TxHash) -> Result<TxLookup> {
        let tx = self
            .provider
            .get_transaction_by_hash(hash)
            .await
            .map_err(|e| Error::rpc("Failed to get transaction", e))?;

        Ok(match tx {
            None => TxLookup::NotFound,
            Some(tx) if tx.block_number.is_none() => TxLookup::Pending,
            Some(_) => TxLookup::Included,
        })
    }

    async fn transaction_receipt(&self, hash: TxHash) -> Result<Receipt> {
        let receipt = self
            .provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| Error::rpc("Failed to get transaction receipt", e))?
            .ok_or_else(|| Error::Rpc(format!("receipt not found for {hash}")))?;

        Ok(Receipt::from(&receipt))
    }
}

impl ContractBinding for RpcChain {
    async fn call(&self, to: Address, data: Bytes, block: BlockContext) -> Result<Bytes> {
        let block = match block {
            BlockContext::Latest => BlockId::latest(),
            BlockContext::Number(number) => BlockId::number(number),
        };

        self.provider
            .call(TransactionRequest::default().with_to(to).with_input(data))
            .block(block)
            .await
            .map_err(|e| Error::rpc("Failed to call contract", e))
    }

    async fn transact(&self, ctx: &SigningContext, intent: &TransactionIntent) -> Result<TxHash> {
        match self.signer {
            Some(signer) if signer == ctx.from => {}
            Some(signer) => {
                return Err(Error::Submission(format!(
                    "signing context is for {}, wallet holds {signer}",
                    ctx.from
                )))
            }
            None => return Err(Error::Submission("no signing account configured".to_string())),
        }

        let request = TransactionRequest::default()
            .with_from(ctx.from)
            .with_to(intent.contract())
            .with_input(intent.calldata())
            .with_value(ctx.value)
            .with_chain_id(ctx.chain_id)
            .with_nonce(ctx.nonce)
            .with_gas_price(ctx.gas_price)
            .with_gas_limit(ctx.gas_limit);

        // The wallet filler signs locally, then the raw transaction is broadcast
        let pending = self
            .provider
            .send_transaction(request)
            .await
            .map_err(|e| Error::submission(&format!("Failed to send {}", intent.method()), e))?;

        Ok(*pending.tx_hash())
    }
}
