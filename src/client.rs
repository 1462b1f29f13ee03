//! CarClient - main entry point for the SDK

use crate::chain::{BlockContext, ChainFacts, ContractBinding, RpcChain};
use crate::config::Config;
use crate::contracts::ICar;
use crate::error::{Error, Result};
use crate::signer::Account;
use crate::tx::{until_cancelled, PollSettings, TxManager};
use crate::types::{Phase, Quota, Receipt, TransactionIntent, WriteCall};
use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Concurrent `ownerOf` calls while taking a snapshot
const SNAPSHOT_CONCURRENCY: usize = 8;

/// Client for the CyberCar NFT contract
///
/// Reads go straight to the contract binding. Writes go through a
/// [`TxManager`] and only return once the transaction is final.
pub struct CarClient<C> {
    chain: Arc<C>,
    contract: Address,
    tx: Option<TxManager<C>>,
}

impl CarClient<RpcChain> {
    /// Read-only client for the configured contract
    pub fn connect(config: &Config) -> Result<Self> {
        let chain = RpcChain::connect(config.rpc_url()?);
        Ok(Self::new(Arc::new(chain), config.contract_address()?))
    }

    /// Client that signs writes with the configured mnemonic account
    pub fn connect_with_account(config: &Config) -> Result<Self> {
        let account = Account::from_mnemonic_file(&config.mnemonic, config.account)?;
        tracing::info!(address = %account.address(), index = account.index(), "wallet initialized");

        let chain = Arc::new(RpcChain::with_account(config.rpc_url()?, &account));
        let settings = PollSettings::from(&config.confirmation);
        Ok(Self::new(chain, config.contract_address()?).with_signer(account.address(), settings))
    }
}

impl<C: ChainFacts + ContractBinding> CarClient<C> {
    pub fn new(chain: Arc<C>, contract: Address) -> Self {
        Self {
            chain,
            contract,
            tx: None,
        }
    }

    /// Enable writes sent from `from`
    pub fn with_signer(mut self, from: Address, settings: PollSettings) -> Self {
        let span = tracing::info_span!("tx", %from, contract = %self.contract);
        self.tx = Some(TxManager::new(self.chain.clone(), from, span).with_settings(settings));
        self
    }

    /// Contract address
    pub fn contract(&self) -> Address {
        self.contract
    }

    /// Sending account, when writes are enabled
    pub fn signer(&self) -> Option<Address> {
        self.tx.as_ref().map(|tx| tx.from())
    }

    // ========== Queries ==========

    /// Whitelist mint quota of `owner`
    pub async fn mint_quota(&self, owner: Address, cancel: &CancellationToken) -> Result<Quota> {
        let ret = self
            .view(ICar::mintQuotaCall { addr: owner }, BlockContext::Latest, cancel)
            .await?;
        Ok(Quota {
            minted: ret.minted,
            cap: ret.cap,
        })
    }

    /// Airdrop quota of `owner`
    pub async fn airdrop_quota(&self, owner: Address, cancel: &CancellationToken) -> Result<Quota> {
        let ret = self
            .view(ICar::airdropQuotaCall { addr: owner }, BlockContext::Latest, cancel)
            .await?;
        Ok(Quota {
            minted: ret.minted,
            cap: ret.cap,
        })
    }

    pub async fn paused(&self, cancel: &CancellationToken) -> Result<bool> {
        self.view(ICar::pausedCall {}, BlockContext::Latest, cancel)
            .await
    }

    pub async fn phase(&self, cancel: &CancellationToken) -> Result<Phase> {
        let phase = self
            .view(ICar::phaseCall {}, BlockContext::Latest, cancel)
            .await?;
        Ok(Phase(phase))
    }

    /// Contract owner
    pub async fn owner(&self, cancel: &CancellationToken) -> Result<Address> {
        self.view(ICar::ownerCall {}, BlockContext::Latest, cancel)
            .await
    }

    pub async fn total_supply(
        &self,
        block: BlockContext,
        cancel: &CancellationToken,
    ) -> Result<U256> {
        self.view(ICar::totalSupplyCall {}, block, cancel).await
    }

    pub async fn owner_of(
        &self,
        token_id: U256,
        block: BlockContext,
        cancel: &CancellationToken,
    ) -> Result<Address> {
        self.view(ICar::ownerOfCall { tokenId: token_id }, block, cancel)
            .await
    }

    /// Owner of every token `1..=totalSupply` at `block`.
    ///
    /// [`BlockContext::Latest`] is resolved to a block number first so every
    /// call reads the same state. Tokens whose `ownerOf` call fails (e.g.
    /// burned) are skipped.
    pub async fn snapshot(
        &self,
        block: BlockContext,
        cancel: &CancellationToken,
    ) -> Result<Vec<(U256, Address)>> {
        let block = match block {
            BlockContext::Latest => {
                BlockContext::Number(until_cancelled(cancel, self.chain.block_number()).await?)
            }
            pinned => pinned,
        };
        let total = self.total_supply(block, cancel).await?;
        let total: u64 = total
            .try_into()
            .map_err(|_| Error::Rpc(format!("total supply {total} out of range")))?;
        tracing::info!(total, ?block, "taking snapshot");

        let results: Vec<(U256, Result<Address>)> = stream::iter(1..=total)
            .map(|id| async move {
                let id = U256::from(id);
                (id, self.owner_of(id, block, cancel).await)
            })
            .buffered(SNAPSHOT_CONCURRENCY)
            .collect()
            .await;

        let mut owners = Vec::with_capacity(results.len());
        for (id, owner) in results {
            match owner {
                Ok(owner) => owners.push((id, owner)),
                Err(Error::Cancelled) => return Err(Error::Cancelled),
                Err(e) => tracing::warn!(token_id = %id, "skipping token: {e}"),
            }
        }
        Ok(owners)
    }

    // ========== Admin Operations ==========

    /// Grant each address `amount` whitelist mints
    pub async fn add_whitelist(
        &self,
        addrs: Vec<Address>,
        amount: u8,
        cancel: &CancellationToken,
    ) -> Result<Receipt> {
        check_list("addWhitelist", &addrs)?;
        self.execute(WriteCall::AddWhitelist { addrs, amount }, cancel)
            .await
    }

    /// Grant each address `amount` airdrop claims
    pub async fn add_airdrop(
        &self,
        addrs: Vec<Address>,
        amount: u8,
        cancel: &CancellationToken,
    ) -> Result<Receipt> {
        check_list("addAirdrop", &addrs)?;
        self.execute(WriteCall::AddAirdrop { addrs, amount }, cancel)
            .await
    }

    /// Grant each address `amount` reserved tokens
    pub async fn add_reserve(
        &self,
        addrs: Vec<Address>,
        amount: u8,
        cancel: &CancellationToken,
    ) -> Result<Receipt> {
        check_list("addReserve", &addrs)?;
        self.execute(WriteCall::AddReserve { addrs, amount }, cancel)
            .await
    }

    /// Pause the contract.
    ///
    /// Returns `None` without sending anything if it is already paused.
    pub async fn pause(&self, cancel: &CancellationToken) -> Result<Option<Receipt>> {
        self.set_paused(true, cancel).await
    }

    /// Unpause the contract.
    ///
    /// Returns `None` without sending anything if it is not paused.
    pub async fn unpause(&self, cancel: &CancellationToken) -> Result<Option<Receipt>> {
        self.set_paused(false, cancel).await
    }

    pub async fn set_phase(&self, phase: Phase, cancel: &CancellationToken) -> Result<Receipt> {
        self.execute(WriteCall::SetPhase(phase), cancel).await
    }

    async fn set_paused(&self, target: bool, cancel: &CancellationToken) -> Result<Option<Receipt>> {
        // Fail before the read when writes are not enabled
        self.manager()?;

        let paused = self.paused(cancel).await.inspect_err(|e| {
            tracing::error!("check paused error: {e}");
        })?;
        if paused == target {
            tracing::info!(paused, "already in requested state, nothing to send");
            return Ok(None);
        }

        let call = if target {
            WriteCall::Pause
        } else {
            WriteCall::Unpause
        };
        self.execute(call, cancel).await.map(Some)
    }

    async fn execute(&self, call: WriteCall, cancel: &CancellationToken) -> Result<Receipt> {
        let tx = self.manager()?;
        let intent = TransactionIntent::new(self.contract, call);
        tx.execute(&intent, cancel).await
    }

    fn manager(&self) -> Result<&TxManager<C>> {
        self.tx
            .as_ref()
            .ok_or_else(|| Error::config("no signing account configured"))
    }

    async fn view<T: SolCall>(
        &self,
        call: T,
        block: BlockContext,
        cancel: &CancellationToken,
    ) -> Result<T::Return> {
        let data = Bytes::from(call.abi_encode());
        let out = until_cancelled(cancel, self.chain.call(self.contract, data, block)).await?;
        T::abi_decode_returns(&out).map_err(|e| Error::rpc(&format!("Failed to decode {}", T::SIGNATURE), e))
    }
}

fn check_list(method: &str, addrs: &[Address]) -> Result<()> {
    if addrs.is_empty() {
        return Err(Error::config(format!("{method}: address list is empty")));
    }
    for addr in addrs {
        tracing::info!("{method} for {addr}");
    }
    Ok(())
}
