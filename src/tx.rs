//! Transaction lifecycle manager
//!
//! Drives one write call from parameter acquisition to a final receipt:
//!
//! ```text
//! Building -> Signed -> Broadcast -> Pending -> Confirmed | Reverted | Dropped | Cancelled | Errored
//! ```
//!
//! Chain id, nonce and gas price are fetched fresh for every submission and
//! never cached. The pending loop sleeps one poll interval between lookups.
//! Every chain interaction races the caller's [`CancellationToken`].

use crate::chain::{ChainFacts, ContractBinding, TxLookup};
use crate::config::ConfirmationConfig;
use crate::constants::{DEFAULT_DROP_AFTER_MISSES, DEFAULT_POLL_INTERVAL, GAS_LIMIT};
use crate::error::{Error, Result};
use crate::types::{Receipt, SigningContext, TransactionIntent, TxState};
use alloy::primitives::{Address, TxHash, U256};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::Span;

/// Confirmation polling behaviour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSettings {
    /// Delay between transaction lookups
    pub interval: Duration,
    /// Stop waiting after this long; `None` waits until cancelled
    pub max_wait: Option<Duration>,
    /// Consecutive "not found" lookups before giving up; 0 never gives up
    pub drop_after_misses: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_wait: None,
            drop_after_misses: DEFAULT_DROP_AFTER_MISSES,
        }
    }
}

impl From<&ConfirmationConfig> for PollSettings {
    fn from(config: &ConfirmationConfig) -> Self {
        Self {
            interval: config.poll_interval(),
            max_wait: config.max_wait(),
            drop_after_misses: config.drop_after_misses,
        }
    }
}

/// A broadcast transaction awaiting confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmittedTransaction {
    pub hash: TxHash,
    pub submitted_at: Instant,
}

/// Runs write calls from one account through their full lifecycle.
///
/// Submissions are serial: the manager holds no nonce state, so running two
/// lifecycles for the same account concurrently may collide on a nonce.
pub struct TxManager<C> {
    chain: Arc<C>,
    from: Address,
    settings: PollSettings,
    span: Span,
}

impl<C: ChainFacts> TxManager<C> {
    /// Create a manager sending from `from`; events are recorded under `span`
    pub fn new(chain: Arc<C>, from: Address, span: Span) -> Self {
        Self {
            chain,
            from,
            settings: PollSettings::default(),
            span,
        }
    }

    pub fn with_settings(mut self, settings: PollSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sending account
    pub fn from(&self) -> Address {
        self.from
    }

    /// Run one transaction: build the signing context, hand it to `broadcast`,
    /// then wait for the receipt.
    ///
    /// Returns the receipt only when its status is success. A reverted
    /// receipt becomes [`Error::Reverted`].
    pub async fn run<F, Fut>(
        &self,
        label: &str,
        cancel: &CancellationToken,
        broadcast: F,
    ) -> Result<Receipt>
    where
        F: FnOnce(SigningContext) -> Fut,
        Fut: Future<Output = Result<TxHash>>,
    {
        self.transition(label, None, TxState::Building);
        let ctx = self
            .signing_context(cancel)
            .await
            .inspect_err(|e| self.abort(label, None, e))?;
        self.transition(label, None, TxState::Signed);

        let submitted = self
            .broadcast(ctx, cancel, broadcast)
            .await
            .inspect_err(|e| self.abort(label, None, e))?;
        self.transition(label, Some(submitted.hash), TxState::Broadcast);
        tracing::info!(parent: &self.span, method = label, hash = %submitted.hash, "transaction sent");

        let receipt = self
            .wait_for_receipt(&submitted, cancel)
            .await
            .inspect_err(|e| self.abort(label, Some(submitted.hash), e))?;

        self.settle(label, &submitted, receipt)
    }

    /// Acquire chain id, nonce and gas price, in that order, each fresh
    pub async fn signing_context(&self, cancel: &CancellationToken) -> Result<SigningContext> {
        let chain_id = until_cancelled(cancel, self.chain.chain_id()).await?;
        let nonce = until_cancelled(cancel, self.chain.nonce_at(self.from)).await?;
        let gas_price = until_cancelled(cancel, self.chain.suggest_gas_price()).await?;

        tracing::debug!(parent: &self.span, chain_id, nonce, gas_price, "acquired chain facts");

        Ok(SigningContext {
            from: self.from,
            chain_id,
            nonce,
            gas_price,
            gas_limit: GAS_LIMIT,
            value: U256::ZERO,
        })
    }

    async fn broadcast<F, Fut>(
        &self,
        ctx: SigningContext,
        cancel: &CancellationToken,
        broadcast: F,
    ) -> Result<SubmittedTransaction>
    where
        F: FnOnce(SigningContext) -> Fut,
        Fut: Future<Output = Result<TxHash>>,
    {
        let hash = until_cancelled(cancel, broadcast(ctx))
            .await
            .map_err(|e| match e {
                Error::Submission(_) | Error::Cancelled => e,
                other => Error::Submission(other.to_string()),
            })?;

        Ok(SubmittedTransaction {
            hash,
            submitted_at: Instant::now(),
        })
    }

    /// Poll until the transaction leaves the pending state, then fetch its receipt.
    ///
    /// The receipt is returned whatever its status.
    pub async fn wait_for_receipt(
        &self,
        submitted: &SubmittedTransaction,
        cancel: &CancellationToken,
    ) -> Result<Receipt> {
        let hash = submitted.hash;
        tracing::debug!(parent: &self.span, %hash, state = %TxState::Pending, "transaction state");

        let mut misses = 0u32;
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                _ = tokio::time::sleep(self.settings.interval) => {}
            }

            if let Some(max_wait) = self.settings.max_wait {
                let waited = submitted.submitted_at.elapsed();
                if waited >= max_wait {
                    return Err(Error::Timeout { hash, waited });
                }
            }

            match until_cancelled(cancel, self.chain.transaction_by_hash(hash)).await? {
                TxLookup::Pending => {
                    misses = 0;
                    tracing::trace!(parent: &self.span, %hash, "still pending");
                }
                TxLookup::Included => break,
                TxLookup::NotFound => {
                    misses += 1;
                    tracing::debug!(parent: &self.span, %hash, misses, "transaction not found");
                    if self.settings.drop_after_misses > 0
                        && misses >= self.settings.drop_after_misses
                    {
                        return Err(Error::Dropped { hash });
                    }
                }
            }
        }

        until_cancelled(cancel, self.chain.transaction_receipt(hash)).await
    }

    fn settle(
        &self,
        label: &str,
        submitted: &SubmittedTransaction,
        receipt: Receipt,
    ) -> Result<Receipt> {
        let hash = submitted.hash;
        if receipt.is_success() {
            self.transition(label, Some(hash), TxState::Confirmed);
            tracing::info!(
                parent: &self.span,
                method = label,
                %hash,
                gas_used = receipt.gas_used,
                block = ?receipt.block_number,
                elapsed = ?submitted.submitted_at.elapsed(),
                "transaction confirmed"
            );
            Ok(receipt)
        } else {
            self.transition(label, Some(hash), TxState::Reverted);
            tracing::warn!(parent: &self.span, method = label, %hash, gas_used = receipt.gas_used, "transaction reverted");
            Err(Error::Reverted { hash })
        }
    }

    fn abort(&self, label: &str, hash: Option<TxHash>, err: &Error) {
        let state = match err {
            Error::Cancelled => TxState::Cancelled,
            Error::Dropped { .. } => TxState::Dropped,
            _ => TxState::Errored,
        };
        self.transition(label, hash, state);
        tracing::error!(parent: &self.span, method = label, hash = ?hash, "{err}");
    }

    fn transition(&self, label: &str, hash: Option<TxHash>, state: TxState) {
        tracing::debug!(parent: &self.span, method = label, hash = ?hash, %state, "transaction state");
    }
}

impl<C: ChainFacts + ContractBinding> TxManager<C> {
    /// Sign and submit `intent` through the contract binding and wait for it
    pub async fn execute(
        &self,
        intent: &TransactionIntent,
        cancel: &CancellationToken,
    ) -> Result<Receipt> {
        let chain = &self.chain;
        self.run(intent.method(), cancel, |ctx| async move {
            chain.transact(&ctx, intent).await
        })
        .await
    }
}

/// Resolve `fut` unless `cancel` fires first
pub(crate) async fn until_cancelled<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        res = fut => res,
    }
}
