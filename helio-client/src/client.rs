//! The submission client: an explicitly constructed handle, no
//! process-global connection.

use std::sync::Arc;

use helio_core::keys::{Pubkey, Signature};
use helio_core::transaction::{BlockReference, Transaction};
use tracing::debug;

use crate::config::{ClientConfig, ConfirmPolicy};
use crate::confirm::{ConfirmationTracker, SubmissionResult};
use crate::error::ClientError;
use crate::http::HttpRpc;
use crate::rpc::{AccountSnapshot, LedgerRpc};

/// Stateless handle for submitting transactions and reading ledger
/// state.
///
/// Cheap to clone and safe to share: concurrent submissions of
/// different transactions need no coordination. Confirmation polling
/// for a given signature stays single-owner: one tracker per
/// signature.
#[derive(Clone)]
pub struct SubmissionClient {
    rpc: Arc<dyn LedgerRpc>,
    confirm: ConfirmPolicy,
}

impl SubmissionClient {
    pub fn new(rpc: Arc<dyn LedgerRpc>) -> Self {
        Self {
            rpc,
            confirm: ConfirmPolicy::default(),
        }
    }

    pub fn with_confirm_policy(mut self, policy: ConfirmPolicy) -> Self {
        self.confirm = policy;
        self
    }

    /// HTTP client wired up from a config.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let rpc = HttpRpc::with_timeout(&config.endpoint, config.request_timeout())?;
        Ok(Self {
            rpc: Arc::new(rpc),
            confirm: config.confirm,
        })
    }

    pub fn confirm_policy(&self) -> ConfirmPolicy {
        self.confirm
    }

    /// Verify locally, then send.
    ///
    /// An under-signed transaction never reaches the network: the signer
    /// invariant is checked here and a violation errors with
    /// `MissingSigner` before any IO happens.
    pub async fn submit(&self, transaction: &Transaction) -> Result<Signature, ClientError> {
        transaction.verify()?;
        let wire_bytes = transaction.to_wire_bytes()?;
        let signature = self.rpc.send_transaction(&wire_bytes).await?;
        debug!(%signature, "transaction submitted");
        Ok(signature)
    }

    /// A tracker for `signature` under this client's confirm policy.
    pub fn tracker(&self, signature: Signature) -> ConfirmationTracker {
        ConfirmationTracker::new(Arc::clone(&self.rpc), signature, self.confirm)
    }

    /// Submit, then poll until the configured target commitment, a
    /// terminal state, or the attempt budget runs out.
    pub async fn submit_and_confirm(
        &self,
        transaction: &Transaction,
    ) -> Result<SubmissionResult, ClientError> {
        let signature = self.submit(transaction).await?;
        self.tracker(signature)
            .with_block_reference(transaction.message.recent_block_reference)
            .wait()
            .await
    }

    /// Test-network convenience; confirmation works exactly as for
    /// submitted transactions.
    pub async fn request_airdrop(
        &self,
        address: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, ClientError> {
        let signature = self.rpc.request_airdrop(address, lamports).await?;
        debug!(%signature, %address, lamports, "airdrop requested");
        Ok(signature)
    }

    pub async fn airdrop_and_confirm(
        &self,
        address: &Pubkey,
        lamports: u64,
    ) -> Result<SubmissionResult, ClientError> {
        let signature = self.request_airdrop(address, lamports).await?;
        self.tracker(signature).wait().await
    }

    pub async fn get_balance(&self, address: &Pubkey) -> Result<u64, ClientError> {
        self.rpc.get_balance(address).await
    }

    /// Fetch an account snapshot, or `AccountNotFound` if the address
    /// has never been allocated. No implicit retries: whether absence is
    /// transient is the caller's call.
    pub async fn fetch_account(&self, address: &Pubkey) -> Result<AccountSnapshot, ClientError> {
        self.rpc
            .get_account(address)
            .await?
            .ok_or(ClientError::AccountNotFound { address: *address })
    }

    pub async fn latest_block_reference(&self) -> Result<BlockReference, ClientError> {
        self.rpc.get_latest_block_reference().await
    }
}
