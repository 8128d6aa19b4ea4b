//! Transaction lifecycle tracking from submission to a durable state.
//!
//! The state machine is `Submitted -> Pending -> {Confirmed ->
//! Finalized} | Failed`. One tracker owns one signature's polling;
//! running two trackers against the same signature only duplicates
//! network load. Dropping a [`ConfirmationTracker::wait`] future stops
//! the local polling and nothing else; the submission itself is
//! irrevocable once the network accepted it.

use std::fmt;
use std::sync::Arc;

use helio_core::keys::Signature;
use helio_core::transaction::BlockReference;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::ConfirmPolicy;
use crate::error::ClientError;
use crate::rpc::{Commitment, LedgerRpc, SignatureStatus};

/// Lifecycle of a submitted transaction.
///
/// Levels only ever advance; a lagging node answering behind the best
/// observation never regresses the tracked state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    /// Accepted for tracking; no status poll has answered yet.
    Submitted,
    /// The network has not (yet) reported a durable level.
    Pending,
    Confirmed,
    /// Irreversible under the network's consensus rules. Terminal.
    Finalized,
    /// The transaction executed and failed. Terminal.
    Failed { reason: String },
}

impl SubmissionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionStatus::Finalized | SubmissionStatus::Failed { .. }
        )
    }

    /// Whether this status counts as success for the given target level.
    pub fn satisfies(&self, target: Commitment) -> bool {
        match self {
            SubmissionStatus::Confirmed => {
                matches!(target, Commitment::Processed | Commitment::Confirmed)
            }
            SubmissionStatus::Finalized => true,
            _ => false,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SubmissionStatus::Submitted => 0,
            SubmissionStatus::Pending => 1,
            SubmissionStatus::Confirmed => 2,
            SubmissionStatus::Finalized => 3,
            SubmissionStatus::Failed { .. } => 4,
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionStatus::Submitted => f.write_str("submitted"),
            SubmissionStatus::Pending => f.write_str("pending"),
            SubmissionStatus::Confirmed => f.write_str("confirmed"),
            SubmissionStatus::Finalized => f.write_str("finalized"),
            SubmissionStatus::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

/// Outcome of tracking one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    pub signature: Signature,
    pub status: SubmissionStatus,
}

/// Polls one signature until it reaches a durable state.
pub struct ConfirmationTracker {
    rpc: Arc<dyn LedgerRpc>,
    signature: Signature,
    block_reference: Option<BlockReference>,
    policy: ConfirmPolicy,
    status: SubmissionStatus,
    attempts: u32,
}

impl ConfirmationTracker {
    pub fn new(rpc: Arc<dyn LedgerRpc>, signature: Signature, policy: ConfirmPolicy) -> Self {
        Self {
            rpc,
            signature,
            block_reference: None,
            policy,
            status: SubmissionStatus::Submitted,
            attempts: 0,
        }
    }

    /// Tell the tracker which block reference the transaction carries.
    ///
    /// When the reference leaves the network's validity window while the
    /// transaction is still pending, the outcome is ambiguous and the
    /// wait ends with `ConfirmationTimeout`, never silent success or
    /// failure.
    pub fn with_block_reference(mut self, reference: BlockReference) -> Self {
        self.block_reference = Some(reference);
        self
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// One status poll: advances the state, leaves it unchanged, or
    /// discovers a terminal failure.
    pub async fn poll_once(&mut self) -> Result<&SubmissionStatus, ClientError> {
        self.attempts += 1;
        let observed = self.rpc.get_signature_status(&self.signature).await?;
        let next = match observed {
            None => SubmissionStatus::Pending,
            Some(SignatureStatus {
                err: Some(reason), ..
            }) => SubmissionStatus::Failed { reason },
            Some(SignatureStatus {
                commitment: Commitment::Processed,
                ..
            }) => SubmissionStatus::Pending,
            Some(SignatureStatus {
                commitment: Commitment::Confirmed,
                ..
            }) => SubmissionStatus::Confirmed,
            Some(SignatureStatus {
                commitment: Commitment::Finalized,
                ..
            }) => SubmissionStatus::Finalized,
        };
        self.advance(next);
        Ok(&self.status)
    }

    fn advance(&mut self, next: SubmissionStatus) {
        if next.rank() > self.status.rank() {
            debug!(signature = %self.signature, from = %self.status, to = %next, "status advanced");
            self.status = next;
        }
    }

    /// Poll at the policy's interval until the target commitment, a
    /// terminal state, or the attempt budget is exhausted.
    ///
    /// Exceeding the budget errors with `ConfirmationTimeout` carrying
    /// the last known status: a distinct, recheck-then-retry outcome,
    /// not a `Failed`.
    pub async fn wait(mut self) -> Result<SubmissionResult, ClientError> {
        loop {
            self.poll_once().await?;
            let done = matches!(self.status, SubmissionStatus::Failed { .. })
                || self.status.satisfies(self.policy.target);
            if done {
                return Ok(SubmissionResult {
                    signature: self.signature,
                    status: self.status,
                });
            }

            if self.attempts >= self.policy.max_attempts {
                return Err(ClientError::ConfirmationTimeout {
                    signature: self.signature,
                    last_status: self.status,
                });
            }

            if let Some(reference) = &self.block_reference {
                match self.rpc.is_block_reference_valid(reference).await {
                    Ok(true) => {}
                    Ok(false) => {
                        warn!(signature = %self.signature, "block reference expired before confirmation");
                        return Err(ClientError::ConfirmationTimeout {
                            signature: self.signature,
                            last_status: self.status,
                        });
                    }
                    Err(err) if err.is_transient() => {
                        // Inconclusive probe; keep polling.
                        debug!(signature = %self.signature, error = %err, "reference validity probe failed");
                    }
                    Err(err) => return Err(err),
                }
            }

            sleep(self.policy.poll_interval()).await;
        }
    }
}
