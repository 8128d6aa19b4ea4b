//! Error taxonomy for network interaction and confirmation.
//!
//! Use [`ClientError::is_transient`] to decide whether retrying the same
//! call can succeed. Local construction errors pass through unchanged as
//! `Core`, so callers keep the full picture in one type.

use helio_core::error::CoreError;
use helio_core::keys::{Pubkey, Signature};
use thiserror::Error;

use crate::confirm::SubmissionStatus;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure; the request may never have reached the
    /// network. Transient: retry, with a fresh block reference if a
    /// transaction was being submitted (the old one may have expired).
    #[error("Network error: {message}")]
    Network { message: String },

    /// The network validated the transaction and refused it. Terminal
    /// for this transaction; rebuild with fresh state before retrying.
    #[error("Rejected by network: {reason}")]
    Rejected { reason: String },

    /// The attempt budget ran out (or the block reference expired)
    /// before a terminal status was observed. The outcome is ambiguous:
    /// re-check the signature status out-of-band before resubmitting, or
    /// a duplicate submission may land.
    #[error("Confirmation timed out for {signature} (last status: {last_status})")]
    ConfirmationTimeout {
        signature: Signature,
        last_status: SubmissionStatus,
    },

    /// The address has never been allocated on the ledger. Expected
    /// absence; not necessarily an error to the caller.
    #[error("Account not found: {address}")]
    AccountNotFound { address: Pubkey },

    /// Local construction or validation failure, surfaced immediately
    /// and never retried.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ClientError {
    /// Whether retrying the same call can reasonably succeed.
    ///
    /// `ConfirmationTimeout` reports `false`: it is retryable only after
    /// an out-of-band status check, not blindly.
    pub fn is_transient(&self) -> bool {
        matches!(self, ClientError::Network { .. })
    }

    pub(crate) fn network(message: impl Into<String>) -> Self {
        ClientError::Network {
            message: message.into(),
        }
    }

    pub(crate) fn rejected(reason: impl Into<String>) -> Self {
        ClientError::Rejected {
            reason: reason.into(),
        }
    }
}
