//! # helio-client
//!
//! Submission and confirmation client for a distributed ledger:
//! reliably hand a signed transaction to a network endpoint and wait
//! for it to reach a durable state, under network unreliability.
//!
//! The client is an explicitly constructed value with no process-global
//! connection behind it, so independent clients and tests can run
//! concurrently without interference.

pub mod client;
pub mod config;
pub mod confirm;
pub mod error;
pub mod http;
pub mod retry;
pub mod rpc;

pub mod prelude {
    pub use crate::client::SubmissionClient;
    pub use crate::config::{ClientConfig, ConfirmPolicy, RetryPolicy};
    pub use crate::confirm::{ConfirmationTracker, SubmissionResult, SubmissionStatus};
    pub use crate::error::ClientError;
    pub use crate::http::HttpRpc;
    pub use crate::retry::with_backoff;
    pub use crate::rpc::{AccountSnapshot, Commitment, LedgerRpc, SignatureStatus};
}
