//! The network seam: the minimal remote-procedure surface the client
//! depends on.
//!
//! The wire encoding behind these calls is a fixed, versioned contract
//! defined by the network. [`LedgerRpc`] exists so the submission client
//! and the confirmation tracker can be exercised against an in-memory
//! ledger in tests.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use helio_core::keys::{Pubkey, Signature};
use helio_core::transaction::BlockReference;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Durability levels reported by the network, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        };
        f.write_str(s)
    }
}

impl FromStr for Commitment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processed" => Ok(Commitment::Processed),
            "confirmed" => Ok(Commitment::Confirmed),
            "finalized" => Ok(Commitment::Finalized),
            other => Err(format!(
                "unknown commitment '{other}' (expected processed|confirmed|finalized)"
            )),
        }
    }
}

/// One `getSignatureStatus` answer for a signature the network knows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureStatus {
    pub commitment: Commitment,
    /// Execution error, when the transaction ran and failed.
    #[serde(default)]
    pub err: Option<String>,
}

/// Read-only view of an account at fetch time.
///
/// Never cached: a snapshot is stale the moment it is produced, and the
/// caller must assume so.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSnapshot {
    pub owner: Pubkey,
    pub lamports: u64,
    pub data: Vec<u8>,
}

/// The remote procedures the client relies on.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Submit serialized signed-transaction bytes. Returns the signature
    /// under which the network tracks the transaction.
    async fn send_transaction(&self, wire_bytes: &[u8]) -> Result<Signature, ClientError>;

    /// `None` means the network has not seen the signature (yet).
    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<SignatureStatus>, ClientError>;

    async fn get_balance(&self, address: &Pubkey) -> Result<u64, ClientError>;

    /// `None` when the address has never been allocated.
    async fn get_account(&self, address: &Pubkey)
        -> Result<Option<AccountSnapshot>, ClientError>;

    /// Test-network convenience; confirmation works exactly as for
    /// submitted transactions.
    async fn request_airdrop(
        &self,
        address: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, ClientError>;

    async fn get_latest_block_reference(&self) -> Result<BlockReference, ClientError>;

    /// Whether the reference is still inside the network's validity
    /// window.
    async fn is_block_reference_valid(
        &self,
        reference: &BlockReference,
    ) -> Result<bool, ClientError>;
}
