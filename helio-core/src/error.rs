//! Structured error types for transaction construction and signing.
//!
//! Everything here is a local failure: the caller either supplied bad
//! parameters or left a required signer out. Network-facing errors live
//! in the client crate.

use thiserror::Error;

use crate::keys::Pubkey;

/// Error type for offline construction and validation.
///
/// `InvalidParameters` is always recoverable by correcting the input;
/// `EmptyTransaction` and `MissingSigner` indicate a construction bug in
/// the caller.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Caller-supplied parameters failed local validation.
    #[error("Invalid parameters: {message}")]
    InvalidParameters { message: String },

    /// A transaction must carry at least one instruction.
    #[error("Transaction has no instructions")]
    EmptyTransaction,

    /// An account marked as signer has no matching keypair or signature.
    #[error("Missing signer: {signer}")]
    MissingSigner { signer: Pubkey },

    /// A carried signature does not verify against the message bytes.
    #[error("Invalid signature for signer {signer}")]
    InvalidSignature { signer: Pubkey },

    /// Key material could not be decoded.
    #[error("Invalid key: {message}")]
    InvalidKey { message: String },

    /// Transaction bytes could not be encoded or decoded.
    #[error("Malformed transaction: {message}")]
    MalformedTransaction { message: String },
}

impl CoreError {
    /// Shorthand for the most common local validation failure.
    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        CoreError::InvalidParameters {
            message: message.into(),
        }
    }
}
