//! Typed instruction construction.
//!
//! An [`Instruction`] names a program, the accounts it touches, and an
//! opaque payload. Builders validate parameters up front and perform no
//! IO; the wire encoding of the payload is a fixed contract with the
//! network.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::CoreError;
use crate::keys::Pubkey;

/// The native program that owns plain value accounts.
pub const NATIVE_PROGRAM_ID: Pubkey = Pubkey::new([0u8; 32]);

/// How an instruction touches one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn writable(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    pub fn readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

/// A single operation addressed to one program. Immutable once built.
#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

/// Payload of the native program.
#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub enum NativeInstruction {
    Transfer { lamports: u64 },
}

/// Move `lamports` from `from` to `to`.
///
/// `from` signs; both accounts are written. Errors with
/// `InvalidParameters` for a zero amount or a self-transfer.
pub fn transfer(from: Pubkey, to: Pubkey, lamports: u64) -> Result<Instruction, CoreError> {
    if lamports == 0 {
        return Err(CoreError::invalid_parameters(
            "transfer amount must be positive",
        ));
    }
    if from == to {
        return Err(CoreError::invalid_parameters(
            "transfer source and destination are the same account",
        ));
    }
    let data = encode_native(&NativeInstruction::Transfer { lamports })?;
    Ok(Instruction {
        program_id: NATIVE_PROGRAM_ID,
        accounts: vec![
            AccountMeta::writable(from, true),
            AccountMeta::writable(to, false),
        ],
        data,
    })
}

/// Invoke a deployed program's entrypoint with an opaque payload.
///
/// A call must name at least one account; which of them sign or get
/// written is up to the caller and the target program's interface.
pub fn program_call(
    program_id: Pubkey,
    accounts: Vec<AccountMeta>,
    data: Vec<u8>,
) -> Result<Instruction, CoreError> {
    if accounts.is_empty() {
        return Err(CoreError::invalid_parameters(
            "a program call must name at least one account",
        ));
    }
    Ok(Instruction {
        program_id,
        accounts,
        data,
    })
}

fn encode_native(payload: &NativeInstruction) -> Result<Vec<u8>, CoreError> {
    borsh::to_vec(payload).map_err(|e| CoreError::invalid_parameters(e.to_string()))
}
