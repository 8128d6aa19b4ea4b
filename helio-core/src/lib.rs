//! # helio-core
//!
//! Offline building blocks for the helio ledger client: signing
//! identities, typed instructions, transaction assembly, and derived
//! addresses. Nothing in this crate touches the network.

pub mod error;
pub mod instruction;
pub mod keys;
pub mod pda;
pub mod transaction;

pub mod prelude {
    pub use crate::error::CoreError;
    pub use crate::instruction::{
        program_call, transfer, AccountMeta, Instruction, NATIVE_PROGRAM_ID,
    };
    pub use crate::keys::{Keypair, Pubkey, Signature};
    pub use crate::pda::{derive_address, find_derived_address};
    pub use crate::transaction::{
        BlockReference, Message, SignatureEntry, Transaction, UnsignedTransaction,
    };
}
