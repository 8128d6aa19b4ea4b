//! Transaction assembly and signing.
//!
//! A [`Message`] bundles instructions with a recent block reference; its
//! canonical borsh encoding is the byte sequence every signer commits
//! to. Signing never mutates the instruction list, and a signed
//! [`Transaction`] can always be re-checked against the invariant that
//! every account marked as signer carries a valid signature.

use std::fmt;
use std::str::FromStr;

use base58::ToBase58;
use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::CoreError;
use crate::instruction::Instruction;
use crate::keys::{decode_bytes_32, Keypair, Pubkey, Signature};

/// Freshness token naming a recent ledger block.
///
/// The network only accepts transactions whose reference is still inside
/// its validity window, which bounds how long a signed transaction can
/// be replayed.
#[derive(Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct BlockReference(pub [u8; 32]);

impl fmt::Display for BlockReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_base58())
    }
}

impl fmt::Debug for BlockReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockReference({})", self.0.to_base58())
    }
}

impl FromStr for BlockReference {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_bytes_32(s).map(Self)
    }
}

/// The content that signatures commit to.
#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct Message {
    pub instructions: Vec<Instruction>,
    pub recent_block_reference: BlockReference,
}

impl Message {
    /// Canonical byte encoding; this is what gets signed.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        borsh::to_vec(self).map_err(|e| CoreError::MalformedTransaction {
            message: e.to_string(),
        })
    }

    /// Every distinct account marked as signer, in first-appearance
    /// order across all instructions.
    pub fn required_signers(&self) -> Vec<Pubkey> {
        let mut signers = Vec::new();
        for instruction in &self.instructions {
            for meta in &instruction.accounts {
                if meta.is_signer && !signers.contains(&meta.pubkey) {
                    signers.push(meta.pubkey);
                }
            }
        }
        signers
    }
}

/// An assembled, not-yet-signed transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct UnsignedTransaction {
    message: Message,
}

impl UnsignedTransaction {
    /// Bundle instructions with a freshness token into one atomic unit.
    pub fn assemble(
        instructions: Vec<Instruction>,
        recent_block_reference: BlockReference,
    ) -> Result<Self, CoreError> {
        if instructions.is_empty() {
            return Err(CoreError::EmptyTransaction);
        }
        Ok(Self {
            message: Message {
                instructions,
                recent_block_reference,
            },
        })
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Sign with the given keypairs.
    ///
    /// Every required signer must have a keypair present, or this errors
    /// with `MissingSigner` naming the first absent one. Surplus
    /// keypairs are ignored.
    pub fn sign(&self, keypairs: &[&Keypair]) -> Result<Transaction, CoreError> {
        let message_bytes = self.message.to_bytes()?;
        let mut signatures = Vec::new();
        for signer in self.message.required_signers() {
            let keypair = keypairs
                .iter()
                .find(|kp| kp.pubkey() == signer)
                .ok_or(CoreError::MissingSigner { signer })?;
            signatures.push(SignatureEntry {
                signer,
                signature: keypair.sign(&message_bytes),
            });
        }
        Ok(Transaction {
            message: self.message.clone(),
            signatures,
        })
    }
}

/// One signer's signature over the message bytes.
#[derive(Debug, Clone, Copy, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct SignatureEntry {
    pub signer: Pubkey,
    pub signature: Signature,
}

/// A fully signed transaction, ready for submission.
#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct Transaction {
    pub message: Message,
    pub signatures: Vec<SignatureEntry>,
}

impl Transaction {
    /// Check the signer invariant: every account marked as signer has a
    /// signature that verifies against the canonical message bytes.
    pub fn verify(&self) -> Result<(), CoreError> {
        let message_bytes = self.message.to_bytes()?;
        for required in self.message.required_signers() {
            let entry = self
                .signatures
                .iter()
                .find(|e| e.signer == required)
                .ok_or(CoreError::MissingSigner { signer: required })?;
            if !required.verify(&message_bytes, &entry.signature) {
                return Err(CoreError::InvalidSignature { signer: required });
            }
        }
        Ok(())
    }

    /// The signer set carried by this transaction, in signature order.
    pub fn signers(&self) -> Vec<Pubkey> {
        self.signatures.iter().map(|e| e.signer).collect()
    }

    /// The first signature, under which the network tracks the
    /// transaction.
    pub fn primary_signature(&self) -> Option<&Signature> {
        self.signatures.first().map(|e| &e.signature)
    }

    pub fn to_wire_bytes(&self) -> Result<Vec<u8>, CoreError> {
        borsh::to_vec(self).map_err(|e| CoreError::MalformedTransaction {
            message: e.to_string(),
        })
    }

    pub fn from_wire_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        borsh::from_slice(bytes).map_err(|e| CoreError::MalformedTransaction {
            message: e.to_string(),
        })
    }
}
