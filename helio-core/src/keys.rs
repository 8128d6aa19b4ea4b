//! Signing identities: public keys, signatures, keypairs.
//!
//! A `Keypair` wraps an ed25519 signing key. The secret half is owned
//! exclusively by the caller and never appears in `Debug` output, so a
//! keypair can be logged without leaking material.

use std::fmt;
use std::str::FromStr;

use base58::{FromBase58, ToBase58};
use borsh::{BorshDeserialize, BorshSerialize};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::CoreError;

/// Length in bytes of a public key / account address.
pub const PUBKEY_LEN: usize = 32;
/// Length in bytes of an ed25519 signature.
pub const SIGNATURE_LEN: usize = 64;
/// Length in bytes of a serialized keypair (secret seed ‖ public key).
pub const KEYPAIR_LEN: usize = 64;

/// A 32-byte account address, displayed as base58.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, BorshSerialize, BorshDeserialize,
)]
pub struct Pubkey([u8; PUBKEY_LEN]);

impl Pubkey {
    pub const fn new(bytes: [u8; PUBKEY_LEN]) -> Self {
        Self(bytes)
    }

    pub const fn to_bytes(self) -> [u8; PUBKEY_LEN] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; PUBKEY_LEN] {
        &self.0
    }

    /// Decode from base58, or from 64 hex chars (with optional `0x`).
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        decode_bytes_32(input).map(Self)
    }

    /// Whether these bytes decode as an ed25519 curve point.
    ///
    /// Addresses produced by [`crate::pda::find_derived_address`] are
    /// guaranteed not to, so no private key can ever sign for them.
    pub fn is_on_curve(&self) -> bool {
        VerifyingKey::from_bytes(&self.0).is_ok()
    }

    /// Verify `signature` over `message` against this key.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        let Ok(key) = VerifyingKey::from_bytes(&self.0) else {
            return false;
        };
        let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
        key.verify_strict(message, &sig).is_ok()
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_base58())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({})", self.0.to_base58())
    }
}

impl FromStr for Pubkey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A 64-byte ed25519 signature, displayed as base58.
#[derive(Clone, Copy, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize)]
pub struct Signature([u8; SIGNATURE_LEN]);

impl Signature {
    pub const fn new(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    pub const fn to_bytes(self) -> [u8; SIGNATURE_LEN] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    /// Decode from base58.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let bytes = input.from_base58().map_err(|_| CoreError::InvalidKey {
            message: format!("'{input}' is not valid base58"),
        })?;
        let arr: [u8; SIGNATURE_LEN] =
            bytes.try_into().map_err(|v: Vec<u8>| CoreError::InvalidKey {
                message: format!("signature decoded to {} bytes, expected {SIGNATURE_LEN}", v.len()),
            })?;
        Ok(Self(arr))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_base58())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.0.to_base58())
    }
}

impl FromStr for Signature {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// An ed25519 keypair: the signing identity behind an account.
#[derive(Clone)]
pub struct Keypair {
    signing: SigningKey,
}

impl Keypair {
    /// Generate a fresh keypair from the system RNG.
    pub fn generate() -> Self {
        let mut seed = [0u8; 32];
        OsRng.fill_bytes(&mut seed);
        Self::from_seed(seed)
    }

    /// Deterministic construction from a 32-byte secret seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing: SigningKey::from_bytes(&seed),
        }
    }

    /// Reconstruct from the 64-byte serialized form (seed ‖ public key).
    ///
    /// Rejects input whose public half does not match the secret half,
    /// which catches corrupted or truncated wallet files early.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        if bytes.len() != KEYPAIR_LEN {
            return Err(CoreError::InvalidKey {
                message: format!("keypair is {} bytes, expected {KEYPAIR_LEN}", bytes.len()),
            });
        }
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&bytes[..32]);
        let keypair = Self::from_seed(seed);
        if keypair.pubkey().as_bytes() != &bytes[32..] {
            return Err(CoreError::InvalidKey {
                message: "public key half does not match the secret half".to_string(),
            });
        }
        Ok(keypair)
    }

    /// Serialize as seed ‖ public key.
    pub fn to_bytes(&self) -> [u8; KEYPAIR_LEN] {
        let mut out = [0u8; KEYPAIR_LEN];
        out[..32].copy_from_slice(&self.signing.to_bytes());
        out[32..].copy_from_slice(self.pubkey().as_bytes());
        out
    }

    pub fn pubkey(&self) -> Pubkey {
        Pubkey(self.signing.verifying_key().to_bytes())
    }

    /// Sign `message`. ed25519 signing is deterministic: the same keypair
    /// and message always yield the same signature bytes.
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.signing.sign(message).to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Public key only. The secret never reaches logs.
        write!(f, "Keypair({})", self.pubkey())
    }
}

/// Decode a 32-byte value from base58 or hex.
pub(crate) fn decode_bytes_32(input: &str) -> Result<[u8; PUBKEY_LEN], CoreError> {
    if let Ok(bytes) = input.from_base58() {
        if bytes.len() == PUBKEY_LEN {
            let mut arr = [0u8; PUBKEY_LEN];
            arr.copy_from_slice(&bytes);
            return Ok(arr);
        }
    }

    let hex = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    if hex.len() == PUBKEY_LEN * 2 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        let mut arr = [0u8; PUBKEY_LEN];
        for (i, byte) in arr.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[2 * i..2 * i + 2], 16).map_err(|e| {
                CoreError::InvalidKey {
                    message: format!("invalid hex at position {}: {e}", 2 * i),
                }
            })?;
        }
        return Ok(arr);
    }

    Err(CoreError::InvalidKey {
        message: format!("'{input}' is neither 32-byte base58 nor 64 hex chars"),
    })
}
