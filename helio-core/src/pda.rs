//! Derived addresses: deterministic, keyless account addresses.
//!
//! A program can own accounts at addresses computed from seeds plus its
//! own id. The derivation is a pure function over its inputs, with no
//! dependency on cluster configuration, and [`find_derived_address`]
//! only returns addresses that do not lie on the ed25519 curve, so no
//! private key can ever sign for them.

use sha2::{Digest, Sha256};

use crate::error::CoreError;
use crate::keys::Pubkey;

/// Upper bound on the number of seeds in one derivation.
pub const MAX_SEEDS: usize = 16;
/// Upper bound on the byte length of a single seed.
pub const MAX_SEED_LEN: usize = 32;

// Domain separator: keeps derived addresses out of the plain-key space.
const DERIVED_ADDRESS_MARKER: &[u8] = b"HelioDerivedAddress";

/// Derive the address for `seeds` + `bump` under `program_id`.
///
/// The bump byte lets callers step off the curve; most callers want
/// [`find_derived_address`] instead.
pub fn derive_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
    bump: u8,
) -> Result<Pubkey, CoreError> {
    validate_seeds(seeds)?;
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update([bump]);
    hasher.update(program_id.as_bytes());
    hasher.update(DERIVED_ADDRESS_MARKER);
    Ok(Pubkey::new(hasher.finalize().into()))
}

/// Find the highest bump whose derived address has no corresponding
/// private key, and return both.
///
/// Statistically about half of all candidates are off-curve, so the
/// search terminates almost immediately; exhausting all 256 bumps is
/// reported as `InvalidParameters` rather than looping forever.
pub fn find_derived_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), CoreError> {
    validate_seeds(seeds)?;
    for bump in (0..=255u8).rev() {
        let candidate = derive_address(seeds, program_id, bump)?;
        if !candidate.is_on_curve() {
            return Ok((candidate, bump));
        }
    }
    Err(CoreError::invalid_parameters(
        "no off-curve address exists for the given seeds",
    ))
}

fn validate_seeds(seeds: &[&[u8]]) -> Result<(), CoreError> {
    if seeds.len() > MAX_SEEDS {
        return Err(CoreError::invalid_parameters(format!(
            "{} seeds given, maximum is {MAX_SEEDS}",
            seeds.len()
        )));
    }
    for (index, seed) in seeds.iter().enumerate() {
        if seed.len() > MAX_SEED_LEN {
            return Err(CoreError::invalid_parameters(format!(
                "seed {index} is {} bytes, maximum is {MAX_SEED_LEN}",
                seed.len()
            )));
        }
    }
    Ok(())
}
