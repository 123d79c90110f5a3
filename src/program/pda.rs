//! Program-derived address resolution.
//!
//! Callers own the seed lists; resolution itself sits behind
//! [`AddressResolver`] so it can be served by a ledger client or computed
//! locally with [`LocalResolver`].

use async_trait::async_trait;
use curve25519_dalek::edwards::CompressedEdwardsY;
use sha2::{Digest, Sha256};
use tracing::trace;

use crate::address::Address;
use crate::error::ResolveError;

pub const MAX_SEEDS: usize = 16;
pub const MAX_SEED_LEN: usize = 32;
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

pub const TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
pub const ASSOCIATED_TOKEN_PROGRAM_ID: &str = "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL";

#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Returns the first off-curve address for `seeds` searching bumps from
    /// 255 downwards, together with that bump.
    async fn find_program_address(
        &self,
        seeds: &[&[u8]],
        program_id: &Address,
    ) -> Result<(Address, u8), ResolveError>;
}

/// Computes addresses in-process with the ledger's hashing rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalResolver;

#[async_trait]
impl AddressResolver for LocalResolver {
    async fn find_program_address(
        &self,
        seeds: &[&[u8]],
        program_id: &Address,
    ) -> Result<(Address, u8), ResolveError> {
        find_program_address(seeds, program_id)
    }
}

pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Address,
) -> Result<(Address, u8), ResolveError> {
    // The bump occupies one seed slot.
    if seeds.len() >= MAX_SEEDS {
        return Err(ResolveError::TooManySeeds(seeds.len()));
    }

    for bump in (0..=u8::MAX).rev() {
        let bump_seed = [bump];
        let mut with_bump: Vec<&[u8]> = seeds.to_vec();
        with_bump.push(&bump_seed);

        if let Some(address) = create_program_address(&with_bump, program_id)? {
            trace!(%address, bump, "resolved program address");
            return Ok((address, bump));
        }
    }

    Err(ResolveError::NoViableBump)
}

/// Hashes the seeds; `None` when the result lands on the curve.
pub fn create_program_address(
    seeds: &[&[u8]],
    program_id: &Address,
) -> Result<Option<Address>, ResolveError> {
    if seeds.len() > MAX_SEEDS {
        return Err(ResolveError::TooManySeeds(seeds.len()));
    }

    let mut hasher = Sha256::new();
    for seed in seeds {
        if seed.len() > MAX_SEED_LEN {
            return Err(ResolveError::MaxSeedLengthExceeded);
        }
        hasher.update(seed);
    }
    hasher.update(program_id.as_bytes());
    hasher.update(PDA_MARKER);

    let hash: [u8; 32] = hasher.finalize().into();
    if is_on_curve(&hash) {
        return Ok(None);
    }
    Ok(Some(Address::new(hash)))
}

pub fn is_on_curve(bytes: &[u8; 32]) -> bool {
    CompressedEdwardsY(*bytes).decompress().is_some()
}

/// Associated token account of `owner` for `mint`.
pub async fn associated_token_address<R: AddressResolver + ?Sized>(
    resolver: &R,
    mint: &Address,
    owner: &Address,
) -> Result<Address, ResolveError> {
    let token_program = parse_program_id(TOKEN_PROGRAM_ID)?;
    let ata_program = parse_program_id(ASSOCIATED_TOKEN_PROGRAM_ID)?;

    let (address, _) = resolver
        .find_program_address(
            &[owner.as_ref(), token_program.as_ref(), mint.as_ref()],
            &ata_program,
        )
        .await?;
    Ok(address)
}

fn parse_program_id(id: &str) -> Result<Address, ResolveError> {
    id.parse()
        .map_err(|_| ResolveError::InvalidProgramId(id.to_string()))
}
