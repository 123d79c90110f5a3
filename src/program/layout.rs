//! Decoders for the account bytes a caller fetches from the ledger.

use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};

use crate::address::Address;
use crate::error::WalletError;

const DISCRIMINATOR_LEN: usize = 8;

/// Size of an SPL token account.
pub const TOKEN_ACCOUNT_LEN: usize = 165;
const TOKEN_AMOUNT_OFFSET: usize = 64;

/// Lock state of a timelock vault as recorded on-chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
pub enum VaultState {
    Unlocked = 1,
    WaitingForTimeout = 2,
    Locked = 3,
    Closed = 4,
}

/// On-chain state of a timelock account, in program field order.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct TimeLockAccount {
    pub data_version: u8,
    pub time_authority: Address,
    pub close_authority: Address,
    pub mint: Address,
    pub vault_address: Address,
    pub vault_bump: u8,
    pub vault_state: VaultState,
    pub vault_owner: Address,
    /// Unix timestamp (seconds), present while waiting for the timeout.
    pub unlock_at: Option<i64>,
    pub num_days_locked: u8,
}

impl TimeLockAccount {
    pub fn discriminator() -> [u8; DISCRIMINATOR_LEN] {
        let digest = Sha256::digest(b"account:TimeLockAccount");
        let mut out = [0u8; DISCRIMINATOR_LEN];
        out.copy_from_slice(&digest[..DISCRIMINATOR_LEN]);
        out
    }

    /// Decode fetched account data. Trailing bytes (account padding) are
    /// ignored.
    pub fn decode(bytes: &[u8]) -> Result<Self, WalletError> {
        if bytes.len() < DISCRIMINATOR_LEN || bytes[..DISCRIMINATOR_LEN] != Self::discriminator() {
            return Err(WalletError::Decode(
                "account discriminator does not match TimeLockAccount".to_string(),
            ));
        }

        let mut data = &bytes[DISCRIMINATOR_LEN..];
        let account = TimeLockAccount::deserialize(&mut data)
            .map_err(|e| WalletError::Decode(format!("timelock account: {}", e)))?;

        if account.vault_state == VaultState::WaitingForTimeout && account.unlock_at.is_none() {
            return Err(WalletError::Decode(
                "timelock account is waiting for timeout without an unlock time".to_string(),
            ));
        }
        Ok(account)
    }

    #[cfg(test)]
    pub(crate) fn encode(&self) -> Vec<u8> {
        let mut out = Self::discriminator().to_vec();
        out.extend(borsh::to_vec(self).unwrap());
        out
    }
}

/// Raw quark amount held by an SPL token account.
pub fn token_account_balance(bytes: &[u8]) -> Result<u64, WalletError> {
    if bytes.len() < TOKEN_ACCOUNT_LEN {
        return Err(WalletError::Decode(format!(
            "token account too short: {} bytes",
            bytes.len()
        )));
    }
    u64::try_from_slice(&bytes[TOKEN_AMOUNT_OFFSET..TOKEN_AMOUNT_OFFSET + 8])
        .map_err(|e| WalletError::Decode(format!("token account: {}", e)))
}
