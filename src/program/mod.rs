//! Interfaces to the on-chain timelock and token programs.

pub mod layout;
pub mod pda;

pub use layout::{token_account_balance, TimeLockAccount, VaultState};
pub use pda::{associated_token_address, AddressResolver, LocalResolver};

/// Seed prefix of the timelock state account.
pub const PREFIX_TIMELOCK: &[u8] = b"timelock_state";
/// Seed prefix of the token vault owned by a timelock.
pub const PREFIX_VAULT: &[u8] = b"timelock_vault";
/// Data version byte mixed into the vault seeds.
pub const VAULT_VERSION: u8 = 1;
