//! Timelock accounts derived with the Code Wallet strategy.
//!
//! Each account has both an owner and an authority. The owner only anchors
//! the derivation (it never appears on-chain); the authority is the keypair
//! that signs for the vault. This lets one keyphrase manage many unrelated
//! looking addresses.
//!
//! ```ignore
//! let primary = Timelock::derive_primary(&env, &resolver).await?;
//! let sending = Timelock::derive_from(&env, &resolver, 42, TrayAccountType::Outgoing, 0).await?;
//! let bucket = Timelock::derive_from(&env, &resolver, 0, TrayAccountType::Bucket, 10).await?;
//! ```

use chrono::Utc;
use tracing::debug;

use crate::account::{keypair_for_account_type, owner_keypair, TrayAccountType};
use crate::address::Address;
use crate::config::CodeWalletData;
use crate::crypto::Keypair;
use crate::error::WalletError;
use crate::program::{
    token_account_balance, AddressResolver, TimeLockAccount, VaultState, PREFIX_TIMELOCK,
    PREFIX_VAULT, VAULT_VERSION,
};

pub const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone)]
pub struct Timelock {
    owner: Address,
    authority: Keypair,

    address: Address,
    bump: u8,
    vault: Address,

    account_type: TrayAccountType,
    derivation_index: u32,
    derivation_offset: u32,

    state: Option<TimeLockAccount>,
    balance: Option<u64>,
}

impl Timelock {
    /// Derive the authority keypair and timelock addresses for `index` and
    /// `offset`. Primary accounts ignore both.
    pub async fn derive_from<R: AddressResolver + ?Sized>(
        env: &CodeWalletData,
        resolver: &R,
        index: u32,
        account_type: TrayAccountType,
        offset: u32,
    ) -> Result<Timelock, WalletError> {
        if account_type == TrayAccountType::Primary {
            return Self::derive_primary(env, resolver).await;
        }

        // Offset 0 would make bucket paths ambiguous with the primary account.
        if account_type == TrayAccountType::Bucket && offset == 0 {
            return Err(WalletError::InvalidOffset);
        }

        let owner = keypair_for_account_type(env, TrayAccountType::Primary, index, 0)?;
        let authority = keypair_for_account_type(env, account_type, index, offset)?;

        Self::resolve(
            env,
            resolver,
            owner.public_key(),
            authority,
            account_type,
            index,
            offset,
        )
        .await
    }

    /// Derive the primary account; its owner and authority are the same keypair.
    pub async fn derive_primary<R: AddressResolver + ?Sized>(
        env: &CodeWalletData,
        resolver: &R,
    ) -> Result<Timelock, WalletError> {
        let keypair = owner_keypair(env)?;
        let owner = keypair.public_key();

        Self::resolve(env, resolver, owner, keypair, TrayAccountType::Primary, 0, 0).await
    }

    async fn resolve<R: AddressResolver + ?Sized>(
        env: &CodeWalletData,
        resolver: &R,
        owner: Address,
        authority: Keypair,
        account_type: TrayAccountType,
        derivation_index: u32,
        derivation_offset: u32,
    ) -> Result<Timelock, WalletError> {
        let (address, bump) = timelock_state_pda(env, resolver, &authority.public_key()).await?;
        let (vault, _) = timelock_vault_pda(env, resolver, &address).await?;

        debug!(
            %account_type,
            derivation_index,
            derivation_offset,
            %address,
            %vault,
            "derived timelock"
        );

        Ok(Timelock {
            owner,
            authority,
            address,
            bump,
            vault,
            account_type,
            derivation_index,
            derivation_offset,
            state: None,
            balance: None,
        })
    }

    /// Replace the cached state with freshly fetched timelock account bytes.
    pub fn update_from_account_info(&mut self, data: &[u8]) -> Result<&mut Self, WalletError> {
        self.state = Some(TimeLockAccount::decode(data)?);
        Ok(self)
    }

    /// Replace the cached balance with freshly fetched vault token account bytes.
    pub fn update_balance(&mut self, data: &[u8]) -> Result<&mut Self, WalletError> {
        self.balance = Some(token_account_balance(data)?);
        Ok(self)
    }

    /// The timelock state account.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// The secret owner. Never appears on-chain.
    pub fn owner(&self) -> &Address {
        &self.owner
    }

    /// Public key of the only signer that can move tokens out of the vault.
    pub fn authority(&self) -> Address {
        self.authority.public_key()
    }

    pub fn authority_keypair(&self) -> &Keypair {
        &self.authority
    }

    pub fn bump(&self) -> u8 {
        self.bump
    }

    /// Token account holding the locked tokens.
    pub fn vault(&self) -> &Address {
        &self.vault
    }

    pub fn account_type(&self) -> TrayAccountType {
        self.account_type
    }

    pub fn derivation_index(&self) -> u32 {
        self.derivation_index
    }

    pub fn derivation_offset(&self) -> u32 {
        self.derivation_offset
    }

    pub fn cached_balance(&self) -> Result<u64, WalletError> {
        self.balance.ok_or(WalletError::UnknownState)
    }

    pub fn cached_state(&self) -> Result<&TimeLockAccount, WalletError> {
        self.state.as_ref().ok_or(WalletError::UnknownState)
    }

    fn vault_state(&self) -> Result<VaultState, WalletError> {
        Ok(self.cached_state()?.vault_state)
    }

    /// A timelock has more than two states; false does not imply locked.
    pub fn is_unlocked(&self) -> Result<bool, WalletError> {
        Ok(self.vault_state()? == VaultState::Unlocked)
    }

    /// A timelock has more than two states; false does not imply unlocked.
    pub fn is_locked(&self) -> Result<bool, WalletError> {
        Ok(self.vault_state()? == VaultState::Locked)
    }

    /// An unlock was requested and the timeout has not been acted on yet.
    pub fn is_waiting(&self) -> Result<bool, WalletError> {
        Ok(self.vault_state()? == VaultState::WaitingForTimeout)
    }

    /// Waiting and the timeout has elapsed; the lock can be deactivated now.
    pub fn can_deactivate_lock(&self) -> Result<bool, WalletError> {
        self.can_deactivate_lock_at(now_ms())
    }

    pub fn can_deactivate_lock_at(&self, now_ms: i64) -> Result<bool, WalletError> {
        Ok(self.is_waiting()? && self.unlock_at_time_at(now_ms)? < now_ms)
    }

    /// Millisecond timestamp at which the account becomes unlockable.
    pub fn unlock_at_time(&self) -> Result<i64, WalletError> {
        self.unlock_at_time_at(now_ms())
    }

    /// For a locked account this is an estimate: the lock start is not
    /// tracked, so the full duration is counted from `now_ms`.
    pub fn unlock_at_time_at(&self, now_ms: i64) -> Result<i64, WalletError> {
        let state = self.cached_state()?;
        let out_of_range = || WalletError::Decode("timelock unlock time out of range".to_string());
        match state.vault_state {
            VaultState::WaitingForTimeout => state
                .unlock_at
                .ok_or_else(|| {
                    WalletError::Decode("waiting timelock has no unlock time".to_string())
                })?
                .checked_mul(1000)
                .ok_or_else(out_of_range),
            VaultState::Locked => now_ms
                .checked_add(state.num_days_locked as i64 * MS_PER_DAY)
                .ok_or_else(out_of_range),
            VaultState::Unlocked | VaultState::Closed => Ok(0),
        }
    }

    /// Milliseconds until the account becomes unlockable (negative once past).
    pub fn remaining_time_until_unlock(&self) -> Result<i64, WalletError> {
        let now = now_ms();
        Ok(self.unlock_at_time_at(now)?.saturating_sub(now))
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// State account PDA. The authority key fills the slot the program calls
/// "owner"; existing addresses depend on this ordering.
pub async fn timelock_state_pda<R: AddressResolver + ?Sized>(
    env: &CodeWalletData,
    resolver: &R,
    authority: &Address,
) -> Result<(Address, u8), WalletError> {
    let duration = [env.unlock_duration];
    let seeds: [&[u8]; 5] = [
        PREFIX_TIMELOCK,
        env.mint.as_ref(),
        env.time_authority.as_ref(),
        authority.as_ref(),
        &duration,
    ];
    Ok(resolver.find_program_address(&seeds, &env.program_id).await?)
}

/// Vault token account PDA owned by the timelock at `timelock`.
pub async fn timelock_vault_pda<R: AddressResolver + ?Sized>(
    env: &CodeWalletData,
    resolver: &R,
    timelock: &Address,
) -> Result<(Address, u8), WalletError> {
    let version = [VAULT_VERSION];
    let seeds: [&[u8]; 3] = [PREFIX_VAULT, timelock.as_ref(), &version];
    Ok(resolver.find_program_address(&seeds, &env.program_id).await?)
}
