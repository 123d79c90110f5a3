//! The set of accounts owned by one keyphrase.

use tracing::{debug, info};

use crate::account::{estimated_total_balance, TrayAccountType};
use crate::address::Address;
use crate::config::CodeWalletData;
use crate::error::WalletError;
use crate::program::{associated_token_address, AddressResolver};
use crate::timelock::Timelock;

#[derive(Debug, Clone)]
pub struct Tray {
    env: CodeWalletData,

    // Every payment advances one of these. Combined with the owner keypair
    // this yields addresses that cannot be guessed ahead of time.
    incoming_index: u32,
    outgoing_index: u32,

    /// Deposit account; its owner owns the whole tray.
    primary: Option<Timelock>,

    /// Denomination ladder: offsets `increment^0 .. increment^(count-1)`.
    buckets: Vec<Timelock>,

    incoming: Vec<Timelock>,
    outgoing: Vec<Timelock>,

    /// Receives tokens once they are unlocked.
    ata: Address,
}

impl Tray {
    pub fn new(env: CodeWalletData) -> Self {
        Tray {
            env,
            incoming_index: 0,
            outgoing_index: 0,
            primary: None,
            buckets: Vec::new(),
            incoming: Vec::new(),
            outgoing: Vec::new(),
            ata: Address::default(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.primary.is_some()
            && !self.buckets.is_empty()
            && !self.incoming.is_empty()
            && !self.outgoing.is_empty()
    }

    /// Derive the primary account, the bucket ladder and the current
    /// incoming/outgoing accounts. Any previously derived accounts are
    /// discarded.
    pub async fn initialize<R: AddressResolver + ?Sized>(
        &mut self,
        resolver: &R,
        last_incoming: u32,
        last_outgoing: u32,
    ) -> Result<(), WalletError> {
        let env = &self.env;

        let primary = Timelock::derive_primary(env, resolver).await?;
        let ata = associated_token_address(resolver, &env.mint, primary.owner()).await?;

        let mut buckets = Vec::with_capacity(env.bucket_count as usize);
        for offset in bucket_offsets(env.bucket_count, env.bucket_increment)? {
            buckets.push(
                Timelock::derive_from(env, resolver, 0, TrayAccountType::Bucket, offset).await?,
            );
        }

        let incoming =
            Timelock::derive_from(env, resolver, last_incoming, TrayAccountType::Incoming, 0)
                .await?;
        let outgoing =
            Timelock::derive_from(env, resolver, last_outgoing, TrayAccountType::Outgoing, 0)
                .await?;

        info!(
            owner = %primary.owner(),
            buckets = buckets.len(),
            last_incoming,
            last_outgoing,
            "tray initialized"
        );

        self.primary = Some(primary);
        self.ata = ata;
        self.buckets = buckets;
        self.incoming_index = last_incoming;
        self.outgoing_index = last_outgoing;
        self.incoming = vec![incoming];
        self.outgoing = vec![outgoing];
        Ok(())
    }

    /// Advance the incoming index and derive a fresh account for it.
    pub async fn next_incoming<R: AddressResolver + ?Sized>(
        &mut self,
        resolver: &R,
    ) -> Result<&Timelock, WalletError> {
        self.ensure_initialized()?;
        let index = next_index(self.incoming_index)?;
        let account =
            Timelock::derive_from(&self.env, resolver, index, TrayAccountType::Incoming, 0).await?;
        debug!(index, address = %account.address(), "next incoming account");

        self.incoming_index = index;
        self.incoming.push(account);
        Ok(&self.incoming[self.incoming.len() - 1])
    }

    /// Advance the outgoing index and derive a fresh account for it.
    pub async fn next_outgoing<R: AddressResolver + ?Sized>(
        &mut self,
        resolver: &R,
    ) -> Result<&Timelock, WalletError> {
        self.ensure_initialized()?;
        let index = next_index(self.outgoing_index)?;
        let account =
            Timelock::derive_from(&self.env, resolver, index, TrayAccountType::Outgoing, 0).await?;
        debug!(index, address = %account.address(), "next outgoing account");

        self.outgoing_index = index;
        self.outgoing.push(account);
        Ok(&self.outgoing[self.outgoing.len() - 1])
    }

    pub fn environment(&self) -> &CodeWalletData {
        &self.env
    }

    pub fn incoming_index(&self) -> u32 {
        self.incoming_index
    }

    pub fn outgoing_index(&self) -> u32 {
        self.outgoing_index
    }

    pub fn owner(&self) -> Result<&Address, WalletError> {
        Ok(self.primary()?.owner())
    }

    pub fn primary(&self) -> Result<&Timelock, WalletError> {
        self.ensure_initialized()?;
        self.primary.as_ref().ok_or(WalletError::NotInitialized)
    }

    pub fn buckets(&self) -> &[Timelock] {
        &self.buckets
    }

    pub fn incoming(&self) -> &[Timelock] {
        &self.incoming
    }

    pub fn outgoing(&self) -> &[Timelock] {
        &self.outgoing
    }

    /// Destination for unlocked tokens.
    pub fn associated_token_address(&self) -> Result<&Address, WalletError> {
        self.ensure_initialized()?;
        Ok(&self.ata)
    }

    pub fn mint(&self) -> &Address {
        &self.env.mint
    }

    /// Derive any account of this tray without storing it.
    pub async fn account_by_index<R: AddressResolver + ?Sized>(
        &self,
        resolver: &R,
        account_type: TrayAccountType,
        index: u32,
        offset: u32,
    ) -> Result<Timelock, WalletError> {
        Timelock::derive_from(&self.env, resolver, index, account_type, offset).await
    }

    /// Primary, buckets, incoming and outgoing, in that order. The addresses
    /// have not been checked against the ledger and may not exist yet.
    pub fn all_accounts(&self) -> Result<Vec<&Timelock>, WalletError> {
        let primary = self.primary()?;
        Ok(std::iter::once(primary)
            .chain(&self.buckets)
            .chain(&self.incoming)
            .chain(&self.outgoing)
            .collect())
    }

    pub fn all_accounts_mut(&mut self) -> Result<Vec<&mut Timelock>, WalletError> {
        self.ensure_initialized()?;
        Ok(self
            .primary
            .iter_mut()
            .chain(&mut self.buckets)
            .chain(&mut self.incoming)
            .chain(&mut self.outgoing)
            .collect())
    }

    /// Total of the last fetched balances across every account, in units.
    pub fn estimated_balance(&self) -> Result<f64, WalletError> {
        estimated_total_balance(self.all_accounts()?)
    }

    fn ensure_initialized(&self) -> Result<(), WalletError> {
        if !self.is_initialized() {
            return Err(WalletError::NotInitialized);
        }
        Ok(())
    }
}

/// `increment^i` for `i` in `0..count`.
pub fn bucket_offsets(count: u32, increment: u32) -> Result<Vec<u32>, WalletError> {
    (0..count)
        .map(|i| increment.checked_pow(i).ok_or(WalletError::InvalidOffset))
        .collect()
}

fn next_index(current: u32) -> Result<u32, WalletError> {
    current
        .checked_add(1)
        .ok_or_else(|| WalletError::InvalidIndex(current.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::layout::TOKEN_ACCOUNT_LEN;
    use crate::program::LocalResolver;
    use std::collections::HashSet;

    const PHRASE: &str =
        "legal winner thank year wave sausage worth useful legal winner thank yellow";

    fn env() -> CodeWalletData {
        CodeWalletData::with_defaults(PHRASE).unwrap()
    }

    fn balance_bytes(amount: u64) -> Vec<u8> {
        let mut data = vec![0u8; TOKEN_ACCOUNT_LEN];
        data[64..72].copy_from_slice(&amount.to_le_bytes());
        data
    }

    #[test]
    fn test_bucket_ladder() {
        assert_eq!(
            bucket_offsets(7, 10).unwrap(),
            vec![1, 10, 100, 1000, 10000, 100000, 1000000]
        );
        assert_eq!(bucket_offsets(3, 2).unwrap(), vec![1, 2, 4]);
        assert!(bucket_offsets(0, 10).unwrap().is_empty());
        assert!(matches!(bucket_offsets(11, 10), Err(WalletError::InvalidOffset)));
    }

    #[test]
    fn test_uninitialized_tray() {
        let tray = Tray::new(env());
        assert!(!tray.is_initialized());
        assert!(matches!(tray.owner(), Err(WalletError::NotInitialized)));
        assert!(matches!(tray.associated_token_address(), Err(WalletError::NotInitialized)));
        assert!(matches!(tray.all_accounts(), Err(WalletError::NotInitialized)));
        assert_eq!(tray.mint(), &env().mint);
    }

    #[tokio::test]
    async fn test_initialize() {
        let mut tray = Tray::new(env());
        tray.initialize(&LocalResolver, 4, 9).await.unwrap();
        assert!(tray.is_initialized());

        let offsets: Vec<u32> = tray.buckets().iter().map(|b| b.derivation_offset()).collect();
        assert_eq!(offsets, vec![1, 10, 100, 1000, 10000, 100000, 1000000]);
        assert!(tray.buckets().iter().all(|b| b.derivation_index() == 0));

        assert_eq!(tray.incoming()[0].derivation_index(), 4);
        assert_eq!(tray.outgoing()[0].derivation_index(), 9);
        assert_eq!(tray.incoming_index(), 4);
        assert_eq!(tray.outgoing_index(), 9);

        let all = tray.all_accounts().unwrap();
        assert_eq!(all.len(), 1 + 7 + 1 + 1);
        assert_eq!(all[0].account_type(), TrayAccountType::Primary);
        assert_eq!(all[1].account_type(), TrayAccountType::Bucket);
        assert_eq!(all[8].account_type(), TrayAccountType::Incoming);
        assert_eq!(all[9].account_type(), TrayAccountType::Outgoing);

        let addresses: HashSet<_> = all.iter().map(|a| *a.address()).collect();
        assert_eq!(addresses.len(), all.len());

        let primary = tray.primary().unwrap();
        assert_eq!(tray.owner().unwrap(), primary.owner());
        let ata = associated_token_address(&LocalResolver, tray.mint(), primary.owner())
            .await
            .unwrap();
        assert_eq!(tray.associated_token_address().unwrap(), &ata);
    }

    #[tokio::test]
    async fn test_initialize_is_deterministic() {
        let mut a = Tray::new(env());
        let mut b = Tray::new(env());
        a.initialize(&LocalResolver, 0, 0).await.unwrap();
        b.initialize(&LocalResolver, 0, 0).await.unwrap();

        let left: Vec<_> = a.all_accounts().unwrap().iter().map(|t| *t.address()).collect();
        let right: Vec<_> = b.all_accounts().unwrap().iter().map(|t| *t.address()).collect();
        assert_eq!(left, right);
    }

    #[tokio::test]
    async fn test_next_accounts_are_fresh() {
        let mut tray = Tray::new(env());
        assert!(matches!(
            tray.next_incoming(&LocalResolver).await,
            Err(WalletError::NotInitialized)
        ));

        tray.initialize(&LocalResolver, 0, 0).await.unwrap();
        let first = *tray.incoming()[0].address();
        let second = *tray.next_incoming(&LocalResolver).await.unwrap().address();
        assert_ne!(first, second);
        assert_eq!(tray.incoming_index(), 1);
        assert_eq!(tray.incoming().len(), 2);

        let out = tray.next_outgoing(&LocalResolver).await.unwrap();
        assert_eq!(out.derivation_index(), 1);
        assert_eq!(tray.outgoing().len(), 2);

        let again = tray
            .account_by_index(&LocalResolver, TrayAccountType::Incoming, 1, 0)
            .await
            .unwrap();
        assert_eq!(again.address(), &second);
    }

    #[tokio::test]
    async fn test_estimated_balance() {
        let mut tray = Tray::new(env());
        tray.initialize(&LocalResolver, 0, 0).await.unwrap();
        assert!(matches!(tray.estimated_balance(), Err(WalletError::UnknownState)));

        for (i, account) in tray.all_accounts_mut().unwrap().into_iter().enumerate() {
            account.update_balance(&balance_bytes(100_000 * i as u64)).unwrap();
        }
        // 0 + 1 + ... + 9 units
        assert_eq!(tray.estimated_balance().unwrap(), 45.0);
    }
}
