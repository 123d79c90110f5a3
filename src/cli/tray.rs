use serde::Serialize;
use tracing::info;

use crate::account::TrayAccountType;
use crate::address::Address;
use crate::config::{CodeWalletData, WalletConfig};
use crate::display::shorten_address;
use crate::error::WalletError;
use crate::program::LocalResolver;
use crate::timelock::Timelock;
use crate::tray::Tray;

#[derive(Serialize)]
struct AccountRow {
    account_type: TrayAccountType,
    index: u32,
    offset: u32,
    authority: Address,
    address: Address,
    vault: Address,
}

impl From<&Timelock> for AccountRow {
    fn from(t: &Timelock) -> Self {
        AccountRow {
            account_type: t.account_type(),
            index: t.derivation_index(),
            offset: t.derivation_offset(),
            authority: t.authority(),
            address: *t.address(),
            vault: *t.vault(),
        }
    }
}

#[derive(Serialize)]
struct TrayReport {
    owner: Address,
    mint: Address,
    associated_token_address: Address,
    accounts: Vec<AccountRow>,
}

fn to_json<T: Serialize>(value: &T) -> Result<String, WalletError> {
    serde_json::to_string_pretty(value).map_err(|e| WalletError::Encode(e.to_string()))
}

pub async fn handle_tray(
    config_path: &str,
    keyphrase: &str,
    last_incoming: u32,
    last_outgoing: u32,
    json: bool,
) -> Result<(), WalletError> {
    let config = WalletConfig::load_or_default(config_path);
    let env = CodeWalletData::from_config(&config, keyphrase)?;

    let mut tray = Tray::new(env);
    tray.initialize(&LocalResolver, last_incoming, last_outgoing).await?;
    info!(accounts = tray.all_accounts()?.len(), "derived tray");

    let report = TrayReport {
        owner: *tray.owner()?,
        mint: *tray.mint(),
        associated_token_address: *tray.associated_token_address()?,
        accounts: tray
            .all_accounts()?
            .into_iter()
            .map(AccountRow::from)
            .collect(),
    };

    if json {
        println!("{}", to_json(&report)?);
        return Ok(());
    }

    println!("Owner: {}", report.owner);
    println!("Mint:  {}", report.mint);
    println!("ATA:   {}", report.associated_token_address);
    println!();
    println!(
        "{:<10} {:>6} {:>8}  {:<17} {:<17} {:<17}",
        "TYPE", "INDEX", "OFFSET", "AUTHORITY", "TIMELOCK", "VAULT"
    );
    for row in &report.accounts {
        println!(
            "{:<10} {:>6} {:>8}  {:<17} {:<17} {:<17}",
            row.account_type.to_string(),
            row.index,
            row.offset,
            shorten_address(&row.authority, 6),
            shorten_address(&row.address, 6),
            shorten_address(&row.vault, 6),
        );
    }
    Ok(())
}
