pub mod keys;
pub mod tray;

use std::io::{self, BufRead};

use clap::{Parser, Subcommand};

use crate::error::WalletError;

#[derive(Parser)]
#[command(name = "timelock_tray")]
#[command(about = "Code Wallet account derivation CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a new keyphrase
    Generate {
        /// 24 words instead of 12
        #[arg(long)]
        long: bool,
    },
    /// Derive the public key at a path (keyphrase read from stdin)
    Derive {
        #[arg(long, default_value = crate::keyphrase::DEFAULT_PATH)]
        path: String,
    },
    /// Derive every account of a tray (keyphrase read from stdin)
    Tray {
        #[arg(long, default_value = "timelock_tray.toml")]
        config: String,
        /// Last used incoming index
        #[arg(long, default_value_t = 0)]
        incoming: u32,
        /// Last used outgoing index
        #[arg(long, default_value_t = 0)]
        outgoing: u32,
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(cli: Cli) -> Result<(), WalletError> {
    match cli.command {
        Commands::Generate { long } => keys::handle_generate(long),
        Commands::Derive { path } => keys::handle_derive(&path, &read_keyphrase()?),
        Commands::Tray {
            config,
            incoming,
            outgoing,
            json,
        } => {
            tray::handle_tray(&config, &read_keyphrase()?, incoming, outgoing, json).await
        }
    }
}

/// First line of stdin, trimmed.
fn read_keyphrase() -> Result<String, WalletError> {
    let mut phrase = String::new();
    io::stdin().lock().read_line(&mut phrase)?;
    Ok(phrase.trim().to_string())
}
