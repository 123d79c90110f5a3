pub mod account;
pub mod address;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod keyphrase;
pub mod program;
pub mod timelock;
pub mod tray;

pub use address::Address;
pub use config::{CodeWalletData, WalletConfig};
pub use error::WalletError;
pub use timelock::Timelock;
pub use tray::Tray;
