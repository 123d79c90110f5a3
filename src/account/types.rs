//! Account roles within a tray

use serde::{Deserialize, Serialize};

use crate::error::WalletError;

/// Role of a derived account; it selects the derivation path used for the
/// authority keypair.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrayAccountType {
    /// Deposit account; its keypair also owns every other account
    Primary = 1,
    /// One fresh account per received payment
    Incoming = 2,
    /// One fresh account per sent payment
    Outgoing = 3,
    /// Fixed denomination accounts
    Bucket = 4,
}

impl TryFrom<u8> for TrayAccountType {
    type Error = WalletError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TrayAccountType::Primary),
            2 => Ok(TrayAccountType::Incoming),
            3 => Ok(TrayAccountType::Outgoing),
            4 => Ok(TrayAccountType::Bucket),
            other => Err(WalletError::UnknownAccountType(other.to_string())),
        }
    }
}

impl std::fmt::Display for TrayAccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrayAccountType::Primary => write!(f, "primary"),
            TrayAccountType::Incoming => write!(f, "incoming"),
            TrayAccountType::Outgoing => write!(f, "outgoing"),
            TrayAccountType::Bucket => write!(f, "bucket"),
        }
    }
}

impl std::str::FromStr for TrayAccountType {
    type Err = WalletError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "primary" => Ok(TrayAccountType::Primary),
            "incoming" => Ok(TrayAccountType::Incoming),
            "outgoing" => Ok(TrayAccountType::Outgoing),
            "bucket" => Ok(TrayAccountType::Bucket),
            _ => Err(WalletError::UnknownAccountType(s.to_string())),
        }
    }
}
