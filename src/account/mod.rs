//! Tray account roles, keypair derivation and balance units.

pub mod balance;
pub mod derivation;
pub mod types;

pub use balance::{estimated_total_balance, from_quarks, to_quarks, QUARKS_PER_UNIT};
pub use derivation::{derivation_path, keypair_for_account_type, owner_keypair};
pub use types::TrayAccountType;
