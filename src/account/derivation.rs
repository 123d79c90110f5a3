//! Keypair derivation for tray accounts.
//!
//! Every account is derived from the keyphrase below the configured default
//! path:
//!
//! | type     | path                            |
//! |----------|---------------------------------|
//! | Primary  | `{default}`                     |
//! | Bucket   | `{default}/{index}'/{offset}'`  |
//! | Incoming | `{default}/{index}'/2'`         |
//! | Outgoing | `{default}/{index}'/3'`         |

use tracing::debug;

use super::types::TrayAccountType;
use crate::config::CodeWalletData;
use crate::crypto::Keypair;
use crate::error::WalletError;
use crate::keyphrase::{descriptor_from_mnemonic, Index, Path};

const INCOMING_LEAF: u32 = 2;
const OUTGOING_LEAF: u32 = 3;

pub fn derivation_path(
    default_path: &Path,
    account_type: TrayAccountType,
    index: u32,
    offset: u32,
) -> Result<Path, WalletError> {
    let leaf = match account_type {
        TrayAccountType::Primary => return Ok(default_path.clone()),
        TrayAccountType::Bucket => offset,
        TrayAccountType::Incoming => INCOMING_LEAF,
        TrayAccountType::Outgoing => OUTGOING_LEAF,
    };

    Ok(default_path
        .child(Index::hardened(index)?)
        .child(Index::hardened(leaf)?))
}

/// Derive the keypair for the given account type, index and offset.
pub fn keypair_for_account_type(
    env: &CodeWalletData,
    account_type: TrayAccountType,
    index: u32,
    offset: u32,
) -> Result<Keypair, WalletError> {
    let path = derivation_path(&env.default_path, account_type, index, offset)?;
    debug!(%account_type, index, offset, %path, "deriving keypair");

    let descriptor = descriptor_from_mnemonic(&path, env.keyphrase.phrase(), "");
    Ok(descriptor.to_keypair())
}

/// Keypair of the primary account, which owns all other accounts.
pub fn owner_keypair(env: &CodeWalletData) -> Result<Keypair, WalletError> {
    keypair_for_account_type(env, TrayAccountType::Primary, 0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const PHRASE: &str =
        "legal winner thank year wave sausage worth useful legal winner thank yellow";

    fn default_path() -> Path {
        Path::parse("m/44'/501'/0'/0'").unwrap()
    }

    #[test]
    fn test_path_table() {
        let base = default_path();
        let cases = [
            (TrayAccountType::Primary, 9, 9, "m/44'/501'/0'/0'"),
            (TrayAccountType::Bucket, 0, 100, "m/44'/501'/0'/0'/0'/100'"),
            (TrayAccountType::Incoming, 5, 0, "m/44'/501'/0'/0'/5'/2'"),
            (TrayAccountType::Outgoing, 42, 7, "m/44'/501'/0'/0'/42'/3'"),
        ];
        for (t, index, offset, expected) in cases {
            assert_eq!(derivation_path(&base, t, index, offset).unwrap().to_string(), expected);
        }
    }

    #[test]
    fn test_out_of_range_index() {
        assert!(matches!(
            derivation_path(&default_path(), TrayAccountType::Incoming, u32::MAX, 0),
            Err(WalletError::InvalidIndex(_))
        ));
        assert!(derivation_path(&default_path(), TrayAccountType::Bucket, 0, 0x8000_0000).is_err());
    }

    #[test]
    fn test_owner_matches_phrase_keypair() {
        let env = CodeWalletData::with_defaults(PHRASE).unwrap();
        let owner = owner_keypair(&env).unwrap();
        assert_eq!(owner, env.keyphrase.to_keypair(&default_path()));
    }

    #[test]
    fn test_roles_do_not_collide() {
        let env = CodeWalletData::with_defaults(PHRASE).unwrap();
        let tuples = [
            (TrayAccountType::Primary, 0, 0),
            (TrayAccountType::Bucket, 0, 1),
            (TrayAccountType::Bucket, 0, 10),
            (TrayAccountType::Bucket, 1, 1),
            (TrayAccountType::Incoming, 0, 0),
            (TrayAccountType::Incoming, 1, 0),
            (TrayAccountType::Outgoing, 0, 0),
            (TrayAccountType::Outgoing, 1, 0),
        ];

        let keys: HashSet<_> = tuples
            .iter()
            .map(|(t, i, o)| keypair_for_account_type(&env, *t, *i, *o).unwrap().public_key())
            .collect();
        assert_eq!(keys.len(), tuples.len());
    }
}
