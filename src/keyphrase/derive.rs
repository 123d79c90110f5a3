//! Deterministic key derivation for the Ed25519 curve (SLIP-0010).
//!
//! Only hardened derivation is meaningful for Ed25519. Unhardened indexes
//! are accepted and hashed the same way, but the results will not match
//! other SLIP-0010 implementations.

use hmac::{Hmac, Mac};
use pbkdf2::pbkdf2;
use sha2::Sha512;

use super::path::{Index, Path};
use crate::crypto::Keypair;

type HmacSha512 = Hmac<Sha512>;

const CURVE: &[u8] = b"ed25519 seed";
const SEED_ROUNDS: u32 = 2048;

/// Private key material plus chain code for one node of the tree.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyDescriptor {
    key: [u8; 32],
    chain: [u8; 32],
}

impl KeyDescriptor {
    fn from_hmac(key: &[u8], data: &[u8]) -> Self {
        let mut mac = HmacSha512::new_from_slice(key).expect("HMAC accepts keys of any length");
        mac.update(data);
        let i = mac.finalize().into_bytes();

        let mut descriptor = KeyDescriptor {
            key: [0u8; 32],
            chain: [0u8; 32],
        };
        descriptor.key.copy_from_slice(&i[..32]);
        descriptor.chain.copy_from_slice(&i[32..]);
        descriptor
    }

    pub fn key(&self) -> &[u8; 32] {
        &self.key
    }

    pub fn chain(&self) -> &[u8; 32] {
        &self.chain
    }

    pub fn to_keypair(&self) -> Keypair {
        Keypair::from_seed(&self.key)
    }
}

impl std::fmt::Debug for KeyDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyDescriptor").finish_non_exhaustive()
    }
}

pub fn master_key(seed: &[u8]) -> KeyDescriptor {
    KeyDescriptor::from_hmac(CURVE, seed)
}

pub fn child_key(parent: &KeyDescriptor, index: Index) -> KeyDescriptor {
    let mut data = Vec::with_capacity(1 + 32 + 4);
    data.push(0x00);
    data.extend_from_slice(&parent.key);
    data.extend_from_slice(&index.to_bytes());

    KeyDescriptor::from_hmac(&parent.chain, &data)
}

pub fn derive_path(seed: &[u8], path: &Path) -> KeyDescriptor {
    path.indexes()
        .iter()
        .fold(master_key(seed), |descriptor, index| {
            child_key(&descriptor, *index)
        })
}

/// BIP-39 seed: PBKDF2-HMAC-SHA512 with salt `"mnemonic" + password`.
pub fn seed_from_mnemonic(phrase: &str, password: &str) -> [u8; 64] {
    let salt = format!("mnemonic{}", password);
    let mut seed = [0u8; 64];
    pbkdf2::<HmacSha512>(phrase.as_bytes(), salt.as_bytes(), SEED_ROUNDS, &mut seed);
    seed
}

pub fn descriptor_from_mnemonic(path: &Path, phrase: &str, password: &str) -> KeyDescriptor {
    let seed = seed_from_mnemonic(phrase, password);
    derive_path(&seed, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    // SLIP-0010 test vector 1 for ed25519
    const SEED: &str = "000102030405060708090a0b0c0d0e0f";

    const ZERO_PHRASE: &str = "abandon abandon abandon abandon abandon abandon \
        abandon abandon abandon abandon abandon about";

    #[test]
    fn test_master_key_vector() {
        let seed = hex::decode(SEED).unwrap();
        let master = master_key(&seed);
        assert_eq!(
            hex::encode(master.key()),
            "2b4be7f19ee27bbf30c667b642d5f4aa69fd169872f8fc3059c08ebae2eb19e7"
        );
        assert_eq!(
            hex::encode(master.chain()),
            "90046a93de5380a72b5e45010748567d5ea02bbf6522f979e05c0d8d8ca9fffb"
        );
    }

    #[test]
    fn test_child_key_vector() {
        let seed = hex::decode(SEED).unwrap();
        let descriptor = derive_path(&seed, &Path::parse("m/0'").unwrap());
        assert_eq!(
            hex::encode(descriptor.key()),
            "68e0fe46dfb67e368c75379acec591dad19df3cde26e63b93a8e704f1dade7a3"
        );
        assert_eq!(
            hex::encode(descriptor.chain()),
            "8b59aa11380b624e81507a27fedda59fea6d0b779a778918a2fd3590e16e9c69"
        );
    }

    #[test]
    fn test_empty_path_is_master() {
        let seed = hex::decode(SEED).unwrap();
        assert_eq!(derive_path(&seed, &Path::default()), master_key(&seed));
    }

    #[test]
    fn test_deterministic() {
        let path = Path::parse("m/44'/501'/0'/0'").unwrap();
        let seed = seed_from_mnemonic(ZERO_PHRASE, "");
        let a = derive_path(&seed, &path);
        let b = derive_path(&seed, &path);
        assert_eq!(a, b);
        assert_eq!(a.to_keypair().public_key(), b.to_keypair().public_key());
    }

    #[test]
    fn test_seed_from_mnemonic_vector() {
        // BIP-39 vector: zero entropy with password "TREZOR"
        let seed = seed_from_mnemonic(ZERO_PHRASE, "TREZOR");
        assert_eq!(
            hex::encode(seed),
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e53495531f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        );
    }

    #[test]
    fn test_password_changes_seed() {
        let phrase = "legal winner thank year wave sausage worth useful legal winner thank yellow";
        assert_ne!(seed_from_mnemonic(phrase, ""), seed_from_mnemonic(phrase, "x"));
    }
}
