//! Mnemonic phrases and SLIP-0010 key derivation.

pub mod derive;
pub mod mnemonic;
pub mod path;

pub use derive::{
    child_key, derive_path, descriptor_from_mnemonic, master_key, seed_from_mnemonic,
    KeyDescriptor,
};
pub use mnemonic::{
    default_wordlist, to_entropy, to_mnemonic, MnemonicPhrase, MnemonicType, DEFAULT_LANGUAGE,
    DEFAULT_PATH,
};
pub use path::{Index, Path};
