//! BIP-39 mnemonic encoding over caller-supplied wordlists.

use std::fmt;

use bip39::Language;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use super::derive::{descriptor_from_mnemonic, KeyDescriptor};
use super::path::Path;
use crate::crypto::Keypair;
use crate::error::WalletError;

pub const DEFAULT_LANGUAGE: Language = Language::English;
pub const DEFAULT_PATH: &str = "m/44'/501'/0'/0'"; // Standard Solana path

const WORDLIST_LEN: usize = 2048;
const BITS_PER_WORD: usize = 11;

/// Words of the default language.
pub fn default_wordlist() -> &'static [&'static str] {
    DEFAULT_LANGUAGE.word_list()
}

/// Encode entropy as a phrase. Entropy must be 16..=32 bytes, a multiple of 4.
pub fn to_mnemonic(entropy: &[u8], wordlist: &[&str]) -> Result<String, WalletError> {
    check_entropy_len(entropy.len())?;
    check_wordlist(wordlist)?;

    let checksum = Sha256::digest(entropy);
    let entropy_bits = entropy.len() * 8;
    let total_bits = entropy_bits + entropy_bits / 32;

    let bit_at = |i: usize| -> usize {
        if i < entropy_bits {
            bit(entropy, i)
        } else {
            bit(&checksum, i - entropy_bits)
        }
    };

    let words: Vec<&str> = (0..total_bits / BITS_PER_WORD)
        .map(|w| {
            let index = (0..BITS_PER_WORD)
                .fold(0usize, |acc, b| (acc << 1) | bit_at(w * BITS_PER_WORD + b));
            wordlist[index]
        })
        .collect();

    Ok(words.join(" "))
}

/// Decode a phrase back to its entropy, verifying the checksum.
pub fn to_entropy(mnemonic: &str, wordlist: &[&str]) -> Result<Vec<u8>, WalletError> {
    check_wordlist(wordlist)?;

    let phrase: Vec<&str> = mnemonic.split_whitespace().collect();
    if phrase.len() < 12 || phrase.len() > 24 || phrase.len() % 3 != 0 {
        return Err(WalletError::InvalidMnemonic);
    }

    let mut bits = Vec::with_capacity(phrase.len() * BITS_PER_WORD);
    for word in phrase {
        let index = wordlist
            .iter()
            .position(|w| *w == word)
            .ok_or(WalletError::InvalidMnemonic)?;
        for b in (0..BITS_PER_WORD).rev() {
            bits.push((index >> b) & 1 == 1);
        }
    }

    let divider = (bits.len() / 33) * 32;
    let (entropy_bits, checksum_bits) = bits.split_at(divider);

    let entropy: Vec<u8> = entropy_bits
        .chunks(8)
        .map(|byte| byte.iter().fold(0u8, |acc, &b| (acc << 1) | b as u8))
        .collect();
    check_entropy_len(entropy.len())?;

    let digest = Sha256::digest(&entropy);
    let matches = checksum_bits
        .iter()
        .enumerate()
        .all(|(i, &b)| (bit(&digest, i) == 1) == b);
    if !matches {
        return Err(WalletError::InvalidMnemonic);
    }

    Ok(entropy)
}

fn bit(bytes: &[u8], i: usize) -> usize {
    ((bytes[i / 8] >> (7 - (i % 8))) & 1) as usize
}

fn check_entropy_len(len: usize) -> Result<(), WalletError> {
    if !(16..=32).contains(&len) || len % 4 != 0 {
        return Err(WalletError::InvalidEntropy);
    }
    Ok(())
}

fn check_wordlist(wordlist: &[&str]) -> Result<(), WalletError> {
    if wordlist.len() != WORDLIST_LEN {
        return Err(WalletError::InvalidWordlist(wordlist.len()));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MnemonicType {
    Short = 12,
    Long = 24,
}

impl MnemonicType {
    /// Entropy strength in bits.
    pub fn strength(self) -> usize {
        match self {
            MnemonicType::Short => 128,
            MnemonicType::Long => 256,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct MnemonicPhrase {
    phrase: String,
    words: Vec<String>,
    kind: MnemonicType,
}

impl MnemonicPhrase {
    /// Wraps an existing phrase. Only the word count is checked here;
    /// use [`to_entropy`] to verify the checksum.
    ///
    /// Words are rejoined with single spaces, so the seed does not depend on
    /// how the phrase was typed.
    pub fn new(phrase: &str) -> Result<Self, WalletError> {
        let words: Vec<String> = phrase.split_whitespace().map(str::to_string).collect();
        let kind = match words.len() {
            12 => MnemonicType::Short,
            24 => MnemonicType::Long,
            n => return Err(WalletError::InvalidWordCount(n)),
        };

        Ok(MnemonicPhrase {
            phrase: words.join(" "),
            words,
            kind,
        })
    }

    pub fn generate(kind: MnemonicType, language: Language) -> Result<Self, WalletError> {
        let mut entropy = vec![0u8; kind.strength() / 8];
        OsRng.fill_bytes(&mut entropy);

        let phrase = to_mnemonic(&entropy, language.word_list())?;
        MnemonicPhrase::new(&phrase)
    }

    /// Cheap shape check for user input: lower-case words, exactly twelve.
    pub fn is_valid(phrase: &str) -> bool {
        let words = phrase.trim();
        if words.is_empty()
            || !words
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_whitespace())
        {
            return false;
        }
        words.split_whitespace().count() == 12
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn kind(&self) -> MnemonicType {
        self.kind
    }

    pub fn to_descriptor(&self, path: &Path) -> KeyDescriptor {
        descriptor_from_mnemonic(path, &self.phrase, "")
    }

    pub fn to_keypair(&self, path: &Path) -> Keypair {
        self.to_descriptor(path).to_keypair()
    }
}

impl fmt::Debug for MnemonicPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MnemonicPhrase")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
