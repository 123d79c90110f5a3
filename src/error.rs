use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Invalid path identifier: {0}")]
    InvalidPathIdentifier(String),
    #[error("Invalid index: {0}")]
    InvalidIndex(String),
    #[error("Invalid entropy")]
    InvalidEntropy,
    #[error("Invalid mnemonic")]
    InvalidMnemonic,
    #[error("Invalid number of words: {0}")]
    InvalidWordCount(usize),
    #[error("Invalid wordlist: expected 2048 words, got {0}")]
    InvalidWordlist(usize),
    #[error("Invalid offset for account type")]
    InvalidOffset,
    #[error("Unknown account type: {0}")]
    UnknownAccountType(String),
    #[error("Unknown timelock account state")]
    UnknownState,
    #[error("State is not initialized")]
    NotInitialized,
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Encode error: {0}")]
    Encode(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Quark(#[from] QuarkError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Which side of the quark conversion rejected the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denomination {
    Quark,
    Unit,
}

impl std::fmt::Display for Denomination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Denomination::Quark => write!(f, "Quark"),
            Denomination::Unit => write!(f, "Kin"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuarkError {
    #[error("{0} amount is not a number")]
    NotANumber(Denomination),
    #[error("{0} amount is not a finite number")]
    NotFinite(Denomination),
    #[error("{0} amount is not a safe integer")]
    NotSafeInteger(Denomination),
    #[error("{0} amount is negative")]
    Negative(Denomination),
    #[error("{0} amount is not a whole number")]
    NotWholeNumber(Denomination),
    #[error("{0} amount is too large")]
    TooLarge(Denomination),
    #[error("{0} amount is too small")]
    TooSmall(Denomination),
}

/// Failures of the program-derived-address primitive.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Length of the seed is too long for address generation")]
    MaxSeedLengthExceeded,
    #[error("Too many seeds for address generation: {0}")]
    TooManySeeds(usize),
    #[error("Unable to find a viable program address bump seed")]
    NoViableBump,
    #[error("Invalid program id: {0}")]
    InvalidProgramId(String),
    #[error("Resolver failure: {0}")]
    Remote(String),
}
