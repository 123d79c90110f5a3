//! Hierarchical derivation paths (`m/44'/501'/0'/0'`).

use std::fmt;
use std::str::FromStr;

use crate::error::WalletError;

/// A single path component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Index {
    value: u32,
    hardened: bool,
}

impl Index {
    pub const HARDEN_OFFSET: u32 = 0x8000_0000;
    pub const MAX_INDEX: u32 = 0x7fff_ffff;

    /// Normal (unhardened) index.
    pub fn new(value: u32) -> Result<Self, WalletError> {
        Self::with_hardening(value, false)
    }

    /// Hardened index, written with a trailing `'`.
    pub fn hardened(value: u32) -> Result<Self, WalletError> {
        Self::with_hardening(value, true)
    }

    fn with_hardening(value: u32, hardened: bool) -> Result<Self, WalletError> {
        if value > Self::MAX_INDEX {
            return Err(WalletError::InvalidIndex(value.to_string()));
        }
        Ok(Index { value, hardened })
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn is_hardened(&self) -> bool {
        self.hardened
    }

    /// Big-endian serialization with the hardening bit applied.
    pub fn to_bytes(&self) -> [u8; 4] {
        let mut value = self.value;
        if self.hardened {
            value += Self::HARDEN_OFFSET;
        }
        value.to_be_bytes()
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        if self.hardened {
            write!(f, "{}", Path::HARDENER)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    indexes: Vec<Index>,
}

impl Path {
    pub const IDENTIFIER: &'static str = "m";
    pub const SEPARATOR: char = '/';
    pub const HARDENER: char = '\'';

    pub fn from_indexes(indexes: Vec<Index>) -> Self {
        Path { indexes }
    }

    pub fn indexes(&self) -> &[Index] {
        &self.indexes
    }

    /// Returns a copy of this path extended by `index`.
    pub fn child(&self, index: Index) -> Path {
        let mut indexes = self.indexes.clone();
        indexes.push(index);
        Path { indexes }
    }

    pub fn parse(path: &str) -> Result<Path, WalletError> {
        let mut components = path.split(Self::SEPARATOR);

        // split always yields at least one item
        let identifier = components.next().unwrap_or_default();
        if identifier != Self::IDENTIFIER {
            return Err(WalletError::InvalidPathIdentifier(identifier.to_string()));
        }

        let indexes = components
            .map(parse_index)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Path { indexes })
    }

    pub fn stringify(&self) -> String {
        self.to_string()
    }
}

fn parse_index(component: &str) -> Result<Index, WalletError> {
    let invalid = || WalletError::InvalidIndex(component.to_string());

    let (digits, hardened) = match component.strip_suffix(Path::HARDENER) {
        Some(digits) => (digits, true),
        None => (component, false),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let value: u32 = digits.parse().map_err(|_| invalid())?;
    Index::with_hardening(value, hardened).map_err(|_| invalid())
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::IDENTIFIER)?;
        for index in &self.indexes {
            write!(f, "{}{}", Self::SEPARATOR, index)?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for s in [
            "m",
            "m/0",
            "m/0'",
            "m/44'/501'/0'/0'",
            "m/44'/501'/0'/0'/7'/1000000'",
            "m/1/2'/3/2147483647'",
        ] {
            let path = Path::parse(s).unwrap();
            assert_eq!(path.stringify(), s);
        }
    }

    #[test]
    fn test_empty_path() {
        let path: Path = "m".parse().unwrap();
        assert!(path.indexes().is_empty());
        assert_eq!(Path::default().to_string(), "m");
    }

    #[test]
    fn test_invalid_identifier() {
        for s in ["", "M/0'", "x/44'", "/44'"] {
            assert!(matches!(
                Path::parse(s),
                Err(WalletError::InvalidPathIdentifier(_))
            ));
        }
    }

    #[test]
    fn test_invalid_index() {
        for s in ["m/", "m/a", "m/-1", "m/1''", "m/'", "m/2147483648", "m/1 ", "m/+1"] {
            assert!(
                matches!(Path::parse(s), Err(WalletError::InvalidIndex(_))),
                "{s} should be rejected"
            );
        }
    }

    #[test]
    fn test_index_bytes() {
        assert_eq!(Index::new(1).unwrap().to_bytes(), [0, 0, 0, 1]);
        assert_eq!(Index::hardened(1).unwrap().to_bytes(), [0x80, 0, 0, 1]);
        assert_eq!(
            Index::hardened(Index::MAX_INDEX).unwrap().to_bytes(),
            [0xff, 0xff, 0xff, 0xff]
        );
        assert!(Index::new(Index::MAX_INDEX + 1).is_err());
    }

    #[test]
    fn test_child() {
        let base = Path::parse("m/44'/501'").unwrap();
        let child = base.child(Index::hardened(3).unwrap());
        assert_eq!(child.to_string(), "m/44'/501'/3'");
        assert_eq!(base.to_string(), "m/44'/501'");
    }
}
