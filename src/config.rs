use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::address::Address;
use crate::error::WalletError;
use crate::keyphrase::{MnemonicPhrase, Path, DEFAULT_PATH};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct WalletConfig {
    pub program: ProgramConfig,
    pub tray: TrayConfig,
}

/// Parameters baked into every timelock address. Changing any of them
/// yields a different set of accounts.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProgramConfig {
    pub mint: String,
    pub time_authority: String,
    #[serde(default = "default_program_id")]
    pub program_id: String,
    /// Days a deposit stays locked after an unlock request
    pub unlock_duration: u8,
    #[serde(default = "default_path")]
    pub default_path: String,
}

fn default_program_id() -> String {
    "time2Z2SCnn3qYg3ULKVtdkh8YmZ5jFdKicnA1W2YnJ".to_string()
}

fn default_path() -> String {
    DEFAULT_PATH.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TrayConfig {
    pub bucket_count: u32,
    pub bucket_increment: u32,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            program: ProgramConfig {
                mint: "kinXdEcpDQeHPEuQnqmUgtYykqKGVFq6CeVX5iAHJq6".to_string(),
                time_authority: "codeHy87wGD5oMRLG75qKqsSi1vWE3oxNyYmXo5F9YR".to_string(),
                program_id: default_program_id(),
                unlock_duration: 21,
                default_path: default_path(),
            },
            tray: TrayConfig {
                bucket_count: 7,
                bucket_increment: 10,
            },
        }
    }
}

impl WalletConfig {
    pub fn load_or_default(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            match std::fs::read_to_string(path) {
                Ok(s) => match toml::from_str(&s) {
                    Ok(c) => {
                        info!("Config loaded from {}", path);
                        c
                    }
                    Err(e) => {
                        warn!("Error parsing config: {}. Using defaults.", e);
                        Self::default()
                    }
                },
                Err(e) => {
                    warn!("Error reading config: {}. Using defaults.", e);
                    Self::default()
                }
            }
        } else {
            info!("Config file not found at '{}'. Creating default.", path);
            let config = Self::default();
            if let Err(e) = config.save(path) {
                warn!("Could not write default config: {}", e);
            }
            config
        }
    }

    pub fn save(&self, path: &str) -> Result<(), WalletError> {
        let s = toml::to_string_pretty(self).map_err(|e| WalletError::Config(e.to_string()))?;
        std::fs::write(path, s).map_err(|e| WalletError::Config(e.to_string()))
    }
}

/// Everything needed to reproduce a tray's addresses. Derivation is a pure
/// function of this value plus (account type, index, offset).
#[derive(Debug, Clone, PartialEq)]
pub struct CodeWalletData {
    pub mint: Address,
    pub time_authority: Address,
    pub program_id: Address,
    pub unlock_duration: u8,
    pub default_path: Path,
    pub keyphrase: MnemonicPhrase,
    pub bucket_count: u32,
    pub bucket_increment: u32,
}

impl CodeWalletData {
    pub fn from_config(config: &WalletConfig, keyphrase: &str) -> Result<Self, WalletError> {
        Ok(CodeWalletData {
            mint: config.program.mint.parse()?,
            time_authority: config.program.time_authority.parse()?,
            program_id: config.program.program_id.parse()?,
            unlock_duration: config.program.unlock_duration,
            default_path: config.program.default_path.parse()?,
            keyphrase: MnemonicPhrase::new(keyphrase)?,
            bucket_count: config.tray.bucket_count,
            bucket_increment: config.tray.bucket_increment,
        })
    }

    /// Environment with the stock program parameters.
    pub fn with_defaults(keyphrase: &str) -> Result<Self, WalletError> {
        Self::from_config(&WalletConfig::default(), keyphrase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const PHRASE: &str = "abandon abandon abandon abandon abandon abandon \
        abandon abandon abandon abandon abandon about";

    #[test]
    fn test_default_config() {
        let config = WalletConfig::default();
        assert_eq!(config.program.unlock_duration, 21);
        assert_eq!(config.program.default_path, "m/44'/501'/0'/0'");
        assert_eq!(config.tray.bucket_count, 7);
        assert_eq!(config.tray.bucket_increment, 10);
    }

    #[test]
    fn test_defaults_parse_into_environment() {
        let env = CodeWalletData::with_defaults(PHRASE).unwrap();
        assert_eq!(env.mint.to_string(), "kinXdEcpDQeHPEuQnqmUgtYykqKGVFq6CeVX5iAHJq6");
        assert_eq!(env.default_path.indexes().len(), 4);
    }

    #[test]
    fn test_bad_values_rejected() {
        let mut config = WalletConfig::default();
        config.program.mint = "not-base58!".to_string();
        assert!(matches!(
            CodeWalletData::from_config(&config, PHRASE),
            Err(WalletError::InvalidAddress(_))
        ));

        let mut config = WalletConfig::default();
        config.program.default_path = "44'/501'".to_string();
        assert!(matches!(
            CodeWalletData::from_config(&config, PHRASE),
            Err(WalletError::InvalidPathIdentifier(_))
        ));

        assert!(matches!(
            CodeWalletData::with_defaults("abandon about"),
            Err(WalletError::InvalidWordCount(2))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tray.toml");
        let path = path.to_str().unwrap();

        let mut config = WalletConfig::default();
        config.tray.bucket_count = 3;
        config.save(path).unwrap();

        assert_eq!(WalletConfig::load_or_default(path), config);
    }

    #[test]
    fn test_missing_file_writes_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let path = path.to_str().unwrap();

        assert_eq!(WalletConfig::load_or_default(path), WalletConfig::default());
        assert!(std::path::Path::new(path).exists());
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "program = 5").unwrap();
        assert_eq!(
            WalletConfig::load_or_default(path.to_str().unwrap()),
            WalletConfig::default()
        );
    }

    #[test]
    fn test_optional_fields_default() {
        let config: WalletConfig = toml::from_str(
            r#"
            [program]
            mint = "kinXdEcpDQeHPEuQnqmUgtYykqKGVFq6CeVX5iAHJq6"
            time_authority = "codeHy87wGD5oMRLG75qKqsSi1vWE3oxNyYmXo5F9YR"
            unlock_duration = 7

            [tray]
            bucket_count = 2
            bucket_increment = 100
            "#,
        )
        .unwrap();
        assert_eq!(config.program.program_id, default_program_id());
        assert_eq!(config.program.default_path, DEFAULT_PATH);
    }
}
