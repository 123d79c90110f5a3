use crate::error::WalletError;
use crate::keyphrase::{MnemonicPhrase, MnemonicType, Path, DEFAULT_LANGUAGE};

pub fn handle_generate(long: bool) -> Result<(), WalletError> {
    let kind = if long { MnemonicType::Long } else { MnemonicType::Short };
    let phrase = MnemonicPhrase::generate(kind, DEFAULT_LANGUAGE)?;

    println!("[SECRET MNEMONIC] - Write this down securely and NEVER share it:");
    println!("---------------------------------------------------------------");
    println!("{}", phrase.phrase());
    println!("---------------------------------------------------------------");
    Ok(())
}

pub fn handle_derive(path: &str, keyphrase: &str) -> Result<(), WalletError> {
    let path: Path = path.parse()?;
    let phrase = MnemonicPhrase::new(keyphrase)?;
    let keypair = phrase.to_keypair(&path);

    println!("Path:       {}", path);
    println!("Public Key: {}", keypair.public_key());
    Ok(())
}
