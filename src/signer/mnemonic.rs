//! Mnemonic-backed local account

use crate::constants::{derivation_path, MAX_ACCOUNT_INDEX};
use crate::error::{Error, Result};
use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};
use std::fmt;
use std::path::Path;

/// Signing identity derived from a mnemonic at one BIP-44 index
#[derive(Clone)]
pub struct Account {
    index: u32,
    signer: PrivateKeySigner,
}

impl Account {
    /// Derive the account at `index` from the mnemonic stored in `path`
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let account = Account::from_mnemonic_file("secrets/mnemonic.txt", 0)?;
    /// println!("operator: {}", account.address());
    /// ```
    pub fn from_mnemonic_file(path: impl AsRef<Path>, index: u32) -> Result<Self> {
        let phrase = load_mnemonic(path)?;
        Self::from_phrase(&phrase, index)
    }

    /// Derive the account at `index` from a mnemonic phrase
    pub fn from_phrase(phrase: &str, index: u32) -> Result<Self> {
        let phrase = phrase.trim();
        if phrase.is_empty() {
            return Err(Error::KeyDerivation("mnemonic is empty".to_string()));
        }
        if index > MAX_ACCOUNT_INDEX {
            return Err(Error::KeyDerivation(format!(
                "account index {index} exceeds {MAX_ACCOUNT_INDEX}"
            )));
        }

        let path = derivation_path(index);
        let signer = MnemonicBuilder::<English>::default()
            .phrase(phrase)
            .derivation_path(&path)
            .and_then(|builder| builder.build())
            .map_err(|e| Error::KeyDerivation(format!("derive {path}: {e}")))?;

        Ok(Self { index, signer })
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Derivation index
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Wallet used by the provider to sign transactions
    pub fn wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("index", &self.index)
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Read the mnemonic phrase from a file, trimming surrounding whitespace
pub fn load_mnemonic(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("read mnemonic {}: {e}", path.display())))?;
    Ok(raw.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use std::io::Write;

    const PHRASE: &str = "test test test test test test test test test test test junk";

    #[test]
    fn test_known_addresses() {
        let first = Account::from_phrase(PHRASE, 0).unwrap();
        assert_eq!(first.address(), address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));

        let second = Account::from_phrase(PHRASE, 1).unwrap();
        assert_eq!(second.address(), address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8"));
        assert_eq!(second.index(), 1);
    }

    #[test]
    fn test_derivation_is_deterministic() {
        for index in [0, 5, 42] {
            let a = Account::from_phrase(PHRASE, index).unwrap();
            let b = Account::from_phrase(PHRASE, index).unwrap();
            assert_eq!(a.address(), b.address());
        }
    }

    #[test]
    fn test_file_is_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  {PHRASE}  ").unwrap();
        let account = Account::from_mnemonic_file(file.path(), 0).unwrap();
        assert_eq!(account.address(), address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = Account::from_mnemonic_file("/no/such/mnemonic.txt", 0).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_malformed_mnemonic() {
        let err = Account::from_phrase("correct horse battery staple", 0).unwrap_err();
        assert!(matches!(err, Error::KeyDerivation(_)));

        let err = Account::from_phrase("   \n", 0).unwrap_err();
        assert!(matches!(err, Error::KeyDerivation(_)));
    }

    #[test]
    fn test_hardened_range_index_rejected() {
        let last = Account::from_phrase(PHRASE, MAX_ACCOUNT_INDEX).unwrap();
        assert_eq!(last.index(), MAX_ACCOUNT_INDEX);

        for index in [1 << 31, u32::MAX] {
            let err = Account::from_phrase(PHRASE, index).unwrap_err();
            assert!(matches!(err, Error::KeyDerivation(msg) if msg.contains(&index.to_string())));
        }
    }

    #[test]
    fn test_debug_hides_key() {
        let account = Account::from_phrase(PHRASE, 0).unwrap();
        let debug = format!("{account:?}");
        assert!(debug.contains("address"));
        assert!(!debug.contains("signer"));
    }
}
