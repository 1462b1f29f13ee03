//! Constants for transaction building and account derivation

use std::time::Duration;

/// Gas limit ceiling for every write call.
/// Sized for `addWhitelist` / `addAirdrop` with a few hundred addresses.
pub const GAS_LIMIT: u64 = 6_721_975;

/// Default interval between confirmation polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Consecutive "unknown transaction" lookups before a transaction is considered dropped
pub const DEFAULT_DROP_AFTER_MISSES: u32 = 30;

/// BIP-44 Ethereum derivation path prefix; the account index is appended
pub const DERIVATION_PATH_PREFIX: &str = "m/44'/60'/0'/0/";

/// Highest non-hardened BIP-32 child index; larger values would select a hardened key
pub const MAX_ACCOUNT_INDEX: u32 = (1 << 31) - 1;

/// Highest phase value the contract accepts
pub const MAX_PHASE: i8 = 2;

/// Default configuration file
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Full derivation path for an account index
pub fn derivation_path(index: u32) -> String {
    format!("{DERIVATION_PATH_PREFIX}{index}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivation_path() {
        assert_eq!(derivation_path(0), "m/44'/60'/0'/0/0");
        assert_eq!(derivation_path(17), "m/44'/60'/0'/0/17");
    }
}
