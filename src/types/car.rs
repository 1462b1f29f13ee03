//! Contract-level value types

use crate::constants::MAX_PHASE;
use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Minted/cap pair returned by `mintQuota` and `airdropQuota`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Quota {
    /// Tokens already minted or claimed
    pub minted: u8,
    /// Maximum the address may mint or claim
    pub cap: u8,
}

impl fmt::Display for Quota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Minted: {}, Cap: {}", self.minted, self.cap)
    }
}

/// Minting phase as stored by the contract (`int8`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Phase(pub i8);

impl Phase {
    pub const CLOSED: Phase = Phase(0);
    pub const WHITELIST: Phase = Phase(1);
    pub const PUBLIC: Phase = Phase(2);

    /// Human readable name for known phases
    pub fn name(&self) -> Option<&'static str> {
        match self.0 {
            0 => Some("closed"),
            1 => Some("whitelist"),
            2 => Some("public"),
            _ => None,
        }
    }

    /// Validate a phase before sending it to the contract
    pub fn checked(value: i8) -> Result<Self, Error> {
        if (0..=MAX_PHASE).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::config(format!("phase should be 0-{MAX_PHASE}, got {value}")))
        }
    }
}

impl From<Phase> for i8 {
    fn from(phase: Phase) -> i8 {
        phase.0
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", self.0, name),
            None => write!(f, "{}", self.0),
        }
    }
}

impl FromStr for Phase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let value = match s.to_ascii_lowercase().as_str() {
            "closed" => return Ok(Self::CLOSED),
            "whitelist" => return Ok(Self::WHITELIST),
            "public" => return Ok(Self::PUBLIC),
            _ => s
                .parse::<i8>()
                .map_err(|_| Error::config(format!("phase should be 0-{MAX_PHASE}, got {s:?}")))?,
        };
        Self::checked(value)
    }
}
