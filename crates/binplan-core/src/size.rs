//! Byte-size values for configuration files.
//!
//! Accepts either a plain integer (bytes) or a string with a unit suffix:
//! `B`, `KB`/`MB`/`GB` (powers of 1000) or `KiB`/`MiB`/`GiB` (powers of 1024).
//! Units are matched case-insensitively.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizeParseError {
    #[error("empty size value")]
    Empty,
    #[error("invalid size number: {0}")]
    InvalidNumber(String),
    #[error("unknown size unit: {0}")]
    UnknownUnit(String),
    #[error("size overflows 64 bits: {0}")]
    Overflow(String),
}

/// A number of bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawSize", into = "u64")]
pub struct ByteSize(pub u64);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSize {
    Bytes(u64),
    Text(String),
}

impl ByteSize {
    pub const fn mib(n: u64) -> Self {
        Self(n * MIB)
    }

    pub fn bytes(self) -> u64 {
        self.0
    }
}

impl FromStr for ByteSize {
    type Err = SizeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SizeParseError::Empty);
        }

        let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (number, unit) = s.split_at(split);
        let number: u64 = number
            .parse()
            .map_err(|_| SizeParseError::InvalidNumber(s.to_string()))?;

        let multiplier = match unit.trim().to_ascii_lowercase().as_str() {
            "" | "b" => 1,
            "kb" => 1_000,
            "mb" => 1_000_000,
            "gb" => 1_000_000_000,
            "kib" => KIB,
            "mib" => MIB,
            "gib" => GIB,
            other => return Err(SizeParseError::UnknownUnit(other.to_string())),
        };

        number
            .checked_mul(multiplier)
            .map(ByteSize)
            .ok_or_else(|| SizeParseError::Overflow(s.to_string()))
    }
}

impl TryFrom<RawSize> for ByteSize {
    type Error = SizeParseError;

    fn try_from(raw: RawSize) -> Result<Self, Self::Error> {
        match raw {
            RawSize::Bytes(n) => Ok(ByteSize(n)),
            RawSize::Text(s) => s.parse(),
        }
    }
}

impl From<ByteSize> for u64 {
    fn from(size: ByteSize) -> u64 {
        size.0
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.0;
        if n >= GIB && n % GIB == 0 {
            write!(f, "{}GiB", n / GIB)
        } else if n >= MIB && n % MIB == 0 {
            write!(f, "{}MiB", n / MIB)
        } else if n >= KIB && n % KIB == 0 {
            write!(f, "{}KiB", n / KIB)
        } else {
            write!(f, "{n}B")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_units() {
        assert_eq!("128MiB".parse::<ByteSize>().unwrap(), ByteSize(128 * 1024 * 1024));
        assert_eq!("256 mib".parse::<ByteSize>().unwrap(), ByteSize::mib(256));
        assert_eq!("5KB".parse::<ByteSize>().unwrap(), ByteSize(5_000));
        assert_eq!("1GiB".parse::<ByteSize>().unwrap(), ByteSize(GIB));
        assert_eq!("150".parse::<ByteSize>().unwrap(), ByteSize(150));
        assert_eq!("150B".parse::<ByteSize>().unwrap(), ByteSize(150));
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!("".parse::<ByteSize>(), Err(SizeParseError::Empty));
        assert!(matches!("MiB".parse::<ByteSize>(), Err(SizeParseError::InvalidNumber(_))));
        assert!(matches!("12TB".parse::<ByteSize>(), Err(SizeParseError::UnknownUnit(_))));
        assert!(matches!(
            "99999999999999GiB".parse::<ByteSize>(),
            Err(SizeParseError::Overflow(_))
        ));
    }

    #[test]
    fn display_prefers_largest_exact_unit() {
        assert_eq!(ByteSize::mib(128).to_string(), "128MiB");
        assert_eq!(ByteSize(2048).to_string(), "2KiB");
        assert_eq!(ByteSize(150).to_string(), "150B");
    }
}
