//! Byte order used for multi-byte values.

use crate::Error;
use std::{fmt, str::FromStr};

/// Byte order applied to every multi-byte numeric read and write.
///
/// Given the value `0x12345678`, a stream using [Endian::BigEndian] writes `12 34 56 78` while
/// a stream using [Endian::LittleEndian] writes `78 56 34 12`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Endian {
    /// Most significant byte first.
    #[default]
    BigEndian,
    /// Least significant byte first.
    LittleEndian,
}

impl Endian {
    /// Returns the canonical name of the byte order (`"bigEndian"` or `"littleEndian"`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BigEndian => "bigEndian",
            Self::LittleEndian => "littleEndian",
        }
    }
}

impl fmt::Display for Endian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Endian {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bigEndian" => Ok(Self::BigEndian),
            "littleEndian" => Ok(Self::LittleEndian),
            other => Err(Error::InvalidEndian(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_big_endian() {
        assert_eq!(Endian::default(), Endian::BigEndian);
    }

    #[test]
    fn test_names() {
        for endian in [Endian::BigEndian, Endian::LittleEndian] {
            let name = endian.to_string();
            assert_eq!(name, endian.as_str());
            assert_eq!(name.parse::<Endian>().unwrap(), endian);
        }
        assert_eq!(Endian::BigEndian.as_str(), "bigEndian");
        assert_eq!(Endian::LittleEndian.as_str(), "littleEndian");
    }

    #[test]
    fn test_parse_unknown() {
        let result = "middleEndian".parse::<Endian>();
        assert!(matches!(result, Err(Error::InvalidEndian(ref s)) if s == "middleEndian"));

        // Names are case-sensitive.
        assert!("BIG_ENDIAN".parse::<Endian>().is_err());
    }
}
