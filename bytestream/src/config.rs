//! Configuration for [crate::ByteStream].

use crate::{compression::Algorithm, Endian};

/// The zlib default compression level.
pub const DEFAULT_LEVEL: u32 = 6;

/// The highest compression level accepted by DEFLATE.
pub const MAX_LEVEL: u32 = 9;

/// How [crate::ByteStream::write_bytes] and [crate::ByteStream::read_bytes] interpret an
/// explicit length of zero.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum ZeroLength {
    /// `Some(0)` transfers nothing.
    #[default]
    Explicit,

    /// `Some(0)` is treated like `None` and transfers the default (remaining) amount.
    ///
    /// This reproduces the behavior of legacy byte-array implementations that could not
    /// distinguish a zero length from an omitted one.
    Remaining,
}

impl ZeroLength {
    /// Normalizes a caller-supplied length according to this policy.
    pub(crate) fn resolve(self, length: Option<usize>) -> Option<usize> {
        match (self, length) {
            (Self::Remaining, Some(0)) => None,
            (_, length) => length,
        }
    }
}

/// Configuration for a [crate::ByteStream].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    /// Byte order the stream starts with.
    pub endian: Endian,

    /// Framing used by [crate::ByteStream::compress] and [crate::ByteStream::uncompress].
    pub compression: Algorithm,

    /// Compression level, from 0 (store) to 9 (best). Values above 9 are clamped.
    pub level: u32,

    /// Interpretation of a zero length passed to sub-buffer transfers.
    pub zero_length: ZeroLength,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endian: Endian::BigEndian,
            compression: Algorithm::Zlib,
            level: DEFAULT_LEVEL,
            zero_length: ZeroLength::Explicit,
        }
    }
}

impl Config {
    /// Returns a configuration that mirrors legacy byte-array behavior.
    pub fn legacy() -> Self {
        Self {
            zero_length: ZeroLength::Remaining,
            ..Self::default()
        }
    }

    /// Returns the compression level, clamped to [MAX_LEVEL].
    pub(crate) fn level(&self) -> u32 {
        self.level.min(MAX_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        assert_eq!(ZeroLength::Explicit.resolve(Some(0)), Some(0));
        assert_eq!(ZeroLength::Explicit.resolve(None), None);
        assert_eq!(ZeroLength::Explicit.resolve(Some(3)), Some(3));
        assert_eq!(ZeroLength::Remaining.resolve(Some(0)), None);
        assert_eq!(ZeroLength::Remaining.resolve(None), None);
        assert_eq!(ZeroLength::Remaining.resolve(Some(3)), Some(3));
    }

    #[test]
    fn test_level_clamped() {
        let cfg = Config {
            level: 42,
            ..Config::default()
        };
        assert_eq!(cfg.level(), MAX_LEVEL);
        assert_eq!(Config::default().level(), DEFAULT_LEVEL);
    }

    #[test]
    fn test_legacy() {
        let cfg = Config::legacy();
        assert_eq!(cfg.zero_length, ZeroLength::Remaining);
        assert_eq!(cfg.endian, Endian::BigEndian);
        assert_eq!(cfg.compression, Algorithm::Zlib);
    }
}
