//! Whole-buffer compression.
//!
//! [ByteStream::compress] replaces the contents of a stream with their compressed form and
//! [ByteStream::uncompress] reverses it. Both move the cursor to the start of the new contents.
//! The framing is selected by [crate::Config::compression] and can be overridden per call.

use crate::{ByteStream, Error};
use bytes::BytesMut;
use flate2::{
    read::{DeflateDecoder, ZlibDecoder},
    write::{DeflateEncoder, ZlibEncoder},
    Compression,
};
use std::io::{Read, Write};
use tracing::debug;

/// Framing applied around DEFLATE-compressed data.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Algorithm {
    /// DEFLATE wrapped in a zlib header and checksum (RFC 1950).
    #[default]
    Zlib,
    /// Raw DEFLATE without any header (RFC 1951).
    Deflate,
}

/// Compresses `data` at the given `level` (0-9).
pub fn encode(data: &[u8], algorithm: Algorithm, level: u32) -> Result<Vec<u8>, Error> {
    let level = Compression::new(level);
    match algorithm {
        Algorithm::Zlib => {
            let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len()), level);
            encoder.write_all(data).map_err(Error::Compress)?;
            encoder.finish().map_err(Error::Compress)
        }
        Algorithm::Deflate => {
            let mut encoder = DeflateEncoder::new(Vec::with_capacity(data.len()), level);
            encoder.write_all(data).map_err(Error::Compress)?;
            encoder.finish().map_err(Error::Compress)
        }
    }
}

/// Decompresses `data`, failing with [Error::Decompress] if it is not a valid stream.
pub fn decode(data: &[u8], algorithm: Algorithm) -> Result<Vec<u8>, Error> {
    let mut decompressed = Vec::new();
    let result = match algorithm {
        Algorithm::Zlib => ZlibDecoder::new(data).read_to_end(&mut decompressed),
        Algorithm::Deflate => DeflateDecoder::new(data).read_to_end(&mut decompressed),
    };
    result.map_err(Error::Decompress)?;
    Ok(decompressed)
}

impl ByteStream {
    /// Compresses the entire buffer using the configured algorithm.
    pub fn compress(&mut self) -> Result<(), Error> {
        self.compress_with(self.config().compression)
    }

    /// Decompresses the entire buffer using the configured algorithm.
    ///
    /// On failure the stream is left unchanged.
    pub fn uncompress(&mut self) -> Result<(), Error> {
        self.uncompress_with(self.config().compression)
    }

    /// Compresses the entire buffer as raw DEFLATE.
    pub fn deflate(&mut self) -> Result<(), Error> {
        self.compress_with(Algorithm::Deflate)
    }

    /// Decompresses an entire buffer of raw DEFLATE.
    pub fn inflate(&mut self) -> Result<(), Error> {
        self.uncompress_with(Algorithm::Deflate)
    }

    /// Compresses the entire buffer using `algorithm`.
    pub fn compress_with(&mut self, algorithm: Algorithm) -> Result<(), Error> {
        let compressed = encode(self.as_slice(), algorithm, self.config().level())?;
        debug!(
            ?algorithm,
            before = self.length(),
            after = compressed.len(),
            "compressed stream"
        );
        self.replace(BytesMut::from(&compressed[..]));
        Ok(())
    }

    /// Decompresses the entire buffer using `algorithm`.
    pub fn uncompress_with(&mut self, algorithm: Algorithm) -> Result<(), Error> {
        let decompressed = decode(self.as_slice(), algorithm)?;
        debug!(
            ?algorithm,
            before = self.length(),
            after = decompressed.len(),
            "decompressed stream"
        );
        self.replace(BytesMut::from(&decompressed[..]));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, Endian};
    use rand::{rngs::StdRng, RngCore, SeedableRng};
    use test_case::test_case;

    #[test_case(Algorithm::Zlib; "zlib")]
    #[test_case(Algorithm::Deflate; "deflate")]
    fn test_roundtrip(algorithm: Algorithm) {
        let mut rng = StdRng::seed_from_u64(0);
        let mut data = vec![0u8; 4096];
        rng.fill_bytes(&mut data);
        data.extend(std::iter::repeat(7u8).take(4096));

        let encoded = encode(&data, algorithm, 6).unwrap();
        assert_eq!(decode(&encoded, algorithm).unwrap(), data);
    }

    #[test]
    fn test_zlib_header() {
        let encoded = encode(b"hello", Algorithm::Zlib, 6).unwrap();

        // CMF of 0x78 is DEFLATE with a 32K window; CMF/FLG must be a multiple of 31.
        assert_eq!(encoded[0], 0x78);
        assert_eq!(u16::from_be_bytes([encoded[0], encoded[1]]) % 31, 0);

        let raw = encode(b"hello", Algorithm::Deflate, 6).unwrap();
        assert_ne!(raw[0], 0x78);
        assert!(encoded.len() > raw.len());
    }

    #[test]
    fn test_levels() {
        let data = vec![42u8; 10_000];
        let stored = encode(&data, Algorithm::Zlib, 0).unwrap();
        let best = encode(&data, Algorithm::Zlib, 9).unwrap();
        assert!(stored.len() > data.len());
        assert!(best.len() < data.len() / 10);
        assert_eq!(decode(&stored, Algorithm::Zlib).unwrap(), data);
        assert_eq!(decode(&best, Algorithm::Zlib).unwrap(), data);
    }

    #[test_case(Algorithm::Zlib; "zlib")]
    #[test_case(Algorithm::Deflate; "deflate")]
    fn test_decode_invalid(algorithm: Algorithm) {
        let result = decode(&[0xFF, 0xFF, 0xFF, 0xFF], algorithm);
        assert!(matches!(result, Err(Error::Decompress(_))));
    }

    #[test]
    fn test_stream_compress() {
        let mut s = ByteStream::new();
        s.write_utf("100000GEGLexaaaa").unwrap();
        s.write_int(7).unwrap();
        let original = s.to_bytes();

        s.compress().unwrap();
        assert_eq!(s.position(), 0);
        assert_ne!(s.to_bytes(), original);
        assert_eq!(decode(s.as_slice(), Algorithm::Zlib).unwrap(), original);

        s.set_position(3);
        s.uncompress().unwrap();
        assert_eq!(s.position(), 0);
        assert_eq!(s.to_bytes(), original);
        assert_eq!(s.read_utf().unwrap(), "100000GEGLexaaaa");
        assert_eq!(s.read_int().unwrap(), 7);
    }

    #[test]
    fn test_stream_deflate() {
        let mut s = ByteStream::new();
        s.set_endian(Endian::LittleEndian);
        s.write_double(1242324.24).unwrap();
        let original = s.to_bytes();

        s.deflate().unwrap();
        assert_eq!(decode(s.as_slice(), Algorithm::Deflate).unwrap(), original);
        s.inflate().unwrap();
        assert_eq!(s.read_double().unwrap(), 1242324.24);
    }

    #[test]
    fn test_stream_configured_algorithm() {
        let cfg = Config {
            compression: Algorithm::Deflate,
            level: 9,
            ..Config::default()
        };
        let mut s = ByteStream::from_bytes(&[1u8; 256][..], cfg);
        s.compress().unwrap();
        assert_eq!(
            decode(s.as_slice(), Algorithm::Deflate).unwrap(),
            vec![1u8; 256]
        );
        s.uncompress().unwrap();
        assert_eq!(s.as_slice(), &[1u8; 256][..]);
    }

    #[test]
    fn test_stream_uncompress_invalid() {
        let mut s = ByteStream::from(b"definitely not zlib".to_vec());
        s.set_position(5);
        assert!(matches!(s.uncompress(), Err(Error::Decompress(_))));
        assert_eq!(s.as_slice(), b"definitely not zlib");
        assert_eq!(s.position(), 5);
    }

    #[test]
    fn test_stream_compress_empty() {
        let mut s = ByteStream::new();
        s.compress().unwrap();
        assert!(s.length() > 0);
        s.uncompress().unwrap();
        assert_eq!(s.length(), 0);
        assert_eq!(s.position(), 0);
    }
}
