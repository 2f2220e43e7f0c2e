//! Read and write typed binary values through a position-tracked byte buffer.
//!
//! # Overview
//!
//! [ByteStream] owns a growable buffer, a cursor, and a byte order. Every read and write
//! happens at the cursor and advances it:
//! - Integers: 8, 16, and 32-bit, read as signed or unsigned
//! - Floats: IEEE 754 single and double precision
//! - Booleans: a single byte
//! - Strings: UTF-8, with or without a 16-bit length prefix
//! - Sub-buffers: byte ranges copied between two streams
//!
//! Integer writes keep the low bits of their input, so out-of-range values wrap rather than
//! fail. Multi-byte values (including the length prefix of strings) use the byte order set with
//! [ByteStream::set_endian] at the time of each call.
//!
//! The whole buffer can be compressed and decompressed in place with zlib or raw DEFLATE.
//!
//! # Example
//!
//! ```
//! use bytestream::{ByteStream, Endian};
//!
//! let mut stream = ByteStream::new();
//! stream.write_utf("hello").unwrap();
//! stream.set_endian(Endian::LittleEndian);
//! stream.write_int(0x12345678).unwrap();
//! assert_eq!(stream.length(), 2 + 5 + 4);
//! assert_eq!(&stream.as_slice()[7..], &[0x78, 0x56, 0x34, 0x12]);
//!
//! stream.compress().unwrap();
//! stream.uncompress().unwrap();
//!
//! stream.set_endian(Endian::BigEndian);
//! assert_eq!(stream.read_utf().unwrap(), "hello");
//! stream.set_endian(Endian::LittleEndian);
//! assert_eq!(stream.read_int().unwrap(), 0x12345678);
//! assert_eq!(stream.bytes_available(), 0);
//! ```

pub mod compression;
pub mod config;
pub mod endian;
pub mod error;
pub mod stream;

// Re-export main types
pub use compression::Algorithm;
pub use config::{Config, ZeroLength};
pub use endian::Endian;
pub use error::Error;
pub use stream::{ByteStream, MAX_UTF_LENGTH};
