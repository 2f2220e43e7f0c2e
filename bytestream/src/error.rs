//! Error types for stream operations

use std::{io, string::FromUtf8Error};
use thiserror::Error;

/// Error type for stream operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("unexpected end of buffer")]
    EndOfBuffer,
    #[error("length exceeded: {0} > {1}")]
    LengthExceeded(usize, usize), // found, max
    #[error("compression failed: {0}")]
    Compress(#[source] io::Error),
    #[error("decompression failed: {0}")]
    Decompress(#[source] io::Error),
    #[error("invalid utf-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
    #[error("invalid endian: {0}")]
    InvalidEndian(String),
}
