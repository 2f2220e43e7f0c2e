//! A position-tracked byte buffer with typed reads and writes.
//!
//! # Growth
//!
//! Before a write of `n` bytes, the stream checks how many bytes remain between the cursor and
//! the end of the buffer. If fewer than `n` remain, exactly `n` zeroed bytes are appended to the
//! end of the buffer (regardless of where the cursor sits). When the cursor is inside the buffer
//! (or at its end) this always leaves enough room for the write, sometimes more. When the cursor
//! has been moved past the end, the appended bytes cannot reach it and the write fails with
//! [Error::EndOfBuffer] without modifying the stream.
//!
//! # Failure
//!
//! Every operation either completes or returns an error without modifying the stream.

use crate::{Config, Endian, Error};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::cmp::Ordering;
use tracing::{debug, trace};

/// Largest encoded length accepted by [ByteStream::write_utf].
pub const MAX_UTF_LENGTH: usize = u16::MAX as usize;

/// Writes a fixed-size value at the cursor using the byte order of the stream.
macro_rules! put {
    ($self:ident, $size:expr, $value:expr, $be:ident, $le:ident) => {{
        $self.check_buffer($size)?;
        let start = $self.position;
        let mut dst = &mut $self.buffer[start..start + $size];
        match $self.endian {
            Endian::BigEndian => dst.$be($value),
            Endian::LittleEndian => dst.$le($value),
        }
        $self.position += $size;
        Ok(())
    }};
}

/// Reads a fixed-size value at the cursor using the byte order of the stream.
macro_rules! get {
    ($self:ident, $type:ty, $be:ident, $le:ident) => {{
        const SIZE: usize = std::mem::size_of::<$type>();
        let mut src = $self.span(SIZE)?;
        let value: $type = match $self.endian {
            Endian::BigEndian => src.$be(),
            Endian::LittleEndian => src.$le(),
        };
        $self.position += SIZE;
        Ok(value)
    }};
}

/// A growable byte buffer with a read/write cursor and a selectable byte order.
///
/// Reads and writes happen at [ByteStream::position] and advance it by the number of bytes
/// consumed or produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ByteStream {
    buffer: BytesMut,
    position: usize,
    endian: Endian,
    cfg: Config,
}

impl ByteStream {
    /// Creates an empty stream with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty stream with the given configuration.
    pub fn with_config(cfg: Config) -> Self {
        Self::from_bytes(BytesMut::new(), cfg)
    }

    /// Creates a stream backed by `initial`, with the cursor at the start.
    pub fn from_bytes(initial: impl Into<BytesMut>, cfg: Config) -> Self {
        Self {
            buffer: initial.into(),
            position: 0,
            endian: cfg.endian,
            cfg,
        }
    }

    /// Returns the configuration of the stream.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Returns the offset, in bytes, at which the next read or write begins.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves the cursor. Any value is accepted, including one past the end of the buffer.
    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    /// Returns the byte order used by multi-byte reads and writes.
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Changes the byte order used by subsequent multi-byte reads and writes.
    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    /// Returns the length of the buffer, in bytes.
    pub fn length(&self) -> usize {
        self.buffer.len()
    }

    /// Resizes the buffer.
    ///
    /// Growing fills the new tail with zeros and shrinking discards the tail. The cursor is
    /// left where it is.
    pub fn set_length(&mut self, length: usize) {
        let previous = self.buffer.len();
        match length.cmp(&previous) {
            Ordering::Greater => self.buffer.resize(length, 0),
            Ordering::Less => self.buffer.truncate(length),
            Ordering::Equal => return,
        }
        debug!(previous, length, "resized stream");
    }

    /// Returns the number of bytes between the cursor and the end of the buffer.
    ///
    /// The result is negative when the cursor has been moved past the end.
    pub fn bytes_available(&self) -> i64 {
        self.buffer.len() as i64 - self.position as i64
    }

    /// Empties the buffer, releasing its memory, and moves the cursor to the start.
    pub fn clear(&mut self) {
        debug!(length = self.buffer.len(), "cleared stream");
        self.buffer = BytesMut::new();
        self.position = 0;
    }

    /// Returns the contents of the buffer.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Returns a copy of the contents of the buffer.
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(&self.buffer)
    }

    /// Consumes the stream, returning the underlying buffer.
    pub fn into_inner(self) -> BytesMut {
        self.buffer
    }

    /// Swaps in a new buffer and moves the cursor to the start.
    pub(crate) fn replace(&mut self, buffer: BytesMut) {
        self.buffer = buffer;
        self.position = 0;
    }

    /// Ensures `size` bytes can be written at the cursor.
    fn check_buffer(&mut self, size: usize) -> Result<(), Error> {
        let at = self.position;
        Self::grow(&mut self.buffer, at, size)
    }

    /// Appends `size` zeroed bytes to `buffer` if fewer than `size` bytes follow `at`.
    ///
    /// Fails, leaving `buffer` untouched, if the grown buffer would still not cover
    /// `at..at + size`.
    fn grow(buffer: &mut BytesMut, at: usize, size: usize) -> Result<(), Error> {
        let length = buffer.len();
        let end = at.checked_add(size).ok_or(Error::EndOfBuffer)?;
        if end <= length {
            return Ok(());
        }
        let grown = length.checked_add(size).ok_or(Error::EndOfBuffer)?;
        if end > grown {
            return Err(Error::EndOfBuffer);
        }
        trace!(length, grown, "growing stream");
        buffer.resize(grown, 0);
        Ok(())
    }

    /// Returns the `len` bytes following the cursor.
    fn span(&self, len: usize) -> Result<&[u8], Error> {
        let end = self.position.checked_add(len).ok_or(Error::EndOfBuffer)?;
        self.buffer.get(self.position..end).ok_or(Error::EndOfBuffer)
    }

    /// Writes `src` at the cursor, growing the buffer as needed.
    fn put_slice(&mut self, src: &[u8]) -> Result<(), Error> {
        if src.is_empty() {
            return Ok(());
        }
        self.check_buffer(src.len())?;
        let start = self.position;
        self.buffer[start..start + src.len()].copy_from_slice(src);
        self.position += src.len();
        Ok(())
    }

    /// Copies bytes from `source` into this stream at the cursor.
    ///
    /// Copies `length` bytes starting at `offset` in `source`. Without a length, everything
    /// from `offset` to the end of `source` is copied. The cursor of `source` is not used or
    /// modified.
    pub fn write_bytes(
        &mut self,
        source: &ByteStream,
        offset: usize,
        length: Option<usize>,
    ) -> Result<(), Error> {
        let length = match self.cfg.zero_length.resolve(length) {
            Some(length) => length,
            None => source
                .length()
                .checked_sub(offset)
                .ok_or(Error::EndOfBuffer)?,
        };
        let end = offset.checked_add(length).ok_or(Error::EndOfBuffer)?;
        let src = source.buffer.get(offset..end).ok_or(Error::EndOfBuffer)?;
        self.put_slice(src)
    }

    /// Copies bytes at the cursor into `destination`, starting at `offset` in `destination`.
    ///
    /// Without a length, every available byte is copied. If fewer than `length` bytes follow
    /// `offset` in `destination`, `length` zeroed bytes are first appended to it. The cursor of
    /// `destination` is not used or modified.
    pub fn read_bytes(
        &mut self,
        destination: &mut ByteStream,
        offset: usize,
        length: Option<usize>,
    ) -> Result<(), Error> {
        let length = match self.cfg.zero_length.resolve(length) {
            Some(length) => length,
            None => usize::try_from(self.bytes_available()).unwrap_or(0),
        };
        let src = self.span(length)?;
        Self::grow(&mut destination.buffer, offset, length)?;
        destination.buffer[offset..offset + length].copy_from_slice(src);
        self.position += length;
        Ok(())
    }

    /// Writes a single byte: 1 for `true`, 0 for `false`.
    pub fn write_boolean(&mut self, value: bool) -> Result<(), Error> {
        put!(self, 1, value as u8, put_u8, put_u8)
    }

    /// Reads a single byte, returning `true` if it is non-zero.
    pub fn read_boolean(&mut self) -> Result<bool, Error> {
        Ok(self.read_unsigned_byte()? != 0)
    }

    /// Writes the low 8 bits of `value`.
    pub fn write_byte(&mut self, value: i64) -> Result<(), Error> {
        put!(self, 1, value as u8, put_u8, put_u8)
    }

    /// Reads a signed byte.
    pub fn read_byte(&mut self) -> Result<i8, Error> {
        get!(self, i8, get_i8, get_i8)
    }

    /// Reads an unsigned byte.
    pub fn read_unsigned_byte(&mut self) -> Result<u8, Error> {
        get!(self, u8, get_u8, get_u8)
    }

    /// Writes the low 16 bits of `value`.
    pub fn write_short(&mut self, value: i64) -> Result<(), Error> {
        put!(self, 2, value as u16, put_u16, put_u16_le)
    }

    /// Reads a signed 16-bit integer.
    pub fn read_short(&mut self) -> Result<i16, Error> {
        get!(self, i16, get_i16, get_i16_le)
    }

    /// Reads an unsigned 16-bit integer.
    pub fn read_unsigned_short(&mut self) -> Result<u16, Error> {
        get!(self, u16, get_u16, get_u16_le)
    }

    /// Writes the low 32 bits of `value`.
    pub fn write_int(&mut self, value: i64) -> Result<(), Error> {
        put!(self, 4, value as u32, put_u32, put_u32_le)
    }

    /// Writes an unsigned 32-bit integer.
    pub fn write_unsigned_int(&mut self, value: u32) -> Result<(), Error> {
        put!(self, 4, value, put_u32, put_u32_le)
    }

    /// Reads a signed 32-bit integer.
    pub fn read_int(&mut self) -> Result<i32, Error> {
        get!(self, i32, get_i32, get_i32_le)
    }

    /// Reads an unsigned 32-bit integer.
    pub fn read_unsigned_int(&mut self) -> Result<u32, Error> {
        get!(self, u32, get_u32, get_u32_le)
    }

    /// Writes an IEEE 754 single-precision float.
    pub fn write_float(&mut self, value: f32) -> Result<(), Error> {
        put!(self, 4, value, put_f32, put_f32_le)
    }

    /// Reads an IEEE 754 single-precision float.
    pub fn read_float(&mut self) -> Result<f32, Error> {
        get!(self, f32, get_f32, get_f32_le)
    }

    /// Writes an IEEE 754 double-precision float.
    pub fn write_double(&mut self, value: f64) -> Result<(), Error> {
        put!(self, 8, value, put_f64, put_f64_le)
    }

    /// Reads an IEEE 754 double-precision float.
    pub fn read_double(&mut self) -> Result<f64, Error> {
        get!(self, f64, get_f64, get_f64_le)
    }

    /// Writes `value` as UTF-8, prefixed by its length in bytes as a 16-bit integer.
    ///
    /// Fails with [Error::LengthExceeded] if the encoded string is longer than
    /// [MAX_UTF_LENGTH] bytes.
    pub fn write_utf(&mut self, value: &str) -> Result<(), Error> {
        let len = value.len();
        if len > MAX_UTF_LENGTH {
            return Err(Error::LengthExceeded(len, MAX_UTF_LENGTH));
        }

        // Once the prefix is written the cursor is inside the buffer, so the body cannot fail.
        self.write_short(len as i64)?;
        self.put_slice(value.as_bytes())
    }

    /// Reads a UTF-8 string prefixed by its length in bytes as a 16-bit integer.
    pub fn read_utf(&mut self) -> Result<String, Error> {
        let start = self.position;
        let len = self.read_unsigned_short()? as usize;
        match self.read_utf_bytes(len) {
            Ok(value) => Ok(value),
            Err(err) => {
                self.position = start;
                Err(err)
            }
        }
    }

    /// Writes `value` as UTF-8 without a length prefix.
    pub fn write_utf_bytes(&mut self, value: &str) -> Result<(), Error> {
        self.put_slice(value.as_bytes())
    }

    /// Reads `length` bytes and decodes them as UTF-8.
    pub fn read_utf_bytes(&mut self, length: usize) -> Result<String, Error> {
        let value = String::from_utf8(self.span(length)?.to_vec())?;
        self.position += length;
        Ok(value)
    }
}

impl AsRef<[u8]> for ByteStream {
    fn as_ref(&self) -> &[u8] {
        &self.buffer
    }
}

impl From<BytesMut> for ByteStream {
    fn from(buffer: BytesMut) -> Self {
        Self::from_bytes(buffer, Config::default())
    }
}

impl From<Vec<u8>> for ByteStream {
    fn from(buffer: Vec<u8>) -> Self {
        Self::from_bytes(&buffer[..], Config::default())
    }
}

impl From<&[u8]> for ByteStream {
    fn from(buffer: &[u8]) -> Self {
        Self::from_bytes(buffer, Config::default())
    }
}

impl From<Bytes> for ByteStream {
    fn from(buffer: Bytes) -> Self {
        Self::from_bytes(&buffer[..], Config::default())
    }
}
