#![no_main]

use arbitrary::Arbitrary;
use bytestream::{ByteStream, Config, Endian, Error, ZeroLength, MAX_UTF_LENGTH};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Op {
    SetPosition(u16),
    SetLength(u16),
    SetEndian(bool),
    Clear,
    Compress,
    Uncompress,
    WriteBoolean(bool),
    WriteByte(i64),
    WriteShort(i64),
    WriteInt(i64),
    WriteFloat(f32),
    WriteDouble(f64),
    WriteUtf(String),
    WriteUtfBytes(String),
    WriteBytes(Vec<u8>, u16, Option<u16>),
    ReadBoolean,
    ReadByte,
    ReadUnsignedByte,
    ReadShort,
    ReadUnsignedShort,
    ReadInt,
    ReadUnsignedInt,
    ReadFloat,
    ReadDouble,
    ReadUtf,
    ReadUtfBytes(u16),
    ReadBytes(u16, Option<u16>),
}

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    legacy: bool,
    initial: Vec<u8>,
    ops: Vec<Op>,
}

fn endian(big: bool) -> Endian {
    if big {
        Endian::BigEndian
    } else {
        Endian::LittleEndian
    }
}

/// Checks the outcome of a fixed-width operation against the cursor and length before it.
fn check<T>(stream: &ByteStream, before: (usize, usize), width: usize, result: Result<T, Error>) {
    let (position, length) = before;
    match result {
        Ok(_) => {
            assert_eq!(stream.position(), position + width);
            assert!(stream.length() >= position + width);
            assert!(stream.length() == length || stream.length() == length + width);
        }
        Err(_) => {
            assert_eq!(stream.position(), position);
            assert_eq!(stream.length(), length);
        }
    }
}

fn fuzz(input: FuzzInput) {
    let cfg = Config {
        zero_length: if input.legacy {
            ZeroLength::Remaining
        } else {
            ZeroLength::Explicit
        },
        ..Config::default()
    };
    let mut stream = ByteStream::from_bytes(&input.initial[..], cfg);

    for op in input.ops {
        let before = (stream.position(), stream.length());
        match op {
            Op::SetPosition(position) => {
                stream.set_position(position as usize);
                assert_eq!(
                    stream.bytes_available(),
                    stream.length() as i64 - position as i64
                );
            }
            Op::SetLength(length) => {
                let prefix = stream.as_slice()[..before.1.min(length as usize)].to_vec();
                stream.set_length(length as usize);
                assert_eq!(stream.length(), length as usize);
                assert_eq!(stream.position(), before.0);
                assert_eq!(&stream.as_slice()[..prefix.len()], &prefix[..]);
                assert!(stream.as_slice()[prefix.len()..].iter().all(|b| *b == 0));
            }
            Op::SetEndian(big) => stream.set_endian(endian(big)),
            Op::Clear => {
                stream.clear();
                assert_eq!(stream.length(), 0);
                assert_eq!(stream.position(), 0);
            }
            Op::Compress => {
                let original = stream.to_bytes();
                stream.compress().expect("compression should not fail");
                assert_eq!(stream.position(), 0);
                stream.uncompress().expect("failed to uncompress compressed data");
                assert_eq!(stream.to_bytes(), original);
            }
            Op::Uncompress => {
                let original = stream.to_bytes();
                if stream.uncompress().is_err() {
                    assert_eq!(stream.to_bytes(), original);
                    assert_eq!(stream.position(), before.0);
                }
            }
            Op::WriteBoolean(v) => {
                let result = stream.write_boolean(v);
                check(&stream, before, 1, result);
            }
            Op::WriteByte(v) => {
                let result = stream.write_byte(v);
                check(&stream, before, 1, result);
            }
            Op::WriteShort(v) => {
                let result = stream.write_short(v);
                check(&stream, before, 2, result);
            }
            Op::WriteInt(v) => {
                let result = stream.write_int(v);
                check(&stream, before, 4, result);
            }
            Op::WriteFloat(v) => {
                let result = stream.write_float(v);
                check(&stream, before, 4, result);
            }
            Op::WriteDouble(v) => {
                let result = stream.write_double(v);
                check(&stream, before, 8, result);
            }
            Op::WriteUtf(v) => {
                let result = stream.write_utf(&v);
                if v.len() > MAX_UTF_LENGTH {
                    assert!(matches!(result, Err(Error::LengthExceeded(_, _))));
                }
                if result.is_ok() {
                    let end = stream.position();
                    assert_eq!(end, before.0 + 2 + v.len());
                    stream.set_position(before.0);
                    assert_eq!(stream.read_utf().expect("failed to read string"), v);
                    assert_eq!(stream.position(), end);
                } else {
                    assert_eq!(stream.position(), before.0);
                    assert_eq!(stream.length(), before.1);
                }
            }
            Op::WriteUtfBytes(v) => {
                if stream.write_utf_bytes(&v).is_ok() && !v.is_empty() {
                    stream.set_position(before.0);
                    assert_eq!(stream.read_utf_bytes(v.len()).unwrap(), v);
                }
            }
            Op::WriteBytes(data, offset, length) => {
                let source = ByteStream::from(data);
                let result =
                    stream.write_bytes(&source, offset as usize, length.map(|l| l as usize));
                if result.is_err() {
                    assert_eq!(stream.position(), before.0);
                    assert_eq!(stream.length(), before.1);
                }
            }
            Op::ReadBoolean => {
                let result = stream.read_boolean();
                check(&stream, before, 1, result);
            }
            Op::ReadByte => {
                let result = stream.read_byte();
                check(&stream, before, 1, result);
            }
            Op::ReadUnsignedByte => {
                let result = stream.read_unsigned_byte();
                check(&stream, before, 1, result);
            }
            Op::ReadShort => {
                let result = stream.read_short();
                check(&stream, before, 2, result);
            }
            Op::ReadUnsignedShort => {
                let result = stream.read_unsigned_short();
                check(&stream, before, 2, result);
            }
            Op::ReadInt => {
                let result = stream.read_int();
                check(&stream, before, 4, result);
            }
            Op::ReadUnsignedInt => {
                let result = stream.read_unsigned_int();
                check(&stream, before, 4, result);
            }
            Op::ReadFloat => {
                let result = stream.read_float();
                check(&stream, before, 4, result);
            }
            Op::ReadDouble => {
                let result = stream.read_double();
                check(&stream, before, 8, result);
            }
            Op::ReadUtf => {
                if stream.read_utf().is_err() {
                    assert_eq!(stream.position(), before.0);
                }
            }
            Op::ReadUtfBytes(length) => {
                let result = stream.read_utf_bytes(length as usize);
                check(&stream, before, length as usize, result);
            }
            Op::ReadBytes(offset, length) => {
                let mut destination = ByteStream::new();
                let result = stream.read_bytes(
                    &mut destination,
                    offset as usize,
                    length.map(|l| l as usize),
                );
                if result.is_err() {
                    assert_eq!(stream.position(), before.0);
                    assert_eq!(destination.length(), 0);
                }
            }
        }
        assert_eq!(stream.length(), stream.as_slice().len());
    }
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
