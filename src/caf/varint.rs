// Variable-length integers used by the CAF packet table
//
// Big-endian base-128: 7-bit groups, most significant group first, high bit
// set on every byte except the last. Always minimal length, so 0 is [0x00].

use std::io::{BufRead, Write};

use crate::error::{Error, Result};

/// Maximum number of bytes `decode` consumes for one integer.
///
/// Decoding stops after this many bytes even when the continuation bit is
/// still set, so values that need a ninth group (>= 2^56) come back
/// truncated and leave their tail bytes in the stream.
pub const MAX_ENCODED_LEN: usize = 8;

/// Number of bytes `encode` emits for `value`
pub fn encoded_len(value: u64) -> usize {
    let significant_bits = 64 - value.leading_zeros() as usize;
    significant_bits.div_ceil(7).max(1)
}

/// Encode `value` into a new byte vector
pub fn encode(value: u64) -> Vec<u8> {
    let len = encoded_len(value);
    (0..len)
        .rev()
        .map(|group| {
            let byte = ((value >> (group * 7)) & 0x7F) as u8;
            if group > 0 {
                byte | 0x80
            } else {
                byte
            }
        })
        .collect()
}

/// Encode `value` straight into a writer
pub fn write<W: Write>(writer: &mut W, value: u64) -> Result<()> {
    writer.write_all(&encode(value))?;
    Ok(())
}

/// Decode one integer from a buffered reader
pub fn decode<R: BufRead>(reader: &mut R) -> Result<u64> {
    let mut value: u64 = 0;
    let mut bytes_read = 0;
    loop {
        let byte = next_byte(reader)?;
        bytes_read += 1;
        value = (value << 7) | u64::from(byte & 0x7F);
        if byte & 0x80 == 0 || bytes_read >= MAX_ENCODED_LEN {
            return Ok(value);
        }
    }
}

fn next_byte<R: BufRead>(reader: &mut R) -> Result<u8> {
    let byte = {
        let buf = reader.fill_buf()?;
        match buf.first() {
            Some(&b) => b,
            None => return Err(Error::incomplete("varint source exhausted")),
        }
    };
    reader.consume(1);
    Ok(byte)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_encode_zero() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encoded_len(0), 1);
    }

    #[test]
    fn test_encode_known_values() {
        assert_eq!(encode(0x7F), vec![0x7F]);
        assert_eq!(encode(0x80), vec![0x81, 0x00]);
        assert_eq!(encode(300), vec![0x82, 0x2C]);
        assert_eq!(encode(0x3FFF), vec![0xFF, 0x7F]);
        assert_eq!(encode(0x4000), vec![0x81, 0x80, 0x00]);
    }

    #[test]
    fn test_no_leading_zero_group() {
        for value in [1u64, 127, 128, 16_383, 16_384, 1 << 35, (1 << 56) - 1] {
            let bytes = encode(value);
            assert_ne!(bytes[0], 0x80, "redundant leading group for {}", value);
            assert_eq!(bytes.len(), encoded_len(value));
        }
    }

    #[test]
    fn test_round_trip_below_cap() {
        let mut value = 1u64;
        while value < (1 << 56) {
            for v in [value - 1, value, value + 1] {
                let mut cursor = Cursor::new(encode(v));
                assert_eq!(decode(&mut cursor).unwrap(), v);
            }
            value <<= 3;
        }
    }

    #[test]
    fn test_decode_stops_after_eight_bytes() {
        // 2^56 needs nine groups; only the first eight are consumed
        let bytes = encode(1 << 56);
        assert_eq!(bytes.len(), 9);
        let mut cursor = Cursor::new(bytes);
        assert_eq!(decode(&mut cursor).unwrap(), 1 << 49);
        assert_eq!(cursor.position(), 8);
    }

    #[test]
    fn test_decode_exhausted() {
        let mut cursor = Cursor::new(vec![0x81, 0x80]);
        assert!(matches!(decode(&mut cursor), Err(Error::IncompleteData(_))));
    }
}
