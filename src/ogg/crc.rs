// OGG page checksum
//
// CRC-32 with polynomial 0x04C11DB7, initial value 0, no bit reflection and
// no final XOR, computed over the whole page with the CRC field zeroed.

const POLYNOMIAL: u32 = 0x04C1_1DB7;

static TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut r = (i as u32) << 24;
        let mut bit = 0;
        while bit < 8 {
            r = if r & 0x8000_0000 != 0 {
                (r << 1) ^ POLYNOMIAL
            } else {
                r << 1
            };
            bit += 1;
        }
        table[i] = r;
        i += 1;
    }
    table
}

/// Feed `data` into a running checksum
pub fn update(crc: u32, data: &[u8]) -> u32 {
    data.iter().fold(crc, |crc, &byte| {
        (crc << 8) ^ TABLE[((crc >> 24) as u8 ^ byte) as usize]
    })
}

/// Checksum of one contiguous buffer
pub fn checksum(data: &[u8]) -> u32 {
    update(0, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_value() {
        // CRC-32/POSIX without its final inversion
        assert_eq!(checksum(b"123456789"), !0x765E_7680);
    }

    #[test]
    fn test_incremental_matches_whole() {
        let data = b"OggS\x00\x02 incremental checksum";
        let split = update(update(0, &data[..7]), &data[7..]);
        assert_eq!(split, checksum(data));
    }

    #[test]
    fn test_empty() {
        assert_eq!(checksum(&[]), 0);
    }
}
