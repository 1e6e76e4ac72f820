use std::hash::Hasher;

use crc24::Crc24Hasher;

/// Two octet checksum: sum of all octets mod 65536.
#[inline]
pub fn calculate_simple(data: &[u8]) -> u16 {
    let sum = data.iter().map(|v| u32::from(*v)).sum::<u32>() & 0xFFFF;
    sum as u16
}

/// CRC-24 as used by ASCII armor, RFC 4880 section 6.1.
pub fn crc24(data: &[u8]) -> u32 {
    let mut hasher = Crc24Hasher::new();
    hasher.write(data);
    hasher.finish() as u32 & 0x00FF_FFFF
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc24() {
        assert_eq!(crc24(b"123456789"), 0x21CF02);
        assert_eq!(crc24(b""), 0xB704CE);
    }

    #[test]
    fn test_simple() {
        assert_eq!(calculate_simple(&[]), 0);
        assert_eq!(calculate_simple(&[0x01, 0x02, 0xFF]), 0x0102);
        assert_eq!(calculate_simple(&[0xFF; 32]), 0x1FE0);
        // wraps at 2^16
        assert_eq!(calculate_simple(&[0xFF; 258]), (0xFF * 258 % 65536) as u16);
    }
}
