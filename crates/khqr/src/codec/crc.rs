//! Frame checksum.
//!
//! CRC-16/CCITT-FALSE: polynomial `0x1021`, initial value `0xFFFF`, no
//! input or output reflection, no final xor. The checksum covers every byte
//! of the payload up to and including the `6304` header of the checksum
//! field itself.

use crate::error::KhqrError;
use crate::limits::{CRC_PREFIX, CRC_VALUE_LEN, MIN_VALID_LENGTH};

const POLY: u16 = 0x1021;
const INIT: u16 = 0xFFFF;

/// Computes the raw CRC-16/CCITT-FALSE of `data`.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = INIT;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ POLY;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

/// Computes the checksum of `s` as four uppercase hex digits.
pub fn checksum(s: &str) -> String {
    format!("{:04X}", crc16(s.as_bytes()))
}

/// Returns true if the payload ends with a checksum field (`6304` followed
/// by four hex digits) and is long enough to be a frame at all.
pub fn looks_like_checksummed(payload: &str) -> bool {
    let bytes = payload.as_bytes();
    let field_len = CRC_PREFIX.len() + CRC_VALUE_LEN;
    if bytes.len() < MIN_VALID_LENGTH || bytes.len() < field_len {
        return false;
    }
    let (header, value) = bytes[bytes.len() - field_len..].split_at(CRC_PREFIX.len());
    header == CRC_PREFIX.as_bytes() && value.iter().all(u8::is_ascii_hexdigit)
}

/// Checks the embedded checksum against the payload.
///
/// The embedded value is compared case-insensitively.
pub fn check_checksum(payload: &str) -> Result<(), KhqrError> {
    if !looks_like_checksummed(payload) {
        return Err(KhqrError::MalformedTlv {
            context: "payload does not end with a checksum field",
        });
    }
    // The tail is ASCII, so this split is on a char boundary.
    let (body, claimed) = payload.split_at(payload.len() - CRC_VALUE_LEN);
    let expected = checksum(body);
    let found = claimed.to_ascii_uppercase();
    if expected != found {
        return Err(KhqrError::ChecksumMismatch { expected, found });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_value() {
        assert_eq!(crc16(b"123456789"), 0x29B1);
        assert_eq!(checksum("123456789"), "29B1");
    }

    #[test]
    fn test_empty_input_is_init() {
        assert_eq!(crc16(b""), 0xFFFF);
    }

    #[test]
    fn test_checksum_is_padded_uppercase() {
        let s = checksum("00020101021153031165802KH6304");
        assert_eq!(s.len(), 4);
        assert!(s.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_looks_like_checksummed() {
        assert!(looks_like_checksummed("00020101021163041A2B"));
        assert!(looks_like_checksummed("00020101021163041a2b"));
        assert!(!looks_like_checksummed("00020101021163041A2G"));
        assert!(!looks_like_checksummed("00020101021163051A2B"));
        assert!(!looks_like_checksummed("63041A2B"));
        assert!(!looks_like_checksummed(""));
    }

    #[test]
    fn test_check_checksum_accepts_lowercase() {
        let body = "0002015802KH6304";
        let crc = checksum(body);
        let upper = format!("{body}{crc}");
        let lower = format!("{body}{}", crc.to_ascii_lowercase());
        assert_eq!(check_checksum(&upper), Ok(()));
        assert_eq!(check_checksum(&lower), Ok(()));
    }

    #[test]
    fn test_check_checksum_mismatch() {
        let body = "0002015802KH6304";
        let crc = checksum(body);
        let bad = if crc == "0000" { "FFFF" } else { "0000" };
        let result = check_checksum(&format!("{body}{bad}"));
        assert_eq!(
            result,
            Err(KhqrError::ChecksumMismatch {
                expected: crc,
                found: bad.to_string(),
            })
        );
    }

    #[test]
    fn test_check_checksum_requires_field() {
        let result = check_checksum("000201010211");
        assert!(matches!(result, Err(KhqrError::MalformedTlv { .. })));
    }
}
