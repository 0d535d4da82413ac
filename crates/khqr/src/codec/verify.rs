//! Payload verification: checksum first, then a strict decode.

use crate::codec::crc::check_checksum;
use crate::codec::decode::decode_strict;
use crate::error::KhqrError;
use crate::limits::MIN_VALID_LENGTH;
use crate::util::trace_debug;

/// Returns true if the payload carries a correct checksum and decodes
/// strictly.
pub fn verify(payload: &str) -> bool {
    match verify_detailed(payload) {
        Ok(()) => true,
        Err(err) => {
            trace_debug(format_args!("payload rejected: {}", err));
            false
        }
    }
}

/// Like [`verify`], but returns the first problem found.
pub fn verify_detailed(payload: &str) -> Result<(), KhqrError> {
    check_checksum(payload)?;
    if payload.len() < MIN_VALID_LENGTH {
        return Err(KhqrError::MalformedTlv {
            context: "payload shorter than minimum frame length",
        });
    }
    decode_strict(payload)?;
    Ok(())
}
