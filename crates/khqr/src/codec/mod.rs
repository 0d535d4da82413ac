//! Text encoding and decoding for KHQR payloads.
//!
//! Implements the TLV wire format, the CRC-16 frame checksum, and the
//! encode, decode, and verify pipelines built on them.

pub mod crc;
pub mod decode;
pub mod encode;
pub mod tlv;
pub mod verify;

pub use crc::{check_checksum, checksum, crc16, looks_like_checksummed};
pub use decode::{decode_lenient, decode_strict};
pub use encode::{generate, generate_with_options, EncodeOptions, KhqrResponse};
pub use tlv::{cut, TlvField, TlvReader, TlvWriter};
pub use verify::{verify, verify_detailed};
