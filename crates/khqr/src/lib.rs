//! KHQR: interoperable payment QR payloads.
//!
//! This crate provides encoding, decoding, and verification for KHQR, the
//! EMVCo-profiled text format banks and merchant apps use to produce and
//! scan payment codes.
//!
//! # Overview
//!
//! A payload is a flat sequence of tag-length-value fields ending in a
//! CRC-16 checksum:
//! - **Encode**: a typed [`KhqrInfo`] becomes a canonical payload
//! - **Decode**: a payload becomes a fixed-shape [`DecodedKhqr`], leniently
//!   for display or strictly for acceptance
//! - **Verify**: checksum plus strict decode, collapsed to a boolean
//!
//! # Quick Start
//!
//! ```rust
//! use khqr::{decode_strict, generate, verify, KhqrBuilder};
//! use rust_decimal::Decimal;
//!
//! let info = KhqrBuilder::individual("somchai_t@trmb", "Somchai T", "BANGKOK")
//!     .amount(Decimal::from(1000))
//!     .build();
//!
//! let response = generate(&info).unwrap();
//! assert!(response.qr.starts_with("000201010212"));
//! assert!(verify(&response.qr));
//!
//! let decoded = decode_strict(&response.qr).unwrap();
//! assert_eq!(decoded.transaction_amount.as_deref(), Some("1000"));
//! assert_eq!(decoded.transaction_currency.as_deref(), Some("116"));
//! ```
//!
//! # Modules
//!
//! - [`model`]: Tag registries, payee descriptions, decoded payloads
//! - [`codec`]: TLV primitives, checksum, encode/decode/verify
//! - [`validate`]: Field validators shared by encoder and strict decoder
//! - [`error`]: Error types
//! - [`limits`]: Wire constants and length limits
//! - [`util`]: Timestamps
//!
//! # Untrusted input
//!
//! The decoders accept arbitrary strings:
//! - The top-level walk is capped at [`limits::MAX_TLV_SEGMENTS`] segments
//! - Lengths are bounds-checked against the remaining input
//! - Invalid data is rejected with descriptive errors, never a panic

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;
pub mod util;
pub mod validate;

// Re-export commonly used types at crate root
pub use codec::{
    decode_lenient, decode_strict, generate, generate_with_options, verify, verify_detailed,
    EncodeOptions, KhqrResponse,
};
pub use error::{ErrorCode, FieldError, KhqrError};
pub use model::{
    AdditionalData, Currency, DecodedKhqr, FieldName, KhqrBuilder, KhqrInfo, KhqrRequest,
    LanguageTemplate, MerchantIdentity, MerchantType, Tag,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
