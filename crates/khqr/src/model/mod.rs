//! Data model types for KHQR.
//!
//! This module contains:
//! - Tag and subtag registries (the wire vocabulary)
//! - Payee descriptions (encoder input)
//! - Decoded payloads (decoder output)
//! - Payload hashes and builders

pub mod builder;
pub mod decoded;
pub mod hash;
pub mod payee;
pub mod request;
pub mod subtag;
pub mod tag;

pub use builder::KhqrBuilder;
pub use decoded::{DecodedKhqr, FieldName};
pub use hash::{full_hash, md5_hex, short_hash};
pub use payee::{
    AdditionalData, Currency, KhqrInfo, LanguageTemplate, MerchantIdentity, MerchantType,
    UnknownCurrency,
};
pub use request::KhqrRequest;
pub use subtag::{SubtagDefinition, SUBTAGS};
pub use tag::{FieldKind, Tag, TagDefinition, TAGS};
