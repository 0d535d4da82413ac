//! Error types for KHQR encoding, decoding, and verification.

use thiserror::Error;

use crate::model::Currency;

/// Coarse error classification, stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// K001: A single field failed validation
    FieldValidation,
    /// K002: A mandatory tag was absent
    RequiredFieldMissing,
    /// K003: Embedded checksum does not match the payload
    ChecksumMismatch,
    /// K004: Truncated, over-long, or otherwise unparseable TLV stream
    MalformedTlv,
    /// K005: UnionPay account combined with an incompatible currency
    CurrencyConflict,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "K001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::FieldValidation => "K001",
            ErrorCode::RequiredFieldMissing => "K002",
            ErrorCode::ChecksumMismatch => "K003",
            ErrorCode::MalformedTlv => "K004",
            ErrorCode::CurrencyConflict => "K005",
        }
    }
}

/// Why a single field value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("value is required")]
    Required,

    #[error("length {len} exceeds maximum {max} bytes")]
    TooLong { len: usize, max: usize },

    #[error("value must contain only decimal digits")]
    NotNumeric,

    #[error("value must contain only hexadecimal digits")]
    NotHex,

    #[error("value must contain only ASCII letters")]
    NotAlphabetic,

    #[error("value contains a control character")]
    ControlCharacter,

    #[error("value {value:?} is not one of the allowed codes")]
    NotAllowed { value: String },

    #[error("unsupported currency {code:?}")]
    UnsupportedCurrency { code: String },

    #[error("amount {amount:?} is not a valid decimal number")]
    InvalidAmount { amount: String },

    #[error("amount must not be negative")]
    NegativeAmount,

    #[error("amount in riel must be a whole number")]
    FractionalLocalAmount,

    #[error("amount has {scale} fractional digits, at most 2 are allowed")]
    TooManyDecimals { scale: u32 },

    #[error("account id {value:?} must have the form name@bank")]
    InvalidAccountId { value: String },

    #[error("nested value is not a well-formed TLV stream")]
    MalformedComposite,
}

/// Error produced by any codec operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KhqrError {
    // === K001 ===
    #[error("[K001] tag {tag} ({field}): {reason}")]
    FieldValidation {
        tag: &'static str,
        field: &'static str,
        reason: FieldError,
    },

    // === K002 ===
    #[error("[K002] required tag {tag} ({field}) is missing")]
    RequiredFieldMissing { tag: &'static str, field: &'static str },

    // === K003 ===
    #[error("[K003] checksum mismatch: payload carries {found}, computed {expected}")]
    ChecksumMismatch { expected: String, found: String },

    // === K004 ===
    #[error("[K004] malformed TLV: {context}")]
    MalformedTlv { context: &'static str },

    // === K005 ===
    #[error("[K005] UnionPay merchant account cannot be used with currency {currency}")]
    CurrencyConflict { currency: Currency },
}

impl KhqrError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            KhqrError::FieldValidation { .. } => ErrorCode::FieldValidation,
            KhqrError::RequiredFieldMissing { .. } => ErrorCode::RequiredFieldMissing,
            KhqrError::ChecksumMismatch { .. } => ErrorCode::ChecksumMismatch,
            KhqrError::MalformedTlv { .. } => ErrorCode::MalformedTlv,
            KhqrError::CurrencyConflict { .. } => ErrorCode::CurrencyConflict,
        }
    }

    /// Returns the wire tag this error is about, if any.
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            KhqrError::FieldValidation { tag, .. } | KhqrError::RequiredFieldMissing { tag, .. } => {
                Some(tag)
            }
            _ => None,
        }
    }
}
