//! Wire constants and length limits for KHQR payloads.
//!
//! All lengths are UTF-8 byte counts, which is what the two-digit TLV
//! length prefix measures.

/// Largest value a two-digit TLV length prefix can describe.
pub const MAX_TLV_VALUE_LEN: usize = 99;

/// Maximum number of top-level segments walked before the stream is
/// rejected as malformed.
pub const MAX_TLV_SEGMENTS: usize = 99;

/// Shortest payload that can possibly be a valid frame.
pub const MIN_VALID_LENGTH: usize = 12;

/// Tag plus length prefix of the checksum field, as it appears before the
/// checksum value.
pub const CRC_PREFIX: &str = "6304";

/// Number of hex digits in the checksum value.
pub const CRC_VALUE_LEN: usize = 4;

/// Subtags of the timestamp field (`99`).
pub const TIMESTAMP_CREATION_SUBTAG: &str = "00";
pub const TIMESTAMP_EXPIRATION_SUBTAG: &str = "01";

// =============================================================================
// DEFAULT VALUES
// =============================================================================

pub const DEFAULT_PAYLOAD_FORMAT_INDICATOR: &str = "01";
pub const STATIC_QR: &str = "11";
pub const DYNAMIC_QR: &str = "12";
pub const DEFAULT_MERCHANT_CATEGORY_CODE: &str = "5999";
pub const DEFAULT_COUNTRY_CODE: &str = "KH";

// =============================================================================
// FIELD LIMITS
// =============================================================================

pub const MAX_PAYLOAD_FORMAT_INDICATOR_LEN: usize = 2;
pub const MAX_POINT_OF_INITIATION_LEN: usize = 2;
pub const MAX_UPI_MERCHANT_ACCOUNT_LEN: usize = 99;
pub const MAX_MERCHANT_CATEGORY_CODE_LEN: usize = 4;
pub const MAX_TRANSACTION_CURRENCY_LEN: usize = 3;
pub const MAX_TRANSACTION_AMOUNT_LEN: usize = 13;
pub const MAX_COUNTRY_CODE_LEN: usize = 3;
pub const MAX_MERCHANT_NAME_LEN: usize = 25;
pub const MAX_MERCHANT_CITY_LEN: usize = 15;
pub const MAX_TIMESTAMP_LEN: usize = 99;

pub const MAX_BAKONG_ACCOUNT_ID_LEN: usize = 32;
pub const MAX_ACCOUNT_INFORMATION_LEN: usize = 32;
pub const MAX_MERCHANT_ID_LEN: usize = 32;
pub const MAX_ACQUIRING_BANK_LEN: usize = 32;

pub const MAX_BILL_NUMBER_LEN: usize = 25;
pub const MAX_MOBILE_NUMBER_LEN: usize = 25;
pub const MAX_STORE_LABEL_LEN: usize = 25;
pub const MAX_TERMINAL_LABEL_LEN: usize = 25;
pub const MAX_PURPOSE_OF_TRANSACTION_LEN: usize = 25;

pub const MAX_LANGUAGE_PREFERENCE_LEN: usize = 2;
pub const MAX_MERCHANT_NAME_ALTERNATE_LEN: usize = 25;
pub const MAX_MERCHANT_CITY_ALTERNATE_LEN: usize = 15;
