//! Decoded payload representation.
//!
//! [`DecodedKhqr`] has one slot per known field, so a decoded payload
//! always exposes the same key set. Fields absent from the payload are
//! `None`.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::codec::tlv::TlvReader;
use crate::limits::{STATIC_QR, TIMESTAMP_CREATION_SUBTAG, TIMESTAMP_EXPIRATION_SUBTAG};
use crate::model::{Currency, MerchantType, Tag};

/// Name of a decoded field, top-level or nested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    // Top-level scalar tags
    PayloadFormatIndicator,
    PointOfInitiationMethod,
    UpiMerchantAccount,
    MerchantCategoryCode,
    TransactionCurrency,
    TransactionAmount,
    CountryCode,
    MerchantName,
    MerchantCity,
    Crc,
    Timestamp,

    // Merchant account (29 / 30)
    BakongAccountId,
    AccountInformation,
    MerchantId,
    AcquiringBank,

    // Additional data (62)
    BillNumber,
    MobileNumber,
    StoreLabel,
    TerminalLabel,
    PurposeOfTransaction,

    // Language template (64)
    LanguagePreference,
    MerchantNameAlternateLanguage,
    MerchantCityAlternateLanguage,
}

impl FieldName {
    /// Returns the field's display name.
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldName::PayloadFormatIndicator => "payloadFormatIndicator",
            FieldName::PointOfInitiationMethod => "pointOfInitiationMethod",
            FieldName::UpiMerchantAccount => "upiMerchantAccount",
            FieldName::MerchantCategoryCode => "merchantCategoryCode",
            FieldName::TransactionCurrency => "transactionCurrency",
            FieldName::TransactionAmount => "transactionAmount",
            FieldName::CountryCode => "countryCode",
            FieldName::MerchantName => "merchantName",
            FieldName::MerchantCity => "merchantCity",
            FieldName::Crc => "crc",
            FieldName::Timestamp => "timestamp",
            FieldName::BakongAccountId => "bakongAccountID",
            FieldName::AccountInformation => "accountInformation",
            FieldName::MerchantId => "merchantID",
            FieldName::AcquiringBank => "acquiringBank",
            FieldName::BillNumber => "billNumber",
            FieldName::MobileNumber => "mobileNumber",
            FieldName::StoreLabel => "storeLabel",
            FieldName::TerminalLabel => "terminalLabel",
            FieldName::PurposeOfTransaction => "purposeOfTransaction",
            FieldName::LanguagePreference => "languagePreference",
            FieldName::MerchantNameAlternateLanguage => "merchantNameAlternateLanguage",
            FieldName::MerchantCityAlternateLanguage => "merchantCityAlternateLanguage",
        }
    }

    /// Returns the slot a scalar top-level tag decodes into.
    ///
    /// Composite tags have no slot of their own; their subfields do.
    pub fn for_tag(tag: Tag) -> Option<FieldName> {
        match tag {
            Tag::PayloadFormatIndicator => Some(FieldName::PayloadFormatIndicator),
            Tag::PointOfInitiationMethod => Some(FieldName::PointOfInitiationMethod),
            Tag::UpiMerchantAccount => Some(FieldName::UpiMerchantAccount),
            Tag::MerchantCategoryCode => Some(FieldName::MerchantCategoryCode),
            Tag::TransactionCurrency => Some(FieldName::TransactionCurrency),
            Tag::TransactionAmount => Some(FieldName::TransactionAmount),
            Tag::CountryCode => Some(FieldName::CountryCode),
            Tag::MerchantName => Some(FieldName::MerchantName),
            Tag::MerchantCity => Some(FieldName::MerchantCity),
            Tag::Crc => Some(FieldName::Crc),
            Tag::Timestamp => Some(FieldName::Timestamp),
            Tag::MerchantAccount | Tag::AdditionalData | Tag::LanguageTemplate => None,
        }
    }
}

/// A decoded KHQR payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedKhqr {
    /// Which merchant account variant was seen; `None` if neither was.
    pub merchant_type: Option<MerchantType>,

    #[serde(rename = "bakongAccountID")]
    pub bakong_account_id: Option<String>,
    pub account_information: Option<String>,
    #[serde(rename = "merchantID")]
    pub merchant_id: Option<String>,
    pub acquiring_bank: Option<String>,

    pub bill_number: Option<String>,
    pub mobile_number: Option<String>,
    pub store_label: Option<String>,
    pub terminal_label: Option<String>,
    pub purpose_of_transaction: Option<String>,

    pub language_preference: Option<String>,
    pub merchant_name_alternate_language: Option<String>,
    pub merchant_city_alternate_language: Option<String>,

    pub payload_format_indicator: Option<String>,
    pub point_of_initiation_method: Option<String>,
    pub upi_merchant_account: Option<String>,
    pub merchant_category_code: Option<String>,
    pub transaction_currency: Option<String>,
    pub transaction_amount: Option<String>,
    pub country_code: Option<String>,
    pub merchant_name: Option<String>,
    pub merchant_city: Option<String>,
    pub crc: Option<String>,
    pub timestamp: Option<String>,
}

impl DecodedKhqr {
    /// Returns the value of a field, if present.
    pub fn get(&self, name: FieldName) -> Option<&str> {
        self.slot(name).as_deref()
    }

    /// Stores a field value, replacing any earlier one.
    pub fn set(&mut self, name: FieldName, value: impl Into<String>) {
        *self.slot_mut(name) = Some(value.into());
    }

    fn slot(&self, name: FieldName) -> &Option<String> {
        match name {
            FieldName::PayloadFormatIndicator => &self.payload_format_indicator,
            FieldName::PointOfInitiationMethod => &self.point_of_initiation_method,
            FieldName::UpiMerchantAccount => &self.upi_merchant_account,
            FieldName::MerchantCategoryCode => &self.merchant_category_code,
            FieldName::TransactionCurrency => &self.transaction_currency,
            FieldName::TransactionAmount => &self.transaction_amount,
            FieldName::CountryCode => &self.country_code,
            FieldName::MerchantName => &self.merchant_name,
            FieldName::MerchantCity => &self.merchant_city,
            FieldName::Crc => &self.crc,
            FieldName::Timestamp => &self.timestamp,
            FieldName::BakongAccountId => &self.bakong_account_id,
            FieldName::AccountInformation => &self.account_information,
            FieldName::MerchantId => &self.merchant_id,
            FieldName::AcquiringBank => &self.acquiring_bank,
            FieldName::BillNumber => &self.bill_number,
            FieldName::MobileNumber => &self.mobile_number,
            FieldName::StoreLabel => &self.store_label,
            FieldName::TerminalLabel => &self.terminal_label,
            FieldName::PurposeOfTransaction => &self.purpose_of_transaction,
            FieldName::LanguagePreference => &self.language_preference,
            FieldName::MerchantNameAlternateLanguage => &self.merchant_name_alternate_language,
            FieldName::MerchantCityAlternateLanguage => &self.merchant_city_alternate_language,
        }
    }

    fn slot_mut(&mut self, name: FieldName) -> &mut Option<String> {
        match name {
            FieldName::PayloadFormatIndicator => &mut self.payload_format_indicator,
            FieldName::PointOfInitiationMethod => &mut self.point_of_initiation_method,
            FieldName::UpiMerchantAccount => &mut self.upi_merchant_account,
            FieldName::MerchantCategoryCode => &mut self.merchant_category_code,
            FieldName::TransactionCurrency => &mut self.transaction_currency,
            FieldName::TransactionAmount => &mut self.transaction_amount,
            FieldName::CountryCode => &mut self.country_code,
            FieldName::MerchantName => &mut self.merchant_name,
            FieldName::MerchantCity => &mut self.merchant_city,
            FieldName::Crc => &mut self.crc,
            FieldName::Timestamp => &mut self.timestamp,
            FieldName::BakongAccountId => &mut self.bakong_account_id,
            FieldName::AccountInformation => &mut self.account_information,
            FieldName::MerchantId => &mut self.merchant_id,
            FieldName::AcquiringBank => &mut self.acquiring_bank,
            FieldName::BillNumber => &mut self.bill_number,
            FieldName::MobileNumber => &mut self.mobile_number,
            FieldName::StoreLabel => &mut self.store_label,
            FieldName::TerminalLabel => &mut self.terminal_label,
            FieldName::PurposeOfTransaction => &mut self.purpose_of_transaction,
            FieldName::LanguagePreference => &mut self.language_preference,
            FieldName::MerchantNameAlternateLanguage => {
                &mut self.merchant_name_alternate_language
            }
            FieldName::MerchantCityAlternateLanguage => {
                &mut self.merchant_city_alternate_language
            }
        }
    }

    /// Returns the transaction currency, if present and supported.
    pub fn currency(&self) -> Option<Currency> {
        self.transaction_currency.as_deref().and_then(Currency::from_code)
    }

    /// Returns the transaction amount, if present and parseable.
    pub fn amount(&self) -> Option<Decimal> {
        self.transaction_amount.as_deref()?.parse().ok()
    }

    /// Returns true if the point of initiation marks a reusable static code.
    ///
    /// A payload without the tag is treated as static.
    pub fn is_static(&self) -> bool {
        self.point_of_initiation_method
            .as_deref()
            .is_none_or(|v| v == STATIC_QR)
    }

    /// Creation time in milliseconds since the Unix epoch.
    pub fn created_at_millis(&self) -> Option<i64> {
        timestamp_subfield(self.timestamp.as_deref()?, TIMESTAMP_CREATION_SUBTAG)
    }

    /// Expiration time in milliseconds since the Unix epoch, if the code
    /// carries one.
    pub fn expires_at_millis(&self) -> Option<i64> {
        timestamp_subfield(self.timestamp.as_deref()?, TIMESTAMP_EXPIRATION_SUBTAG)
    }
}

fn timestamp_subfield(value: &str, subtag: &str) -> Option<i64> {
    let mut reader = TlvReader::new(value);
    while !reader.is_empty() {
        let field = reader.read_field().ok()?;
        if field.tag == subtag {
            return field.value.parse().ok();
        }
    }
    None
}
