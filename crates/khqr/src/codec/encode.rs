//! Payload encoding.
//!
//! Fields are written in a fixed order:
//! ```text
//! 00 payload format indicator
//! 01 point of initiation (11 static / 12 dynamic)
//! 15 UnionPay merchant account (optional)
//! 29 | 30 merchant account composite
//! 52 merchant category code
//! 53 transaction currency
//! 54 transaction amount (only when non-zero)
//! 58 country code
//! 59 merchant name
//! 60 merchant city
//! 62 additional data composite (optional)
//! 64 language template composite (optional)
//! 99 timestamp composite
//! 63 checksum
//! ```
//! Every value goes through the same validators the strict decoder uses
//! before it is written. Any failure aborts with no output.

use serde::Serialize;

use crate::codec::crc::checksum;
use crate::codec::tlv::TlvWriter;
use crate::error::KhqrError;
use crate::limits::{
    CRC_PREFIX, DEFAULT_COUNTRY_CODE, DEFAULT_MERCHANT_CATEGORY_CODE,
    DEFAULT_PAYLOAD_FORMAT_INDICATOR, DYNAMIC_QR, STATIC_QR, TIMESTAMP_CREATION_SUBTAG,
    TIMESTAMP_EXPIRATION_SUBTAG,
};
use crate::model::payee::is_blank;
use crate::model::{
    full_hash, md5_hex, short_hash, subtag, Currency, FieldName, KhqrInfo, MerchantIdentity,
    MerchantType, Tag,
};
use crate::util::{now_millis, trace_debug};
use crate::validate::{normalize_amount, validate_field, validate_subfields};

/// Options for encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Creation time written into tag `99`. Defaults to the current time.
    pub timestamp_millis: Option<i64>,
    /// Expiration time written into tag `99`, if any.
    pub expiration_millis: Option<i64>,
    /// Write the store label in place of the merchant name when one is set.
    pub embed_store_label_as_merchant: bool,
}

/// A generated payload and its content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KhqrResponse {
    /// The payload text, ready to be rendered as a QR code.
    pub qr: String,
    /// Lowercase hex MD5 of `qr`.
    pub md5: String,
}

impl KhqrResponse {
    fn new(qr: String) -> Self {
        let md5 = md5_hex(&qr);
        Self { qr, md5 }
    }

    /// SHA-256 of the payload as lowercase hex.
    pub fn full_hash(&self) -> String {
        full_hash(&self.qr)
    }

    /// First eight hex characters of [`full_hash`](Self::full_hash).
    pub fn short_hash(&self) -> String {
        short_hash(&self.qr)
    }
}

/// Generates a payload with default options.
pub fn generate(info: &KhqrInfo) -> Result<KhqrResponse, KhqrError> {
    generate_with_options(info, &EncodeOptions::default())
}

/// Generates a payload.
pub fn generate_with_options(
    info: &KhqrInfo,
    options: &EncodeOptions,
) -> Result<KhqrResponse, KhqrError> {
    let upi = info
        .upi_merchant_account
        .as_deref()
        .filter(|v| !v.trim().is_empty());
    if upi.is_some() && info.currency == Currency::Usd {
        return Err(KhqrError::CurrencyConflict {
            currency: info.currency,
        });
    }

    let variant = info.identity.merchant_type();
    let account = merchant_account_subfields(&info.identity);
    validate_subfields(Tag::MerchantAccount, Some(variant), &account)?;

    let amount = match info.amount {
        Some(amount) => {
            normalize_amount(amount, info.currency).map_err(|reason| KhqrError::FieldValidation {
                tag: Tag::TransactionAmount.code(),
                field: Tag::TransactionAmount.name(),
                reason,
            })?
        }
        None => None,
    };

    let mut writer = TlvWriter::with_capacity(256);

    write_scalar(&mut writer, Tag::PayloadFormatIndicator, DEFAULT_PAYLOAD_FORMAT_INDICATOR)?;
    let initiation = if amount.is_some() { DYNAMIC_QR } else { STATIC_QR };
    write_scalar(&mut writer, Tag::PointOfInitiationMethod, initiation)?;
    if let Some(upi) = upi {
        write_scalar(&mut writer, Tag::UpiMerchantAccount, upi)?;
    }

    write_composite(&mut writer, Tag::MerchantAccount, Some(variant), &account)?;

    write_scalar(&mut writer, Tag::MerchantCategoryCode, DEFAULT_MERCHANT_CATEGORY_CODE)?;
    write_scalar(&mut writer, Tag::TransactionCurrency, info.currency.code())?;
    if let Some(amount) = &amount {
        write_scalar(&mut writer, Tag::TransactionAmount, amount)?;
    }
    write_scalar(&mut writer, Tag::CountryCode, DEFAULT_COUNTRY_CODE)?;

    let store_label = info.additional_data.store_label.as_deref();
    let merchant_name = match store_label {
        Some(label) if options.embed_store_label_as_merchant && !is_blank(Some(label)) => label,
        _ => info.merchant_name.as_str(),
    };
    write_scalar(&mut writer, Tag::MerchantName, merchant_name)?;
    write_scalar(&mut writer, Tag::MerchantCity, &info.merchant_city)?;

    if !info.additional_data.is_empty() {
        let data = &info.additional_data;
        let subfields = subfields(
            Tag::AdditionalData,
            &[
                (FieldName::BillNumber, data.bill_number.as_deref()),
                (FieldName::MobileNumber, data.mobile_number.as_deref()),
                (FieldName::StoreLabel, data.store_label.as_deref()),
                (FieldName::TerminalLabel, data.terminal_label.as_deref()),
                (FieldName::PurposeOfTransaction, data.purpose_of_transaction.as_deref()),
            ],
        );
        validate_subfields(Tag::AdditionalData, None, &subfields)?;
        write_composite(&mut writer, Tag::AdditionalData, None, &subfields)?;
    }

    if !info.language.is_empty() {
        let language = &info.language;
        let subfields = subfields(
            Tag::LanguageTemplate,
            &[
                (FieldName::LanguagePreference, language.language_preference.as_deref()),
                (
                    FieldName::MerchantNameAlternateLanguage,
                    language.merchant_name_alternate_language.as_deref(),
                ),
                (
                    FieldName::MerchantCityAlternateLanguage,
                    language.merchant_city_alternate_language.as_deref(),
                ),
            ],
        );
        validate_subfields(Tag::LanguageTemplate, None, &subfields)?;
        write_composite(&mut writer, Tag::LanguageTemplate, None, &subfields)?;
    }

    let created = options.timestamp_millis.unwrap_or_else(now_millis);
    let timestamp = encode_timestamp(created, options.expiration_millis)?;
    write_scalar(&mut writer, Tag::Timestamp, &timestamp)?;

    writer.write_raw(CRC_PREFIX);
    let crc = checksum(writer.as_str());
    writer.write_raw(&crc);

    let qr = writer.into_string();
    trace_debug(format_args!("generated {} byte payload, crc {}", qr.len(), crc));
    Ok(KhqrResponse::new(qr))
}

fn write_scalar(writer: &mut TlvWriter, tag: Tag, value: &str) -> Result<(), KhqrError> {
    validate_field(tag, None, value)?;
    writer.write_field(tag.code(), tag.name(), value)
}

/// Writes a composite whose subfields have already been validated.
fn write_composite(
    writer: &mut TlvWriter,
    tag: Tag,
    variant: Option<MerchantType>,
    subfields: &[(&'static str, &str)],
) -> Result<(), KhqrError> {
    let mut inner = TlvWriter::new();
    for &(code, value) in subfields {
        let field = subtag::field_for(tag, code, variant).map_or(tag.name(), FieldName::as_str);
        inner.write_field(code, field, value)?;
    }

    let code = match variant {
        Some(variant) => variant.wire_code(),
        None => tag.code(),
    };
    writer.write_field(code, tag.name(), inner.as_str())
}

/// Collects the non-blank subfields of a composite, in wire order.
fn subfields<'a>(
    parent: Tag,
    fields: &[(FieldName, Option<&'a str>)],
) -> Vec<(&'static str, &'a str)> {
    fields
        .iter()
        .filter_map(|&(field, value)| {
            let value = value.filter(|v| !v.trim().is_empty())?;
            let def = subtag::find_field(parent, field)?;
            Some((def.code, value))
        })
        .collect()
}

fn merchant_account_subfields(identity: &MerchantIdentity) -> Vec<(&'static str, &str)> {
    let fields = match identity {
        MerchantIdentity::Individual {
            bakong_account_id,
            account_information,
            acquiring_bank,
        } => [
            (FieldName::BakongAccountId, Some(bakong_account_id.as_str())),
            (FieldName::AccountInformation, account_information.as_deref()),
            (FieldName::AcquiringBank, acquiring_bank.as_deref()),
        ],
        MerchantIdentity::Merchant {
            bakong_account_id,
            merchant_id,
            acquiring_bank,
        } => [
            (FieldName::BakongAccountId, Some(bakong_account_id.as_str())),
            (FieldName::MerchantId, Some(merchant_id.as_str())),
            (FieldName::AcquiringBank, Some(acquiring_bank.as_str())),
        ],
    };
    subfields(Tag::MerchantAccount, &fields)
}

fn encode_timestamp(created: i64, expires: Option<i64>) -> Result<String, KhqrError> {
    let field = Tag::Timestamp.name();
    let mut inner = TlvWriter::new();
    inner.write_field(TIMESTAMP_CREATION_SUBTAG, field, &created.to_string())?;
    if let Some(expires) = expires {
        inner.write_field(TIMESTAMP_EXPIRATION_SUBTAG, field, &expires.to_string())?;
    }
    Ok(inner.into_string())
}
