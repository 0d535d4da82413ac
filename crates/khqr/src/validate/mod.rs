//! Field validation shared by the encoder and the strict decoder.
//!
//! Every top-level tag has a [`FieldKind`] and every kind has one checking
//! function. The encoder runs the same checks on the values it is about to
//! write that the strict decoder runs on the values it read, so a payload
//! produced by [`generate`](crate::generate) always passes
//! [`decode_strict`](crate::decode_strict).

use rust_decimal::Decimal;

use crate::codec::tlv::TlvReader;
use crate::error::{FieldError, KhqrError};
use crate::limits::{
    DYNAMIC_QR, MAX_BAKONG_ACCOUNT_ID_LEN, MAX_TIMESTAMP_LEN, MAX_TRANSACTION_AMOUNT_LEN,
    MAX_TRANSACTION_CURRENCY_LEN, MAX_TLV_VALUE_LEN, STATIC_QR,
};
use crate::model::subtag::{self, SubtagDefinition};
use crate::model::{Currency, FieldKind, FieldName, MerchantType, Tag};

// =============================================================================
// TOP-LEVEL FIELDS
// =============================================================================

/// Validates the value of a top-level tag.
///
/// `variant` selects the merchant account rules and is ignored for other
/// tags.
pub fn validate_field(
    tag: Tag,
    variant: Option<MerchantType>,
    value: &str,
) -> Result<(), KhqrError> {
    let def = tag.definition();
    let code = wire_code(tag, variant);
    let fail = |reason: FieldError| KhqrError::FieldValidation {
        tag: code,
        field: def.name,
        reason,
    };

    match def.kind {
        FieldKind::Numeric { max_len } => check_numeric(value, max_len).map_err(fail),
        FieldKind::Text { max_len } => check_text(value, max_len, def.required).map_err(fail),
        FieldKind::Alphabetic { max_len } => check_alphabetic(value, max_len).map_err(fail),
        FieldKind::InitiationMethod => check_initiation_method(value).map_err(fail),
        FieldKind::Currency => check_currency(value).map(|_| ()).map_err(fail),
        FieldKind::Amount => check_amount_text(value).map(|_| ()).map_err(fail),
        FieldKind::Checksum => check_checksum_value(value).map_err(fail),
        FieldKind::Timestamp => check_timestamp(value).map_err(fail),
        FieldKind::MerchantAccount | FieldKind::AdditionalData | FieldKind::LanguageTemplate => {
            let subfields = split_composite(value).map_err(fail)?;
            validate_subfields(tag, variant, &subfields)
        }
    }
}

/// Returns the wire code errors about `tag` are reported under.
fn wire_code(tag: Tag, variant: Option<MerchantType>) -> &'static str {
    match (tag, variant) {
        (Tag::MerchantAccount, Some(variant)) => variant.wire_code(),
        _ => tag.code(),
    }
}

fn check_len(value: &str, max_len: usize) -> Result<(), FieldError> {
    if value.len() > max_len {
        return Err(FieldError::TooLong {
            len: value.len(),
            max: max_len,
        });
    }
    Ok(())
}

fn check_numeric(value: &str, max_len: usize) -> Result<(), FieldError> {
    if value.is_empty() {
        return Err(FieldError::Required);
    }
    check_len(value, max_len)?;
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FieldError::NotNumeric);
    }
    Ok(())
}

fn check_alphabetic(value: &str, max_len: usize) -> Result<(), FieldError> {
    if value.is_empty() {
        return Err(FieldError::Required);
    }
    check_len(value, max_len)?;
    if !value.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(FieldError::NotAlphabetic);
    }
    Ok(())
}

/// Checks a free-text value: byte length, no control characters, and not
/// blank when `required`.
pub fn check_text(value: &str, max_len: usize, required: bool) -> Result<(), FieldError> {
    if required && value.trim().is_empty() {
        return Err(FieldError::Required);
    }
    check_len(value, max_len)?;
    if value.chars().any(char::is_control) {
        return Err(FieldError::ControlCharacter);
    }
    Ok(())
}

fn check_initiation_method(value: &str) -> Result<(), FieldError> {
    if value == STATIC_QR || value == DYNAMIC_QR {
        Ok(())
    } else {
        Err(FieldError::NotAllowed {
            value: value.to_string(),
        })
    }
}

fn check_currency(value: &str) -> Result<Currency, FieldError> {
    check_len(value, MAX_TRANSACTION_CURRENCY_LEN)?;
    Currency::from_code(value).ok_or_else(|| FieldError::UnsupportedCurrency {
        code: value.to_string(),
    })
}

fn check_checksum_value(value: &str) -> Result<(), FieldError> {
    if value.len() != 4 {
        return Err(FieldError::NotAllowed {
            value: value.to_string(),
        });
    }
    if !value.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(FieldError::NotHex);
    }
    Ok(())
}

fn check_timestamp(value: &str) -> Result<(), FieldError> {
    check_len(value, MAX_TIMESTAMP_LEN)?;
    for (_, millis) in split_composite(value)? {
        check_numeric(millis, MAX_TLV_VALUE_LEN)?;
    }
    Ok(())
}

// =============================================================================
// AMOUNTS
// =============================================================================

/// Parses an amount as written on the wire: decimal digits with at most one
/// decimal point, no sign, no exponent.
pub fn check_amount_text(value: &str) -> Result<Decimal, FieldError> {
    check_len(value, MAX_TRANSACTION_AMOUNT_LEN)?;
    let invalid = || FieldError::InvalidAmount {
        amount: value.to_string(),
    };
    let (whole, fraction) = match value.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (value, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(whole) || !fraction.is_none_or(digits) {
        return Err(invalid());
    }
    value.parse::<Decimal>().map_err(|_| invalid())
}

/// Checks an amount against the precision its currency allows.
pub fn check_amount_precision(amount: Decimal, currency: Currency) -> Result<(), FieldError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(FieldError::NegativeAmount);
    }
    if currency.is_local() {
        if !amount.fract().is_zero() {
            return Err(FieldError::FractionalLocalAmount);
        }
    } else {
        let scale = amount.normalize().scale();
        if scale > 2 {
            return Err(FieldError::TooManyDecimals { scale });
        }
    }
    Ok(())
}

/// Renders an amount the way it is written into a payload.
///
/// Returns `None` for a zero amount, which is not written at all. Riel
/// amounts are written as whole numbers. Dollar amounts are written as
/// whole numbers when integral and with exactly two decimals otherwise.
pub fn normalize_amount(amount: Decimal, currency: Currency) -> Result<Option<String>, FieldError> {
    check_amount_precision(amount, currency)?;
    if amount.is_zero() {
        return Ok(None);
    }
    let mut normalized = amount.normalize();
    if normalized.scale() > 0 {
        normalized.rescale(2);
    }
    let text = normalized.to_string();
    check_len(&text, MAX_TRANSACTION_AMOUNT_LEN)?;
    Ok(Some(text))
}

/// Cross-checks a decoded amount against the decoded currency.
pub fn validate_amount_currency(amount: &str, currency: &str) -> Result<(), KhqrError> {
    let fail = |reason: FieldError| KhqrError::FieldValidation {
        tag: Tag::TransactionAmount.code(),
        field: Tag::TransactionAmount.name(),
        reason,
    };
    let Some(currency) = Currency::from_code(currency) else {
        return Ok(());
    };
    let amount = check_amount_text(amount).map_err(fail)?;
    check_amount_precision(amount, currency).map_err(fail)
}

// =============================================================================
// COMPOSITES
// =============================================================================

/// Splits a composite value into `(subtag, value)` pairs.
pub fn split_composite(value: &str) -> Result<Vec<(&str, &str)>, FieldError> {
    let mut reader = TlvReader::new(value);
    let mut fields = Vec::new();
    while !reader.is_empty() {
        let field = reader
            .read_field()
            .map_err(|_| FieldError::MalformedComposite)?;
        fields.push((field.tag, field.value));
    }
    Ok(fields)
}

/// Validates the subfields of a composite tag.
///
/// Unknown subtags are ignored. After the per-subfield checks, the
/// composite's own presence rules are applied:
/// - the merchant account needs a Bakong account ID, and the merchant
///   variant also needs a merchant ID and an acquiring bank;
/// - the language template needs a language preference and an alternate
///   merchant name.
pub fn validate_subfields(
    parent: Tag,
    variant: Option<MerchantType>,
    subfields: &[(&str, &str)],
) -> Result<(), KhqrError> {
    let code = wire_code(parent, variant);
    let fail = |field: FieldName, reason: FieldError| KhqrError::FieldValidation {
        tag: code,
        field: field.as_str(),
        reason,
    };

    for &(sub, value) in subfields {
        let Some(def) = subtag::find(parent, sub) else {
            continue;
        };
        let field = subtag::field_for(parent, sub, variant).unwrap_or(def.field);
        check_subfield(def, value).map_err(|reason| fail(field, reason))?;
    }

    let present = |field: FieldName| {
        subfields.iter().any(|&(sub, value)| {
            subtag::find(parent, sub).is_some_and(|def| def.field == field)
                && !value.trim().is_empty()
        })
    };
    let mut needed: Vec<(FieldName, FieldName)> = Vec::new();
    match parent {
        Tag::MerchantAccount => {
            needed.push((FieldName::BakongAccountId, FieldName::BakongAccountId));
            if variant == Some(MerchantType::Merchant) {
                needed.push((FieldName::AccountInformation, FieldName::MerchantId));
                needed.push((FieldName::AcquiringBank, FieldName::AcquiringBank));
            }
        }
        Tag::LanguageTemplate => {
            needed.push((FieldName::LanguagePreference, FieldName::LanguagePreference));
            needed.push((
                FieldName::MerchantNameAlternateLanguage,
                FieldName::MerchantNameAlternateLanguage,
            ));
        }
        _ => {}
    }
    for (registered, reported) in needed {
        if !present(registered) {
            return Err(fail(reported, FieldError::Required));
        }
    }
    Ok(())
}

fn check_subfield(def: &SubtagDefinition, value: &str) -> Result<(), FieldError> {
    match def.field {
        FieldName::BakongAccountId => check_account_id(value),
        _ => check_text(value, def.max_len, false),
    }
}

/// Checks a Bakong account ID of the form `name@bank`.
pub fn check_account_id(value: &str) -> Result<(), FieldError> {
    check_text(value, MAX_BAKONG_ACCOUNT_ID_LEN, true)?;
    let well_formed = value
        .split_once('@')
        .is_some_and(|(name, bank)| !name.is_empty() && !bank.is_empty() && !bank.contains('@'));
    if !well_formed || value.chars().any(char::is_whitespace) {
        return Err(FieldError::InvalidAccountId {
            value: value.to_string(),
        });
    }
    Ok(())
}
