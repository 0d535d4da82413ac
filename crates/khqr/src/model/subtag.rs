//! Subtag registry for composite tags.
//!
//! Maps `(parent tag, subtag code)` to the decoded field it fills.

use crate::limits::*;
use crate::model::{FieldName, MerchantType, Tag};

/// Registry entry describing one subfield of a composite tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubtagDefinition {
    pub parent: Tag,
    pub code: &'static str,
    pub field: FieldName,
    pub max_len: usize,
}

const fn sub(parent: Tag, code: &'static str, field: FieldName, max_len: usize) -> SubtagDefinition {
    SubtagDefinition {
        parent,
        code,
        field,
        max_len,
    }
}

/// Every known subtag, in wire order within each parent.
///
/// Subtag `01` of the merchant account is registered as
/// `accountInformation`; the merchant variant relabels it to `merchantID`
/// (see [`field_for`]).
pub static SUBTAGS: [SubtagDefinition; 11] = [
    sub(Tag::MerchantAccount, "00", FieldName::BakongAccountId, MAX_BAKONG_ACCOUNT_ID_LEN),
    sub(Tag::MerchantAccount, "01", FieldName::AccountInformation, MAX_ACCOUNT_INFORMATION_LEN),
    sub(Tag::MerchantAccount, "02", FieldName::AcquiringBank, MAX_ACQUIRING_BANK_LEN),
    sub(Tag::AdditionalData, "01", FieldName::BillNumber, MAX_BILL_NUMBER_LEN),
    sub(Tag::AdditionalData, "02", FieldName::MobileNumber, MAX_MOBILE_NUMBER_LEN),
    sub(Tag::AdditionalData, "03", FieldName::StoreLabel, MAX_STORE_LABEL_LEN),
    sub(Tag::AdditionalData, "07", FieldName::TerminalLabel, MAX_TERMINAL_LABEL_LEN),
    sub(Tag::AdditionalData, "08", FieldName::PurposeOfTransaction, MAX_PURPOSE_OF_TRANSACTION_LEN),
    sub(Tag::LanguageTemplate, "00", FieldName::LanguagePreference, MAX_LANGUAGE_PREFERENCE_LEN),
    sub(
        Tag::LanguageTemplate,
        "01",
        FieldName::MerchantNameAlternateLanguage,
        MAX_MERCHANT_NAME_ALTERNATE_LEN,
    ),
    sub(
        Tag::LanguageTemplate,
        "02",
        FieldName::MerchantCityAlternateLanguage,
        MAX_MERCHANT_CITY_ALTERNATE_LEN,
    ),
];

/// Looks up a subtag by parent and code.
pub fn find(parent: Tag, code: &str) -> Option<&'static SubtagDefinition> {
    SUBTAGS.iter().find(|def| def.parent == parent && def.code == code)
}

/// Looks up the subtag definition that carries `field`.
///
/// `merchantID` resolves to the shared subtag `01` of the merchant account.
pub fn find_field(parent: Tag, field: FieldName) -> Option<&'static SubtagDefinition> {
    let field = match field {
        FieldName::MerchantId => FieldName::AccountInformation,
        other => other,
    };
    SUBTAGS.iter().find(|def| def.parent == parent && def.field == field)
}

/// Resolves the decoded field name for a subtag, applying the merchant
/// variant's relabeling of subtag `01`.
pub fn field_for(parent: Tag, code: &str, variant: Option<MerchantType>) -> Option<FieldName> {
    let def = find(parent, code)?;
    match (def.field, variant) {
        (FieldName::AccountInformation, Some(MerchantType::Merchant)) => Some(FieldName::MerchantId),
        (field, _) => Some(field),
    }
}
