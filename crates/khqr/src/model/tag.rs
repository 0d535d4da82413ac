//! Top-level tag registry.
//!
//! Every tag the codec understands is listed once in [`TAGS`], in the order
//! the encoder emits it. Tag codes follow the EMVCo merchant-presented QR
//! layout as profiled by KHQR.

use crate::limits::*;
use crate::model::MerchantType;

/// A known top-level tag.
///
/// The merchant account composite has two wire codes (`29` and `30`); both
/// map to [`Tag::MerchantAccount`] and the variant is carried separately as
/// a [`MerchantType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    PayloadFormatIndicator,
    PointOfInitiationMethod,
    UpiMerchantAccount,
    MerchantAccount,
    MerchantCategoryCode,
    TransactionCurrency,
    TransactionAmount,
    CountryCode,
    MerchantName,
    MerchantCity,
    AdditionalData,
    Crc,
    LanguageTemplate,
    Timestamp,
}

impl Tag {
    /// Returns the canonical two-character wire code.
    pub const fn code(self) -> &'static str {
        match self {
            Tag::PayloadFormatIndicator => "00",
            Tag::PointOfInitiationMethod => "01",
            Tag::UpiMerchantAccount => "15",
            Tag::MerchantAccount => "29",
            Tag::MerchantCategoryCode => "52",
            Tag::TransactionCurrency => "53",
            Tag::TransactionAmount => "54",
            Tag::CountryCode => "58",
            Tag::MerchantName => "59",
            Tag::MerchantCity => "60",
            Tag::AdditionalData => "62",
            Tag::Crc => "63",
            Tag::LanguageTemplate => "64",
            Tag::Timestamp => "99",
        }
    }

    /// Resolves a wire code to a tag.
    ///
    /// Returns the merchant account variant alongside the tag when the code
    /// is one of the two merchant account codes.
    pub fn from_wire(code: &str) -> Option<(Tag, Option<MerchantType>)> {
        let tag = match code {
            "00" => Tag::PayloadFormatIndicator,
            "01" => Tag::PointOfInitiationMethod,
            "15" => Tag::UpiMerchantAccount,
            "29" => return Some((Tag::MerchantAccount, Some(MerchantType::Individual))),
            "30" => return Some((Tag::MerchantAccount, Some(MerchantType::Merchant))),
            "52" => Tag::MerchantCategoryCode,
            "53" => Tag::TransactionCurrency,
            "54" => Tag::TransactionAmount,
            "58" => Tag::CountryCode,
            "59" => Tag::MerchantName,
            "60" => Tag::MerchantCity,
            "62" => Tag::AdditionalData,
            "63" => Tag::Crc,
            "64" => Tag::LanguageTemplate,
            "99" => Tag::Timestamp,
            _ => return None,
        };
        Some((tag, None))
    }

    /// Returns the registry entry for this tag.
    pub fn definition(self) -> &'static TagDefinition {
        // TAGS is declared in the same order as the enum.
        &TAGS[self as usize]
    }

    /// Returns the field name used in errors and decoded output.
    pub fn name(self) -> &'static str {
        self.definition().name
    }
}

/// Validation rule class for a tag's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Decimal digits only.
    Numeric { max_len: usize },
    /// Free text without control characters.
    Text { max_len: usize },
    /// ASCII letters only.
    Alphabetic { max_len: usize },
    /// Static (`11`) or dynamic (`12`) point of initiation.
    InitiationMethod,
    /// One of the supported ISO 4217 numeric currency codes.
    Currency,
    /// Non-negative decimal amount.
    Amount,
    /// Four hex digits.
    Checksum,
    /// Nested TLV of epoch-millisecond values.
    Timestamp,
    /// Payee account identity composite.
    MerchantAccount,
    /// Bill, store, and terminal composite.
    AdditionalData,
    /// Alternate-language names composite.
    LanguageTemplate,
}

impl FieldKind {
    /// Returns true if values of this kind are nested TLV streams with
    /// entries in the subtag registry.
    pub fn has_subtags(self) -> bool {
        matches!(
            self,
            FieldKind::MerchantAccount | FieldKind::AdditionalData | FieldKind::LanguageTemplate
        )
    }
}

/// Registry entry describing one top-level tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagDefinition {
    pub tag: Tag,
    pub name: &'static str,
    pub required: bool,
    pub kind: FieldKind,
}

impl TagDefinition {
    const fn new(tag: Tag, name: &'static str, required: bool, kind: FieldKind) -> Self {
        Self {
            tag,
            name,
            required,
            kind,
        }
    }

    /// Returns the canonical wire code.
    pub fn code(&self) -> &'static str {
        self.tag.code()
    }

    /// Returns true if the value is a composite with its own subtags.
    pub fn has_subtags(&self) -> bool {
        self.kind.has_subtags()
    }
}

/// Every known top-level tag, in wire order.
pub static TAGS: [TagDefinition; 14] = [
    TagDefinition::new(
        Tag::PayloadFormatIndicator,
        "payloadFormatIndicator",
        true,
        FieldKind::Numeric { max_len: MAX_PAYLOAD_FORMAT_INDICATOR_LEN },
    ),
    TagDefinition::new(
        Tag::PointOfInitiationMethod,
        "pointOfInitiationMethod",
        false,
        FieldKind::InitiationMethod,
    ),
    TagDefinition::new(
        Tag::UpiMerchantAccount,
        "upiMerchantAccount",
        false,
        FieldKind::Text { max_len: MAX_UPI_MERCHANT_ACCOUNT_LEN },
    ),
    TagDefinition::new(
        Tag::MerchantAccount,
        "merchantAccountInformation",
        true,
        FieldKind::MerchantAccount,
    ),
    TagDefinition::new(
        Tag::MerchantCategoryCode,
        "merchantCategoryCode",
        true,
        FieldKind::Numeric { max_len: MAX_MERCHANT_CATEGORY_CODE_LEN },
    ),
    TagDefinition::new(
        Tag::TransactionCurrency,
        "transactionCurrency",
        true,
        FieldKind::Currency,
    ),
    TagDefinition::new(
        Tag::TransactionAmount,
        "transactionAmount",
        false,
        FieldKind::Amount,
    ),
    TagDefinition::new(
        Tag::CountryCode,
        "countryCode",
        true,
        FieldKind::Alphabetic { max_len: MAX_COUNTRY_CODE_LEN },
    ),
    TagDefinition::new(
        Tag::MerchantName,
        "merchantName",
        true,
        FieldKind::Text { max_len: MAX_MERCHANT_NAME_LEN },
    ),
    TagDefinition::new(
        Tag::MerchantCity,
        "merchantCity",
        true,
        FieldKind::Text { max_len: MAX_MERCHANT_CITY_LEN },
    ),
    TagDefinition::new(
        Tag::AdditionalData,
        "additionalDataFieldTemplate",
        false,
        FieldKind::AdditionalData,
    ),
    TagDefinition::new(Tag::Crc, "crc", true, FieldKind::Checksum),
    TagDefinition::new(
        Tag::LanguageTemplate,
        "merchantInformationLanguageTemplate",
        false,
        FieldKind::LanguageTemplate,
    ),
    TagDefinition::new(Tag::Timestamp, "timestamp", false, FieldKind::Timestamp),
];

/// Iterates over the tags a strictly decoded payload must contain.
pub fn required_tags() -> impl Iterator<Item = Tag> {
    TAGS.iter().filter(|def| def.required).map(|def| def.tag)
}
