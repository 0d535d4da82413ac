//! Typed description of a payee and the payment it requests.
//!
//! A [`KhqrInfo`] is the encoder's input. Every field here has a fixed place
//! in the payload; validation happens when the payload is generated.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Currencies a KHQR payload can be denominated in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "CurrencyRepr", into = "&'static str")]
pub enum Currency {
    /// Cambodian riel, the local currency (ISO 4217 `116`).
    #[default]
    Khr,
    /// US dollar (ISO 4217 `840`).
    Usd,
}

impl Currency {
    /// Returns the ISO 4217 numeric code as it appears on the wire.
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Khr => "116",
            Currency::Usd => "840",
        }
    }

    /// Returns the ISO 4217 alphabetic code.
    pub const fn alpha(self) -> &'static str {
        match self {
            Currency::Khr => "KHR",
            Currency::Usd => "USD",
        }
    }

    /// Resolves a wire code.
    pub fn from_code(code: &str) -> Option<Currency> {
        match code {
            "116" => Some(Currency::Khr),
            "840" => Some(Currency::Usd),
            _ => None,
        }
    }

    /// Returns true for the local currency, whose amounts must be integral.
    pub fn is_local(self) -> bool {
        self == Currency::Khr
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alpha())
    }
}

/// Error returned when a currency code or name is not supported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported currency: {0}")]
pub struct UnknownCurrency(pub String);

impl FromStr for Currency {
    type Err = UnknownCurrency;

    /// Accepts the numeric wire code or the alphabetic code, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(currency) = Currency::from_code(trimmed) {
            return Ok(currency);
        }
        match trimmed.to_ascii_uppercase().as_str() {
            "KHR" => Ok(Currency::Khr),
            "USD" => Ok(Currency::Usd),
            _ => Err(UnknownCurrency(s.to_string())),
        }
    }
}

/// Serde input shape for [`Currency`]: either a number or a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum CurrencyRepr {
    Code(u16),
    Name(String),
}

impl TryFrom<CurrencyRepr> for Currency {
    type Error = UnknownCurrency;

    fn try_from(repr: CurrencyRepr) -> Result<Self, Self::Error> {
        match repr {
            CurrencyRepr::Code(code) => code.to_string().parse(),
            CurrencyRepr::Name(name) => name.parse(),
        }
    }
}

impl From<Currency> for &'static str {
    fn from(currency: Currency) -> Self {
        currency.alpha()
    }
}

/// Which wire variant of the merchant account composite a payload uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MerchantType {
    /// Tag `29`: a personal account.
    Individual,
    /// Tag `30`: a merchant registered with an acquiring bank.
    Merchant,
}

impl MerchantType {
    /// Returns the wire code of the merchant account tag for this variant.
    pub const fn wire_code(self) -> &'static str {
        match self {
            MerchantType::Individual => "29",
            MerchantType::Merchant => "30",
        }
    }
}

/// Account identity carried in the merchant account composite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MerchantIdentity {
    Individual {
        bakong_account_id: String,
        account_information: Option<String>,
        acquiring_bank: Option<String>,
    },
    Merchant {
        bakong_account_id: String,
        merchant_id: String,
        acquiring_bank: String,
    },
}

impl MerchantIdentity {
    pub fn merchant_type(&self) -> MerchantType {
        match self {
            MerchantIdentity::Individual { .. } => MerchantType::Individual,
            MerchantIdentity::Merchant { .. } => MerchantType::Merchant,
        }
    }

    pub fn bakong_account_id(&self) -> &str {
        match self {
            MerchantIdentity::Individual {
                bakong_account_id, ..
            }
            | MerchantIdentity::Merchant {
                bakong_account_id, ..
            } => bakong_account_id,
        }
    }
}

/// Optional bill, store, and terminal references (tag `62`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdditionalData {
    pub bill_number: Option<String>,
    pub mobile_number: Option<String>,
    pub store_label: Option<String>,
    pub terminal_label: Option<String>,
    pub purpose_of_transaction: Option<String>,
}

impl AdditionalData {
    /// Returns true if no subfield carries a non-empty value.
    pub fn is_empty(&self) -> bool {
        [
            &self.bill_number,
            &self.mobile_number,
            &self.store_label,
            &self.terminal_label,
            &self.purpose_of_transaction,
        ]
        .iter()
        .all(|v| is_blank(v.as_deref()))
    }
}

/// Merchant name and city in an alternate language (tag `64`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageTemplate {
    pub language_preference: Option<String>,
    pub merchant_name_alternate_language: Option<String>,
    pub merchant_city_alternate_language: Option<String>,
}

impl LanguageTemplate {
    /// Returns true if no subfield carries a non-empty value.
    pub fn is_empty(&self) -> bool {
        [
            &self.language_preference,
            &self.merchant_name_alternate_language,
            &self.merchant_city_alternate_language,
        ]
        .iter()
        .all(|v| is_blank(v.as_deref()))
    }
}

/// Everything needed to generate a KHQR payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KhqrInfo {
    pub identity: MerchantIdentity,
    pub merchant_name: String,
    pub merchant_city: String,
    pub currency: Currency,
    /// Requested amount; `None` or zero produces a static code.
    pub amount: Option<Decimal>,
    /// UnionPay merchant account (tag `15`), riel only.
    pub upi_merchant_account: Option<String>,
    pub additional_data: AdditionalData,
    pub language: LanguageTemplate,
}

impl KhqrInfo {
    /// Creates a description for a personal account with no amount.
    pub fn individual(
        bakong_account_id: impl Into<String>,
        merchant_name: impl Into<String>,
        merchant_city: impl Into<String>,
    ) -> Self {
        Self::with_identity(
            MerchantIdentity::Individual {
                bakong_account_id: bakong_account_id.into(),
                account_information: None,
                acquiring_bank: None,
            },
            merchant_name.into(),
            merchant_city.into(),
        )
    }

    /// Creates a description for a merchant account with no amount.
    pub fn merchant(
        bakong_account_id: impl Into<String>,
        merchant_id: impl Into<String>,
        acquiring_bank: impl Into<String>,
        merchant_name: impl Into<String>,
        merchant_city: impl Into<String>,
    ) -> Self {
        Self::with_identity(
            MerchantIdentity::Merchant {
                bakong_account_id: bakong_account_id.into(),
                merchant_id: merchant_id.into(),
                acquiring_bank: acquiring_bank.into(),
            },
            merchant_name.into(),
            merchant_city.into(),
        )
    }

    fn with_identity(identity: MerchantIdentity, merchant_name: String, merchant_city: String) -> Self {
        Self {
            identity,
            merchant_name,
            merchant_city,
            currency: Currency::Khr,
            amount: None,
            upi_merchant_account: None,
            additional_data: AdditionalData::default(),
            language: LanguageTemplate::default(),
        }
    }

    /// Returns true if the payload will carry an amount (dynamic code).
    pub fn is_dynamic(&self) -> bool {
        self.amount.is_some_and(|a| !a.is_zero())
    }
}

pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_parse() {
        assert_eq!("116".parse::<Currency>(), Ok(Currency::Khr));
        assert_eq!("usd".parse::<Currency>(), Ok(Currency::Usd));
        assert_eq!(" KHR ".parse::<Currency>(), Ok(Currency::Khr));
        assert!("EUR".parse::<Currency>().is_err());
        assert!("978".parse::<Currency>().is_err());

        let err = "EUR".parse::<Currency>().unwrap_err();
        assert_eq!(err, UnknownCurrency("EUR".to_string()));
        assert_eq!(err.to_string(), "unsupported currency: EUR");
    }

    #[test]
    fn test_currency_serde() {
        let c: Currency = serde_json::from_str("840").unwrap();
        assert_eq!(c, Currency::Usd);
        let c: Currency = serde_json::from_str("\"khr\"").unwrap();
        assert_eq!(c, Currency::Khr);
        assert!(serde_json::from_str::<Currency>("\"THB\"").is_err());
        assert_eq!(serde_json::to_string(&Currency::Usd).unwrap(), "\"USD\"");
    }

    #[test]
    fn test_additional_data_blank_is_empty() {
        let mut data = AdditionalData::default();
        assert!(data.is_empty());
        data.store_label = Some("  ".to_string());
        assert!(data.is_empty());
        data.bill_number = Some("INV-1".to_string());
        assert!(!data.is_empty());
    }

    #[test]
    fn test_dynamic_requires_nonzero_amount() {
        let mut info = KhqrInfo::individual("a@b", "Name", "City");
        assert!(!info.is_dynamic());
        info.amount = Some(Decimal::ZERO);
        assert!(!info.is_dynamic());
        info.amount = Some(Decimal::from(5));
        assert!(info.is_dynamic());
    }

    #[test]
    fn test_identity_accessors() {
        let info = KhqrInfo::merchant("shop@bank", "M-1", "Bank", "Shop", "City");
        assert_eq!(info.identity.merchant_type(), MerchantType::Merchant);
        assert_eq!(info.identity.bakong_account_id(), "shop@bank");
    }
}
