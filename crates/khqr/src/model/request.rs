//! Loosely keyed payment requests, resolved once into a [`KhqrInfo`].
//!
//! Integrations hand over payment details as JSON-like bags with assorted
//! key spellings. [`KhqrRequest`] accepts all of them through a map
//! visitor and [`KhqrRequest::into_info`] turns the result into the typed
//! description the encoder takes. Nothing downstream sees the aliases.
//!
//! # Alias table
//!
//! | Field | Accepted keys |
//! |-------|---------------|
//! | bakong account | `bakong_account_id`, `bakongAccountID`, `merchant_account`, `account`, `bakong_account` |
//! | merchant name | `merchant_name`, `merchantName`, `name` |
//! | merchant city | `merchant_city`, `merchantCity`, `city` |
//! | merchant ID | `merchant_id`, `merchantID` |
//! | acquiring bank | `acquiring_bank`, `acquiringBank`, `bank` |
//! | account information | `account_information`, `accountInformation` |
//! | UnionPay account | `upi_merchant_account`, `upiMerchantAccount`, `upi_account`, `unionpay_account` |
//! | amount | `amount`, `transaction_amount` |
//! | currency | `currency`, `transaction_currency` |
//! | bill number | `bill_number`, `billNumber` |
//! | mobile number | `mobile_number`, `mobileNumber` |
//! | store label | `store_label`, `storeLabel` |
//! | terminal label | `terminal_label`, `terminalLabel` |
//! | purpose | `purpose_of_transaction`, `purposeOfTransaction`, `purpose` |
//! | language preference | `language_preference`, `languagePreference` |
//! | alternate name | `merchant_name_alternate_language`, `merchantNameAlternateLanguage`, `merchant_name_alt` |
//! | alternate city | `merchant_city_alternate_language`, `merchantCityAlternateLanguage`, `merchant_city_alt` |
//! | store label as name | `embed_store_label_as_merchant`, `embedStoreLabelAsMerchant`, `store_label_as_merchant` |

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use rustc_hash::FxHashMap;
use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::KhqrError;
use crate::model::{
    AdditionalData, Currency, FieldName, KhqrInfo, LanguageTemplate, MerchantIdentity, Tag,
};

/// A payment request as received from an integration.
///
/// When a bag carries several spellings of one field, the first non-blank
/// one in alias table order wins. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KhqrRequest {
    pub bakong_account_id: Option<String>,
    pub merchant_name: Option<String>,
    pub merchant_city: Option<String>,
    pub merchant_id: Option<String>,
    pub acquiring_bank: Option<String>,
    pub account_information: Option<String>,
    pub upi_merchant_account: Option<String>,

    pub amount: Option<Decimal>,
    pub currency: Option<Currency>,

    pub bill_number: Option<String>,
    pub mobile_number: Option<String>,
    pub store_label: Option<String>,
    pub terminal_label: Option<String>,
    pub purpose_of_transaction: Option<String>,

    pub language_preference: Option<String>,
    pub merchant_name_alternate_language: Option<String>,
    pub merchant_city_alternate_language: Option<String>,

    /// Put the store label in the merchant name field so scanners display it.
    pub embed_store_label_as_merchant: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Slot {
    BakongAccountId,
    MerchantName,
    MerchantCity,
    MerchantId,
    AcquiringBank,
    AccountInformation,
    UpiMerchantAccount,
    Amount,
    Currency,
    BillNumber,
    MobileNumber,
    StoreLabel,
    TerminalLabel,
    PurposeOfTransaction,
    LanguagePreference,
    MerchantNameAlternateLanguage,
    MerchantCityAlternateLanguage,
    EmbedStoreLabelAsMerchant,
}

/// Accepted keys per slot, highest priority first.
static ALIASES: [(Slot, &[&str]); 18] = [
    (
        Slot::BakongAccountId,
        &["bakong_account_id", "bakongAccountID", "merchant_account", "account", "bakong_account"],
    ),
    (Slot::MerchantName, &["merchant_name", "merchantName", "name"]),
    (Slot::MerchantCity, &["merchant_city", "merchantCity", "city"]),
    (Slot::MerchantId, &["merchant_id", "merchantID"]),
    (Slot::AcquiringBank, &["acquiring_bank", "acquiringBank", "bank"]),
    (Slot::AccountInformation, &["account_information", "accountInformation"]),
    (
        Slot::UpiMerchantAccount,
        &["upi_merchant_account", "upiMerchantAccount", "upi_account", "unionpay_account"],
    ),
    (Slot::Amount, &["amount", "transaction_amount"]),
    (Slot::Currency, &["currency", "transaction_currency"]),
    (Slot::BillNumber, &["bill_number", "billNumber"]),
    (Slot::MobileNumber, &["mobile_number", "mobileNumber"]),
    (Slot::StoreLabel, &["store_label", "storeLabel"]),
    (Slot::TerminalLabel, &["terminal_label", "terminalLabel"]),
    (
        Slot::PurposeOfTransaction,
        &["purpose_of_transaction", "purposeOfTransaction", "purpose"],
    ),
    (Slot::LanguagePreference, &["language_preference", "languagePreference"]),
    (
        Slot::MerchantNameAlternateLanguage,
        &["merchant_name_alternate_language", "merchantNameAlternateLanguage", "merchant_name_alt"],
    ),
    (
        Slot::MerchantCityAlternateLanguage,
        &["merchant_city_alternate_language", "merchantCityAlternateLanguage", "merchant_city_alt"],
    ),
    (
        Slot::EmbedStoreLabelAsMerchant,
        &["embed_store_label_as_merchant", "embedStoreLabelAsMerchant", "store_label_as_merchant"],
    ),
];

/// Returns the slot a key fills and the key's rank among that slot's aliases.
fn lookup(key: &str) -> Option<(Slot, usize)> {
    ALIASES.iter().find_map(|&(slot, keys)| {
        keys.iter().position(|&k| k == key).map(|rank| (slot, rank))
    })
}

impl<'de> Deserialize<'de> for KhqrRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RequestVisitor)
    }
}

struct RequestVisitor;

impl<'de> Visitor<'de> for RequestVisitor {
    type Value = KhqrRequest;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of payment request fields")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut request = KhqrRequest::default();
        let mut filled: FxHashMap<Slot, usize> = FxHashMap::default();

        while let Some(key) = map.next_key::<String>()? {
            let Some((slot, rank)) = lookup(&key) else {
                map.next_value::<IgnoredAny>()?;
                continue;
            };
            if filled.get(&slot).is_some_and(|&best| best <= rank) {
                map.next_value::<IgnoredAny>()?;
                continue;
            }

            let target = match slot {
                Slot::Amount => {
                    if fill(&mut request.amount, map.next_value()?) {
                        filled.insert(slot, rank);
                    }
                    continue;
                }
                Slot::Currency => {
                    if fill(&mut request.currency, map.next_value()?) {
                        filled.insert(slot, rank);
                    }
                    continue;
                }
                Slot::EmbedStoreLabelAsMerchant => {
                    let value: Option<bool> = map.next_value()?;
                    request.embed_store_label_as_merchant |= value.unwrap_or(false);
                    continue;
                }
                Slot::BakongAccountId => &mut request.bakong_account_id,
                Slot::MerchantName => &mut request.merchant_name,
                Slot::MerchantCity => &mut request.merchant_city,
                Slot::MerchantId => &mut request.merchant_id,
                Slot::AcquiringBank => &mut request.acquiring_bank,
                Slot::AccountInformation => &mut request.account_information,
                Slot::UpiMerchantAccount => &mut request.upi_merchant_account,
                Slot::BillNumber => &mut request.bill_number,
                Slot::MobileNumber => &mut request.mobile_number,
                Slot::StoreLabel => &mut request.store_label,
                Slot::TerminalLabel => &mut request.terminal_label,
                Slot::PurposeOfTransaction => &mut request.purpose_of_transaction,
                Slot::LanguagePreference => &mut request.language_preference,
                Slot::MerchantNameAlternateLanguage => {
                    &mut request.merchant_name_alternate_language
                }
                Slot::MerchantCityAlternateLanguage => {
                    &mut request.merchant_city_alternate_language
                }
            };
            if fill(target, present(map.next_value()?)) {
                filled.insert(slot, rank);
            }
        }

        Ok(request)
    }
}

/// Stores `value` if there is one and reports whether it did.
fn fill<T>(target: &mut Option<T>, value: Option<T>) -> bool {
    match value {
        Some(value) => {
            *target = Some(value);
            true
        }
        None => false,
    }
}

impl KhqrRequest {
    /// Resolves the request into a typed description.
    ///
    /// - A merchant account is chosen when both merchant ID and acquiring
    ///   bank are present; otherwise the request describes an individual.
    /// - Blank strings count as absent.
    /// - Riel amounts are rounded half away from zero to a whole number.
    /// - Currency defaults to riel.
    pub fn into_info(self) -> Result<KhqrInfo, KhqrError> {
        let bakong_account_id = required(
            self.bakong_account_id,
            Tag::MerchantAccount,
            FieldName::BakongAccountId,
        )?;
        let store_label = present(self.store_label);
        let mut merchant_name =
            required(self.merchant_name, Tag::MerchantName, FieldName::MerchantName)?;
        let merchant_city =
            required(self.merchant_city, Tag::MerchantCity, FieldName::MerchantCity)?;

        if self.embed_store_label_as_merchant {
            if let Some(label) = &store_label {
                merchant_name = label.clone();
            }
        }

        let merchant_id = present(self.merchant_id);
        let acquiring_bank = present(self.acquiring_bank);
        let identity = match (merchant_id, acquiring_bank) {
            (Some(merchant_id), Some(acquiring_bank)) => MerchantIdentity::Merchant {
                bakong_account_id,
                merchant_id,
                acquiring_bank,
            },
            (_, acquiring_bank) => MerchantIdentity::Individual {
                bakong_account_id,
                account_information: present(self.account_information),
                acquiring_bank,
            },
        };

        let currency = self.currency.unwrap_or_default();
        let amount = self.amount.map(|amount| {
            if currency.is_local() {
                amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            } else {
                amount
            }
        });

        Ok(KhqrInfo {
            identity,
            merchant_name,
            merchant_city,
            currency,
            amount,
            upi_merchant_account: present(self.upi_merchant_account),
            additional_data: AdditionalData {
                bill_number: present(self.bill_number),
                mobile_number: present(self.mobile_number),
                store_label,
                terminal_label: present(self.terminal_label),
                purpose_of_transaction: present(self.purpose_of_transaction),
            },
            language: LanguageTemplate {
                language_preference: present(self.language_preference),
                merchant_name_alternate_language: present(self.merchant_name_alternate_language),
                merchant_city_alternate_language: present(self.merchant_city_alternate_language),
            },
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required(value: Option<String>, tag: Tag, field: FieldName) -> Result<String, KhqrError> {
    present(value).ok_or(KhqrError::RequiredFieldMissing {
        tag: tag.code(),
        field: field.as_str(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> KhqrRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_aliases_resolve_to_individual() {
        let request = parse(
            r#"{
                "account": "somchai_t@trmb",
                "name": "Somchai T",
                "city": "BANGKOK",
                "transaction_amount": "1000",
                "storeLabel": "Stall 4"
            }"#,
        );
        let info = request.into_info().unwrap();
        assert_eq!(info.identity.bakong_account_id(), "somchai_t@trmb");
        assert_eq!(info.merchant_name, "Somchai T");
        assert_eq!(info.merchant_city, "BANGKOK");
        assert_eq!(info.currency, Currency::Khr);
        assert_eq!(info.amount, Some(Decimal::from(1000)));
        assert_eq!(info.additional_data.store_label.as_deref(), Some("Stall 4"));
        assert!(matches!(info.identity, MerchantIdentity::Individual { .. }));
    }

    #[test]
    fn test_merchant_needs_id_and_bank() {
        let info = parse(
            r#"{"bakongAccountID": "shop@aba", "merchantName": "Shop", "merchantCity": "Phnom Penh",
                "merchantID": "M-42", "bank": "ABA Bank", "currency": "USD", "amount": 3.5}"#,
        )
        .into_info()
        .unwrap();
        assert_eq!(
            info.identity,
            MerchantIdentity::Merchant {
                bakong_account_id: "shop@aba".to_string(),
                merchant_id: "M-42".to_string(),
                acquiring_bank: "ABA Bank".to_string(),
            }
        );
        assert_eq!(info.currency, Currency::Usd);
        assert_eq!(info.amount, Some(Decimal::new(35, 1)));

        let info = parse(
            r#"{"account": "shop@aba", "name": "Shop", "city": "PP", "merchant_id": "M-42"}"#,
        )
        .into_info()
        .unwrap();
        assert!(matches!(info.identity, MerchantIdentity::Individual { .. }));
    }

    #[test]
    fn test_riel_amount_is_rounded() {
        let info = parse(r#"{"account": "a@b", "name": "N", "city": "C", "amount": "100.5"}"#)
            .into_info()
            .unwrap();
        assert_eq!(info.amount, Some(Decimal::from(101)));

        let info = parse(
            r#"{"account": "a@b", "name": "N", "city": "C", "amount": "100.5", "currency": 840}"#,
        )
        .into_info()
        .unwrap();
        assert_eq!(info.amount, Some(Decimal::new(1005, 1)));
    }

    #[test]
    fn test_missing_required_fields() {
        let err = parse(r#"{"name": "N", "city": "C"}"#).into_info().unwrap_err();
        assert_eq!(
            err,
            KhqrError::RequiredFieldMissing {
                tag: "29",
                field: "bakongAccountID"
            }
        );

        let err = parse(r#"{"account": "a@b", "name": "  ", "city": "C"}"#)
            .into_info()
            .unwrap_err();
        assert_eq!(err.tag(), Some("59"));
    }

    #[test]
    fn test_embed_store_label() {
        let info = parse(
            r#"{"account": "a@b", "name": "Owner", "city": "C", "store_label": "Cafe",
                "store_label_as_merchant": true}"#,
        )
        .into_info()
        .unwrap();
        assert_eq!(info.merchant_name, "Cafe");
        assert_eq!(info.additional_data.store_label.as_deref(), Some("Cafe"));
    }

    #[test]
    fn test_duplicate_spellings_take_first_alias() {
        let info = parse(
            r#"{"account": "second@bank", "bakongAccountID": "first@bank", "name": "N",
                "merchant_name": "  ", "city": "C", "unrelated": [1, 2]}"#,
        )
        .into_info()
        .unwrap();
        assert_eq!(info.identity.bakong_account_id(), "first@bank");
        assert_eq!(info.merchant_name, "N");

        let request = parse(r#"{"transaction_amount": "5", "amount": null, "currency": 840}"#);
        assert_eq!(request.amount, Some(Decimal::from(5)));
        assert_eq!(request.currency, Some(Currency::Usd));
    }

    #[test]
    fn test_unknown_currency_rejected() {
        let result = serde_json::from_str::<KhqrRequest>(r#"{"currency": "EUR"}"#);
        assert!(result.is_err());
    }
}
