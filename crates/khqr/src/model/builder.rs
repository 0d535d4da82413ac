//! Builder API for ergonomic [`KhqrInfo`] construction.
//!
//! # Example
//!
//! ```rust
//! use khqr::model::builder::KhqrBuilder;
//! use khqr::Currency;
//! use rust_decimal::Decimal;
//!
//! let info = KhqrBuilder::individual("somchai_t@trmb", "Somchai T", "BANGKOK")
//!     .currency(Currency::Usd)
//!     .amount(Decimal::new(250, 2))
//!     .store_label("Night Market")
//!     .build();
//!
//! assert_eq!(info.merchant_name, "Somchai T");
//! ```

use rust_decimal::Decimal;

use crate::model::{Currency, KhqrInfo, MerchantIdentity};

/// Fluent builder for a [`KhqrInfo`].
#[derive(Debug, Clone)]
pub struct KhqrBuilder {
    info: KhqrInfo,
}

impl KhqrBuilder {
    /// Starts a description for a personal account.
    pub fn individual(
        bakong_account_id: impl Into<String>,
        merchant_name: impl Into<String>,
        merchant_city: impl Into<String>,
    ) -> Self {
        Self {
            info: KhqrInfo::individual(bakong_account_id, merchant_name, merchant_city),
        }
    }

    /// Starts a description for a merchant account.
    pub fn merchant(
        bakong_account_id: impl Into<String>,
        merchant_id: impl Into<String>,
        acquiring_bank: impl Into<String>,
        merchant_name: impl Into<String>,
        merchant_city: impl Into<String>,
    ) -> Self {
        Self {
            info: KhqrInfo::merchant(
                bakong_account_id,
                merchant_id,
                acquiring_bank,
                merchant_name,
                merchant_city,
            ),
        }
    }

    /// Sets the transaction currency.
    pub fn currency(mut self, currency: Currency) -> Self {
        self.info.currency = currency;
        self
    }

    /// Sets the requested amount.
    pub fn amount(mut self, amount: Decimal) -> Self {
        self.info.amount = Some(amount);
        self
    }

    /// Sets the free-form account information of an individual account.
    ///
    /// Ignored for merchant accounts, whose subtag `01` carries the merchant ID.
    pub fn account_information(mut self, value: impl Into<String>) -> Self {
        if let MerchantIdentity::Individual {
            account_information, ..
        } = &mut self.info.identity
        {
            *account_information = Some(value.into());
        }
        self
    }

    /// Sets the acquiring bank.
    pub fn acquiring_bank(mut self, value: impl Into<String>) -> Self {
        match &mut self.info.identity {
            MerchantIdentity::Individual { acquiring_bank, .. } => {
                *acquiring_bank = Some(value.into());
            }
            MerchantIdentity::Merchant { acquiring_bank, .. } => {
                *acquiring_bank = value.into();
            }
        }
        self
    }

    /// Sets the UnionPay merchant account.
    pub fn upi_merchant_account(mut self, value: impl Into<String>) -> Self {
        self.info.upi_merchant_account = Some(value.into());
        self
    }

    pub fn bill_number(mut self, value: impl Into<String>) -> Self {
        self.info.additional_data.bill_number = Some(value.into());
        self
    }

    pub fn mobile_number(mut self, value: impl Into<String>) -> Self {
        self.info.additional_data.mobile_number = Some(value.into());
        self
    }

    pub fn store_label(mut self, value: impl Into<String>) -> Self {
        self.info.additional_data.store_label = Some(value.into());
        self
    }

    pub fn terminal_label(mut self, value: impl Into<String>) -> Self {
        self.info.additional_data.terminal_label = Some(value.into());
        self
    }

    pub fn purpose_of_transaction(mut self, value: impl Into<String>) -> Self {
        self.info.additional_data.purpose_of_transaction = Some(value.into());
        self
    }

    /// Sets the language template in one call.
    pub fn alternate_language(
        mut self,
        language_preference: impl Into<String>,
        merchant_name: impl Into<String>,
        merchant_city: Option<String>,
    ) -> Self {
        self.info.language.language_preference = Some(language_preference.into());
        self.info.language.merchant_name_alternate_language = Some(merchant_name.into());
        self.info.language.merchant_city_alternate_language = merchant_city;
        self
    }

    /// Builds the description.
    pub fn build(self) -> KhqrInfo {
        self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MerchantType;

    #[test]
    fn test_individual_builder() {
        let info = KhqrBuilder::individual("a@bank", "Name", "City")
            .account_information("85512345678")
            .acquiring_bank("Bank")
            .bill_number("INV-1")
            .build();

        assert_eq!(
            info.identity,
            MerchantIdentity::Individual {
                bakong_account_id: "a@bank".to_string(),
                account_information: Some("85512345678".to_string()),
                acquiring_bank: Some("Bank".to_string()),
            }
        );
        assert_eq!(info.additional_data.bill_number.as_deref(), Some("INV-1"));
        assert_eq!(info.currency, Currency::Khr);
    }

    #[test]
    fn test_merchant_ignores_account_information() {
        let info = KhqrBuilder::merchant("m@bank", "M-1", "Bank", "Shop", "City")
            .account_information("ignored")
            .acquiring_bank("Other Bank")
            .build();

        assert_eq!(info.identity.merchant_type(), MerchantType::Merchant);
        assert_eq!(
            info.identity,
            MerchantIdentity::Merchant {
                bakong_account_id: "m@bank".to_string(),
                merchant_id: "M-1".to_string(),
                acquiring_bank: "Other Bank".to_string(),
            }
        );
    }

    #[test]
    fn test_alternate_language() {
        let info = KhqrBuilder::individual("a@bank", "Name", "City")
            .alternate_language("km", "ហាងកាហ្វេ", None)
            .build();
        assert!(!info.language.is_empty());
        assert_eq!(info.language.language_preference.as_deref(), Some("km"));
    }
}
