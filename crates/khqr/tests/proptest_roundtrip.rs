//! Property tests for the encode / decode / verify pipelines.

use proptest::prelude::*;
use rust_decimal::Decimal;

use khqr::{
    decode_lenient, decode_strict, generate_with_options, verify, Currency, EncodeOptions,
    FieldError, KhqrBuilder, KhqrError, KhqrInfo, MerchantType,
};

fn options() -> EncodeOptions {
    EncodeOptions {
        timestamp_millis: Some(1_700_000_000_000),
        ..Default::default()
    }
}

fn account() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,10}@[a-z]{2,8}"
}

fn currency() -> impl Strategy<Value = Currency> {
    prop_oneof![Just(Currency::Khr), Just(Currency::Usd)]
}

/// An amount with a precision its currency accepts.
fn amount_for(currency: Currency) -> BoxedStrategy<Decimal> {
    match currency {
        Currency::Khr => (0i64..1_000_000_000).prop_map(Decimal::from).boxed(),
        Currency::Usd => (0i64..100_000_000, 0u32..=2)
            .prop_map(|(units, scale)| Decimal::new(units, scale))
            .boxed(),
    }
}

fn khqr_info() -> impl Strategy<Value = KhqrInfo> {
    (
        account(),
        "[A-Za-z][A-Za-z ]{0,20}",
        "[A-Za-z][A-Za-z ]{0,13}",
        proptest::option::of(("[A-Z0-9-]{1,12}", "[A-Za-z][A-Za-z ]{0,19}")),
        proptest::option::of("[A-Z0-9-]{1,20}"),
        currency().prop_flat_map(|c| (Just(c), amount_for(c))),
    )
        .prop_map(|(account, name, city, merchant, bill, (currency, amount))| {
            let mut builder = match merchant {
                Some((id, bank)) => KhqrBuilder::merchant(account, id, bank, name, city),
                None => KhqrBuilder::individual(account, name, city),
            };
            builder = builder.currency(currency).amount(amount);
            if let Some(bill) = bill {
                builder = builder.bill_number(bill);
            }
            builder.build()
        })
}

proptest! {
    #[test]
    fn roundtrip_recovers_fields(info in khqr_info()) {
        let response = generate_with_options(&info, &options()).unwrap();
        let decoded = decode_strict(&response.qr).unwrap();

        prop_assert_eq!(decoded.merchant_name.as_deref(), Some(info.merchant_name.as_str()));
        prop_assert_eq!(decoded.merchant_city.as_deref(), Some(info.merchant_city.as_str()));
        prop_assert_eq!(decoded.currency(), Some(info.currency));
        prop_assert_eq!(
            decoded.bakong_account_id.as_deref(),
            Some(info.identity.bakong_account_id())
        );
        prop_assert_eq!(decoded.merchant_type, Some(info.identity.merchant_type()));
        if decoded.merchant_type == Some(MerchantType::Merchant) {
            prop_assert!(decoded.merchant_id.is_some());
            prop_assert!(decoded.account_information.is_none());
        }

        let expected = info.amount.filter(|a| !a.is_zero());
        prop_assert_eq!(decoded.amount(), expected);
        prop_assert_eq!(decoded.is_static(), expected.is_none());
        prop_assert_eq!(decoded.bill_number, info.additional_data.bill_number);
    }

    #[test]
    fn generated_payloads_verify(info in khqr_info()) {
        let response = generate_with_options(&info, &options()).unwrap();
        prop_assert!(verify(&response.qr));

        let crc = &response.qr[response.qr.len() - 4..];
        prop_assert!(crc.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn single_character_flip_fails_verify(info in khqr_info(), index in any::<prop::sample::Index>()) {
        let qr = generate_with_options(&info, &options()).unwrap().qr;
        let body_len = qr.len() - 4;
        let i = index.index(body_len);

        let mut bytes = qr.into_bytes();
        bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();
        prop_assert!(!verify(&tampered));
    }

    #[test]
    fn fractional_riel_rejected(whole in 0i64..1_000_000, cents in 1i64..100) {
        let info = KhqrBuilder::individual("a@bank", "Name", "City")
            .amount(Decimal::new(whole * 100 + cents, 2))
            .build();
        let result = generate_with_options(&info, &options());
        prop_assert!(
            matches!(
                result,
                Err(KhqrError::FieldValidation { reason: FieldError::FractionalLocalAmount, .. })
            ),
            "expected a fractional riel error, got {:?}",
            result
        );
    }

    #[test]
    fn excess_dollar_precision_rejected(whole in 0i64..1_000_000, tenths in 0i64..100, last in 1i64..10) {
        let info = KhqrBuilder::individual("a@bank", "Name", "City")
            .currency(Currency::Usd)
            .amount(Decimal::new(whole * 1000 + tenths * 10 + last, 3))
            .build();
        let result = generate_with_options(&info, &options());
        prop_assert!(
            matches!(
                result,
                Err(KhqrError::FieldValidation { reason: FieldError::TooManyDecimals { .. }, .. })
            ),
            "expected a precision error, got {:?}",
            result
        );
    }

    #[test]
    fn upi_with_dollars_rejected(upi in "[0-9]{16}", cents in 0i64..100_000) {
        let info = KhqrBuilder::individual("a@bank", "Name", "City")
            .currency(Currency::Usd)
            .amount(Decimal::new(cents, 2))
            .upi_merchant_account(upi)
            .build();
        prop_assert_eq!(
            generate_with_options(&info, &options()),
            Err(KhqrError::CurrencyConflict { currency: Currency::Usd })
        );
    }

    #[test]
    fn truncated_checksum_is_malformed(info in khqr_info(), cut in 1usize..8) {
        let qr = generate_with_options(&info, &options()).unwrap().qr;
        let truncated = &qr[..qr.len() - cut];
        let result = decode_lenient(truncated);
        prop_assert!(
            matches!(result, Err(KhqrError::MalformedTlv { .. })),
            "expected MalformedTlv, got {:?}",
            result
        );
        prop_assert!(!verify(truncated));
    }

    #[test]
    fn prefixes_never_verify(info in khqr_info(), index in any::<prop::sample::Index>()) {
        let qr = generate_with_options(&info, &options()).unwrap().qr;
        let prefix = &qr[..index.index(qr.len())];
        prop_assert!(!verify(prefix));
        if let Err(err) = decode_lenient(prefix) {
            prop_assert!(
                matches!(err, KhqrError::MalformedTlv { .. }),
                "expected MalformedTlv, got {:?}",
                err
            );
        }
    }

    #[test]
    fn lenient_decode_never_panics(input in any::<String>()) {
        let _ = decode_lenient(&input);
        prop_assert!(!verify(&input) || input.len() >= 12);
    }
}
