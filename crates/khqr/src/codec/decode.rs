//! Payload decoding.
//!
//! Both decoders share one walk over the top-level TLV stream:
//! - the walk stops at the end of input, or when a tag repeats the tag
//!   immediately before it (`29` after `30` counts as a repeat);
//! - more than [`MAX_TLV_SEGMENTS`] segments is a malformed stream;
//! - unknown tags are consumed and dropped;
//! - tag `30` is folded into the merchant account slot and recorded as the
//!   merchant variant;
//! - a tag seen again later overwrites its earlier value.
//!
//! The lenient decoder then expands composites best effort. The strict
//! decoder first checks that every required tag was seen and re-validates
//! every value.

use rustc_hash::FxHashMap;

use crate::codec::tlv::TlvReader;
use crate::error::KhqrError;
use crate::limits::MAX_TLV_SEGMENTS;
use crate::model::subtag;
use crate::model::tag::{required_tags, TAGS};
use crate::model::{DecodedKhqr, FieldName, MerchantType, Tag};
use crate::util::trace_debug;
use crate::validate::{validate_amount_currency, validate_field};

/// Top-level fields of a payload, keyed by tag.
struct Walk<'a> {
    fields: FxHashMap<Tag, &'a str>,
    variant: Option<MerchantType>,
}

impl<'a> Walk<'a> {
    fn get(&self, tag: Tag) -> Option<&'a str> {
        self.fields.get(&tag).copied()
    }
}

/// A tag as compared by the repeat check. `29` and `30` are the same tag.
#[derive(Clone, Copy, PartialEq, Eq)]
enum SeenTag<'a> {
    Known(Tag),
    Unknown(&'a str),
}

fn walk(payload: &str) -> Result<Walk<'_>, KhqrError> {
    let mut reader = TlvReader::new(payload);
    let mut fields = FxHashMap::default();
    let mut variant = None;
    let mut last_tag: Option<SeenTag<'_>> = None;
    let mut segments = 0usize;

    while !reader.is_empty() {
        if segments == MAX_TLV_SEGMENTS {
            return Err(KhqrError::MalformedTlv {
                context: "too many segments",
            });
        }
        let field = reader.read_field()?;
        segments += 1;

        let resolved = Tag::from_wire(field.tag);
        let seen = match resolved {
            Some((tag, _)) => SeenTag::Known(tag),
            None => SeenTag::Unknown(field.tag),
        };
        if last_tag == Some(seen) {
            trace_debug(format_args!(
                "tag {} repeated at offset {}, stopping",
                field.tag,
                reader.position()
            ));
            break;
        }
        last_tag = Some(seen);

        match resolved {
            Some((tag, seen_variant)) => {
                if seen_variant.is_some() {
                    variant = seen_variant;
                }
                fields.insert(tag, field.value);
            }
            None => trace_debug(format_args!("skipping unknown tag {}", field.tag)),
        }
    }

    Ok(Walk { fields, variant })
}

/// Decodes a payload without validating field contents.
///
/// Fails only if the top-level stream cannot be walked. Missing fields are
/// `None`; unknown tags are ignored; a malformed composite yields the
/// subfields that precede the damage.
pub fn decode_lenient(payload: &str) -> Result<DecodedKhqr, KhqrError> {
    let walk = walk(payload)?;
    Ok(expand(&walk))
}

/// Decodes a payload and validates it.
///
/// Fails with [`KhqrError::RequiredFieldMissing`] for the first required
/// tag (in registry order) the payload lacks, then with the first field
/// that does not pass its validator. The checksum value is checked for
/// shape only; see [`verify`](crate::verify) for the checksum itself.
pub fn decode_strict(payload: &str) -> Result<DecodedKhqr, KhqrError> {
    let walk = walk(payload)?;

    if let Some(tag) = required_tags().find(|tag| !walk.fields.contains_key(tag)) {
        return Err(KhqrError::RequiredFieldMissing {
            tag: tag.code(),
            field: tag.name(),
        });
    }

    for def in &TAGS {
        if let Some(value) = walk.get(def.tag) {
            validate_field(def.tag, walk.variant, value)?;
        }
    }

    if let (Some(amount), Some(currency)) = (
        walk.get(Tag::TransactionAmount),
        walk.get(Tag::TransactionCurrency),
    ) {
        validate_amount_currency(amount, currency)?;
    }

    Ok(expand(&walk))
}

fn expand(walk: &Walk<'_>) -> DecodedKhqr {
    let mut decoded = DecodedKhqr {
        merchant_type: walk.variant,
        ..Default::default()
    };

    for def in &TAGS {
        let Some(value) = walk.get(def.tag) else {
            continue;
        };
        if def.has_subtags() {
            expand_composite(&mut decoded, def.tag, walk.variant, value);
        } else if let Some(name) = FieldName::for_tag(def.tag) {
            decoded.set(name, value);
        }
    }

    decoded
}

fn expand_composite(
    decoded: &mut DecodedKhqr,
    parent: Tag,
    variant: Option<MerchantType>,
    value: &str,
) {
    let mut reader = TlvReader::new(value);
    while !reader.is_empty() {
        let field = match reader.read_field() {
            Ok(field) => field,
            Err(_) => {
                trace_debug(format_args!(
                    "composite {} malformed at offset {}, keeping earlier subfields",
                    parent.code(),
                    reader.position()
                ));
                return;
            }
        };
        match subtag::field_for(parent, field.tag, variant) {
            Some(name) => decoded.set(name, field.value),
            None => trace_debug(format_args!(
                "skipping unknown subtag {} of {}",
                field.tag,
                parent.code()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldError;

    const INDIVIDUAL: &str = "00020101021229180014somchai_t@trmb520459995303116540410005802KH\
                              5909Somchai T6007BANGKOK99170013170000000000063041EE4";

    const MERCHANT: &str = "00020101021130320008shop@aba0104M-420208ABA Bank5204599953038405802KH\
                            5911Coffee Shop6010Phnom Penh62200105INV-10307Stall 4\
                            99170013170000000000063048603";

    #[test]
    fn test_lenient_individual() {
        let decoded = decode_lenient(INDIVIDUAL).unwrap();
        assert_eq!(decoded.merchant_type, Some(MerchantType::Individual));
        assert_eq!(decoded.bakong_account_id.as_deref(), Some("somchai_t@trmb"));
        assert_eq!(decoded.transaction_amount.as_deref(), Some("1000"));
        assert_eq!(decoded.transaction_currency.as_deref(), Some("116"));
        assert_eq!(decoded.merchant_name.as_deref(), Some("Somchai T"));
        assert_eq!(decoded.merchant_city.as_deref(), Some("BANGKOK"));
        assert_eq!(decoded.crc.as_deref(), Some("1EE4"));
        assert_eq!(decoded.timestamp.as_deref(), Some("00131700000000000"));
        assert_eq!(decoded.created_at_millis(), Some(1_700_000_000_000));
        assert_eq!(decoded.merchant_id, None);
        assert_eq!(decoded.bill_number, None);
    }

    #[test]
    fn test_merchant_variant_relabels_subtag() {
        let decoded = decode_strict(MERCHANT).unwrap();
        assert_eq!(decoded.merchant_type, Some(MerchantType::Merchant));
        assert_eq!(decoded.merchant_id.as_deref(), Some("M-42"));
        assert_eq!(decoded.account_information, None);
        assert_eq!(decoded.acquiring_bank.as_deref(), Some("ABA Bank"));
        assert_eq!(decoded.bill_number.as_deref(), Some("INV-1"));
        assert_eq!(decoded.store_label.as_deref(), Some("Stall 4"));
        assert!(decoded.is_static());
    }

    #[test]
    fn test_strict_individual() {
        let decoded = decode_strict(INDIVIDUAL).unwrap();
        assert_eq!(decoded.amount(), Some(rust_decimal::Decimal::from(1000)));
        assert!(!decoded.is_static());
    }

    #[test]
    fn test_truncated_stream_fails() {
        let truncated = &INDIVIDUAL[..INDIVIDUAL.len() - 10];
        assert!(matches!(
            decode_lenient(truncated),
            Err(KhqrError::MalformedTlv { .. })
        ));
        assert!(matches!(
            decode_strict(truncated),
            Err(KhqrError::MalformedTlv { .. })
        ));
    }

    #[test]
    fn test_unknown_tags_skipped() {
        let decoded = decode_lenient("000201").unwrap();
        assert_eq!(decoded.payload_format_indicator.as_deref(), Some("01"));

        let decoded = decode_lenient("0002014003abc5903Foo").unwrap();
        assert_eq!(decoded.merchant_name.as_deref(), Some("Foo"));
    }

    #[test]
    fn test_repeated_tag_stops_walk() {
        let decoded = decode_lenient("5903Foo5903Bar6003Baz").unwrap();
        assert_eq!(decoded.merchant_name.as_deref(), Some("Foo"));
        assert_eq!(decoded.merchant_city, None);
    }

    #[test]
    fn test_merchant_account_variants_repeat() {
        let mixed = "00020101021130320008shop@aba0104M-420208ABA Bank\
                     29180014somchai_t@trmb5204599953038405802KH5911Coffee Shop\
                     6010Phnom Penh";
        let decoded = decode_lenient(mixed).unwrap();
        assert_eq!(decoded.merchant_type, Some(MerchantType::Merchant));
        assert_eq!(decoded.bakong_account_id.as_deref(), Some("shop@aba"));
        assert_eq!(decoded.merchant_id.as_deref(), Some("M-42"));
        assert_eq!(decoded.merchant_category_code, None);
        assert_eq!(decoded.merchant_name, None);

        assert_eq!(
            decode_strict(mixed).unwrap_err(),
            KhqrError::RequiredFieldMissing {
                tag: "52",
                field: "merchantCategoryCode"
            }
        );
    }

    #[test]
    fn test_later_value_wins() {
        let decoded = decode_lenient("5903Foo6003Baz5903Bar").unwrap();
        assert_eq!(decoded.merchant_name.as_deref(), Some("Bar"));
    }

    #[test]
    fn test_segment_cap() {
        let within: String = ["4000", "4100"].repeat(49).concat() + "5903Foo";
        assert!(decode_lenient(&within).is_ok());

        let over: String = ["4000", "4100"].repeat(50).concat();
        assert_eq!(
            decode_lenient(&over),
            Err(KhqrError::MalformedTlv {
                context: "too many segments"
            })
        );
    }

    #[test]
    fn test_lenient_keeps_invalid_content() {
        let decoded = decode_lenient("5303978540612.345").unwrap();
        assert_eq!(decoded.transaction_currency.as_deref(), Some("978"));
        assert_eq!(decoded.currency(), None);
        assert_eq!(decoded.transaction_amount.as_deref(), Some("12.345"));
    }

    #[test]
    fn test_lenient_malformed_composite() {
        let decoded = decode_lenient("62130105INV-10399").unwrap();
        assert_eq!(decoded.bill_number.as_deref(), Some("INV-1"));
        assert_eq!(decoded.store_label, None);
    }

    #[test]
    fn test_strict_missing_required() {
        let err = decode_strict("000201010211").unwrap_err();
        assert_eq!(
            err,
            KhqrError::RequiredFieldMissing {
                tag: "29",
                field: "merchantAccountInformation"
            }
        );

        let without_city = INDIVIDUAL.replace("6007BANGKOK", "");
        let err = decode_strict(&without_city).unwrap_err();
        assert_eq!(err.tag(), Some("60"));
    }

    #[test]
    fn test_strict_rejects_bad_content() {
        let bad_currency = INDIVIDUAL.replace("5303116", "5303978");
        assert_eq!(
            decode_strict(&bad_currency).unwrap_err(),
            KhqrError::FieldValidation {
                tag: "53",
                field: "transactionCurrency",
                reason: FieldError::UnsupportedCurrency {
                    code: "978".to_string()
                },
            }
        );

        let fractional_riel = INDIVIDUAL.replace("54041000", "540410.5");
        assert_eq!(
            decode_strict(&fractional_riel).unwrap_err(),
            KhqrError::FieldValidation {
                tag: "54",
                field: "transactionAmount",
                reason: FieldError::FractionalLocalAmount,
            }
        );
    }

    #[test]
    fn test_lenient_and_strict_agree() {
        assert_eq!(decode_lenient(MERCHANT), decode_strict(MERCHANT));
    }
}
