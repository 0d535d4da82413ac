//! TLV primitives for the KHQR text format.
//!
//! A field is `tag (2 chars) + length (2 decimal digits) + value (length
//! bytes)`. Lengths count UTF-8 bytes, so a value may hold fewer characters
//! than its length when it contains non-ASCII text.

use crate::error::KhqrError;
use crate::limits::MAX_TLV_VALUE_LEN;

/// One field borrowed from a TLV stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlvField<'a> {
    pub tag: &'a str,
    pub value: &'a str,
}

// =============================================================================
// DECODING
// =============================================================================

/// Splits the first field off a TLV string.
///
/// Returns the field and the unconsumed remainder. Fails with
/// [`KhqrError::MalformedTlv`] if the header is incomplete, the length is not
/// two decimal digits, the value runs past the end of the input, or the value
/// would end inside a multi-byte character.
pub fn cut(input: &str) -> Result<(TlvField<'_>, &str), KhqrError> {
    let bytes = input.as_bytes();
    if bytes.len() < 4 {
        return Err(KhqrError::MalformedTlv { context: "incomplete field header" });
    }
    if !bytes[..4].is_ascii() {
        return Err(KhqrError::MalformedTlv { context: "non-ASCII field header" });
    }
    let (tag, rest) = input.split_at(2);
    let (len_str, rest) = rest.split_at(2);
    let len = parse_length(len_str)?;
    if rest.len() < len {
        return Err(KhqrError::MalformedTlv { context: "value runs past end of input" });
    }
    if !rest.is_char_boundary(len) {
        return Err(KhqrError::MalformedTlv { context: "value splits a multi-byte character" });
    }
    let (value, remainder) = rest.split_at(len);
    Ok((TlvField { tag, value }, remainder))
}

fn parse_length(s: &str) -> Result<usize, KhqrError> {
    let digits = s.as_bytes();
    if digits.len() != 2 || !digits.iter().all(u8::is_ascii_digit) {
        return Err(KhqrError::MalformedTlv { context: "length is not two decimal digits" });
    }
    Ok(((digits[0] - b'0') * 10 + (digits[1] - b'0')) as usize)
}

/// Reader over a TLV string.
///
/// Wraps the input and hands out fields one at a time with bounds checking.
#[derive(Debug, Clone)]
pub struct TlvReader<'a> {
    rest: &'a str,
    consumed: usize,
}

impl<'a> TlvReader<'a> {
    /// Creates a new reader over a TLV string.
    pub fn new(input: &'a str) -> Self {
        Self {
            rest: input,
            consumed: 0,
        }
    }

    /// Returns the byte offset of the next field.
    pub fn position(&self) -> usize {
        self.consumed
    }

    /// Returns the unread part of the input.
    pub fn remaining(&self) -> &'a str {
        self.rest
    }

    /// Returns true if all input has been consumed.
    pub fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    /// Reads the next field.
    pub fn read_field(&mut self) -> Result<TlvField<'a>, KhqrError> {
        let (field, rest) = cut(self.rest)?;
        self.consumed += self.rest.len() - rest.len();
        self.rest = rest;
        Ok(field)
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writer that appends TLV fields to a string.
#[derive(Debug, Clone, Default)]
pub struct TlvWriter {
    buf: String,
}

impl TlvWriter {
    /// Creates a new writer.
    pub fn new() -> Self {
        Self { buf: String::new() }
    }

    /// Creates a new writer with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity),
        }
    }

    /// Returns the written text.
    pub fn into_string(self) -> String {
        self.buf
    }

    /// Returns a reference to the written text.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Writes one field.
    ///
    /// `tag` must be a two-character code. Fails if the value does not fit
    /// in a two-digit length.
    pub fn write_field(
        &mut self,
        tag: &'static str,
        field: &'static str,
        value: &str,
    ) -> Result<(), KhqrError> {
        debug_assert_eq!(tag.len(), 2);
        if value.len() > MAX_TLV_VALUE_LEN {
            return Err(KhqrError::FieldValidation {
                tag,
                field,
                reason: crate::error::FieldError::TooLong {
                    len: value.len(),
                    max: MAX_TLV_VALUE_LEN,
                },
            });
        }
        self.buf.push_str(tag);
        self.buf.push_str(&format!("{:02}", value.len()));
        self.buf.push_str(value);
        Ok(())
    }

    /// Writes raw text with no header, e.g. the checksum value.
    pub fn write_raw(&mut self, s: &str) {
        self.buf.push_str(s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cut_simple() {
        let (field, rest) = cut("000201010211").unwrap();
        assert_eq!(field, TlvField { tag: "00", value: "01" });
        assert_eq!(rest, "010211");
    }

    #[test]
    fn test_cut_zero_length() {
        let (field, rest) = cut("6200").unwrap();
        assert_eq!(field.value, "");
        assert_eq!(rest, "");
    }

    #[test]
    fn test_cut_truncated_value() {
        let result = cut("5910Short");
        assert!(matches!(result, Err(KhqrError::MalformedTlv { .. })));
    }

    #[test]
    fn test_cut_short_header() {
        assert!(matches!(cut("59"), Err(KhqrError::MalformedTlv { .. })));
        assert!(matches!(cut(""), Err(KhqrError::MalformedTlv { .. })));
    }

    #[test]
    fn test_cut_non_decimal_length() {
        assert!(matches!(cut("59AB"), Err(KhqrError::MalformedTlv { .. })));
        assert!(matches!(cut("59-1x"), Err(KhqrError::MalformedTlv { .. })));
    }

    #[test]
    fn test_cut_counts_bytes() {
        // "ក" is three bytes in UTF-8.
        let (field, rest) = cut("0103ក00").unwrap();
        assert_eq!(field.value, "ក");
        assert_eq!(rest, "00");

        let result = cut("0102ក");
        assert!(matches!(result, Err(KhqrError::MalformedTlv { .. })));
    }

    #[test]
    fn test_reader_walks_fields() {
        let mut reader = TlvReader::new("000201010212");
        assert_eq!(reader.read_field().unwrap().tag, "00");
        assert_eq!(reader.position(), 6);
        assert_eq!(reader.remaining(), "010212");
        assert_eq!(reader.read_field().unwrap().value, "12");
        assert!(reader.is_empty());
    }

    #[test]
    fn test_writer_formats_length() {
        let mut writer = TlvWriter::new();
        writer.write_field("00", "payloadFormatIndicator", "01").unwrap();
        writer.write_field("59", "merchantName", "Somchai T").unwrap();
        writer.write_field("62", "additionalDataFieldTemplate", "").unwrap();
        assert_eq!(writer.as_str(), "0002015909Somchai T6200");
    }

    #[test]
    fn test_writer_rejects_overlong_value() {
        let mut writer = TlvWriter::new();
        let long = "x".repeat(100);
        let result = writer.write_field("15", "upiMerchantAccount", &long);
        assert!(matches!(
            result,
            Err(KhqrError::FieldValidation { tag: "15", .. })
        ));
        assert!(writer.is_empty());
    }

    #[test]
    fn test_write_then_read() {
        let mut writer = TlvWriter::new();
        writer.write_field("01", "merchantNameAlternateLanguage", "ហាង").unwrap();
        let text = writer.into_string();
        assert_eq!(&text[..4], "0109");
        let (field, rest) = cut(&text).unwrap();
        assert_eq!(field.value, "ហាង");
        assert!(rest.is_empty());
    }
}
