//! Decoded tag values.
//!
//! This module converts raw byte spans into typed values. A span plus a
//! declared [`DataType`] decodes into an [`EntryValue`]: either a single
//! scalar or a homogeneous array, depending on the encoded cardinality
//! and the tag's intent.
//!
//! Array decoding splits the span into equal chunks of the type's size
//! and decodes each element independently, preserving order. An empty
//! span decodes to no value at all rather than an error.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::cursor::ByteOrder;
use super::tags::DataType;

// =============================================================================
// Rational Types
// =============================================================================

/// Unsigned numerator/denominator pair.
///
/// Stored on disk as two consecutive 4-byte unsigned integers. The
/// denominator is not validated; a zero denominator is preserved as-is
/// and surfaces as a non-finite value from [`Rational::to_f64`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rational {
    pub numerator: u32,
    pub denominator: u32,
}

impl Rational {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Approximate the fraction as a float.
    pub fn to_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl std::fmt::Display for Rational {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Signed numerator/denominator pair.
///
/// Stored on disk as two consecutive 4-byte signed integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedRational {
    pub numerator: i32,
    pub denominator: i32,
}

impl SignedRational {
    pub const fn new(numerator: i32, denominator: i32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Approximate the fraction as a float.
    pub fn to_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl std::fmt::Display for SignedRational {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

// =============================================================================
// EntryValue
// =============================================================================

/// A decoded tag payload: one scalar or one homogeneous array.
///
/// This is the closed union over the data-type table. `Byte` and
/// `Undefined` entries share the byte variants; the owning
/// [`Value`](super::reader::Value) records which data type produced the
/// payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntryValue {
    Byte(u8),
    ByteArray(Bytes),
    Ascii(String),
    Short(u16),
    ShortArray(Vec<u16>),
    Long(u32),
    LongArray(Vec<u32>),
    Long8(u64),
    Long8Array(Vec<u64>),
    SignedByte(i8),
    SignedByteArray(Vec<i8>),
    SignedShort(i16),
    SignedShortArray(Vec<i16>),
    SignedLong(i32),
    SignedLongArray(Vec<i32>),
    SignedLong8(i64),
    SignedLong8Array(Vec<i64>),
    Rational(Rational),
    RationalArray(Vec<Rational>),
    SignedRational(SignedRational),
    SignedRationalArray(Vec<SignedRational>),
    Float(f32),
    FloatArray(Vec<f32>),
    Double(f64),
    DoubleArray(Vec<f64>),
}

impl EntryValue {
    /// Number of components in the payload.
    ///
    /// For a valid decode this equals the entry's encoded cardinality
    /// (ASCII counts characters including the terminator's span).
    pub fn component_count(&self) -> usize {
        match self {
            EntryValue::Byte(_)
            | EntryValue::Short(_)
            | EntryValue::Long(_)
            | EntryValue::Long8(_)
            | EntryValue::SignedByte(_)
            | EntryValue::SignedShort(_)
            | EntryValue::SignedLong(_)
            | EntryValue::SignedLong8(_)
            | EntryValue::Rational(_)
            | EntryValue::SignedRational(_)
            | EntryValue::Float(_)
            | EntryValue::Double(_) => 1,
            EntryValue::Ascii(s) => s.len(),
            EntryValue::ByteArray(v) => v.len(),
            EntryValue::ShortArray(v) => v.len(),
            EntryValue::LongArray(v) => v.len(),
            EntryValue::Long8Array(v) => v.len(),
            EntryValue::SignedByteArray(v) => v.len(),
            EntryValue::SignedShortArray(v) => v.len(),
            EntryValue::SignedLongArray(v) => v.len(),
            EntryValue::SignedLong8Array(v) => v.len(),
            EntryValue::RationalArray(v) => v.len(),
            EntryValue::SignedRationalArray(v) => v.len(),
            EntryValue::FloatArray(v) => v.len(),
            EntryValue::DoubleArray(v) => v.len(),
        }
    }

    /// Interpret an unsigned scalar payload as a u64.
    ///
    /// Used for offset-carrying tags (directory pointers, thumbnail
    /// position/length). Returns `None` for arrays, strings, and signed
    /// or floating payloads.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            EntryValue::Byte(v) => Some(u64::from(*v)),
            EntryValue::Short(v) => Some(u64::from(*v)),
            EntryValue::Long(v) => Some(u64::from(*v)),
            EntryValue::Long8(v) => Some(*v),
            _ => None,
        }
    }

    /// Interpret the payload as a list of u64 offsets.
    ///
    /// Accepts unsigned scalars and arrays; everything else is `None`.
    pub fn to_u64_vec(&self) -> Option<Vec<u64>> {
        match self {
            EntryValue::Byte(_) | EntryValue::Short(_) | EntryValue::Long(_) | EntryValue::Long8(_) => {
                self.as_u64().map(|v| vec![v])
            }
            EntryValue::ByteArray(v) => Some(v.iter().map(|&b| u64::from(b)).collect()),
            EntryValue::ShortArray(v) => Some(v.iter().map(|&s| u64::from(s)).collect()),
            EntryValue::LongArray(v) => Some(v.iter().map(|&l| u64::from(l)).collect()),
            EntryValue::Long8Array(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Widen an unsigned payload to 64-bit storage.
    ///
    /// The wide layout allows the strip/tile and pointer tags to carry
    /// legacy Short/Long declarations; their resolved values are always
    /// held as Long8 so 4GB+ offsets and legacy encodings look the same
    /// to callers. Non-widenable payloads pass through unchanged.
    pub fn widen_to_long8(self) -> EntryValue {
        match self {
            EntryValue::Byte(v) => EntryValue::Long8(u64::from(v)),
            EntryValue::Short(v) => EntryValue::Long8(u64::from(v)),
            EntryValue::Long(v) => EntryValue::Long8(u64::from(v)),
            EntryValue::ShortArray(v) => {
                EntryValue::Long8Array(v.into_iter().map(u64::from).collect())
            }
            EntryValue::LongArray(v) => {
                EntryValue::Long8Array(v.into_iter().map(u64::from).collect())
            }
            other => other,
        }
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Split a span into `size`-byte chunks and decode each element.
///
/// A trailing partial chunk is ignored, so a short span yields the
/// elements that fit.
fn decode_elements<T>(bytes: &[u8], size: usize, decode: impl Fn(&[u8]) -> T) -> Vec<T> {
    bytes.chunks_exact(size).map(&decode).collect()
}

/// Decode one scalar from the front of a span.
///
/// Returns `None` when the span is shorter than the element size.
fn decode_scalar<T>(bytes: &[u8], size: usize, decode: impl Fn(&[u8]) -> T) -> Option<T> {
    bytes.get(..size).map(|span| decode(span))
}

fn decode_ascii(bytes: &[u8]) -> String {
    // Up to the first NUL; the whole span when unterminated.
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

fn decode_rational(order: ByteOrder, bytes: &[u8]) -> Rational {
    Rational::new(order.read_u32(&bytes[..4]), order.read_u32(&bytes[4..8]))
}

fn decode_signed_rational(order: ByteOrder, bytes: &[u8]) -> SignedRational {
    SignedRational::new(
        order.read_u32(&bytes[..4]) as i32,
        order.read_u32(&bytes[4..8]) as i32,
    )
}

/// Convert a raw byte span into a typed value.
///
/// `as_array` forces an array payload even at cardinality 1. An empty
/// span produces no value. The caller must have filtered unknown data
/// types already; every reachable type decodes.
pub fn decode_value(
    data_type: DataType,
    bytes: &[u8],
    order: ByteOrder,
    as_array: bool,
) -> Option<EntryValue> {
    if bytes.is_empty() {
        return None;
    }

    let size = data_type.byte_size() as usize;

    match data_type {
        DataType::Byte | DataType::Undefined => {
            if as_array {
                Some(EntryValue::ByteArray(Bytes::copy_from_slice(bytes)))
            } else {
                Some(EntryValue::Byte(bytes[0]))
            }
        }
        DataType::Ascii => Some(EntryValue::Ascii(decode_ascii(bytes))),
        DataType::SignedByte => {
            if as_array {
                Some(EntryValue::SignedByteArray(
                    bytes.iter().map(|&b| b as i8).collect(),
                ))
            } else {
                Some(EntryValue::SignedByte(bytes[0] as i8))
            }
        }
        DataType::Short => {
            if as_array {
                Some(EntryValue::ShortArray(decode_elements(bytes, size, |b| {
                    order.read_u16(b)
                })))
            } else {
                decode_scalar(bytes, size, |b| order.read_u16(b)).map(EntryValue::Short)
            }
        }
        DataType::SignedShort => {
            if as_array {
                Some(EntryValue::SignedShortArray(decode_elements(
                    bytes,
                    size,
                    |b| order.read_u16(b) as i16,
                )))
            } else {
                decode_scalar(bytes, size, |b| order.read_u16(b) as i16)
                    .map(EntryValue::SignedShort)
            }
        }
        DataType::Long | DataType::Ifd => {
            if as_array {
                Some(EntryValue::LongArray(decode_elements(bytes, size, |b| {
                    order.read_u32(b)
                })))
            } else {
                decode_scalar(bytes, size, |b| order.read_u32(b)).map(EntryValue::Long)
            }
        }
        DataType::SignedLong => {
            if as_array {
                Some(EntryValue::SignedLongArray(decode_elements(
                    bytes,
                    size,
                    |b| order.read_u32(b) as i32,
                )))
            } else {
                decode_scalar(bytes, size, |b| order.read_u32(b) as i32)
                    .map(EntryValue::SignedLong)
            }
        }
        DataType::Long8 | DataType::Ifd8 => {
            if as_array {
                Some(EntryValue::Long8Array(decode_elements(bytes, size, |b| {
                    order.read_u64(b)
                })))
            } else {
                decode_scalar(bytes, size, |b| order.read_u64(b)).map(EntryValue::Long8)
            }
        }
        DataType::SignedLong8 => {
            if as_array {
                Some(EntryValue::SignedLong8Array(decode_elements(
                    bytes,
                    size,
                    |b| order.read_u64(b) as i64,
                )))
            } else {
                decode_scalar(bytes, size, |b| order.read_u64(b) as i64)
                    .map(EntryValue::SignedLong8)
            }
        }
        DataType::Rational => {
            if as_array {
                Some(EntryValue::RationalArray(decode_elements(
                    bytes,
                    size,
                    |b| decode_rational(order, b),
                )))
            } else {
                decode_scalar(bytes, size, |b| decode_rational(order, b))
                    .map(EntryValue::Rational)
            }
        }
        DataType::SignedRational => {
            if as_array {
                Some(EntryValue::SignedRationalArray(decode_elements(
                    bytes,
                    size,
                    |b| decode_signed_rational(order, b),
                )))
            } else {
                decode_scalar(bytes, size, |b| decode_signed_rational(order, b))
                    .map(EntryValue::SignedRational)
            }
        }
        DataType::Float => {
            if as_array {
                Some(EntryValue::FloatArray(decode_elements(bytes, size, |b| {
                    f32::from_bits(order.read_u32(b))
                })))
            } else {
                decode_scalar(bytes, size, |b| f32::from_bits(order.read_u32(b)))
                    .map(EntryValue::Float)
            }
        }
        DataType::Double => {
            if as_array {
                Some(EntryValue::DoubleArray(decode_elements(bytes, size, |b| {
                    f64::from_bits(order.read_u64(b))
                })))
            } else {
                decode_scalar(bytes, size, |b| f64::from_bits(order.read_u64(b)))
                    .map(EntryValue::Double)
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Rational Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_rational_to_f64() {
        assert_eq!(Rational::new(72, 1).to_f64(), 72.0);
        assert_eq!(Rational::new(1, 4).to_f64(), 0.25);
        assert!(Rational::new(1, 0).to_f64().is_infinite());
    }

    #[test]
    fn test_signed_rational_to_f64() {
        assert_eq!(SignedRational::new(-5, 2).to_f64(), -2.5);
    }

    #[test]
    fn test_rational_display() {
        assert_eq!(Rational::new(300, 100).to_string(), "300/100");
        assert_eq!(SignedRational::new(-1, 3).to_string(), "-1/3");
    }

    // -------------------------------------------------------------------------
    // Scalar Decoding Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_decode_empty_span_is_absent() {
        let value = decode_value(DataType::Long, &[], ByteOrder::LittleEndian, false);
        assert_eq!(value, None);
    }

    #[test]
    fn test_decode_byte_and_undefined() {
        let value = decode_value(DataType::Byte, &[0x2A], ByteOrder::LittleEndian, false);
        assert_eq!(value, Some(EntryValue::Byte(0x2A)));

        let value = decode_value(
            DataType::Undefined,
            &[0xDE, 0xAD],
            ByteOrder::LittleEndian,
            true,
        );
        assert_eq!(
            value,
            Some(EntryValue::ByteArray(Bytes::from_static(&[0xDE, 0xAD])))
        );
    }

    #[test]
    fn test_decode_signed_byte_reinterprets() {
        let value = decode_value(DataType::SignedByte, &[0xFF], ByteOrder::LittleEndian, false);
        assert_eq!(value, Some(EntryValue::SignedByte(-1)));
    }

    #[test]
    fn test_decode_short_both_orders() {
        let bytes = [0x01, 0x02];
        assert_eq!(
            decode_value(DataType::Short, &bytes, ByteOrder::LittleEndian, false),
            Some(EntryValue::Short(0x0201))
        );
        assert_eq!(
            decode_value(DataType::Short, &bytes, ByteOrder::BigEndian, false),
            Some(EntryValue::Short(0x0102))
        );
    }

    #[test]
    fn test_decode_signed_long() {
        let bytes = (-123456i32).to_le_bytes();
        assert_eq!(
            decode_value(DataType::SignedLong, &bytes, ByteOrder::LittleEndian, false),
            Some(EntryValue::SignedLong(-123456))
        );
    }

    #[test]
    fn test_decode_long8_and_signed_long8() {
        let bytes = 0x0000_0001_0000_0000u64.to_le_bytes();
        assert_eq!(
            decode_value(DataType::Long8, &bytes, ByteOrder::LittleEndian, false),
            Some(EntryValue::Long8(0x0000_0001_0000_0000))
        );

        let bytes = (-42i64).to_be_bytes();
        assert_eq!(
            decode_value(DataType::SignedLong8, &bytes, ByteOrder::BigEndian, false),
            Some(EntryValue::SignedLong8(-42))
        );
    }

    #[test]
    fn test_decode_float_bit_reinterpretation() {
        let bytes = 1.5f32.to_bits().to_le_bytes();
        assert_eq!(
            decode_value(DataType::Float, &bytes, ByteOrder::LittleEndian, false),
            Some(EntryValue::Float(1.5))
        );

        let bytes = (-0.125f64).to_bits().to_be_bytes();
        assert_eq!(
            decode_value(DataType::Double, &bytes, ByteOrder::BigEndian, false),
            Some(EntryValue::Double(-0.125))
        );
    }

    #[test]
    fn test_decode_rational_pairs() {
        // 300/100 little-endian
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&300u32.to_le_bytes());
        bytes.extend_from_slice(&100u32.to_le_bytes());
        assert_eq!(
            decode_value(DataType::Rational, &bytes, ByteOrder::LittleEndian, false),
            Some(EntryValue::Rational(Rational::new(300, 100)))
        );

        // Zero denominator is preserved, not rejected
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        assert_eq!(
            decode_value(DataType::Rational, &bytes, ByteOrder::LittleEndian, false),
            Some(EntryValue::Rational(Rational::new(1, 0)))
        );
    }

    #[test]
    fn test_decode_signed_rational() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&(-1i32).to_be_bytes());
        bytes.extend_from_slice(&3i32.to_be_bytes());
        assert_eq!(
            decode_value(
                DataType::SignedRational,
                &bytes,
                ByteOrder::BigEndian,
                false
            ),
            Some(EntryValue::SignedRational(SignedRational::new(-1, 3)))
        );
    }

    // -------------------------------------------------------------------------
    // String Decoding Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_decode_ascii_nul_terminated() {
        let value = decode_value(DataType::Ascii, b"Camera\0", ByteOrder::LittleEndian, false);
        assert_eq!(value, Some(EntryValue::Ascii("Camera".to_string())));
    }

    #[test]
    fn test_decode_ascii_unterminated_uses_whole_span() {
        let value = decode_value(DataType::Ascii, b"abc", ByteOrder::LittleEndian, false);
        assert_eq!(value, Some(EntryValue::Ascii("abc".to_string())));
    }

    #[test]
    fn test_decode_ascii_stops_at_first_nul() {
        let value = decode_value(
            DataType::Ascii,
            b"ab\0cd\0",
            ByteOrder::LittleEndian,
            false,
        );
        assert_eq!(value, Some(EntryValue::Ascii("ab".to_string())));
    }

    // -------------------------------------------------------------------------
    // Array Decoding Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_decode_short_array_preserves_order() {
        let mut bytes = Vec::new();
        for v in [100u16, 200, 300, 400] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        assert_eq!(
            decode_value(DataType::Short, &bytes, ByteOrder::LittleEndian, true),
            Some(EntryValue::ShortArray(vec![100, 200, 300, 400]))
        );
    }

    #[test]
    fn test_decode_array_at_cardinality_one() {
        // Array intent with a single element still yields an array
        let bytes = 7u32.to_le_bytes();
        assert_eq!(
            decode_value(DataType::Long, &bytes, ByteOrder::LittleEndian, true),
            Some(EntryValue::LongArray(vec![7]))
        );
    }

    #[test]
    fn test_decode_rational_array() {
        let mut bytes = Vec::new();
        for (n, d) in [(1u32, 2u32), (3, 4)] {
            bytes.extend_from_slice(&n.to_le_bytes());
            bytes.extend_from_slice(&d.to_le_bytes());
        }
        assert_eq!(
            decode_value(DataType::Rational, &bytes, ByteOrder::LittleEndian, true),
            Some(EntryValue::RationalArray(vec![
                Rational::new(1, 2),
                Rational::new(3, 4),
            ]))
        );
    }

    #[test]
    fn test_component_count_matches_cardinality() {
        let mut bytes = Vec::new();
        for v in [1u32, 2, 3] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let value = decode_value(DataType::Long, &bytes, ByteOrder::LittleEndian, true).unwrap();
        assert_eq!(value.component_count(), 3);

        let value = decode_value(DataType::Double, &1.0f64.to_bits().to_le_bytes(), ByteOrder::LittleEndian, false)
            .unwrap();
        assert_eq!(value.component_count(), 1);
    }

    // -------------------------------------------------------------------------
    // Conversion Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_as_u64_unsigned_scalars() {
        assert_eq!(EntryValue::Byte(7).as_u64(), Some(7));
        assert_eq!(EntryValue::Short(300).as_u64(), Some(300));
        assert_eq!(EntryValue::Long(70_000).as_u64(), Some(70_000));
        assert_eq!(EntryValue::Long8(1 << 40).as_u64(), Some(1 << 40));
        assert_eq!(EntryValue::SignedLong(-1).as_u64(), None);
        assert_eq!(EntryValue::Ascii("8".into()).as_u64(), None);
    }

    #[test]
    fn test_to_u64_vec() {
        assert_eq!(EntryValue::Long(9).to_u64_vec(), Some(vec![9]));
        assert_eq!(
            EntryValue::LongArray(vec![1, 2]).to_u64_vec(),
            Some(vec![1, 2])
        );
        assert_eq!(
            EntryValue::Long8Array(vec![1 << 33]).to_u64_vec(),
            Some(vec![1 << 33])
        );
        assert_eq!(EntryValue::Float(1.0).to_u64_vec(), None);
    }

    #[test]
    fn test_widen_to_long8() {
        assert_eq!(
            EntryValue::Short(5).widen_to_long8(),
            EntryValue::Long8(5)
        );
        assert_eq!(
            EntryValue::LongArray(vec![1, 2]).widen_to_long8(),
            EntryValue::Long8Array(vec![1, 2])
        );
        // Already wide or non-numeric payloads pass through
        assert_eq!(
            EntryValue::Long8Array(vec![3]).widen_to_long8(),
            EntryValue::Long8Array(vec![3])
        );
        assert_eq!(
            EntryValue::Ascii("x".into()).widen_to_long8(),
            EntryValue::Ascii("x".into())
        );
    }
}
