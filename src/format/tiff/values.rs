//! TIFF tag value decoding.
//!
//! Values are stored either inline in the IFD entry (when they fit in 4
//! bytes) or at an offset inside the TIFF block. Decoding always checks
//! the full value range against the block before touching any byte.

use std::fmt;

use serde::Serialize;

use crate::error::TiffError;
use crate::io::ByteOrder;

use super::parser::IfdEntry;
use super::tags::FieldType;

/// Undefined values longer than this are abbreviated in text output
const DISPLAY_BYTES_LIMIT: usize = 32;

// =============================================================================
// Rationals
// =============================================================================

/// Unsigned fraction (RATIONAL).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rational {
    pub numerator: u32,
    pub denominator: u32,
}

/// Signed fraction (SRATIONAL).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SRational {
    pub numerator: i32,
    pub denominator: i32,
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl fmt::Display for SRational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

// =============================================================================
// TagValue
// =============================================================================

/// A decoded tag value: the ordered scalars of one entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TagValue {
    Byte(Vec<u8>),
    /// Text up to the first NUL
    Ascii(String),
    Short(Vec<u16>),
    Long(Vec<u32>),
    Rational(Vec<Rational>),
    SByte(Vec<i8>),
    Undefined(Vec<u8>),
    SShort(Vec<i16>),
    SLong(Vec<i32>),
    SRational(Vec<SRational>),
    Float(Vec<f32>),
    Double(Vec<f64>),
}

impl TagValue {
    /// Decode the value of `entry` from the TIFF block it was read from.
    ///
    /// # Errors
    /// - `UnknownFieldType` if the entry's type is not one of the 12 TIFF types
    /// - `ValueTooLarge` if type size times count overflows
    /// - `ValueOutOfRange` if the value bytes lie outside `tiff`
    pub fn decode(entry: &IfdEntry, tiff: &[u8], byte_order: ByteOrder) -> Result<Self, TiffError> {
        let field_type = entry
            .field_type
            .ok_or(TiffError::UnknownFieldType(entry.field_type_raw))?;
        let bytes = value_bytes(entry, field_type, tiff, byte_order)?;
        Ok(Self::from_bytes(field_type, bytes, byte_order))
    }

    /// Decode raw value bytes of a known type.
    ///
    /// `bytes.len()` must be a multiple of the type size; a trailing partial
    /// value is ignored.
    pub fn from_bytes(field_type: FieldType, bytes: &[u8], byte_order: ByteOrder) -> Self {
        let size = field_type.size_in_bytes();
        let chunks = bytes.chunks_exact(size);

        match field_type {
            FieldType::Byte => TagValue::Byte(bytes.to_vec()),
            FieldType::Undefined => TagValue::Undefined(bytes.to_vec()),
            FieldType::SByte => TagValue::SByte(bytes.iter().map(|&b| b as i8).collect()),
            FieldType::Ascii => {
                let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
                TagValue::Ascii(String::from_utf8_lossy(&bytes[..end]).into_owned())
            }
            FieldType::Short => {
                TagValue::Short(chunks.map(|c| byte_order.read_u16(c)).collect())
            }
            FieldType::SShort => {
                TagValue::SShort(chunks.map(|c| byte_order.read_u16(c) as i16).collect())
            }
            FieldType::Long => TagValue::Long(chunks.map(|c| byte_order.read_u32(c)).collect()),
            FieldType::SLong => {
                TagValue::SLong(chunks.map(|c| byte_order.read_u32(c) as i32).collect())
            }
            FieldType::Rational => TagValue::Rational(
                chunks
                    .map(|c| Rational {
                        numerator: byte_order.read_u32(&c[0..4]),
                        denominator: byte_order.read_u32(&c[4..8]),
                    })
                    .collect(),
            ),
            FieldType::SRational => TagValue::SRational(
                chunks
                    .map(|c| SRational {
                        numerator: byte_order.read_u32(&c[0..4]) as i32,
                        denominator: byte_order.read_u32(&c[4..8]) as i32,
                    })
                    .collect(),
            ),
            FieldType::Float => TagValue::Float(
                chunks
                    .map(|c| f32::from_bits(byte_order.read_u32(c)))
                    .collect(),
            ),
            FieldType::Double => TagValue::Double(
                chunks
                    .map(|c| f64::from_bits(byte_order.read_u64(c)))
                    .collect(),
            ),
        }
    }

    /// The TIFF type this value was decoded as.
    pub fn field_type(&self) -> FieldType {
        match self {
            TagValue::Byte(_) => FieldType::Byte,
            TagValue::Ascii(_) => FieldType::Ascii,
            TagValue::Short(_) => FieldType::Short,
            TagValue::Long(_) => FieldType::Long,
            TagValue::Rational(_) => FieldType::Rational,
            TagValue::SByte(_) => FieldType::SByte,
            TagValue::Undefined(_) => FieldType::Undefined,
            TagValue::SShort(_) => FieldType::SShort,
            TagValue::SLong(_) => FieldType::SLong,
            TagValue::SRational(_) => FieldType::SRational,
            TagValue::Float(_) => FieldType::Float,
            TagValue::Double(_) => FieldType::Double,
        }
    }

    /// Number of scalars (characters for ASCII).
    pub fn len(&self) -> usize {
        match self {
            TagValue::Byte(v) | TagValue::Undefined(v) => v.len(),
            TagValue::Ascii(s) => s.len(),
            TagValue::Short(v) => v.len(),
            TagValue::Long(v) => v.len(),
            TagValue::Rational(v) => v.len(),
            TagValue::SByte(v) => v.len(),
            TagValue::SShort(v) => v.len(),
            TagValue::SLong(v) => v.len(),
            TagValue::SRational(v) => v.len(),
            TagValue::Float(v) => v.len(),
            TagValue::Double(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The value as a single unsigned integer, for one-element BYTE, SHORT
    /// or LONG values.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            TagValue::Byte(v) if v.len() == 1 => Some(v[0] as u32),
            TagValue::Short(v) if v.len() == 1 => Some(v[0] as u32),
            TagValue::Long(v) if v.len() == 1 => Some(v[0]),
            _ => None,
        }
    }

    /// The value as text, for ASCII values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::Ascii(s) => Some(s),
            _ => None,
        }
    }
}

fn value_bytes<'a>(
    entry: &'a IfdEntry,
    field_type: FieldType,
    tiff: &'a [u8],
    byte_order: ByteOrder,
) -> Result<&'a [u8], TiffError> {
    let size = field_type
        .total_size(entry.count)
        .ok_or(TiffError::ValueTooLarge {
            tag: entry.tag_id,
            count: entry.count,
        })?;

    if field_type.fits_inline(entry.count) {
        return Ok(&entry.value_offset_bytes[..size]);
    }

    let offset = entry.value_offset(byte_order);
    let out_of_range = || TiffError::ValueOutOfRange {
        tag: entry.tag_id,
        offset,
        size,
        available: tiff.len(),
    };
    let end = (offset as usize).checked_add(size).ok_or_else(out_of_range)?;
    tiff.get(offset as usize..end).ok_or_else(out_of_range)
}

// =============================================================================
// Display
// =============================================================================

fn join<T: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &[T]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", value)?;
    }
    Ok(())
}

fn write_undefined(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    // Versions and similar codes are stored as printable ASCII
    let trimmed = bytes.strip_suffix(&[0]).unwrap_or(bytes);
    if !trimmed.is_empty() && trimmed.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        return f.write_str(&String::from_utf8_lossy(trimmed));
    }

    let shown = &bytes[..bytes.len().min(DISPLAY_BYTES_LIMIT)];
    for (i, byte) in shown.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{:02X}", byte)?;
    }
    if bytes.len() > shown.len() {
        write!(f, " ... ({} bytes)", bytes.len())?;
    }
    Ok(())
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Byte(v) => join(f, v),
            TagValue::Ascii(s) => f.write_str(s),
            TagValue::Short(v) => join(f, v),
            TagValue::Long(v) => join(f, v),
            TagValue::Rational(v) => join(f, v),
            TagValue::SByte(v) => join(f, v),
            TagValue::Undefined(v) => write_undefined(f, v),
            TagValue::SShort(v) => join(f, v),
            TagValue::SLong(v) => join(f, v),
            TagValue::SRational(v) => join(f, v),
            TagValue::Float(v) => join(f, v),
            TagValue::Double(v) => join(f, v),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
