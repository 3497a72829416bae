//! TIFF field types and IFD kinds.
//!
//! This module defines the vocabulary for Exif/TIFF parsing:
//! - Field types that determine how values are encoded
//! - IFD kinds that partition the tag id space
//! - The pointer tags that link IFD0 to the Exif-specific IFDs

use std::fmt;

use serde::Serialize;

// =============================================================================
// TIFF Field Types
// =============================================================================

/// TIFF field types that determine how values are encoded.
///
/// Each field type has a fixed size in bytes, which decides whether a value
/// fits inline in an IFD entry and how arrays of values are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u16)]
pub enum FieldType {
    /// Unsigned 8-bit integer
    Byte = 1,

    /// 8-bit ASCII character, NUL-terminated
    Ascii = 2,

    /// Unsigned 16-bit integer
    Short = 3,

    /// Unsigned 32-bit integer
    Long = 4,

    /// Two LONGs: numerator, denominator
    Rational = 5,

    /// Signed 8-bit integer
    SByte = 6,

    /// Opaque byte
    Undefined = 7,

    /// Signed 16-bit integer
    SShort = 8,

    /// Signed 32-bit integer
    SLong = 9,

    /// Two SLONGs: numerator, denominator
    SRational = 10,

    /// IEEE single precision
    Float = 11,

    /// IEEE double precision
    Double = 12,
}

impl FieldType {
    /// Size of the value/offset field in a classic TIFF entry.
    pub const INLINE_THRESHOLD: usize = 4;

    /// Size of a single value of this type in bytes.
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            FieldType::Byte | FieldType::Ascii | FieldType::SByte | FieldType::Undefined => 1,
            FieldType::Short | FieldType::SShort => 2,
            FieldType::Long | FieldType::SLong | FieldType::Float => 4,
            FieldType::Rational | FieldType::SRational | FieldType::Double => 8,
        }
    }

    /// Create a FieldType from its numeric value.
    ///
    /// Returns `None` for unknown type values.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(FieldType::Byte),
            2 => Some(FieldType::Ascii),
            3 => Some(FieldType::Short),
            4 => Some(FieldType::Long),
            5 => Some(FieldType::Rational),
            6 => Some(FieldType::SByte),
            7 => Some(FieldType::Undefined),
            8 => Some(FieldType::SShort),
            9 => Some(FieldType::SLong),
            10 => Some(FieldType::SRational),
            11 => Some(FieldType::Float),
            12 => Some(FieldType::Double),
            _ => None,
        }
    }

    /// Get the numeric type id.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Upper-case TIFF name, as used in tag tables.
    pub const fn name(self) -> &'static str {
        match self {
            FieldType::Byte => "BYTE",
            FieldType::Ascii => "ASCII",
            FieldType::Short => "SHORT",
            FieldType::Long => "LONG",
            FieldType::Rational => "RATIONAL",
            FieldType::SByte => "SBYTE",
            FieldType::Undefined => "UNDEFINED",
            FieldType::SShort => "SSHORT",
            FieldType::SLong => "SLONG",
            FieldType::SRational => "SRATIONAL",
            FieldType::Float => "FLOAT",
            FieldType::Double => "DOUBLE",
        }
    }

    /// Parse a TIFF type name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_ascii_uppercase();
        (1..=12)
            .filter_map(Self::from_u16)
            .find(|t| t.name() == upper)
    }

    /// Total encoded size of `count` values, or `None` on overflow.
    #[inline]
    pub fn total_size(self, count: u32) -> Option<usize> {
        self.size_in_bytes().checked_mul(count as usize)
    }

    /// Check if `count` values of this type fit in the 4-byte inline field.
    #[inline]
    pub fn fits_inline(self, count: u32) -> bool {
        self.total_size(count)
            .is_some_and(|size| size <= Self::INLINE_THRESHOLD)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

// =============================================================================
// IFD Kinds
// =============================================================================

/// Tag pointing to the Exif sub-IFD
pub const EXIF_IFD_POINTER: u16 = 0x8769;

/// Tag pointing to the GPS IFD
pub const GPS_IFD_POINTER: u16 = 0x8825;

/// Tag pointing to the Interoperability IFD
pub const INTEROP_IFD_POINTER: u16 = 0xA005;

/// Which directory of an Exif block a tag was read from.
///
/// Tag ids are only unique within a kind: 0x0001 is `GPSLatitudeRef` in the
/// GPS IFD and `InteroperabilityIndex` in the Interoperability IFD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum IfdKind {
    /// IFD0, the primary image
    Main,
    /// IFD1 and later links of the next-IFD chain
    Thumbnail,
    /// Exif-specific IFD
    ExifSub,
    /// GPS IFD
    Gps,
    /// Interoperability IFD
    Interop,
}

impl IfdKind {
    /// All kinds, in report order.
    pub const ALL: [IfdKind; 5] = [
        IfdKind::Main,
        IfdKind::Thumbnail,
        IfdKind::ExifSub,
        IfdKind::Gps,
        IfdKind::Interop,
    ];

    /// The IFD a pointer tag links to, if `tag_id` is a pointer tag.
    pub const fn from_pointer_tag(tag_id: u16) -> Option<Self> {
        match tag_id {
            EXIF_IFD_POINTER => Some(IfdKind::ExifSub),
            GPS_IFD_POINTER => Some(IfdKind::Gps),
            INTEROP_IFD_POINTER => Some(IfdKind::Interop),
            _ => None,
        }
    }

    /// Partition name used in tag dictionary files.
    pub const fn partition_name(self) -> &'static str {
        match self {
            IfdKind::Main => "main",
            IfdKind::Thumbnail => "thumbnail",
            IfdKind::ExifSub => "exif",
            IfdKind::Gps => "gps",
            IfdKind::Interop => "interop",
        }
    }

    /// Look up a kind by its dictionary partition name.
    pub fn from_partition_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.partition_name() == name)
    }

    /// Human-readable directory name.
    pub const fn name(self) -> &'static str {
        match self {
            IfdKind::Main => "IFD0",
            IfdKind::Thumbnail => "IFD1 (thumbnail)",
            IfdKind::ExifSub => "Exif SubIFD",
            IfdKind::Gps => "GPS IFD",
            IfdKind::Interop => "Interop IFD",
        }
    }
}

impl fmt::Display for IfdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Tests
// =============================================================================
