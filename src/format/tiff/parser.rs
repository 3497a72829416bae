//! TIFF header and IFD structure parsing.
//!
//! Exif stores a complete little TIFF file inside the APP1 payload, right
//! after the `Exif\0\0` identifier. Every offset inside it is relative to
//! the first byte of the TIFF header, so the functions here all take the
//! TIFF block as a slice starting at that byte.
//!
//! # TIFF Header Structure (8 bytes)
//! ```text
//! Bytes 0-1: Byte order (0x4949 = little-endian "II", 0x4D4D = big-endian "MM")
//! Bytes 2-3: Version (42 = 0x002A)
//! Bytes 4-7: Offset to first IFD (4 bytes)
//! ```
//!
//! # IFD Structure
//! ```text
//! u16            entry count N
//! N x 12 bytes   entries: tag (u16), type (u16), count (u32), value/offset (4 bytes)
//! u32            offset of the next IFD, 0 if none
//! ```

use tracing::warn;

use crate::error::TiffError;
use crate::io::{ByteCursor, ByteOrder};

use super::tags::FieldType;

// =============================================================================
// Constants
// =============================================================================

/// Magic bytes indicating little-endian byte order ("II" for Intel)
const BYTE_ORDER_LITTLE_ENDIAN: u16 = 0x4949;

/// Magic bytes indicating big-endian byte order ("MM" for Motorola)
const BYTE_ORDER_BIG_ENDIAN: u16 = 0x4D4D;

/// Version number for classic TIFF
const VERSION_TIFF: u16 = 42;

/// Size of the TIFF header in bytes
pub const TIFF_HEADER_SIZE: usize = 8;

/// Size of one IFD entry in bytes
pub const IFD_ENTRY_SIZE: usize = 12;

// =============================================================================
// TiffHeader
// =============================================================================

/// Parsed TIFF header.
///
/// Contains the byte order for reading all subsequent values and the
/// location of IFD0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct TiffHeader {
    /// Byte order for all multi-byte values in the block
    pub byte_order: ByteOrder,

    /// Offset to IFD0, relative to the start of the header
    pub first_ifd_offset: u32,
}

impl TiffHeader {
    /// Parse a TIFF header from the start of a TIFF block.
    ///
    /// # Errors
    /// - `Io` if there aren't enough bytes for the header
    /// - `InvalidByteOrder` if byte order bytes are not II or MM
    /// - `InvalidVersion` if version is not 42
    /// - `InvalidIfdOffset` if the first IFD offset is outside the block
    pub fn parse(tiff: &[u8]) -> Result<Self, TiffError> {
        let mut cursor = ByteCursor::new(tiff);

        // II and MM are palindromes, so either order reads them the same
        let magic = cursor.read_u16(ByteOrder::BigEndian)?;
        let byte_order = match magic {
            BYTE_ORDER_LITTLE_ENDIAN => ByteOrder::LittleEndian,
            BYTE_ORDER_BIG_ENDIAN => ByteOrder::BigEndian,
            _ => return Err(TiffError::InvalidByteOrder(magic)),
        };

        let version = cursor.read_u16(byte_order)?;
        if version != VERSION_TIFF {
            return Err(TiffError::InvalidVersion(version));
        }

        let first_ifd_offset = cursor.read_u32(byte_order)?;
        if first_ifd_offset as usize >= tiff.len() {
            return Err(TiffError::InvalidIfdOffset(first_ifd_offset));
        }

        Ok(TiffHeader {
            byte_order,
            first_ifd_offset,
        })
    }
}

// =============================================================================
// IfdEntry
// =============================================================================

/// A raw 12-byte IFD entry.
///
/// The value is not decoded here; see [`super::TagValue::decode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IfdEntry {
    /// Tag id
    pub tag_id: u16,

    /// Field type as stored, kept for error reporting when unknown
    pub field_type_raw: u16,

    /// Field type, if the stored value is a known type
    pub field_type: Option<FieldType>,

    /// Number of values (not bytes)
    pub count: u32,

    /// The value/offset field exactly as stored
    pub value_offset_bytes: [u8; 4],
}

impl IfdEntry {
    /// Parse an entry from exactly [`IFD_ENTRY_SIZE`] bytes.
    pub fn parse(bytes: &[u8; IFD_ENTRY_SIZE], byte_order: ByteOrder) -> Self {
        let field_type_raw = byte_order.read_u16(&bytes[2..4]);
        Self {
            tag_id: byte_order.read_u16(&bytes[0..2]),
            field_type_raw,
            field_type: FieldType::from_u16(field_type_raw),
            count: byte_order.read_u32(&bytes[4..8]),
            value_offset_bytes: [bytes[8], bytes[9], bytes[10], bytes[11]],
        }
    }

    /// Total size of the value in bytes.
    ///
    /// Returns `None` for unknown field types or on overflow.
    pub fn value_byte_size(&self) -> Option<usize> {
        self.field_type?.total_size(self.count)
    }

    /// Whether the value is stored in the value/offset field itself.
    pub fn is_inline(&self) -> bool {
        self.field_type
            .is_some_and(|field_type| field_type.fits_inline(self.count))
    }

    /// Interpret the value/offset field as an offset.
    #[inline]
    pub fn value_offset(&self, byte_order: ByteOrder) -> u32 {
        byte_order.read_u32(&self.value_offset_bytes)
    }

    /// Read a single inline SHORT or LONG as u32.
    ///
    /// Returns `None` for any other type or for count != 1.
    pub fn inline_u32(&self, byte_order: ByteOrder) -> Option<u32> {
        if self.count != 1 {
            return None;
        }
        match self.field_type? {
            FieldType::Short => Some(byte_order.read_u16(&self.value_offset_bytes) as u32),
            FieldType::Long => Some(byte_order.read_u32(&self.value_offset_bytes)),
            _ => None,
        }
    }
}

// =============================================================================
// RawIfd
// =============================================================================

/// The entry table of one IFD, read but not decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawIfd {
    /// Offset of this IFD within the TIFF block
    pub offset: u32,

    /// Entries that were fully present in the block
    pub entries: Vec<IfdEntry>,

    /// Offset of the next IFD, 0 if none or if the table was truncated
    pub next_ifd_offset: u32,

    /// Set when the entry table or next-IFD field ran past the block
    pub truncation: Option<TiffError>,
}

impl RawIfd {
    /// Read the IFD at `offset` within `tiff`.
    ///
    /// Fails only if the offset is outside the block or the entry count
    /// cannot be read. A truncated entry table keeps the entries that fit
    /// and records the failure in `truncation`.
    pub fn parse(tiff: &[u8], offset: u32, byte_order: ByteOrder) -> Result<Self, TiffError> {
        if offset as usize >= tiff.len() {
            return Err(TiffError::InvalidIfdOffset(offset));
        }

        let mut cursor = ByteCursor::new(tiff);
        cursor.seek(offset as usize)?;
        let entry_count = cursor.read_u16(byte_order)?;

        let mut entries = Vec::with_capacity(entry_count as usize);
        for index in 0..entry_count {
            let bytes = match cursor.read_bytes(IFD_ENTRY_SIZE) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(
                        ifd_offset = offset,
                        index,
                        entry_count,
                        "IFD entry table truncated: {}",
                        e
                    );
                    return Ok(Self::truncated(offset, entries, e.into()));
                }
            };
            let mut raw = [0u8; IFD_ENTRY_SIZE];
            raw.copy_from_slice(bytes);
            entries.push(IfdEntry::parse(&raw, byte_order));
        }

        match cursor.read_u32(byte_order) {
            Ok(next_ifd_offset) => Ok(Self {
                offset,
                entries,
                next_ifd_offset,
                truncation: None,
            }),
            Err(e) => {
                warn!(ifd_offset = offset, "Next-IFD offset missing: {}", e);
                Ok(Self::truncated(offset, entries, e.into()))
            }
        }
    }

    fn truncated(offset: u32, entries: Vec<IfdEntry>, error: TiffError) -> Self {
        Self {
            offset,
            entries,
            next_ifd_offset: 0,
            truncation: Some(error),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
