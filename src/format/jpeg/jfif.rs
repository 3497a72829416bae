//! JFIF APP0 header decoding.
//!
//! ```text
//! JFIF\0  identifier (5 bytes)
//! u8 u8   version major, minor
//! u8      density units (0 = aspect ratio, 1 = dpi, 2 = dpcm)
//! u16 u16 X/Y density, big-endian
//! u8 u8   thumbnail width, height
//! ```
//!
//! A `JFXX\0` extension segment carries a one-byte extension code instead.

use serde::Serialize;

use crate::error::JfifError;
use crate::io::{ByteCursor, ByteOrder};

const JFIF_IDENTIFIER: &[u8] = b"JFIF\0";
const JFXX_IDENTIFIER: &[u8] = b"JFXX\0";

/// Decoded APP0 header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JfifHeader {
    Jfif {
        version_major: u8,
        version_minor: u8,
        density_units: u8,
        x_density: u16,
        y_density: u16,
        thumbnail_width: u8,
        thumbnail_height: u8,
    },
    Extension {
        /// 0x10 = JPEG thumbnail, 0x11 = 1 byte/pixel, 0x13 = 3 bytes/pixel
        code: u8,
    },
}

impl JfifHeader {
    /// Parse the payload of an APP0 segment.
    pub fn parse(payload: &[u8]) -> Result<Self, JfifError> {
        let mut cursor = ByteCursor::new(payload);

        if payload.starts_with(JFXX_IDENTIFIER) {
            cursor.skip(JFXX_IDENTIFIER.len())?;
            return Ok(JfifHeader::Extension {
                code: cursor.read_u8()?,
            });
        }

        if !payload.starts_with(JFIF_IDENTIFIER) {
            return Err(JfifError::NotJfif);
        }
        cursor.skip(JFIF_IDENTIFIER.len())?;

        Ok(JfifHeader::Jfif {
            version_major: cursor.read_u8()?,
            version_minor: cursor.read_u8()?,
            density_units: cursor.read_u8()?,
            x_density: cursor.read_u16(ByteOrder::BigEndian)?,
            y_density: cursor.read_u16(ByteOrder::BigEndian)?,
            thumbnail_width: cursor.read_u8()?,
            thumbnail_height: cursor.read_u8()?,
        })
    }
}
