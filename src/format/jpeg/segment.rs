//! Marker segment records emitted by the scanner.

use serde::Serialize;

use super::markers::MarkerKind;

/// Identifier that opens an Exif APP1 payload
pub const EXIF_IDENTIFIER: &[u8] = b"Exif\0\0";

/// Identifier that opens an XMP APP1 payload
pub const XMP_IDENTIFIER: &[u8] = b"http://ns.adobe.com/xap/1.0/\0";

/// Identifier that opens an extended XMP APP1 payload
pub const XMP_EXTENDED_IDENTIFIER: &[u8] = b"http://ns.adobe.com/xmp/extension/\0";

/// One marker-delimited unit of a JPEG stream.
///
/// `offset` is the position of the marker's 0xFF byte. `length` counts
/// payload bytes only: neither the 2 marker bytes nor the 2-byte length
/// field are included. Standalone markers (SOI, EOI, RSTn) have length 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// Full 2-byte marker code, e.g. 0xFFE1
    pub marker: u16,

    /// Offset of the marker in the buffer
    pub offset: usize,

    /// Payload length in bytes
    pub length: usize,

    /// Classified marker kind
    pub kind: MarkerKind,
}

impl Segment {
    /// Offset of the first payload byte.
    #[inline]
    pub fn payload_offset(&self) -> usize {
        if self.kind.has_length() {
            self.offset + 4
        } else {
            self.offset + 2
        }
    }

    /// Offset one past the last byte belonging to this segment.
    #[inline]
    pub fn end(&self) -> usize {
        self.payload_offset() + self.length
    }

    /// Borrow this segment's payload from the buffer it was scanned from.
    ///
    /// Returns an empty slice if `data` is not that buffer and is too short.
    pub fn payload<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        data.get(self.payload_offset()..self.end()).unwrap_or(&[])
    }

    /// The declared length field (payload length plus 2), if the marker has one.
    pub fn length_field(&self) -> Option<u16> {
        self.kind.has_length().then(|| (self.length + 2) as u16)
    }
}

// =============================================================================
// App1Kind
// =============================================================================

/// Flavor of an APP1 segment, from its leading identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum App1Kind {
    Exif,
    Xmp,
    XmpExtended,
    Unknown,
}

impl App1Kind {
    /// Identify an APP1 payload.
    pub fn identify(payload: &[u8]) -> Self {
        if payload.starts_with(EXIF_IDENTIFIER) {
            App1Kind::Exif
        } else if payload.starts_with(XMP_IDENTIFIER) {
            App1Kind::Xmp
        } else if payload.starts_with(XMP_EXTENDED_IDENTIFIER) {
            App1Kind::XmpExtended
        } else {
            App1Kind::Unknown
        }
    }

    /// Short label used in reports, e.g. "APP1-Exif".
    pub const fn label(self) -> &'static str {
        match self {
            App1Kind::Exif => "APP1-Exif",
            App1Kind::Xmp => "APP1-XMP",
            App1Kind::XmpExtended => "APP1-XMPext",
            App1Kind::Unknown => "APP1-unknown",
        }
    }
}
