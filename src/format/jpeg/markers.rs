//! JPEG marker codes and their classification.
//!
//! A marker is 0xFF followed by a code byte that is neither 0x00 (byte
//! stuffing) nor 0xFF (fill). The code space is fixed by ITU T.81, so the
//! classification is a closed enum rather than a lookup table.

use std::fmt;

use serde::{Serialize, Serializer};

// =============================================================================
// JPEG Markers
// =============================================================================

/// Prefix byte of every marker
pub const MARKER_PREFIX: u8 = 0xFF;

/// Temporary private use in arithmetic coding (standalone)
pub const TEM: u8 = 0x01;

/// Start Of Frame, baseline DCT
pub const SOF0: u8 = 0xC0;

/// Define Huffman Table
pub const DHT: u8 = 0xC4;

/// Reserved for JPEG extensions
pub const JPG: u8 = 0xC8;

/// Define Arithmetic Coding conditioning
pub const DAC: u8 = 0xCC;

/// Start Of Frame, differential lossless arithmetic (last SOF code)
pub const SOF15: u8 = 0xCF;

/// Restart marker 0
pub const RST0: u8 = 0xD0;

/// Restart marker 7
pub const RST7: u8 = 0xD7;

/// Start Of Image
pub const SOI: u8 = 0xD8;

/// End Of Image
pub const EOI: u8 = 0xD9;

/// Start Of Scan
pub const SOS: u8 = 0xDA;

/// Define Quantization Table
pub const DQT: u8 = 0xDB;

/// Define Number of Lines
pub const DNL: u8 = 0xDC;

/// Define Restart Interval
pub const DRI: u8 = 0xDD;

/// Define Hierarchical Progression
pub const DHP: u8 = 0xDE;

/// Expand Reference Components
pub const EXP: u8 = 0xDF;

/// Application segment 0 (JFIF)
pub const APP0: u8 = 0xE0;

/// Application segment 1 (Exif, XMP)
pub const APP1: u8 = 0xE1;

/// Application segment 15
pub const APP15: u8 = 0xEF;

/// First JPEG extension code
pub const JPG0: u8 = 0xF0;

/// Last JPEG extension code
pub const JPG13: u8 = 0xFD;

/// Comment
pub const COM: u8 = 0xFE;

// =============================================================================
// MarkerKind
// =============================================================================

/// Semantic kind of a marker code.
///
/// Indexed variants keep the exact code: `App(1)` is APP1, `Sof(2)` is
/// SOF2 (progressive), `Rst(3)` is RST3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Soi,
    Eoi,
    /// APPn, n = 0..=15
    App(u8),
    Dqt,
    Dht,
    /// SOFn, n = the low nibble of the code
    Sof(u8),
    Sos,
    Dri,
    Com,
    /// RSTn, n = 0..=7
    Rst(u8),
    /// Defined by T.81 but not broken out above (TEM, JPG, DAC, DNL, DHP, EXP, JPGn)
    Other(u8),
    /// Reserved code
    Unknown(u8),
}

impl MarkerKind {
    /// Classify the second byte of a marker.
    pub const fn from_code(code: u8) -> Self {
        match code {
            SOI => MarkerKind::Soi,
            EOI => MarkerKind::Eoi,
            APP0..=APP15 => MarkerKind::App(code - APP0),
            DQT => MarkerKind::Dqt,
            DHT => MarkerKind::Dht,
            JPG | DAC => MarkerKind::Other(code),
            SOF0..=SOF15 => MarkerKind::Sof(code - SOF0),
            SOS => MarkerKind::Sos,
            DRI => MarkerKind::Dri,
            COM => MarkerKind::Com,
            RST0..=RST7 => MarkerKind::Rst(code - RST0),
            TEM | DNL | DHP | EXP | JPG0..=JPG13 => MarkerKind::Other(code),
            _ => MarkerKind::Unknown(code),
        }
    }

    /// The marker code byte this kind was classified from.
    pub const fn code(self) -> u8 {
        match self {
            MarkerKind::Soi => SOI,
            MarkerKind::Eoi => EOI,
            MarkerKind::App(n) => APP0 + n,
            MarkerKind::Dqt => DQT,
            MarkerKind::Dht => DHT,
            MarkerKind::Sof(n) => SOF0 + n,
            MarkerKind::Sos => SOS,
            MarkerKind::Dri => DRI,
            MarkerKind::Com => COM,
            MarkerKind::Rst(n) => RST0 + n,
            MarkerKind::Other(code) | MarkerKind::Unknown(code) => code,
        }
    }

    /// Whether a 2-byte length field follows the marker.
    ///
    /// SOI, EOI, RSTn and TEM stand alone.
    pub const fn has_length(self) -> bool {
        !matches!(
            self,
            MarkerKind::Soi | MarkerKind::Eoi | MarkerKind::Rst(_) | MarkerKind::Other(TEM)
        )
    }

    /// Whether this is the given APPn.
    #[inline]
    pub const fn is_app(self, n: u8) -> bool {
        matches!(self, MarkerKind::App(m) if m == n)
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerKind::Soi => f.write_str("SOI"),
            MarkerKind::Eoi => f.write_str("EOI"),
            MarkerKind::App(n) => write!(f, "APP{}", n),
            MarkerKind::Dqt => f.write_str("DQT"),
            MarkerKind::Dht => f.write_str("DHT"),
            MarkerKind::Sof(n) => write!(f, "SOF{}", n),
            MarkerKind::Sos => f.write_str("SOS"),
            MarkerKind::Dri => f.write_str("DRI"),
            MarkerKind::Com => f.write_str("COM"),
            MarkerKind::Rst(n) => write!(f, "RST{}", n),
            MarkerKind::Other(TEM) => f.write_str("TEM"),
            MarkerKind::Other(JPG) => f.write_str("JPG"),
            MarkerKind::Other(DAC) => f.write_str("DAC"),
            MarkerKind::Other(DNL) => f.write_str("DNL"),
            MarkerKind::Other(DHP) => f.write_str("DHP"),
            MarkerKind::Other(EXP) => f.write_str("EXP"),
            MarkerKind::Other(code) if (JPG0..=JPG13).contains(code) => {
                write!(f, "JPG{}", code - JPG0)
            }
            MarkerKind::Other(code) | MarkerKind::Unknown(code) => write!(f, "0xFF{:02X}", code),
        }
    }
}

impl Serialize for MarkerKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// =============================================================================
// Tests
// =============================================================================
