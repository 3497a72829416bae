//! JPEG stream structure.
//!
//! A JPEG file is a sequence of marker segments. Each marker is `0xFF`
//! followed by a code byte; most markers are followed by a big-endian length
//! and a payload. This module classifies markers, walks the segment
//! sequence, and decodes the JFIF header carried in APP0.
//!
//! # Key Concepts
//!
//! - **Standalone markers**: SOI, EOI and RST0-RST7 have no length or payload.
//!
//! - **Length fields**: the 2-byte length counts itself but not the marker,
//!   so a segment's payload is `length - 2` bytes.
//!
//! - **Entropy-coded data**: after SOS, compressed data runs until the next
//!   marker. Literal `0xFF` bytes in it are stuffed as `0xFF00`.

mod jfif;
mod markers;
mod scanner;
mod segment;

pub use jfif::JfifHeader;
pub use markers::MarkerKind;
pub use scanner::MarkerScanner;
pub use segment::{
    App1Kind, Segment, EXIF_IDENTIFIER, XMP_EXTENDED_IDENTIFIER, XMP_IDENTIFIER,
};
