//! TIFF structure parsing for Exif payloads.
//!
//! # Key Concepts
//!
//! - **Byte order**: the TIFF header declares its endianness (II = little-endian,
//!   MM = big-endian). All multi-byte values must be read respecting this order.
//!
//! - **IFD (Image File Directory)**: a table of 12-byte entries followed by
//!   the offset of the next IFD. Exif uses IFD0 for the primary image, IFD1
//!   for the thumbnail, and pointer tags to reach the Exif, GPS and
//!   Interoperability IFDs.
//!
//! - **Inline vs offset values**: values of 4 bytes or less are stored in the
//!   entry itself, larger values at an offset relative to the TIFF header.

mod parser;
mod tags;
mod values;

pub use parser::{IfdEntry, RawIfd, TiffHeader, IFD_ENTRY_SIZE, TIFF_HEADER_SIZE};
pub use tags::{FieldType, IfdKind, EXIF_IFD_POINTER, GPS_IFD_POINTER, INTEROP_IFD_POINTER};
pub use values::{Rational, SRational, TagValue};
