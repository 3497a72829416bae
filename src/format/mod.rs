//! Binary format parsers.
//!
//! - [`jpeg`]: marker segment walking and APP0/APP1 identification
//! - [`tiff`]: the TIFF header and IFD tables embedded in Exif APP1 payloads

pub mod jpeg;
pub mod tiff;
