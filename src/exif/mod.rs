//! Exif metadata decoding.
//!
//! An Exif APP1 payload is `Exif\0\0` followed by a TIFF block. The
//! [`ExifDecoder`] turns that block into [`IfdGroup`]s of named [`Tag`]s.

mod decoder;

pub use decoder::{EntryFailure, ExifDecoder, ExifMetadata, IfdGroup, Tag, DEFAULT_MAX_IFD_DEPTH};
