//! # jpeg-walker
//!
//! Walks the marker segments of a JPEG file and decodes the Exif metadata
//! embedded in its APP1 segments into named tag/value pairs.
//!
//! Compressed image data is never decoded; only segment and metadata
//! structure is parsed. Every read is bounds-checked against the input
//! buffer, so malformed or truncated files produce partial results and
//! errors rather than panics.
//!
//! ## Architecture
//!
//! - [`io`] - Bounds-checked cursor and byte order helpers
//! - [`mod@format`] - JPEG marker scanning and TIFF/IFD structure
//! - [`exif`] - Exif payload decoding into IFD groups of tags
//! - [`dictionary`] - Tag id to name mapping, loaded once
//! - [`tree`] - Segments plus decoded metadata, the main output
//! - [`render`] - Text and JSON reports
//! - [`config`] - CLI configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use jpeg_walker::{IfdKind, SegmentTree, TagDictionary};
//!
//! let dictionary = TagDictionary::bundled().expect("bundled table is valid");
//! let data = std::fs::read("photo.jpg").expect("readable file");
//!
//! let tree = SegmentTree::build(&data, &dictionary);
//! for node in &tree.nodes {
//!     println!("{:>8} {:>6} {}", node.segment.offset, node.segment.length, node.label());
//! }
//! if let Some(make) = tree.find_tag(IfdKind::Main, 0x010F) {
//!     println!("Make: {}", make.value);
//! }
//! ```

pub mod config;
pub mod dictionary;
pub mod error;
pub mod exif;
pub mod format;
pub mod io;
pub mod render;
pub mod tree;

pub use dictionary::{TagDictionary, TagSpec};
pub use error::{
    DictionaryError, ExifError, IoError, JfifError, MetadataError, ScanError, TiffError,
};
pub use exif::{EntryFailure, ExifDecoder, ExifMetadata, IfdGroup, Tag};
pub use format::jpeg::{App1Kind, JfifHeader, MarkerKind, MarkerScanner, Segment};
pub use format::tiff::{FieldType, IfdKind, TagValue, TiffHeader};
pub use io::{ByteCursor, ByteOrder};
pub use tree::{Metadata, SegmentNode, SegmentTree};
