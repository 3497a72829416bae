use thiserror::Error;

/// Errors raised by [`ByteCursor`](crate::io::ByteCursor) reads and seeks
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IoError {
    /// Requested range exceeds the buffer bounds
    #[error("Out of bounds: requested {requested} bytes at offset {offset}, size is {size}")]
    OutOfBounds {
        offset: usize,
        requested: usize,
        size: usize,
    },
}

/// Errors that stop the top-level marker walk.
///
/// Segments emitted before the error remain valid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// A segment runs past the end of the buffer
    #[error("Truncated file: {0}")]
    OutOfBounds(#[from] IoError),

    /// The buffer does not start with SOI (0xFFD8)
    #[error("Missing SOI marker: expected 0xFFD8 at offset 0, got 0x{found:04X}")]
    MissingSoi { found: u16 },

    /// A length field smaller than the 2 bytes it occupies
    #[error("Invalid segment length {length} for marker at offset {offset}")]
    InvalidLength { offset: usize, length: u16 },

    /// The buffer ended before an EOI marker was found
    #[error("Truncated file: no EOI marker before end of buffer at offset {offset}")]
    MissingEoi { offset: usize },
}

/// Malformed TIFF structure inside an Exif payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TiffError {
    /// A read ran past the end of the TIFF block
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Invalid byte order marker (not II or MM)
    #[error("Invalid TIFF byte order: expected 0x4949 (II) or 0x4D4D (MM), got 0x{0:04X}")]
    InvalidByteOrder(u16),

    /// Invalid TIFF version number
    #[error("Invalid TIFF version: expected 42, got {0}")]
    InvalidVersion(u16),

    /// IFD offset points outside the TIFF block
    #[error("Invalid IFD offset: {0}")]
    InvalidIfdOffset(u32),

    /// Value bytes of an entry lie outside the TIFF block
    #[error("Value of tag 0x{tag:04X} out of range: {size} bytes at offset {offset}, block is {available} bytes")]
    ValueOutOfRange {
        tag: u16,
        offset: u32,
        size: usize,
        available: usize,
    },

    /// Type size times count does not fit in memory
    #[error("Value of tag 0x{tag:04X} too large: count {count}")]
    ValueTooLarge { tag: u16, count: u32 },

    /// Unknown field type in IFD entry
    #[error("Unknown field type: {0}")]
    UnknownFieldType(u16),

    /// A pointer tag whose value is not a single offset
    #[error("Invalid IFD pointer in tag 0x{tag:04X}: {message}")]
    InvalidPointer { tag: u16, message: String },

    /// IFD nesting deeper than the configured cap
    #[error("IFD depth limit of {0} exceeded")]
    DepthExceeded(usize),

    /// An IFD offset that was already decoded in this payload
    #[error("IFD at offset {0} already visited")]
    IfdCycle(u32),
}

/// Errors decoding one APP1 Exif payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExifError {
    /// Payload does not begin with the `Exif\0\0` identifier
    #[error("Not Exif data: missing Exif\\0\\0 identifier")]
    NotExifData,

    /// TIFF header could not be parsed
    #[error("Malformed TIFF: {0}")]
    MalformedTiff(#[from] TiffError),
}

/// Errors decoding one APP0 JFIF payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JfifError {
    /// Payload does not begin with `JFIF\0` or `JFXX\0`
    #[error("Not JFIF data: missing JFIF\\0 or JFXX\\0 identifier")]
    NotJfif,

    /// Payload shorter than the fixed JFIF header
    #[error("Truncated JFIF header: {0}")]
    Truncated(#[from] IoError),
}

/// Decode failure attached to a single segment node
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    #[error("Exif: {0}")]
    Exif(#[from] ExifError),

    #[error("JFIF: {0}")]
    Jfif(#[from] JfifError),
}

/// Errors loading a tag dictionary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DictionaryError {
    /// The dictionary source could not be read
    #[error("Failed to read tag dictionary {path}: {reason}")]
    Read { path: String, reason: String },

    /// The source is not valid dictionary JSON
    #[error("Failed to parse tag dictionary: {0}")]
    Parse(String),

    /// Partition name is not one of main, thumbnail, exif, gps, interop
    #[error("Unknown IFD partition: {0}")]
    UnknownPartition(String),

    /// Tag key is not a decimal or 0x-prefixed hex u16
    #[error("Invalid tag id {key:?} in partition {partition}")]
    InvalidTagId { partition: String, key: String },

    /// Unrecognised type name in a tag record
    #[error("Unknown field type name {name:?} for tag {key} in partition {partition}")]
    UnknownTypeName {
        partition: String,
        key: String,
        name: String,
    },
}

// =============================================================================
// Serialization
// =============================================================================

/// Serialize an error as its display string.
pub(crate) fn serialize_display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: std::fmt::Display,
    S: serde::Serializer,
{
    serializer.collect_str(value)
}

/// Serialize an optional error as its display string or `null`.
pub(crate) fn serialize_option_display<T, S>(
    value: &Option<T>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    T: std::fmt::Display,
    S: serde::Serializer,
{
    match value {
        Some(value) => serializer.collect_str(value),
        None => serializer.serialize_none(),
    }
}
