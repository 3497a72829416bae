//! Exif APP1 payload decoding.
//!
//! The decoder walks every IFD reachable from the TIFF header: IFD0, the
//! next-IFD chain (IFD1 and beyond), and the Exif, GPS and Interoperability
//! IFDs linked by pointer tags. IFDs are visited from an explicit work list
//! so malformed offsets can never recurse or loop.

use std::collections::{HashSet, VecDeque};

use serde::Serialize;
use tracing::{debug, warn};

use crate::dictionary::TagDictionary;
use crate::error::{serialize_display, serialize_option_display, ExifError, TiffError};
use crate::format::jpeg::EXIF_IDENTIFIER;
use crate::format::tiff::{FieldType, IfdEntry, IfdKind, RawIfd, TagValue, TiffHeader};
use crate::io::ByteOrder;

/// Default maximum IFD nesting depth
pub const DEFAULT_MAX_IFD_DEPTH: usize = 16;

// =============================================================================
// Output Model
// =============================================================================

/// One decoded IFD entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tag {
    pub id: u16,

    /// Dictionary name or `Unknown(0xNNNN)`
    pub name: String,

    pub ifd_kind: IfdKind,
    pub field_type: FieldType,

    /// Number of values as declared in the entry
    pub count: u32,

    pub value: TagValue,
}

/// An entry that could not be decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryFailure {
    /// Position of the entry within its IFD
    pub index: usize,
    pub tag_id: u16,
    pub name: String,
    #[serde(serialize_with = "serialize_display")]
    pub error: TiffError,
}

/// Tags and failures of a single IFD.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfdGroup {
    pub kind: IfdKind,

    /// Offset of the IFD relative to the TIFF header
    pub offset: u32,

    pub tags: Vec<Tag>,
    pub failures: Vec<EntryFailure>,

    /// Failure of the IFD as a whole (unreadable or truncated table, depth
    /// cap, revisited offset). Tags read before the failure are kept.
    #[serde(serialize_with = "serialize_option_display")]
    pub error: Option<TiffError>,
}

impl IfdGroup {
    fn new(kind: IfdKind, offset: u32) -> Self {
        Self {
            kind,
            offset,
            tags: Vec::new(),
            failures: Vec::new(),
            error: None,
        }
    }

    /// Find a tag by id.
    pub fn tag(&self, id: u16) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.id == id)
    }

    /// Whether every entry decoded and the table was read completely.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.error.is_none()
    }
}

/// Everything decoded from one Exif payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExifMetadata {
    pub header: TiffHeader,

    /// IFDs in the order they were visited
    pub ifds: Vec<IfdGroup>,
}

impl ExifMetadata {
    /// The first IFD of the given kind.
    pub fn ifd(&self, kind: IfdKind) -> Option<&IfdGroup> {
        self.ifds.iter().find(|ifd| ifd.kind == kind)
    }

    /// Find a tag by IFD kind and id.
    pub fn find_tag(&self, kind: IfdKind, id: u16) -> Option<&Tag> {
        self.ifds
            .iter()
            .filter(|ifd| ifd.kind == kind)
            .find_map(|ifd| ifd.tag(id))
    }

    /// Find the first tag with the given name in any IFD.
    pub fn find_by_name(&self, name: &str) -> Option<&Tag> {
        self.tags().find(|tag| tag.name == name)
    }

    /// All decoded tags, in visit order.
    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.ifds.iter().flat_map(|ifd| ifd.tags.iter())
    }

    /// Number of entry-level and IFD-level failures.
    pub fn failure_count(&self) -> usize {
        self.ifds
            .iter()
            .map(|ifd| ifd.failures.len() + usize::from(ifd.error.is_some()))
            .sum()
    }
}

// =============================================================================
// ExifDecoder
// =============================================================================

/// Decodes Exif APP1 payloads using a shared tag dictionary.
#[derive(Debug, Clone, Copy)]
pub struct ExifDecoder<'d> {
    dictionary: &'d TagDictionary,
    max_depth: usize,
}

/// A queued IFD: kind, offset, depth
type PendingIfd = (IfdKind, u32, usize);

impl<'d> ExifDecoder<'d> {
    pub fn new(dictionary: &'d TagDictionary) -> Self {
        Self {
            dictionary,
            max_depth: DEFAULT_MAX_IFD_DEPTH,
        }
    }

    /// Set the deepest IFD nesting level that is still decoded.
    ///
    /// IFD0 is depth 0; each pointer or next-IFD link adds one.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn dictionary(&self) -> &'d TagDictionary {
        self.dictionary
    }

    /// Decode the payload of an APP1 segment.
    ///
    /// # Errors
    /// - `NotExifData` if the payload does not start with `Exif\0\0`
    /// - `MalformedTiff` if the TIFF header is invalid
    ///
    /// Problems below the header are recorded in the returned IFD groups.
    pub fn decode(&self, payload: &[u8]) -> Result<ExifMetadata, ExifError> {
        let tiff = payload
            .strip_prefix(EXIF_IDENTIFIER)
            .ok_or(ExifError::NotExifData)?;
        let header = TiffHeader::parse(tiff)?;
        let byte_order = header.byte_order;

        debug!(
            byte_order = byte_order.mnemonic(),
            first_ifd_offset = header.first_ifd_offset,
            tiff_len = tiff.len(),
            "Decoding Exif payload"
        );

        let mut queue: VecDeque<PendingIfd> = VecDeque::new();
        queue.push_back((IfdKind::Main, header.first_ifd_offset, 0));
        let mut visited = HashSet::new();
        let mut ifds = Vec::new();

        while let Some((kind, offset, depth)) = queue.pop_front() {
            let mut group = IfdGroup::new(kind, offset);

            if depth > self.max_depth {
                warn!(%kind, offset, depth, "IFD depth limit exceeded");
                group.error = Some(TiffError::DepthExceeded(self.max_depth));
                ifds.push(group);
                continue;
            }

            if !visited.insert(offset) {
                warn!(%kind, offset, "IFD offset already visited");
                group.error = Some(TiffError::IfdCycle(offset));
                ifds.push(group);
                continue;
            }

            match RawIfd::parse(tiff, offset, byte_order) {
                Ok(raw) => {
                    debug!(%kind, offset, entries = raw.entries.len(), "Decoding IFD");
                    self.decode_entries(&raw, tiff, byte_order, depth, &mut group, &mut queue);
                    group.error = raw.truncation;
                    if raw.next_ifd_offset != 0 {
                        queue.push_back((IfdKind::Thumbnail, raw.next_ifd_offset, depth + 1));
                    }
                }
                Err(e) => {
                    warn!(%kind, offset, "Unreadable IFD: {}", e);
                    group.error = Some(e);
                }
            }

            ifds.push(group);
        }

        Ok(ExifMetadata { header, ifds })
    }

    fn decode_entries(
        &self,
        raw: &RawIfd,
        tiff: &[u8],
        byte_order: ByteOrder,
        depth: usize,
        group: &mut IfdGroup,
        queue: &mut VecDeque<PendingIfd>,
    ) {
        let kind = group.kind;

        for (index, entry) in raw.entries.iter().enumerate() {
            let spec = self.dictionary.lookup(kind, entry.tag_id);
            let name = self.dictionary.resolve_name(kind, entry.tag_id);

            let value = match TagValue::decode(entry, tiff, byte_order) {
                Ok(value) => value,
                Err(e) => {
                    warn!(%kind, tag = entry.tag_id, index, "Failed to decode entry: {}", e);
                    group.failures.push(EntryFailure {
                        index,
                        tag_id: entry.tag_id,
                        name,
                        error: e,
                    });
                    continue;
                }
            };

            if let Some(expected) = spec.and_then(|spec| spec.expected_type) {
                if expected != value.field_type() {
                    debug!(
                        %kind,
                        tag = entry.tag_id,
                        expected = %expected,
                        found = %value.field_type(),
                        "Unexpected field type"
                    );
                }
            }

            if let Some(target) = IfdKind::from_pointer_tag(entry.tag_id) {
                match pointer_offset(entry, &value) {
                    Ok(0) => debug!(%kind, tag = entry.tag_id, "Null IFD pointer"),
                    Ok(offset) => queue.push_back((target, offset, depth + 1)),
                    Err(e) => {
                        warn!(%kind, tag = entry.tag_id, "Invalid IFD pointer: {}", e);
                        group.failures.push(EntryFailure {
                            index,
                            tag_id: entry.tag_id,
                            name: name.clone(),
                            error: e,
                        });
                    }
                }
            }

            group.tags.push(Tag {
                id: entry.tag_id,
                name,
                ifd_kind: kind,
                field_type: value.field_type(),
                count: entry.count,
                value,
            });
        }
    }
}

fn pointer_offset(entry: &IfdEntry, value: &TagValue) -> Result<u32, TiffError> {
    match value {
        TagValue::Short(_) | TagValue::Long(_) => {
            value.as_u32().ok_or_else(|| TiffError::InvalidPointer {
                tag: entry.tag_id,
                message: format!("expected a single offset, got {} values", entry.count),
            })
        }
        other => Err(TiffError::InvalidPointer {
            tag: entry.tag_id,
            message: format!("expected SHORT or LONG, got {}", other.field_type()),
        }),
    }
}

// =============================================================================
// Tests
// =============================================================================
