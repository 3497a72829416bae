//! The segment tree: marker segments with their decoded metadata.
//!
//! [`SegmentTree::build`] is the main entry point of the crate. It drives
//! the [`MarkerScanner`] over a buffer, decodes APP0 (JFIF) and APP1 (Exif)
//! payloads, and attaches decode failures to the node they belong to. A
//! failure in one segment never hides the segments around it.

use serde::Serialize;
use tracing::{debug, warn};

use crate::dictionary::TagDictionary;
use crate::error::{serialize_option_display, MetadataError, ScanError};
use crate::exif::{ExifDecoder, ExifMetadata, Tag};
use crate::format::jpeg::{App1Kind, JfifHeader, MarkerKind, MarkerScanner, Segment};
use crate::format::tiff::IfdKind;

/// Metadata decoded from a segment payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Metadata {
    Exif(ExifMetadata),
    Jfif(JfifHeader),
}

/// One segment and whatever was decoded from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentNode {
    #[serde(flatten)]
    pub segment: Segment,

    /// Flavor of an APP1 payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app1: Option<App1Kind>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    #[serde(
        serialize_with = "serialize_option_display",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<MetadataError>,
}

impl SegmentNode {
    fn new(segment: Segment) -> Self {
        Self {
            segment,
            app1: None,
            metadata: None,
            error: None,
        }
    }

    /// Report label: "APP1-Exif" for identified APP1 segments, else the marker name.
    pub fn label(&self) -> String {
        match self.app1 {
            Some(kind) => kind.label().to_string(),
            None => self.segment.kind.to_string(),
        }
    }

    /// Decoded Exif metadata, if this is an Exif APP1 segment that decoded.
    pub fn exif(&self) -> Option<&ExifMetadata> {
        match &self.metadata {
            Some(Metadata::Exif(exif)) => Some(exif),
            _ => None,
        }
    }

    /// Decoded JFIF header, if this is an APP0 segment that decoded.
    pub fn jfif(&self) -> Option<&JfifHeader> {
        match &self.metadata {
            Some(Metadata::Jfif(jfif)) => Some(jfif),
            _ => None,
        }
    }
}

/// All segments of a JPEG buffer, in file order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentTree {
    pub nodes: Vec<SegmentNode>,

    /// Why the walk stopped early, if it did
    #[serde(serialize_with = "serialize_option_display")]
    pub scan_error: Option<ScanError>,
}

impl SegmentTree {
    /// Walk `data` and decode its metadata with the default decoder settings.
    pub fn build(data: &[u8], dictionary: &TagDictionary) -> Self {
        Self::build_with(data, &ExifDecoder::new(dictionary))
    }

    /// Walk `data` and decode its metadata with a preconfigured decoder.
    pub fn build_with(data: &[u8], decoder: &ExifDecoder<'_>) -> Self {
        let (segments, scan_error) = MarkerScanner::scan(data);
        if let Some(e) = &scan_error {
            warn!(segments = segments.len(), "Incomplete marker walk: {}", e);
        }

        let nodes = segments
            .into_iter()
            .map(|segment| decode_node(data, segment, decoder))
            .collect();

        Self { nodes, scan_error }
    }

    /// Whether the walk reached EOI without error.
    pub fn is_complete(&self) -> bool {
        self.scan_error.is_none()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.nodes.iter().map(|node| &node.segment)
    }

    /// Decoded Exif blocks, in file order.
    pub fn exif(&self) -> impl Iterator<Item = &ExifMetadata> {
        self.nodes.iter().filter_map(SegmentNode::exif)
    }

    /// Find a tag in the first Exif block that has it.
    pub fn find_tag(&self, kind: IfdKind, id: u16) -> Option<&Tag> {
        self.exif().find_map(|exif| exif.find_tag(kind, id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn decode_node(data: &[u8], segment: Segment, decoder: &ExifDecoder<'_>) -> SegmentNode {
    let mut node = SegmentNode::new(segment);
    let payload = segment.payload(data);

    match segment.kind {
        MarkerKind::App(0) => match JfifHeader::parse(payload) {
            Ok(header) => node.metadata = Some(Metadata::Jfif(header)),
            Err(e) => {
                debug!(offset = segment.offset, "APP0 is not JFIF: {}", e);
                node.error = Some(e.into());
            }
        },
        MarkerKind::App(1) => {
            node.app1 = Some(App1Kind::identify(payload));
            match decoder.decode(payload) {
                Ok(exif) => {
                    debug!(
                        offset = segment.offset,
                        ifds = exif.ifds.len(),
                        failures = exif.failure_count(),
                        "Decoded Exif block"
                    );
                    node.metadata = Some(Metadata::Exif(exif));
                }
                Err(e) => {
                    debug!(offset = segment.offset, "APP1 not decoded: {}", e);
                    node.error = Some(e.into());
                }
            }
        }
        _ => {}
    }

    node
}
