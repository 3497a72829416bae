//! Text and JSON reports for segment trees.

use std::fmt;

use serde::Serialize;

use crate::exif::{ExifMetadata, IfdGroup};
use crate::format::jpeg::JfifHeader;
use crate::tree::{Metadata, SegmentNode, SegmentTree};

/// Tag names are padded to this width in text output
const NAME_WIDTH: usize = 28;

/// A segment tree labelled with the file it came from.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FileReport<'a> {
    pub path: &'a str,
    #[serde(flatten)]
    pub tree: &'a SegmentTree,
}

impl<'a> FileReport<'a> {
    pub fn new(path: &'a str, tree: &'a SegmentTree) -> Self {
        Self { path, tree }
    }
}

/// Render reports as a pretty-printed JSON array.
pub fn render_json(reports: &[FileReport<'_>]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(reports)
}

/// Render one report as human-readable text.
pub fn render_text(report: &FileReport<'_>) -> String {
    report.to_string()
}

impl fmt::Display for FileReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.tree;

        writeln!(f, "== {} ==", self.path)?;
        write!(f, "Segments: {}", tree.len())?;
        match &tree.scan_error {
            Some(e) => writeln!(f, " (incomplete: {})", e)?,
            None => writeln!(f)?,
        }

        writeln!(f, "  {:<10}  {:>8}  {:<6}  SEGMENT", "OFFSET", "LENGTH", "MARKER")?;
        for node in &tree.nodes {
            let segment = &node.segment;
            writeln!(
                f,
                "  0x{:08X}  {:>8}  {:04X}    {}",
                segment.offset,
                segment.length,
                segment.marker,
                node.label()
            )?;
        }

        for node in &tree.nodes {
            write_node_details(f, node)?;
        }

        Ok(())
    }
}

fn write_node_details(f: &mut fmt::Formatter<'_>, node: &SegmentNode) -> fmt::Result {
    if node.metadata.is_none() && node.error.is_none() {
        return Ok(());
    }

    writeln!(f)?;
    write!(f, "{} at 0x{:08X}", node.label(), node.segment.offset)?;

    if let Some(e) = &node.error {
        writeln!(f, ": {}", e)?;
    }

    match &node.metadata {
        Some(Metadata::Exif(exif)) => write_exif(f, exif),
        Some(Metadata::Jfif(jfif)) => write_jfif(f, jfif),
        None => Ok(()),
    }
}

fn write_jfif(f: &mut fmt::Formatter<'_>, jfif: &JfifHeader) -> fmt::Result {
    match jfif {
        JfifHeader::Jfif {
            version_major,
            version_minor,
            density_units,
            x_density,
            y_density,
            thumbnail_width,
            thumbnail_height,
        } => {
            let units = match density_units {
                0 => "aspect ratio",
                1 => "dpi",
                2 => "dpcm",
                _ => "unknown units",
            };
            writeln!(
                f,
                ": JFIF {}.{:02}, density {}x{} ({}), thumbnail {}x{}",
                version_major,
                version_minor,
                x_density,
                y_density,
                units,
                thumbnail_width,
                thumbnail_height
            )
        }
        JfifHeader::Extension { code } => writeln!(f, ": JFXX extension 0x{:02X}", code),
    }
}

fn write_exif(f: &mut fmt::Formatter<'_>, exif: &ExifMetadata) -> fmt::Result {
    writeln!(
        f,
        ": TIFF {}, IFD0 at {}",
        exif.header.byte_order.mnemonic(),
        exif.header.first_ifd_offset
    )?;

    for ifd in &exif.ifds {
        write_ifd(f, ifd)?;
    }
    Ok(())
}

fn write_ifd(f: &mut fmt::Formatter<'_>, ifd: &IfdGroup) -> fmt::Result {
    writeln!(
        f,
        "  [{}] offset {}, {} tags",
        ifd.kind,
        ifd.offset,
        ifd.tags.len()
    )?;

    for tag in &ifd.tags {
        writeln!(
            f,
            "    0x{:04X}  {:<width$}  {:<9}  {:>5}  {}",
            tag.id,
            tag.name,
            tag.field_type,
            tag.count,
            tag.value,
            width = NAME_WIDTH
        )?;
    }

    for failure in &ifd.failures {
        writeln!(
            f,
            "    ! entry {} (0x{:04X} {}): {}",
            failure.index, failure.tag_id, failure.name, failure.error
        )?;
    }

    if let Some(e) = &ifd.error {
        writeln!(f, "    ! {}", e)?;
    }

    Ok(())
}
