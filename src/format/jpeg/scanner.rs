//! Top-level marker walk over a JPEG byte stream.
//!
//! # Stream Structure
//!
//! ```text
//! FFD8                          SOI, no length
//! FFE1 LLLL <L-2 bytes>         APP1 (Exif), length includes itself
//! FFDB LLLL <L-2 bytes>         DQT
//! FFC0 LLLL <L-2 bytes>         SOF0
//! FFC4 LLLL <L-2 bytes>         DHT
//! FFDA LLLL <L-2 bytes>         SOS header
//! ... entropy-coded data ...    FF00 stuffing, FFD0-FFD7 restarts
//! FFD9                          EOI, no length
//! ```
//!
//! The SOS length covers only the scan header. The compressed data that
//! follows has no length, so after SOS the scanner searches byte by byte
//! for the next marker that is neither stuffing nor a restart.

use std::iter::FusedIterator;

use tracing::{debug, warn};

use crate::error::ScanError;
use crate::io::{ByteCursor, ByteOrder};

use super::markers::{MarkerKind, MARKER_PREFIX, RST0, RST7, SOI};
use super::segment::Segment;

/// Full SOI marker code
const SOI_MARKER: u16 = 0xFF00 | SOI as u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Nothing read yet; SOI must come first
    Start,
    /// Between segments, before any SOS or after a non-scan marker
    Header,
    /// Inside entropy-coded data following SOS
    EntropyCoded,
    /// EOI emitted or an error reported
    Done,
}

/// Lazy iterator over the marker segments of a JPEG buffer.
///
/// Yields segments in file order. The sequence ends after EOI, or after
/// yielding a single error; segments yielded before an error remain valid.
#[derive(Debug, Clone)]
pub struct MarkerScanner<'a> {
    cursor: ByteCursor<'a>,
    state: ScanState,
}

impl<'a> MarkerScanner<'a> {
    /// Create a scanner over a complete JPEG buffer.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: ByteCursor::new(data),
            state: ScanState::Start,
        }
    }

    /// Drain the scanner into the segments found and the error that ended it, if any.
    pub fn scan(data: &'a [u8]) -> (Vec<Segment>, Option<ScanError>) {
        let mut segments = Vec::new();
        for item in Self::new(data) {
            match item {
                Ok(segment) => segments.push(segment),
                Err(err) => return (segments, Some(err)),
            }
        }
        (segments, None)
    }

    fn read_soi(&mut self) -> Result<Segment, ScanError> {
        let marker = self.cursor.peek_marker()?;
        if marker != SOI_MARKER {
            return Err(ScanError::MissingSoi { found: marker });
        }
        self.cursor.skip(2)?;

        Ok(Segment {
            marker,
            offset: 0,
            length: 0,
            kind: MarkerKind::Soi,
        })
    }

    fn read_segment(&mut self) -> Result<Segment, ScanError> {
        let offset = self.locate_marker()?;
        self.cursor.seek(offset)?;

        let marker = self.cursor.read_u16(ByteOrder::BigEndian)?;
        let kind = MarkerKind::from_code(marker as u8);

        if !kind.has_length() {
            return Ok(Segment {
                marker,
                offset,
                length: 0,
                kind,
            });
        }

        let declared = self.cursor.read_u16(ByteOrder::BigEndian)?;
        if declared < 2 {
            return Err(ScanError::InvalidLength {
                offset,
                length: declared,
            });
        }

        let length = declared as usize - 2;
        self.cursor.skip(length)?;

        Ok(Segment {
            marker,
            offset,
            length,
            kind,
        })
    }

    /// Find the offset of the next marker's 0xFF byte.
    ///
    /// Fill bytes (runs of 0xFF) and stuffed 0xFF00 pairs are skipped; inside
    /// entropy-coded data restart markers are skipped too.
    fn locate_marker(&self) -> Result<usize, ScanError> {
        let data = self.cursor.data();
        let start = self.cursor.position();
        let in_scan = self.state == ScanState::EntropyCoded;

        let mut pos = start;
        while pos + 1 < data.len() {
            if data[pos] != MARKER_PREFIX {
                pos += 1;
                continue;
            }

            match data[pos + 1] {
                0x00 => pos += 2,
                MARKER_PREFIX => pos += 1,
                RST0..=RST7 if in_scan => pos += 2,
                _ => {
                    if !in_scan && data[start] != MARKER_PREFIX {
                        warn!(
                            offset = start,
                            skipped = pos - start,
                            "Skipped bytes between segments"
                        );
                    }
                    return Ok(pos);
                }
            }
        }

        Err(ScanError::MissingEoi { offset: data.len() })
    }
}

impl Iterator for MarkerScanner<'_> {
    type Item = Result<Segment, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = match self.state {
            ScanState::Done => return None,
            ScanState::Start => self.read_soi(),
            ScanState::Header | ScanState::EntropyCoded => self.read_segment(),
        };

        self.state = match &result {
            Ok(segment) => {
                debug!(
                    offset = segment.offset,
                    length = segment.length,
                    "Found {} segment",
                    segment.kind
                );
                match segment.kind {
                    MarkerKind::Eoi => ScanState::Done,
                    MarkerKind::Sos => ScanState::EntropyCoded,
                    _ => ScanState::Header,
                }
            }
            Err(err) => {
                warn!("Marker scan stopped: {}", err);
                ScanState::Done
            }
        };

        Some(result)
    }
}

impl FusedIterator for MarkerScanner<'_> {}

// =============================================================================
// Tests
// =============================================================================
