//! Marker scanning over real and synthetic JPEG streams.

use jpeg_walker::{IoError, MarkerKind, MarkerScanner, ScanError, Segment};

use super::test_utils::{create_test_jpeg, create_test_rgb_jpeg, JpegBuilder, SCAN_HEADER};

fn kinds(segments: &[Segment]) -> Vec<MarkerKind> {
    segments.iter().map(|s| s.kind).collect()
}

/// Rebuild the buffer from segments and the gaps between them, recording
/// which segment kind each non-empty gap follows.
fn reconstruct(data: &[u8], segments: &[Segment]) -> (Vec<u8>, Vec<MarkerKind>) {
    let mut rebuilt = Vec::with_capacity(data.len());
    let mut gap_followers = Vec::new();
    let mut pos = 0;
    let mut previous = None;

    for segment in segments {
        if segment.offset > pos {
            rebuilt.extend_from_slice(&data[pos..segment.offset]);
            if let Some(kind) = previous {
                gap_followers.push(kind);
            }
        }
        rebuilt.extend_from_slice(&data[segment.offset..segment.end()]);
        pos = segment.end();
        previous = Some(segment.kind);
    }
    rebuilt.extend_from_slice(&data[pos..]);

    (rebuilt, gap_followers)
}

// =============================================================================
// Real Encoder Output
// =============================================================================

#[test]
fn test_real_jpeg_structure() {
    let data = create_test_jpeg(64, 48, 85);
    let (segments, error) = MarkerScanner::scan(&data);

    assert!(error.is_none(), "unexpected scan error: {:?}", error);
    assert_eq!(segments.first().unwrap().kind, MarkerKind::Soi);
    assert_eq!(segments.first().unwrap().offset, 0);
    assert_eq!(segments.last().unwrap().kind, MarkerKind::Eoi);
    assert_eq!(segments.last().unwrap().end(), data.len());

    let found = kinds(&segments);
    assert!(found.contains(&MarkerKind::Dqt));
    assert!(found.contains(&MarkerKind::Dht));
    assert!(found.contains(&MarkerKind::Sof(0)));
    assert!(found.contains(&MarkerKind::Sos));
}

#[test]
fn test_real_jpeg_lengths_match_declared_fields() {
    let data = create_test_rgb_jpeg(40, 40, 90);
    let (segments, _) = MarkerScanner::scan(&data);

    for segment in segments.iter().filter(|s| s.kind.has_length()) {
        let declared = u16::from_be_bytes([data[segment.offset + 2], data[segment.offset + 3]]);
        assert_eq!(segment.length, declared as usize - 2);
        assert_eq!(segment.length_field(), Some(declared));
        assert_eq!(segment.payload_offset(), segment.offset + 4);
        assert!(segment.end() <= data.len());
        assert_eq!(
            segment.payload(&data),
            &data[segment.offset + 4..segment.offset + 4 + segment.length]
        );
    }
}

#[test]
fn test_real_jpeg_reconstructs_byte_exact() {
    let data = create_test_rgb_jpeg(33, 17, 75);
    let (segments, error) = MarkerScanner::scan(&data);
    assert!(error.is_none());

    let (rebuilt, gap_followers) = reconstruct(&data, &segments);
    assert_eq!(rebuilt, data);
    // The only bytes outside segments are entropy-coded data
    assert!(gap_followers.iter().all(|kind| *kind == MarkerKind::Sos));
    assert!(!gap_followers.is_empty());
}

#[test]
fn test_truncated_real_jpeg_keeps_contained_segments() {
    let data = create_test_jpeg(32, 32, 80);
    let (segments, _) = MarkerScanner::scan(&data);

    let dqt = segments
        .iter()
        .find(|s| s.kind == MarkerKind::Dqt)
        .copied()
        .unwrap();
    let cut = dqt.offset + 10;
    let truncated = &data[..cut];

    let (partial, error) = MarkerScanner::scan(truncated);
    assert!(matches!(
        error,
        Some(ScanError::OutOfBounds(IoError::OutOfBounds { .. }))
    ));
    assert_eq!(partial, segments[..partial.len()].to_vec());
    assert!(partial.iter().all(|s| s.end() <= cut));
    assert!(partial.iter().all(|s| s.offset < dqt.offset));
}

#[test]
fn test_truncated_in_scan_data_reports_missing_eoi() {
    let data = create_test_jpeg(32, 32, 80);
    let cut = data.len() - 2;

    let (segments, error) = MarkerScanner::scan(&data[..cut]);
    assert_eq!(error, Some(ScanError::MissingEoi { offset: cut }));
    assert_eq!(segments.last().unwrap().kind, MarkerKind::Sos);
}

// =============================================================================
// Synthetic Streams
// =============================================================================

#[test]
fn test_progressive_multi_scan_stream() {
    let data = JpegBuilder::new()
        .segment(0xDB, &[0x00; 65])
        .segment(0xC2, &[0x08, 0x00, 0x10, 0x00, 0x10, 0x01, 0x01, 0x11, 0x00])
        .segment(0xC4, &[0x00; 17])
        .scan(&[0x12, 0xFF, 0x00, 0x34, 0xFF, 0xD0, 0x56])
        .segment(0xC4, &[0x10; 17])
        .scan(&[0x78, 0xFF, 0xD7, 0x9A])
        .finish();

    let (segments, error) = MarkerScanner::scan(&data);
    assert!(error.is_none());
    assert_eq!(
        kinds(&segments),
        vec![
            MarkerKind::Soi,
            MarkerKind::Dqt,
            MarkerKind::Sof(2),
            MarkerKind::Dht,
            MarkerKind::Sos,
            MarkerKind::Dht,
            MarkerKind::Sos,
            MarkerKind::Eoi,
        ]
    );
    assert_eq!(segments[4].length, SCAN_HEADER.len());

    let (rebuilt, _) = reconstruct(&data, &segments);
    assert_eq!(rebuilt, data);
}

#[test]
fn test_app_segments_keep_their_index() {
    let data = JpegBuilder::new()
        .segment(0xE0, b"JFIF\0\x01\x02\x00\x00\x01\x00\x01\x00\x00")
        .segment(0xE1, b"Exif\0\0")
        .segment(0xE2, b"ICC_PROFILE\0")
        .segment(0xED, b"Photoshop 3.0\0")
        .segment(0xEE, b"Adobe")
        .segment(0xFE, b"a comment")
        .finish();

    let (segments, _) = MarkerScanner::scan(&data);
    assert_eq!(
        kinds(&segments),
        vec![
            MarkerKind::Soi,
            MarkerKind::App(0),
            MarkerKind::App(1),
            MarkerKind::App(2),
            MarkerKind::App(13),
            MarkerKind::App(14),
            MarkerKind::Com,
            MarkerKind::Eoi,
        ]
    );
    assert!(segments[2].kind.is_app(1));
    assert_eq!(segments[2].payload(&data), b"Exif\0\0");
}

#[test]
fn test_fill_bytes_before_marker() {
    let data = JpegBuilder::new()
        .raw(&[0xFF, 0xFF, 0xFF])
        .segment(0xFE, b"x")
        .finish();

    let (segments, error) = MarkerScanner::scan(&data);
    assert!(error.is_none());
    assert_eq!(segments[1].kind, MarkerKind::Com);
    // Fill bytes at 2..5, the marker sits on the last 0xFF of the run
    assert_eq!(segments[1].offset, 5);
}

#[test]
fn test_missing_soi() {
    let data = JpegBuilder::empty().segment(0xE1, b"Exif\0\0").finish();
    let mut scanner = MarkerScanner::new(&data);

    assert_eq!(
        scanner.next(),
        Some(Err(ScanError::MissingSoi { found: 0xFFE1 }))
    );
    assert_eq!(scanner.next(), None);
}

#[test]
fn test_declared_length_too_small() {
    let data = JpegBuilder::new().raw(&[0xFF, 0xDB, 0x00, 0x01]).finish();
    let (segments, error) = MarkerScanner::scan(&data);

    assert_eq!(segments.len(), 1);
    assert_eq!(
        error,
        Some(ScanError::InvalidLength {
            offset: 2,
            length: 1
        })
    );
}

#[test]
fn test_segment_past_end_of_buffer() {
    let data = JpegBuilder::new()
        .segment(0xFE, b"ok")
        .raw(&[0xFF, 0xE1, 0x10, 0x00, b'E', b'x'])
        .build();

    let (segments, error) = MarkerScanner::scan(&data);
    assert_eq!(kinds(&segments), vec![MarkerKind::Soi, MarkerKind::Com]);
    assert!(matches!(error, Some(ScanError::OutOfBounds(_))));
}

#[test]
fn test_scanner_is_deterministic() {
    let data = create_test_jpeg(16, 16, 70);
    assert_eq!(MarkerScanner::scan(&data), MarkerScanner::scan(&data));
}
