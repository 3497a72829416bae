//! Test utilities for integration tests.
//!
//! This module provides byte-level builders for JPEG streams and Exif
//! payloads, and helpers that produce real JPEG files with the `image` crate.

use image::codecs::jpeg::JpegEncoder;
use image::{GrayImage, Luma, Rgb, RgbImage};

use jpeg_walker::ByteOrder;

// =============================================================================
// Real JPEG Files
// =============================================================================

/// Create a test grayscale JPEG image.
pub fn create_test_jpeg(width: u32, height: u32, quality: u8) -> Vec<u8> {
    let img = GrayImage::from_fn(width, height, |x, y| {
        let val = ((x + y) % 256) as u8;
        Luma([val])
    });

    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.encode_image(&img).unwrap();
    buf
}

/// Create a test RGB JPEG image.
pub fn create_test_rgb_jpeg(width: u32, height: u32, quality: u8) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let r = (x % 256) as u8;
        let g = (y % 256) as u8;
        let b = ((x + y) % 256) as u8;
        Rgb([r, g, b])
    });

    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.encode_image(&img).unwrap();
    buf
}

/// Insert a length-bearing segment right after the SOI of `jpeg`.
pub fn insert_after_soi(jpeg: &[u8], code: u8, payload: &[u8]) -> Vec<u8> {
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8], "not a JPEG");
    let mut out = jpeg[..2].to_vec();
    out.extend(segment_bytes(code, payload));
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// Marker, big-endian length (payload + 2), payload.
pub fn segment_bytes(code: u8, payload: &[u8]) -> Vec<u8> {
    let mut bytes = vec![0xFF, code];
    bytes.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    bytes.extend_from_slice(payload);
    bytes
}

// =============================================================================
// JPEG Stream Builder
// =============================================================================

/// A one-component SOS header payload
pub const SCAN_HEADER: [u8; 6] = [0x01, 0x01, 0x00, 0x00, 0x3F, 0x00];

/// Builder for synthetic JPEG marker streams.
///
/// Nothing is validated; the builder writes exactly what it is told so
/// tests can produce malformed streams too.
pub struct JpegBuilder {
    data: Vec<u8>,
}

impl JpegBuilder {
    /// Start a stream with SOI.
    pub fn new() -> Self {
        Self {
            data: vec![0xFF, 0xD8],
        }
    }

    /// Start a stream with no SOI.
    pub fn empty() -> Self {
        Self { data: Vec::new() }
    }

    /// Append a length-bearing segment.
    pub fn segment(mut self, code: u8, payload: &[u8]) -> Self {
        self.data.extend(segment_bytes(code, payload));
        self
    }

    /// Append an APP1 segment carrying an Exif payload.
    pub fn app1(self, payload: &[u8]) -> Self {
        self.segment(0xE1, payload)
    }

    /// Append a standalone marker (RSTn, TEM, EOI, ...).
    pub fn marker(mut self, code: u8) -> Self {
        self.data.extend_from_slice(&[0xFF, code]);
        self
    }

    /// Append an SOS segment followed by entropy-coded bytes.
    pub fn scan(self, entropy: &[u8]) -> Self {
        self.segment(0xDA, &SCAN_HEADER).raw(entropy)
    }

    /// Append bytes verbatim.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    /// Append EOI and return the stream.
    pub fn finish(self) -> Vec<u8> {
        self.marker(0xD9).data
    }

    /// Return the stream as built, without EOI.
    pub fn build(self) -> Vec<u8> {
        self.data
    }
}

impl Default for JpegBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Exif Payload Builder
// =============================================================================

/// Value of one IFD entry in an [`ExifBuilder`].
#[derive(Debug, Clone)]
pub enum Value {
    Byte(Vec<u8>),
    Ascii(String),
    Short(Vec<u16>),
    Long(Vec<u32>),
    Rational(Vec<(u32, u32)>),
    Undefined(Vec<u8>),
    SRational(Vec<(i32, i32)>),
    /// LONG offset of the IFD with this index in the builder
    IfdLink(usize),
    /// Entry written verbatim: type, count, value/offset field
    Raw { field_type: u16, count: u32, value: u32 },
}

impl Value {
    pub fn ascii(text: &str) -> Self {
        Value::Ascii(text.to_string())
    }
}

/// Entries and next-IFD link of one IFD.
#[derive(Debug, Clone, Default)]
pub struct Ifd {
    entries: Vec<(u16, Value)>,
    next: Option<usize>,
    next_raw: Option<u32>,
}

impl Ifd {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(mut self, tag: u16, value: Value) -> Self {
        self.entries.push((tag, value));
        self
    }

    /// Link the next-IFD field to the IFD with this index.
    pub fn next(mut self, index: usize) -> Self {
        self.next = Some(index);
        self
    }

    /// Write a literal next-IFD offset.
    pub fn next_offset(mut self, offset: u32) -> Self {
        self.next_raw = Some(offset);
        self
    }
}

/// Builder for Exif APP1 payloads.
///
/// IFDs are laid out in order after the 8-byte TIFF header, each followed
/// by the out-of-line values of its entries. IFD 0 is IFD0.
pub struct ExifBuilder {
    byte_order: ByteOrder,
    ifds: Vec<Ifd>,
}

impl ExifBuilder {
    pub fn new(byte_order: ByteOrder) -> Self {
        Self {
            byte_order,
            ifds: Vec::new(),
        }
    }

    pub fn ifd(mut self, ifd: Ifd) -> Self {
        self.ifds.push(ifd);
        self
    }

    /// Offsets of every IFD relative to the TIFF header.
    pub fn ifd_offsets(&self) -> Vec<u32> {
        let mut offsets = Vec::with_capacity(self.ifds.len());
        let mut offset = 8usize;
        for ifd in &self.ifds {
            offsets.push(offset as u32);
            offset += 2 + 12 * ifd.entries.len() + 4;
            offset += ifd
                .entries
                .iter()
                .map(|(_, value)| self.external_len(value))
                .sum::<usize>();
        }
        offsets
    }

    /// The TIFF block alone.
    pub fn build_tiff(&self) -> Vec<u8> {
        let offsets = self.ifd_offsets();
        let mut data = Vec::new();

        match self.byte_order {
            ByteOrder::LittleEndian => data.extend_from_slice(b"II"),
            ByteOrder::BigEndian => data.extend_from_slice(b"MM"),
        }
        self.put_u16(&mut data, 42);
        self.put_u32(&mut data, offsets.first().copied().unwrap_or(0));

        for (ifd, &ifd_offset) in self.ifds.iter().zip(&offsets) {
            assert_eq!(data.len(), ifd_offset as usize);
            let mut external_offset = ifd_offset as usize + 2 + 12 * ifd.entries.len() + 4;
            let mut external = Vec::new();

            self.put_u16(&mut data, ifd.entries.len() as u16);
            for (tag, value) in &ifd.entries {
                let (field_type, count, bytes) = self.encode(value, &offsets);
                self.put_u16(&mut data, *tag);
                self.put_u16(&mut data, field_type);
                self.put_u32(&mut data, count);

                if bytes.len() <= 4 {
                    let mut inline = bytes.clone();
                    inline.resize(4, 0);
                    data.extend_from_slice(&inline);
                } else {
                    self.put_u32(&mut data, external_offset as u32);
                    external.extend_from_slice(&bytes);
                    if bytes.len() % 2 == 1 {
                        external.push(0);
                    }
                    external_offset += self.external_len(value);
                }
            }

            let next = match (ifd.next, ifd.next_raw) {
                (_, Some(raw)) => raw,
                (Some(index), None) => offsets[index],
                (None, None) => 0,
            };
            self.put_u32(&mut data, next);
            data.extend_from_slice(&external);
        }

        data
    }

    /// `Exif\0\0` followed by the TIFF block.
    pub fn build(&self) -> Vec<u8> {
        let mut payload = b"Exif\0\0".to_vec();
        payload.extend(self.build_tiff());
        payload
    }

    fn external_len(&self, value: &Value) -> usize {
        let len = self.value_bytes(value, &[]).len();
        if len <= 4 {
            0
        } else {
            len + len % 2
        }
    }

    fn encode(&self, value: &Value, offsets: &[u32]) -> (u16, u32, Vec<u8>) {
        let bytes = self.value_bytes(value, offsets);
        let (field_type, count) = match value {
            Value::Byte(v) => (1, v.len() as u32),
            Value::Ascii(s) => (2, s.len() as u32 + 1),
            Value::Short(v) => (3, v.len() as u32),
            Value::Long(v) => (4, v.len() as u32),
            Value::Rational(v) => (5, v.len() as u32),
            Value::Undefined(v) => (7, v.len() as u32),
            Value::SRational(v) => (10, v.len() as u32),
            Value::IfdLink(_) => (4, 1),
            Value::Raw {
                field_type, count, ..
            } => (*field_type, *count),
        };
        (field_type, count, bytes)
    }

    fn value_bytes(&self, value: &Value, offsets: &[u32]) -> Vec<u8> {
        let mut bytes = Vec::new();
        match value {
            Value::Byte(v) | Value::Undefined(v) => bytes.extend_from_slice(v),
            Value::Ascii(s) => {
                bytes.extend_from_slice(s.as_bytes());
                bytes.push(0);
            }
            Value::Short(v) => v.iter().for_each(|x| self.put_u16(&mut bytes, *x)),
            Value::Long(v) => v.iter().for_each(|x| self.put_u32(&mut bytes, *x)),
            Value::Rational(v) => v.iter().for_each(|(n, d)| {
                self.put_u32(&mut bytes, *n);
                self.put_u32(&mut bytes, *d);
            }),
            Value::SRational(v) => v.iter().for_each(|(n, d)| {
                self.put_u32(&mut bytes, *n as u32);
                self.put_u32(&mut bytes, *d as u32);
            }),
            Value::IfdLink(index) => {
                self.put_u32(&mut bytes, offsets.get(*index).copied().unwrap_or(0))
            }
            Value::Raw { value, .. } => self.put_u32(&mut bytes, *value),
        }
        bytes
    }

    fn put_u16(&self, data: &mut Vec<u8>, value: u16) {
        match self.byte_order {
            ByteOrder::LittleEndian => data.extend(&value.to_le_bytes()),
            ByteOrder::BigEndian => data.extend(&value.to_be_bytes()),
        }
    }

    fn put_u32(&self, data: &mut Vec<u8>, value: u32) {
        match self.byte_order {
            ByteOrder::LittleEndian => data.extend(&value.to_le_bytes()),
            ByteOrder::BigEndian => data.extend(&value.to_be_bytes()),
        }
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// A camera-style Exif payload: IFD0 with Exif and GPS pointers, an Exif
/// sub-IFD with an Interoperability pointer, and a thumbnail IFD1.
///
/// IFD indices: 0 = IFD0, 1 = IFD1, 2 = Exif, 3 = GPS, 4 = Interop.
pub fn camera_exif(byte_order: ByteOrder) -> Vec<u8> {
    ExifBuilder::new(byte_order)
        .ifd(
            Ifd::new()
                .entry(0x010F, Value::ascii("Acme"))
                .entry(0x0110, Value::ascii("Acme Shooter 3000"))
                .entry(0x0112, Value::Short(vec![1]))
                .entry(0x011A, Value::Rational(vec![(72, 1)]))
                .entry(0x0128, Value::Short(vec![2]))
                .entry(0x8769, Value::IfdLink(2))
                .entry(0x8825, Value::IfdLink(3))
                .next(1),
        )
        .ifd(
            Ifd::new()
                .entry(0x0103, Value::Short(vec![6]))
                .entry(0x0201, Value::Long(vec![4096]))
                .entry(0x0202, Value::Long(vec![1024])),
        )
        .ifd(
            Ifd::new()
                .entry(0x829A, Value::Rational(vec![(1, 250)]))
                .entry(0x829D, Value::Rational(vec![(28, 10)]))
                .entry(0x9000, Value::Undefined(b"0230".to_vec()))
                .entry(0x9003, Value::ascii("2024:05:17 10:30:00"))
                .entry(0x9204, Value::SRational(vec![(-1, 3)]))
                .entry(0xA005, Value::IfdLink(4)),
        )
        .ifd(
            Ifd::new()
                .entry(0x0000, Value::Byte(vec![2, 3, 0, 0]))
                .entry(0x0001, Value::ascii("N"))
                .entry(0x0002, Value::Rational(vec![(48, 1), (51, 1), (2958, 100)])),
        )
        .ifd(Ifd::new().entry(0x0001, Value::ascii("R98")))
        .build()
}
