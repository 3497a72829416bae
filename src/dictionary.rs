//! Tag name dictionary.
//!
//! Maps `(IfdKind, tag id)` to a human-readable name and, optionally, the
//! field type the tag is expected to carry. The dictionary is loaded once
//! and shared read-only by every decode.
//!
//! # File Format
//!
//! ```json
//! {
//!   "main":    { "0x0100": { "name": "ImageWidth", "type": "SHORT" } },
//!   "exif":    { "36864":  { "name": "ExifVersion" } },
//!   "gps":     {},
//!   "interop": {},
//!   "thumbnail": {}
//! }
//! ```
//!
//! Keys are decimal or `0x`-prefixed hex. `type` is optional and uses the
//! upper-case TIFF type names. Tags in IFD1 are looked up in `thumbnail`
//! first and then in `main`.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::DictionaryError;
use crate::format::tiff::{FieldType, IfdKind};

/// Exif 2.3 tag table compiled into the crate
const BUNDLED_TABLE: &str = include_str!("../data/exif_tags.json");

/// Name and expected type of one tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpec {
    pub name: String,
    pub expected_type: Option<FieldType>,
}

#[derive(Debug, Deserialize)]
struct RawTagSpec {
    name: String,
    #[serde(default, rename = "type")]
    field_type: Option<String>,
}

type RawTable = BTreeMap<String, BTreeMap<String, RawTagSpec>>;

/// Immutable `(IfdKind, tag id) -> TagSpec` mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDictionary {
    tags: HashMap<(IfdKind, u16), TagSpec>,
}

impl TagDictionary {
    /// Load a dictionary from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| DictionaryError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let dictionary = Self::from_reader(BufReader::new(file))?;
        debug!(
            path = %path.display(),
            tags = dictionary.len(),
            "Loaded tag dictionary"
        );
        Ok(dictionary)
    }

    /// Load a dictionary from any JSON reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DictionaryError> {
        let raw: RawTable =
            serde_json::from_reader(reader).map_err(|e| DictionaryError::Parse(e.to_string()))?;
        Self::from_raw(raw)
    }

    /// Load a dictionary from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, DictionaryError> {
        let raw: RawTable =
            serde_json::from_str(json).map_err(|e| DictionaryError::Parse(e.to_string()))?;
        Self::from_raw(raw)
    }

    /// The Exif 2.3 table shipped with the crate.
    pub fn bundled() -> Result<Self, DictionaryError> {
        Self::from_json_str(BUNDLED_TABLE)
    }

    /// Build a dictionary from in-memory entries.
    ///
    /// Later entries replace earlier ones with the same key.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (IfdKind, u16, S, Option<FieldType>)>,
        S: Into<String>,
    {
        let tags = entries
            .into_iter()
            .map(|(kind, id, name, expected_type)| {
                (
                    (kind, id),
                    TagSpec {
                        name: name.into(),
                        expected_type,
                    },
                )
            })
            .collect();
        Self { tags }
    }

    fn from_raw(raw: RawTable) -> Result<Self, DictionaryError> {
        let mut tags = HashMap::new();

        for (partition, entries) in raw {
            let kind = IfdKind::from_partition_name(&partition)
                .ok_or_else(|| DictionaryError::UnknownPartition(partition.clone()))?;

            for (key, spec) in entries {
                let id = parse_tag_id(&key).ok_or_else(|| DictionaryError::InvalidTagId {
                    partition: partition.clone(),
                    key: key.clone(),
                })?;

                let expected_type = match spec.field_type {
                    Some(name) => Some(FieldType::from_name(&name).ok_or_else(|| {
                        DictionaryError::UnknownTypeName {
                            partition: partition.clone(),
                            key: key.clone(),
                            name,
                        }
                    })?),
                    None => None,
                };

                tags.insert(
                    (kind, id),
                    TagSpec {
                        name: spec.name,
                        expected_type,
                    },
                );
            }
        }

        Ok(Self { tags })
    }

    /// Look up a tag. IFD1 tags fall back to the IFD0 partition.
    pub fn lookup(&self, kind: IfdKind, id: u16) -> Option<&TagSpec> {
        self.tags.get(&(kind, id)).or_else(|| match kind {
            IfdKind::Thumbnail => self.tags.get(&(IfdKind::Main, id)),
            _ => None,
        })
    }

    /// The tag's name, or `Unknown(0xNNNN)` if it is not in the dictionary.
    pub fn resolve_name(&self, kind: IfdKind, id: u16) -> String {
        match self.lookup(kind, id) {
            Some(spec) => spec.name.clone(),
            None => unknown_tag_name(id),
        }
    }

    /// Number of entries across all partitions.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Placeholder name for a tag the dictionary does not know.
pub fn unknown_tag_name(id: u16) -> String {
    format!("Unknown(0x{:04X})", id)
}

fn parse_tag_id(key: &str) -> Option<u16> {
    let key = key.trim();
    match key.strip_prefix("0x").or_else(|| key.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16).ok(),
        None => key.parse().ok(),
    }
}
