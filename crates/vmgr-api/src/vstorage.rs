//! Virtual storage object types
//!
//! Field names follow the platform's camelCase wire format. Keys this client
//! does not model are carried in `extra` maps, and unrecognized backing kinds
//! keep their raw fields, so objects are dumped back out as they were
//! received.

use chrono::{DateTime, FixedOffset};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

const DISK_FILE_BACKING: &str = "BaseConfigInfoDiskFileBackingInfo";
const RAW_DISK_MAPPING_BACKING: &str = "BaseConfigInfoRawDiskMappingBackingInfo";

/// Identifier of a virtual storage object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Id {
    pub id: String,
}

impl Id {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A platform-managed virtual disk
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VStorageObject {
    pub config: VStorageObjectConfigInfo,
}

impl VStorageObject {
    /// Object identifier
    #[must_use]
    pub fn id(&self) -> &str {
        &self.config.id.id
    }

    /// Backing file path, if the object is backed by a plain disk file
    #[must_use]
    pub fn disk_file_path(&self) -> Option<&str> {
        match &self.config.backing {
            Some(BaseConfigInfoBacking::DiskFile(file)) => Some(&file.file_path),
            _ => None,
        }
    }

    /// Capacity in bytes
    #[must_use]
    pub fn capacity_bytes(&self) -> i64 {
        self.config.capacity_in_mb.saturating_mul(1024 * 1024)
    }
}

/// Configuration of a virtual storage object
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VStorageObjectConfigInfo {
    pub id: Id,
    pub name: String,
    /// Unset for objects synthesized locally (e.g. missing-object placeholders).
    /// Keeps the offset the server sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backing: Option<BaseConfigInfoBacking>,
    #[serde(rename = "capacityInMB", default)]
    pub capacity_in_mb: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumption_type: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Backing of a virtual storage object
///
/// On the wire this is an object tagged by its `type` key.
#[derive(Debug, Clone, PartialEq)]
pub enum BaseConfigInfoBacking {
    /// Plain virtual disk file on a datastore
    DiskFile(DiskFileBackingInfo),
    /// Raw device mapping
    RawDiskMapping(RawDiskMappingBackingInfo),
    /// Any backing kind this client does not model, `type` key included
    Unknown(Map<String, Value>),
}

impl BaseConfigInfoBacking {
    /// Wire type name
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        match self {
            Self::DiskFile(_) => Some(DISK_FILE_BACKING),
            Self::RawDiskMapping(_) => Some(RAW_DISK_MAPPING_BACKING),
            Self::Unknown(fields) => fields.get("type").and_then(Value::as_str),
        }
    }
}

#[derive(Serialize)]
struct Tagged<'a, T> {
    #[serde(rename = "type")]
    kind: &'a str,
    #[serde(flatten)]
    info: &'a T,
}

impl Serialize for BaseConfigInfoBacking {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::DiskFile(info) => Tagged {
                kind: DISK_FILE_BACKING,
                info,
            }
            .serialize(serializer),
            Self::RawDiskMapping(info) => Tagged {
                kind: RAW_DISK_MAPPING_BACKING,
                info,
            }
            .serialize(serializer),
            Self::Unknown(fields) => fields.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for BaseConfigInfoBacking {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::deserialize(deserializer)?;
        let kind = fields.get("type").and_then(Value::as_str).map(str::to_owned);

        let backing = match kind.as_deref() {
            Some(DISK_FILE_BACKING) => {
                fields.remove("type");
                serde_json::from_value(Value::Object(fields)).map(Self::DiskFile)
            }
            Some(RAW_DISK_MAPPING_BACKING) => {
                fields.remove("type");
                serde_json::from_value(Value::Object(fields)).map(Self::RawDiskMapping)
            }
            _ => Ok(Self::Unknown(fields)),
        };
        backing.map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskFileBackingInfo {
    pub datastore: String,
    pub file_path: String,
    #[serde(default)]
    pub provisioning_type: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDiskMappingBackingInfo {
    pub datastore: String,
    pub file_path: String,
    #[serde(default)]
    pub lun_uuid: String,
    #[serde(default)]
    pub compatibility_mode: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Tag attached to a virtual storage object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VslmTagEntry {
    pub tag_name: String,
    pub parent_category_name: String,
}

impl VslmTagEntry {
    pub fn new(category: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            tag_name: tag.into(),
            parent_category_name: category.into(),
        }
    }
}
