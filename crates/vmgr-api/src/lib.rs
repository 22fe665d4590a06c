//! vmgr-api: Shared API types
//!
//! Contains the storage object, tag, and account types exchanged with the
//! management API, along with the response envelopes used by the client.

pub mod account;
pub mod responses;
pub mod vstorage;

pub use account::HostAccountSpec;
pub use responses::{ApiErrorBody, IdList};
pub use vstorage::{
    BaseConfigInfoBacking, DiskFileBackingInfo, Id, RawDiskMappingBackingInfo, VStorageObject,
    VStorageObjectConfigInfo, VslmTagEntry,
};
