//! Manager traits consumed by the CLI commands

use async_trait::async_trait;
use vmgr_api::{VStorageObject, VslmTagEntry};

use crate::error::Result;

/// Virtual storage object operations scoped to one datastore
#[async_trait]
pub trait VStorageObjectManager: Send + Sync {
    /// List the IDs of all objects on the datastore
    async fn list(&self) -> Result<Vec<String>>;

    /// List the IDs of objects carrying `tag` in `category`
    async fn list_attached_objects(&self, category: &str, tag: &str) -> Result<Vec<String>>;

    /// Fetch a single object
    ///
    /// Returns `ClientError::NotFound` when the inventory knows no such object.
    async fn retrieve(&self, id: &str) -> Result<VStorageObject>;

    /// List the tags attached to an object
    async fn list_attached_tags(&self, id: &str) -> Result<Vec<VslmTagEntry>>;

    /// Resynchronize the datastore's object inventory with on-disk state
    async fn reconcile_datastore_inventory(&self) -> Result<()>;
}

/// Local account operations on a managed host
#[async_trait]
pub trait HostAccountManager: Send + Sync {
    /// Remove the local account `id`
    async fn remove(&self, id: &str) -> Result<()>;
}
