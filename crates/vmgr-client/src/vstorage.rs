//! Virtual storage object manager backed by the HTTP API

use async_trait::async_trait;
use tracing::{debug, info, instrument};
use vmgr_api::{IdList, VStorageObject, VslmTagEntry};

use crate::error::Result;
use crate::http::HttpClient;
use crate::traits::VStorageObjectManager;

/// Datastore-scoped storage object manager
#[derive(Debug, Clone)]
pub struct HttpVStorageManager {
    client: HttpClient,
    datastore: String,
}

impl HttpVStorageManager {
    pub fn new(client: HttpClient, datastore: impl Into<String>) -> Self {
        Self {
            client,
            datastore: datastore.into(),
        }
    }
}

#[async_trait]
impl VStorageObjectManager for HttpVStorageManager {
    #[instrument(skip(self), fields(datastore = %self.datastore), level = "debug")]
    async fn list(&self) -> Result<Vec<String>> {
        let url = self
            .client
            .endpoint(&["datastores", self.datastore.as_str(), "vstorage-objects"])?;
        let ids: IdList = self.client.get(url).await?;
        debug!(count = ids.ids.len(), "listed storage objects");
        Ok(ids.into_strings())
    }

    #[instrument(skip(self), level = "debug")]
    async fn list_attached_objects(&self, category: &str, tag: &str) -> Result<Vec<String>> {
        let mut url = self.client.endpoint(&["vstorage-objects", "attached"])?;
        url.query_pairs_mut()
            .append_pair("category", category)
            .append_pair("tag", tag);

        let ids: IdList = self.client.get(url).await?;
        debug!(count = ids.ids.len(), "listed tagged storage objects");
        Ok(ids.into_strings())
    }

    #[instrument(skip(self), fields(datastore = %self.datastore), level = "debug")]
    async fn retrieve(&self, id: &str) -> Result<VStorageObject> {
        let url = self
            .client
            .endpoint(&["datastores", self.datastore.as_str(), "vstorage-objects", id])?;
        self.client.get(url).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn list_attached_tags(&self, id: &str) -> Result<Vec<VslmTagEntry>> {
        let url = self.client.endpoint(&["vstorage-objects", id, "tags"])?;
        self.client.get(url).await
    }

    #[instrument(skip(self), fields(datastore = %self.datastore))]
    async fn reconcile_datastore_inventory(&self) -> Result<()> {
        let url = self
            .client
            .endpoint(&["datastores", self.datastore.as_str(), "reconcile"])?;
        self.client.post_empty(url).await?;
        info!("datastore inventory reconciled");
        Ok(())
    }
}
