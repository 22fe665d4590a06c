//! Host account manager backed by the HTTP API

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::error::Result;
use crate::http::HttpClient;
use crate::traits::HostAccountManager;

/// Account manager for one managed host
#[derive(Debug, Clone)]
pub struct HttpHostAccountManager {
    client: HttpClient,
    /// `None` addresses the host the endpoint is directly connected to
    host: Option<String>,
}

impl HttpHostAccountManager {
    pub fn new(client: HttpClient, host: Option<String>) -> Self {
        Self { client, host }
    }

    fn account_url(&self, id: &str) -> Result<url::Url> {
        match &self.host {
            Some(host) => self.client.endpoint(&["hosts", host.as_str(), "accounts", id]),
            None => self.client.endpoint(&["host", "accounts", id]),
        }
    }
}

#[async_trait]
impl HostAccountManager for HttpHostAccountManager {
    #[instrument(skip(self), fields(host = self.host.as_deref().unwrap_or("<connected>")))]
    async fn remove(&self, id: &str) -> Result<()> {
        let url = self.account_url(id)?;
        self.client.delete(url).await?;
        info!("account removed");
        Ok(())
    }
}
