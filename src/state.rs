use crate::api::{ApiClient, CatalogClient, http_client};
use crate::config::Config;
use crate::dom::Document;
use crate::errors::UiError;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handle on the page: its document plus the HTTP clients.
///
/// Handlers never hold the document lock across an `.await`.
#[derive(Clone)]
pub struct Page {
    pub document: Arc<Mutex<Document>>,
    pub api: ApiClient,
    pub catalog: CatalogClient,
}

impl Page {
    pub fn new(document: Document, api: ApiClient, catalog: CatalogClient) -> Self {
        Self {
            document: Arc::new(Mutex::new(document)),
            api,
            catalog,
        }
    }

    pub fn from_config(config: &Config, document: Document) -> Result<Self, UiError> {
        let http = http_client(config)?;
        Ok(Self::new(
            document,
            ApiClient::new(http.clone(), &config.api_base_url)?,
            CatalogClient::new(http, &config.catalog_base_url)?,
        ))
    }
}
