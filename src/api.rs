//! HTTP clients for the application backend and the species reference API.

use crate::config::Config;
use crate::errors::UiError;
use crate::models::{
    CatalogEntry, FishDetail, FishDetailResponse, FishId, ToggleResponse, ToggleResult, UserId,
};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

pub fn http_client(config: &Config) -> Result<Client, UiError> {
    Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|err| UiError::transport(config.api_base_url.as_str(), err))
}

/// Client for the application backend's `/api` routes.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(http: Client, base_url: &str) -> Result<Self, UiError> {
        Ok(Self {
            http,
            base_url: parse_base(base_url, "FISH_API_BASE_URL")?,
        })
    }

    /// `PATCH /api/users/{user}/fish/{fish}`, no body.
    pub async fn toggle_caught(
        &self,
        user: &UserId,
        fish: &FishId,
    ) -> Result<ToggleResult, UiError> {
        let url = endpoint(
            &self.base_url,
            &["api", "users", user.as_str(), "fish", fish.as_str()],
        );
        let response: ToggleResponse = send_json(self.http.patch(url.clone()), &url).await?;
        Ok(response.fish)
    }

    /// `GET /api/fish/{fish}`.
    pub async fn fish_detail(&self, fish: &FishId) -> Result<FishDetail, UiError> {
        let url = endpoint(&self.base_url, &["api", "fish", fish.as_str()]);
        let response: FishDetailResponse = send_json(self.http.get(url.clone()), &url).await?;
        Ok(response.fish)
    }
}

/// Client for the third-party species catalog.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: Url,
}

impl CatalogClient {
    pub fn new(http: Client, base_url: &str) -> Result<Self, UiError> {
        Ok(Self {
            http,
            base_url: parse_base(base_url, "FISH_CATALOG_BASE_URL")?,
        })
    }

    pub async fn all_fish(&self) -> Result<Vec<CatalogEntry>, UiError> {
        let url = endpoint(&self.base_url, &["fish"]);
        send_json(self.http.get(url.clone()), &url).await
    }

    pub async fn fish(&self, id: u32) -> Result<CatalogEntry, UiError> {
        let id = id.to_string();
        let url = endpoint(&self.base_url, &["fish", id.as_str()]);
        send_json(self.http.get(url.clone()), &url).await
    }
}

/// Accepts only URLs that can carry a path, so [`endpoint`] always applies.
fn parse_base(raw: &str, key: &'static str) -> Result<Url, UiError> {
    match Url::parse(raw) {
        Ok(url) if !url.cannot_be_a_base() => Ok(url),
        _ => Err(UiError::InvalidConfig {
            key,
            value: raw.to_string(),
        }),
    }
}

/// Appends `segments` to `base`, percent-encoding each one so ids cannot
/// introduce extra path segments, a query or a fragment.
fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

async fn send_json<T>(request: RequestBuilder, url: &Url) -> Result<T, UiError>
where
    T: DeserializeOwned,
{
    debug!(%url, "sending request");
    let response = request
        .send()
        .await
        .map_err(|err| UiError::transport(url.as_str(), err))?;

    let status = response.status();
    if !status.is_success() {
        return Err(UiError::Status {
            url: url.to_string(),
            status,
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|err| UiError::transport(url.as_str(), err))?;
    serde_json::from_slice(&body).map_err(|source| UiError::MalformedResponse {
        url: url.to_string(),
        source,
    })
}
