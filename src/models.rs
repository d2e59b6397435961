use crate::errors::UiError;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

pub const FISH_ID_ATTR: &str = "data-fish-id";
pub const USER_ID_ATTR: &str = "data-user-id";

/// Fish identifier as it appears in request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FishId(String);

impl FishId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parses the `<prefix>-<id>` form carried by `data-fish-id`.
    ///
    /// Only the segment right after the first dash is kept, so `fish-4-2`
    /// yields `4`.
    pub fn parse_attr(value: &str) -> Result<Self, UiError> {
        match value.split('-').nth(1) {
            Some(id) if !id.is_empty() => Ok(Self(id.to_string())),
            _ => Err(UiError::MalformedAttribute {
                attr: FISH_ID_ATTR,
                value: value.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FishId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId(String);

impl UserId {
    pub fn parse_attr(value: &str) -> Result<Self, UiError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(UiError::MalformedAttribute {
                attr: USER_ID_ATTR,
                value: value.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of `PATCH /api/users/{user}/fish/{fish}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub fish: ToggleResult,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ToggleResult {
    pub is_caught: bool,
}

/// Body of `GET /api/fish/{fish}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct FishDetailResponse {
    pub fish: FishDetail,
}

/// Only the catchphrase is read. The backend's other record fields (a localized
/// name object, image links) pass through unchecked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FishDetail {
    pub catchphrase: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizedName {
    #[serde(rename = "name-USen")]
    pub us_en: String,
    #[serde(flatten)]
    pub others: BTreeMap<String, String>,
}

impl LocalizedName {
    pub fn display(&self) -> &str {
        &self.us_en
    }
}

/// One species from the reference catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: u32,
    pub name: LocalizedName,
    pub icon_uri: String,
    #[serde(default)]
    pub image_uri: Option<String>,
    #[serde(rename = "catch-phrase", default)]
    pub catch_phrase: Option<String>,
}

impl CatalogEntry {
    pub fn checkbox_id(&self) -> String {
        format!("fish-{}", self.id)
    }
}
