//! Hero block as delivered by the headless CMS (`GET /items/hero`).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const MISSING_HERO_MESSAGE: &str =
    "No hero content found. Please create a hero entry in Directus.";
const UNKNOWN_API_ERROR: &str = "Unknown API error";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroContent {
    pub title: String,
    /// Rich-text subtitle, decoded lazily by the block renderer.
    #[serde(default)]
    pub subtitle: Option<Value>,
    #[serde(default)]
    pub cta_text: Option<String>,
    #[serde(default)]
    pub cta_link: Option<String>,
    #[serde(default)]
    pub background_image: Option<BackgroundImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundImage {
    pub id: String,
    #[serde(default)]
    pub filename_disk: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub extensions: Option<ApiErrorExtensions>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorExtensions {
    pub code: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// The collection endpoint answers with either one item or a list of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeroPayload {
    Many(Vec<HeroContent>),
    One(HeroContent),
}

/// Response envelope: `{ "data": ... }` on success, `{ "errors": [...] }` on failure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HeroResponse {
    #[serde(default)]
    pub data: Option<HeroPayload>,
    #[serde(default)]
    pub errors: Option<Vec<ApiError>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeroError {
    #[error("{0}")]
    Api(String),
    #[error("No hero content found. Please create a hero entry in Directus.")]
    Missing,
}

impl HeroResponse {
    pub fn from_hero(hero: HeroContent) -> Self {
        Self {
            data: Some(HeroPayload::One(hero)),
            errors: None,
        }
    }

    pub fn from_errors(errors: Vec<ApiError>) -> Self {
        Self {
            data: None,
            errors: Some(errors),
        }
    }

    /// Resolve the envelope into the hero entry.
    ///
    /// Errors win over data. An empty list yields `Ok(None)` so callers can
    /// distinguish "nothing published" from "no data at all".
    pub fn into_hero(self) -> Result<Option<HeroContent>, HeroError> {
        if let Some(errors) = self.errors {
            let message = errors
                .into_iter()
                .next()
                .map(|error| error.message)
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| UNKNOWN_API_ERROR.to_string());
            return Err(HeroError::Api(message));
        }

        match self.data {
            Some(HeroPayload::One(hero)) => Ok(Some(hero)),
            Some(HeroPayload::Many(heroes)) => Ok(heroes.into_iter().next()),
            None => Err(HeroError::Missing),
        }
    }
}

impl HeroContent {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            cta_text: None,
            cta_link: None,
            background_image: None,
        }
    }

    /// Call-to-action text and link, only when both are present and non-empty.
    pub fn call_to_action(&self) -> Option<(&str, &str)> {
        let text = self.cta_text.as_deref().filter(|text| !text.is_empty())?;
        let link = self.cta_link.as_deref().filter(|link| !link.is_empty())?;
        Some((text, link))
    }
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            extensions: None,
        }
    }
}
