//! Hero block loading: fetch from the content source, resolve the envelope,
//! and settle on one of the display states.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::application::render::{BlockRenderer, TracingSink};
use crate::domain::hero::{HeroContent, HeroError, HeroResponse};

/// External content source for the hero envelope.
#[async_trait]
pub trait HeroSource: Send + Sync {
    async fn fetch_hero(&self) -> Result<HeroResponse, HeroSourceError>;
}

#[derive(Debug, Clone, Error)]
pub enum HeroSourceError {
    #[error("request to content source failed: {0}")]
    Transport(String),
    #[error("{0}")]
    Decode(String),
}

/// What the hero area shows once the fetch has settled.
#[derive(Debug, Clone, PartialEq)]
pub enum HeroState {
    Failed { message: String },
    /// The source answered with an empty collection.
    Empty,
    Ready(HeroContent),
}

#[derive(Clone)]
pub struct HeroService {
    source: Arc<dyn HeroSource>,
    renderer: Arc<BlockRenderer>,
}

impl HeroService {
    pub fn new(source: Arc<dyn HeroSource>, renderer: Arc<BlockRenderer>) -> Self {
        Self { source, renderer }
    }

    /// Fetch the hero and map every outcome to a display state. Never fails.
    pub async fn load(&self) -> HeroState {
        debug!(target = "application::hero", "Fetching hero content");

        let response = match self.source.fetch_hero().await {
            Ok(response) => response,
            Err(err) => {
                error!(
                    target = "application::hero",
                    error = %err,
                    "Error fetching hero content"
                );
                return HeroState::Failed {
                    message: err.to_string(),
                };
            }
        };

        match response.into_hero() {
            Ok(Some(hero)) => {
                info!(
                    target = "application::hero",
                    title = %hero.title,
                    has_background = hero.background_image.is_some(),
                    "Hero content loaded"
                );
                HeroState::Ready(hero)
            }
            Ok(None) => {
                info!(target = "application::hero", "Hero collection is empty");
                HeroState::Empty
            }
            Err(err @ HeroError::Api(_)) => {
                error!(
                    target = "application::hero",
                    error = %err,
                    "Content source reported errors"
                );
                HeroState::Failed {
                    message: err.to_string(),
                }
            }
            Err(err @ HeroError::Missing) => {
                warn!(target = "application::hero", "No hero content found in response");
                HeroState::Failed {
                    message: err.to_string(),
                }
            }
        }
    }

    /// Render the rich-text subtitle to HTML. Render diagnostics go to the log.
    pub fn render_subtitle(&self, hero: &HeroContent) -> Option<String> {
        let subtitle = hero.subtitle.as_ref()?;
        let mut sink = TracingSink;
        self.renderer
            .render_json(subtitle, &mut sink)
            .map(|node| node.to_html())
    }
}
