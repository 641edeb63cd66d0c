//! Directus REST client for the hero collection.

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use crate::{
    application::hero::{HeroSource, HeroSourceError},
    config::CmsSettings,
    domain::hero::HeroResponse,
};

use super::error::InfraError;

const HERO_ITEMS_PATH: &str = "items/hero";
const ASSETS_PATH: &str = "assets/";

#[derive(Clone, Debug)]
pub struct DirectusClient {
    client: Client,
    base: Url,
}

impl DirectusClient {
    pub fn new(settings: &CmsSettings) -> Result<Self, InfraError> {
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| InfraError::http_client(err.to_string()))?;

        Ok(Self {
            client,
            base: settings.api_url.clone(),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("partners-site/", env!("CARGO_PKG_VERSION"))
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn asset_url(&self, id: &str) -> String {
        asset_url(&self.base, id)
    }

    fn url(&self, path: &str) -> Result<Url, HeroSourceError> {
        self.base
            .join(path)
            .map_err(|err| HeroSourceError::Transport(format!("invalid URL `{path}`: {err}")))
    }
}

/// Public URL of a CMS file; `base` is expected to end in `/`.
pub fn asset_url(base: &Url, id: &str) -> String {
    format!("{base}{ASSETS_PATH}{id}")
}

#[async_trait]
impl HeroSource for DirectusClient {
    async fn fetch_hero(&self) -> Result<HeroResponse, HeroSourceError> {
        let url = self.url(HERO_ITEMS_PATH)?;
        debug!(target = "infra::cms", url = %url, "Requesting hero collection");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| HeroSourceError::Transport(err.to_string()))?;

        // Error envelopes arrive with 4xx/5xx statuses, so the body is decoded either way.
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| HeroSourceError::Transport(err.to_string()))?;

        serde_json::from_slice::<HeroResponse>(&body).map_err(|err| {
            HeroSourceError::Decode(format!(
                "unexpected response from content source (status {status}): {err}"
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{Json, Router, http::StatusCode, routing::get};
    use serde_json::json;

    use super::*;

    async fn spawn(router: Router) -> CmsSettings {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve");
        });

        CmsSettings {
            api_url: Url::parse(&format!("http://{addr}/")).expect("url"),
            request_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn asset_url_appends_id() {
        let base = Url::parse("https://cms.example.com/directus/").expect("url");
        assert_eq!(
            asset_url(&base, "abc-123"),
            "https://cms.example.com/directus/assets/abc-123"
        );
    }

    #[tokio::test]
    async fn decodes_hero_item() {
        let router = Router::new().route(
            "/items/hero",
            get(|| async {
                Json(json!({
                    "data": {
                        "title": "Welcome",
                        "cta_text": "Join",
                        "cta_link": "/join",
                        "background_image": { "id": "img-1", "filename_disk": "img-1.jpg" }
                    }
                }))
            }),
        );
        let client = DirectusClient::new(&spawn(router).await).expect("client");

        let hero = client
            .fetch_hero()
            .await
            .expect("fetch")
            .into_hero()
            .expect("hero")
            .expect("present");
        assert_eq!(hero.title, "Welcome");
        assert_eq!(hero.call_to_action(), Some(("Join", "/join")));
        assert_eq!(
            hero.background_image.map(|image| image.id).as_deref(),
            Some("img-1")
        );
    }

    #[tokio::test]
    async fn decodes_error_envelope_on_server_error() {
        let router = Router::new().route(
            "/items/hero",
            get(|| async {
                (
                    StatusCode::FORBIDDEN,
                    Json(json!({
                        "errors": [{
                            "message": "You don't have permission to access this.",
                            "extensions": { "code": "FORBIDDEN" }
                        }]
                    })),
                )
            }),
        );
        let client = DirectusClient::new(&spawn(router).await).expect("client");

        let response = client.fetch_hero().await.expect("fetch");
        let errors = response.errors.expect("errors");
        assert_eq!(errors[0].message, "You don't have permission to access this.");
        assert_eq!(
            errors[0].extensions.as_ref().map(|ext| ext.code.as_str()),
            Some("FORBIDDEN")
        );
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_error() {
        let router = Router::new().route(
            "/items/hero",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream unavailable") }),
        );
        let client = DirectusClient::new(&spawn(router).await).expect("client");

        match client.fetch_hero().await {
            Err(HeroSourceError::Decode(message)) => assert!(message.contains("502")),
            other => panic!("expected decode error, got {other:?}"),
        }
    }
}
