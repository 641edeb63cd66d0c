use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::{info, warn};
use url::Url;

use crate::{
    application::hero::HeroService,
    infra::{cms::asset_url, error::InfraError},
    presentation::views::{HeroView, SiteView, render_home_response, render_not_found_response},
};

use super::middleware::{log_responses, set_request_context};

#[derive(Clone)]
pub struct HttpState {
    pub hero: Arc<HeroService>,
    pub site: SiteView,
    /// CMS base URL used to link hero assets.
    pub assets_base: Url,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/_health", get(health))
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, router: Router) -> Result<(), InfraError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        target = "partners_site::http",
        addr = %listener.local_addr()?,
        "Listening for HTTP requests"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(target = "partners_site::http", "HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(
            target = "partners_site::http",
            error = %err,
            "Failed to listen for shutdown signal"
        );
        std::future::pending::<()>().await;
    }
    info!(target = "partners_site::http", "Shutdown signal received");
}

async fn home(State(state): State<HttpState>) -> Response {
    let hero_state = state.hero.load().await;
    let hero = HeroView::from_state(
        hero_state,
        |content| state.hero.render_subtitle(content),
        |id| asset_url(&state.assets_base, id),
    );

    render_home_response(state.site.clone(), hero)
}

async fn health() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

async fn not_found(State(state): State<HttpState>) -> Response {
    render_not_found_response(state.site.clone())
}
