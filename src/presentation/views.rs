use crate::{
    application::{
        error::{ErrorReport, HttpError},
        hero::HeroState,
    },
    config::SiteSettings,
    domain::hero::HeroContent,
};
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Home page; falls back to the error page when the template cannot render.
pub fn render_home_response(site: SiteView, hero: HeroView) -> Response {
    let template = HomeTemplate {
        site: site.clone(),
        hero,
    };

    match render_template(template) {
        Ok(html) => (StatusCode::OK, html).into_response(),
        Err(err) => {
            let mut response = render_error_response(
                site,
                StatusCode::INTERNAL_SERVER_ERROR,
                err.public_message(),
            );
            err.into_report().attach(&mut response);
            response
        }
    }
}

pub fn render_not_found_response(site: SiteView) -> Response {
    let error = ErrorPageView::not_found();
    let mut response =
        render_template_response(ErrorTemplate { site, error }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

pub fn render_error_response(site: SiteView, status: StatusCode, message: &str) -> Response {
    let error = ErrorPageView::unexpected(message);
    render_template_response(ErrorTemplate { site, error }, status)
}

#[derive(Clone, Debug)]
pub struct SiteView {
    pub title: String,
    pub description: String,
}

impl From<&SiteSettings> for SiteView {
    fn from(settings: &SiteSettings) -> Self {
        Self {
            title: settings.title.clone(),
            description: settings.description.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum HeroView {
    Failed(String),
    Empty,
    Ready(ReadyHeroView),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReadyHeroView {
    pub title: String,
    /// Pre-rendered block content, inserted unescaped.
    pub subtitle_html: Option<String>,
    pub background_url: Option<String>,
    pub cta: Option<CtaView>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CtaView {
    pub text: String,
    pub href: String,
}

impl HeroView {
    /// Build the view for a settled hero state.
    ///
    /// `subtitle` renders the rich-text subtitle and `asset_url` maps a CMS
    /// file id to its public URL.
    pub fn from_state(
        state: HeroState,
        subtitle: impl FnOnce(&HeroContent) -> Option<String>,
        asset_url: impl FnOnce(&str) -> String,
    ) -> Self {
        match state {
            HeroState::Failed { message } => Self::Failed(message),
            HeroState::Empty => Self::Empty,
            HeroState::Ready(hero) => {
                let subtitle_html = subtitle(&hero);
                let background_url = hero
                    .background_image
                    .as_ref()
                    .map(|image| asset_url(&image.id));
                let cta = hero.call_to_action().map(|(text, href)| CtaView {
                    text: text.to_string(),
                    href: href.to_string(),
                });

                Self::Ready(ReadyHeroView {
                    title: hero.title,
                    subtitle_html,
                    background_url,
                    cta,
                })
            }
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn ready(&self) -> Option<&ReadyHeroView> {
        match self {
            Self::Ready(hero) => Some(hero),
            _ => None,
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub site: SiteView,
    pub hero: HeroView,
}

/// Hero markup on its own, for terminal output.
#[derive(Template)]
#[template(path = "partials/hero_section.html")]
pub struct HeroSectionTemplate {
    pub hero: HeroView,
}

pub struct ErrorAction {
    pub href: String,
    pub label: String,
}

impl ErrorAction {
    pub fn home() -> Self {
        Self {
            href: "/".to_string(),
            label: "Return Home".to_string(),
        }
    }
}

pub struct ErrorPageView {
    pub title: String,
    pub message: String,
    pub primary_action: Option<ErrorAction>,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            title: "Page Not Found".to_string(),
            message: "The page you are looking for does not exist.".to_string(),
            primary_action: Some(ErrorAction::home()),
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self {
            title: "Something went wrong".to_string(),
            message: message.into(),
            primary_action: Some(ErrorAction::home()),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub site: SiteView,
    pub error: ErrorPageView,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hero::BackgroundImage;

    fn site() -> SiteView {
        SiteView {
            title: "My Blog Site".into(),
            description: "A personal blog".into(),
        }
    }

    fn render_hero(hero: HeroView) -> String {
        HeroSectionTemplate { hero }.render().expect("render hero")
    }

    #[test]
    fn failed_state_shows_message_escaped() {
        let html = render_hero(HeroView::Failed("<boom>".into()));
        assert!(html.contains("Error loading hero content"));
        assert!(html.contains("&lt;boom&gt;"));
        assert!(!html.contains("No hero content available"));
    }

    #[test]
    fn empty_state_shows_notice() {
        assert!(render_hero(HeroView::Empty).contains("No hero content available"));
    }

    #[test]
    fn ready_view_maps_background_and_cta() {
        let mut hero = HeroContent::new("Welcome");
        hero.cta_text = Some("Get started".into());
        hero.cta_link = Some("/start".into());
        hero.background_image = Some(BackgroundImage {
            id: "img-1".into(),
            filename_disk: None,
        });

        let view = HeroView::from_state(
            HeroState::Ready(hero),
            |_| Some("<p>Sub</p>".into()),
            |id| format!("https://cms.example.com/assets/{id}"),
        );

        let ready = view.ready().expect("ready view");
        assert_eq!(
            ready.background_url.as_deref(),
            Some("https://cms.example.com/assets/img-1")
        );
        assert_eq!(
            ready.cta,
            Some(CtaView {
                text: "Get started".into(),
                href: "/start".into()
            })
        );

        let html = render_hero(view);
        assert!(html.contains("<h1 class=\"hero__title\">Welcome</h1>"));
        assert!(html.contains("<div class=\"hero__subtitle\"><p>Sub</p></div>"));
        assert!(html.contains("class=\"hero__cta\""));
        assert!(html.contains("Get started"));
        assert!(html.contains("Hero background"));
    }

    #[test]
    fn ready_view_without_cta_link_hides_button() {
        let mut hero = HeroContent::new("Welcome");
        hero.cta_text = Some("Get started".into());

        let view = HeroView::from_state(HeroState::Ready(hero), |_| None, |id| id.into());
        let html = render_hero(view);
        assert!(!html.contains("hero__cta"));
        assert!(!html.contains("hero__subtitle"));
        assert!(!html.contains("hero__background"));
    }

    #[test]
    fn home_page_includes_site_title_and_latest_posts() {
        let html = HomeTemplate {
            site: site(),
            hero: HeroView::Empty,
        }
        .render()
        .expect("render home");

        assert!(html.contains("<title>My Blog Site</title>"));
        assert!(html.contains("Latest Posts"));
        assert!(html.contains("No hero content available"));
    }

    #[test]
    fn not_found_page_links_home() {
        let html = ErrorTemplate {
            site: site(),
            error: ErrorPageView::not_found(),
        }
        .render()
        .expect("render not found");

        assert!(html.contains("Page Not Found"));
        assert!(html.contains("class=\"error-page__action\""));
        assert!(html.contains("Return Home</a>"));
    }

    #[test]
    fn not_found_response_attaches_report() {
        let response = render_not_found_response(site());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.extensions().get::<ErrorReport>().is_some());
    }

    #[test]
    fn error_page_shows_public_message() {
        let response = render_error_response(
            site(),
            StatusCode::INTERNAL_SERVER_ERROR,
            "Template rendering failed",
        );
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let html = ErrorTemplate {
            site: site(),
            error: ErrorPageView::unexpected("Template rendering failed"),
        }
        .render()
        .expect("render error page");
        assert!(html.contains("Something went wrong"));
        assert!(html.contains("Template rendering failed"));
    }
}
