//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;

use std::{net::SocketAddr, num::NonZeroUsize, path::Path, str::FromStr, time::Duration};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::application::render::RenderOptions;

pub use cli::{
    CliArgs, CmsOverrides, Command, HeroArgs, LoggingOverrides, OutputFormat, RenderArgs,
    RenderOverrides, ServeArgs, ServeOverrides,
};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "partners-site";
const ENV_PREFIX: &str = "PARTNERS";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CMS_API_URL: &str = "http://localhost:8055";
const DEFAULT_CMS_TIMEOUT_SECS: u64 = 10;
const DEFAULT_RENDER_MAX_DEPTH: u64 = 32;
const DEFAULT_RENDER_MAX_HEADING_LEVEL: u8 = 6;
const DEFAULT_SITE_TITLE: &str = "My Blog Site";
const DEFAULT_SITE_DESCRIPTION: &str = "A personal blog built with partners-site";

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub cms: CmsSettings,
    pub render: RenderSettings,
    pub site: SiteSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct CmsSettings {
    /// Base URL, always ending in `/` so relative joins keep any path prefix.
    pub api_url: Url,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub max_depth: NonZeroUsize,
    pub max_heading_level: u8,
}

#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub title: String,
    pub description: String,
}

impl From<&RenderSettings> for RenderOptions {
    fn from(settings: &RenderSettings) -> Self {
        Self {
            max_depth: settings.max_depth.get(),
            max_heading_level: settings.max_heading_level,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut raw = load_raw(cli.config_file.as_deref())?;

    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_serve_overrides(&args.overrides),
        Some(Command::Render(args)) => {
            raw.apply_logging_overrides(&args.logging);
            raw.apply_render_overrides(&args.render);
        }
        Some(Command::Hero(args)) => {
            raw.apply_logging_overrides(&args.logging);
            raw.apply_render_overrides(&args.render);
            raw.apply_cms_overrides(&args.cms);
        }
        Some(Command::Keys) => {}
        None => raw.apply_serve_overrides(&ServeOverrides::default()),
    }

    Settings::from_raw(raw)
}

fn load_raw(config_file: Option<&Path>) -> Result<RawSettings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = config_file {
        builder = builder.add_source(File::from(path).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    Ok(builder.build()?.try_deserialize()?)
}

/// Resolve configuration using the process arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    cms: RawCmsSettings,
    render: RawRenderSettings,
    site: RawSiteSettings,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.server_port {
            self.server.port = Some(port);
        }

        self.apply_logging_overrides(&overrides.logging);
        self.apply_render_overrides(&overrides.render);
        self.apply_cms_overrides(&overrides.cms);
    }

    fn apply_logging_overrides(&mut self, overrides: &LoggingOverrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }

    fn apply_render_overrides(&mut self, overrides: &RenderOverrides) {
        if let Some(depth) = overrides.max_depth {
            self.render.max_depth = Some(depth);
        }
        if let Some(level) = overrides.max_heading_level {
            self.render.max_heading_level = Some(level);
        }
    }

    fn apply_cms_overrides(&mut self, overrides: &CmsOverrides) {
        if let Some(url) = overrides.api_url.as_ref() {
            self.cms.api_url = Some(url.clone());
        }
        if let Some(seconds) = overrides.request_timeout_seconds {
            self.cms.request_timeout_seconds = Some(seconds);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            cms,
            render,
            site,
        } = raw;

        let server = build_server_settings(server)?;
        let logging = build_logging_settings(logging)?;
        let cms = build_cms_settings(cms)?;
        let render = build_render_settings(render)?;
        let site = build_site_settings(site);

        Ok(Self {
            server,
            logging,
            cms,
            render,
            site,
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());

    let port = server.port.unwrap_or(DEFAULT_PORT);
    if port == 0 {
        return Err(LoadError::invalid(
            "server.port",
            "port must be greater than zero",
        ));
    }

    let addr = parse_socket_addr(&host, port)
        .map_err(|reason| LoadError::invalid("server.addr", reason))?;

    Ok(ServerSettings { addr })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_cms_settings(cms: RawCmsSettings) -> Result<CmsSettings, LoadError> {
    let raw_url = cms
        .api_url
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_CMS_API_URL.to_string());

    let mut api_url = Url::parse(&raw_url)
        .map_err(|err| LoadError::invalid("cms.api_url", format!("invalid URL: {err}")))?;
    if !matches!(api_url.scheme(), "http" | "https") {
        return Err(LoadError::invalid(
            "cms.api_url",
            format!("unsupported scheme `{}`", api_url.scheme()),
        ));
    }
    if !api_url.path().ends_with('/') {
        let path = format!("{}/", api_url.path());
        api_url.set_path(&path);
    }

    let timeout_secs = cms
        .request_timeout_seconds
        .unwrap_or(DEFAULT_CMS_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(LoadError::invalid(
            "cms.request_timeout_seconds",
            "must be greater than zero",
        ));
    }

    Ok(CmsSettings {
        api_url,
        request_timeout: Duration::from_secs(timeout_secs),
    })
}

fn build_render_settings(render: RawRenderSettings) -> Result<RenderSettings, LoadError> {
    let depth_value = render.max_depth.unwrap_or(DEFAULT_RENDER_MAX_DEPTH);
    let depth = usize::try_from(depth_value).map_err(|_| {
        LoadError::invalid(
            "render.max_depth",
            "value exceeds supported range for usize",
        )
    })?;
    let max_depth = NonZeroUsize::new(depth)
        .ok_or_else(|| LoadError::invalid("render.max_depth", "must be greater than zero"))?;

    let max_heading_level = render
        .max_heading_level
        .unwrap_or(DEFAULT_RENDER_MAX_HEADING_LEVEL);
    if !(1..=6).contains(&max_heading_level) {
        return Err(LoadError::invalid(
            "render.max_heading_level",
            "must be between 1 and 6",
        ));
    }

    Ok(RenderSettings {
        max_depth,
        max_heading_level,
    })
}

fn build_site_settings(site: RawSiteSettings) -> SiteSettings {
    let non_empty = |value: Option<String>| {
        value
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    SiteSettings {
        title: non_empty(site.title).unwrap_or_else(|| DEFAULT_SITE_TITLE.to_string()),
        description: non_empty(site.description)
            .unwrap_or_else(|| DEFAULT_SITE_DESCRIPTION.to_string()),
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCmsSettings {
    api_url: Option<String>,
    request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRenderSettings {
    max_depth: Option<u64>,
    max_heading_level: Option<u8>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSiteSettings {
    title: Option<String>,
    description: Option<String>,
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    let candidate = format!("{host}:{port}");
    candidate
        .parse()
        .map_err(|err| format!("invalid address `{candidate}`: {err}"))
}
