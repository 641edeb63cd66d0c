use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the partners-site binary.
#[derive(Debug, Parser)]
#[command(
    name = "partners-site",
    version,
    about = "Marketing site front-end backed by a headless CMS"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "PARTNERS_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the HTTP site.
    Serve(Box<ServeArgs>),
    /// Render a content document from a JSON file.
    Render(RenderArgs),
    /// Fetch the hero block from the CMS and print the rendered section.
    Hero(HeroArgs),
    /// Print a fresh KEY/SECRET pair for the CMS environment.
    Keys,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct LoggingOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct RenderOverrides {
    /// Override the maximum block nesting depth.
    #[arg(long = "render-max-depth", value_name = "DEPTH")]
    pub max_depth: Option<u64>,

    /// Override the highest heading level emitted (1-6).
    #[arg(long = "render-max-heading-level", value_name = "LEVEL")]
    pub max_heading_level: Option<u8>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct CmsOverrides {
    /// Override the CMS base URL.
    #[arg(long = "cms-api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// Override the CMS request timeout.
    #[arg(long = "cms-request-timeout-seconds", value_name = "SECONDS")]
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    #[command(flatten)]
    pub logging: LoggingOverrides,

    #[command(flatten)]
    pub render: RenderOverrides,

    #[command(flatten)]
    pub cms: CmsOverrides,

    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Html,
    Json,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub logging: LoggingOverrides,

    #[command(flatten)]
    pub render: RenderOverrides,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,

    /// JSON document to render; `-` reads standard input.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: PathBuf,
}

#[derive(Debug, Args, Default, Clone)]
pub struct HeroArgs {
    #[command(flatten)]
    pub logging: LoggingOverrides,

    #[command(flatten)]
    pub render: RenderOverrides,

    #[command(flatten)]
    pub cms: CmsOverrides,
}
