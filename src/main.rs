use std::{process, sync::Arc};

use askama::Template;
use partners_site::{
    application::{
        error::AppError,
        hero::HeroService,
        keys::generate_secret_pair,
        render::{
            RenderOptions, TracingSink, block_renderer, configure_block_renderer, read_source,
            render_source,
        },
    },
    config::{self, RenderArgs},
    infra::{
        cms::DirectusClient,
        http::{self, HttpState},
        telemetry,
    },
    presentation::views::{HeroSectionTemplate, HeroView, SiteView},
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    if matches!(command, config::Command::Keys) {
        print!("{}", generate_secret_pair().to_env());
        return Ok(());
    }

    telemetry::init(&settings.logging)?;
    configure_block_renderer(RenderOptions::from(&settings.render))
        .map_err(|err| AppError::unexpected(err.to_string()))?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Render(args) => run_render(args).await,
        config::Command::Hero(_) => run_hero(settings).await,
        config::Command::Keys => Ok(()),
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let client = DirectusClient::new(&settings.cms)?;
    let assets_base = client.base_url().clone();
    let hero = HeroService::new(Arc::new(client), block_renderer());

    info!(
        target = "partners_site::serve",
        addr = %settings.server.addr,
        cms = %assets_base,
        "Starting partners site"
    );

    let state = HttpState {
        hero: Arc::new(hero),
        site: SiteView::from(&settings.site),
        assets_base,
    };
    let router = http::build_router(state);

    http::serve(settings.server.addr, router).await?;
    Ok(())
}

async fn run_render(args: RenderArgs) -> Result<(), AppError> {
    let raw = read_source(&args.file).await?;
    let output = render_source(&raw, args.format, &block_renderer(), &mut TracingSink)?;
    println!("{output}");
    Ok(())
}

async fn run_hero(settings: config::Settings) -> Result<(), AppError> {
    let client = DirectusClient::new(&settings.cms)?;
    let assets_base = client.base_url().clone();
    let service = HeroService::new(Arc::new(client), block_renderer());

    let state = service.load().await;
    let hero = HeroView::from_state(
        state,
        |content| service.render_subtitle(content),
        |id| partners_site::infra::cms::asset_url(&assets_base, id),
    );

    let html = HeroSectionTemplate { hero }
        .render()
        .map_err(|err| AppError::unexpected(format!("render hero section: {err}")))?;
    println!("{}", html.trim());
    Ok(())
}
