// Framework bootstrap for the arena runtime.

use crate::domain::errors::ConfigError;
use crate::domain::ports::{AssetCatalog, InputSource, Presenter};
use crate::frameworks::config;
use crate::interface_adapters::assets::{DirectoryAssets, NamedAssets};
use crate::interface_adapters::input::ScriptedInput;
use crate::interface_adapters::presenter::JsonLinesPresenter;
use crate::use_cases::{ArenaSettings, build_arena, game};
use std::sync::Arc;
use tokio::sync::Notify;

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // Frames go to stdout, so logs stay on stderr.
    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Builds the arena and plays it until quit or shutdown. Returns ticks run.
pub async fn run<A, I, P>(
    settings: &ArenaSettings,
    assets: &A,
    input: &mut I,
    presenter: &mut P,
    shutdown: Arc<Notify>,
) -> Result<u64, ConfigError>
where
    A: AssetCatalog,
    I: InputSource,
    P: Presenter,
{
    let mut sim = build_arena(settings, assets)?;
    let ticks = game::run(
        &mut sim,
        input,
        presenter,
        settings.tick_interval(),
        shutdown,
    )
    .await;

    if let Some(side) = sim.winner() {
        tracing::info!(?side, ticks, "match decided");
    }
    Ok(ticks)
}

pub async fn run_with_config() -> Result<u64, ConfigError> {
    init_runtime();

    let settings = config::arena_settings()?;
    let mut input = match config::input_script() {
        Some(path) => ScriptedInput::from_path(&path)?,
        None => ScriptedInput::demo(),
    };
    let mut presenter = JsonLinesPresenter::new(std::io::stdout().lock());

    let shutdown = Arc::new(Notify::new());
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.notify_one();
        }
    });

    tracing::debug!(
        fps = settings.fps,
        width = settings.width,
        height = settings.height,
        "arena configured"
    );

    match config::assets_dir() {
        Some(dir) => {
            tracing::debug!(assets_dir = %dir.display(), "resolving assets from disk");
            let assets = DirectoryAssets::new(dir);
            run(&settings, &assets, &mut input, &mut presenter, shutdown).await
        }
        None => run(&settings, &NamedAssets, &mut input, &mut presenter, shutdown).await,
    }
}
