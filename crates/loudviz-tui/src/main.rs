mod action;
mod app;
mod component;
mod components;
mod raster;
mod theme;
mod widgets;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use loudviz_core::config::Config;
use loudviz_core::engine::Mode;
use loudviz_core::platform;
use loudviz_core::transport::HttpSampleSource;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliMode {
    Spectrum,
    Vu,
}

impl From<CliMode> for Mode {
    fn from(m: CliMode) -> Self {
        match m {
            CliMode::Spectrum => Mode::Spectrum,
            CliMode::Vu => Mode::Vu,
        }
    }
}

#[derive(Parser)]
#[command(name = "loudviz", about = "Terminal loudness visualizer for a networked audio sensor", version)]
struct Cli {
    /// Sensor host or base URL (overrides the config file)
    #[arg(long)]
    host: Option<String>,

    /// Mode to start in
    #[arg(long, value_enum)]
    mode: Option<CliMode>,

    /// Connect to the sensor on startup
    #[arg(long)]
    connect: bool,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = platform::log_path();

    // ── Load config ──────────────────────────────────────────────────────────
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let (mut config, config_err) = match Config::load_from(&config_path) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // RUST_LOG wins; otherwise the config's filter, which by default keeps
    // HTTP client internals (hyper_util, reqwest) at warn.
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| config.log.filter.clone());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("loudviz log: {}", log_path.display());

    tracing::info!("loudviz starting…");
    if let Some(e) = &config_err {
        tracing::warn!("{}; running with defaults", e);
    }

    // ── CLI overrides ────────────────────────────────────────────────────────
    if let Some(host) = cli.host {
        config.sensor.host = host;
    }
    if let Some(mode) = cli.mode {
        config.display.initial_mode = mode.into();
    }
    if cli.connect {
        config.sensor.auto_connect = true;
    }

    let source = HttpSampleSource::from_config(&config.sensor)?;
    let url = source.url().to_string();
    tracing::info!("sensor endpoint: {}", url);

    // A file that failed to parse is left alone rather than overwritten.
    let save_path = config_err.is_none().then_some(config_path);

    let app = app::App::new(config, source, url, save_path);
    app.run().await?;

    Ok(())
}
