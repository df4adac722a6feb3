use clap::Parser;
use loudviz_sensor::synth::Synth;
use loudviz_sensor::{start_server, SensorState};

#[derive(Parser)]
#[command(
    name = "loudviz-sensor",
    about = "Serves synthetic audio frames in the sensor's /data format",
    version
)]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Samples per frame
    #[arg(long, default_value_t = 256)]
    frame_len: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter.as_str())
        .init();

    let addr = format!("{}:{}", cli.bind, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("frame length {}", cli.frame_len);

    start_server(listener, SensorState::new(Synth::new(cli.frame_len))).await?;
    Ok(())
}
