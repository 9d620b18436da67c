//! Chatline TUI entry point.

use std::{fs::File, path::PathBuf, sync::Mutex, time::Duration};

use chatline_app::DEFAULT_SERVER_URL;
use chatline_client::TransportConfig;
use chatline_tui::{App, Runtime, TerminalDriver};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Chatline terminal chat client
#[derive(Parser, Debug)]
#[command(name = "chatline")]
#[command(about = "Terminal client for a Chatline relay server")]
#[command(version)]
struct Args {
    /// WebSocket URL of the relay server
    #[arg(short, long, default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Display name. When omitted, the client asks for one at startup
    #[arg(short, long)]
    name: Option<String>,

    /// Give up connecting after this many milliseconds
    #[arg(long, default_value = "10000")]
    connect_timeout_ms: u64,

    /// Write logs to this file (the terminal is busy with the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Install file logging if requested; otherwise logs are discarded.
fn init_logging(args: &Args) -> std::io::Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };

    let file = File::create(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(filter)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    let app = match args.name {
        Some(name) => App::with_display_name(args.server, name),
        None => App::new(args.server),
    };

    let transport = TransportConfig {
        connect_timeout: Duration::from_millis(args.connect_timeout_ms),
        ..TransportConfig::default()
    };
    let driver = TerminalDriver::new(transport)?;

    let app = Runtime::new(driver, app).run().await?;
    tracing::info!(messages = app.chat_log().bubble_count(), "chatline exiting");

    Ok(())
}
