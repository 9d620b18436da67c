//! Chatline relay server binary.
//!
//! # Usage
//!
//! ```bash
//! chatline-server --bind 0.0.0.0:8000
//! ```

use chatline_server::{Server, ServerRuntimeConfig};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Chatline relay server
#[derive(Parser, Debug)]
#[command(name = "chatline-server")]
#[command(about = "Relays chat lines between WebSocket clients")]
#[command(version)]
struct Args {
    /// Address to bind to
    #[arg(short, long, default_value = "0.0.0.0:8000")]
    bind: String,

    /// Frames queued for a client that is not reading before it is dropped
    #[arg(long, default_value = "256")]
    send_queue: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let config =
        ServerRuntimeConfig { bind_address: args.bind, send_queue_capacity: args.send_queue };
    let server = Server::bind(config).await?;

    tracing::info!("Server listening on {}", server.local_addr()?);

    server.run().await?;

    Ok(())
}
