//! Shiftboard REST API server binary

use clap::Parser;
use shiftboard_rest_server::{Server, ServerConfig};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bind address for the server
    #[arg(short, long, default_value = "127.0.0.1:3001")]
    bind: SocketAddr,

    /// Database path (SQLite)
    #[arg(short, long, default_value = ":memory:")]
    database: String,

    /// Enable CORS for development
    #[arg(long)]
    cors: bool,

    /// PBKDF2 iteration count for password credentials.
    ///
    /// Must match the count used when existing credentials were stored.
    #[arg(long)]
    kdf_iterations: Option<u32>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting Shiftboard REST API server");

    // Create server configuration
    let mut config = ServerConfig {
        bind_addr: args.bind,
        database_path: args.database,
        enable_cors: args.cors,
        ..Default::default()
    };
    if let Some(iterations) = args.kdf_iterations {
        config.kdf.iterations = iterations;
    }

    // Create and start server
    let server = Server::new(config).await?;
    server.run().await?;

    Ok(())
}
