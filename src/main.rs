//! HLS stream relay
//!
//! ```text
//!                 ┌────────────────────────────────────────────────┐
//!                 │                   HLS RELAY                    │
//!  Browser/player │  ┌──────────┐   ┌────────────┐                 │
//!  ───────────────┼─▶│  router  │──▶│   proxy    │─── GET ─────────┼──▶ private
//!                 │  │ (prefix) │   │  engine    │◀── body ────────┼─── origin
//!                 │  └────┬─────┘   └─────┬──────┘                 │
//!                 │       │ static        │ .m3u8: rewrite+buffer  │
//!                 │       ▼               │ other: stream chunks   │
//!                 │  ┌──────────┐         │                        │
//!  ◀──────────────┼──│ ServeDir │◀────────┘  + CORS / no-cache     │
//!                 │  └──────────┘                                  │
//!                 └────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use hls_relay::config::loader::{read_config, ConfigError};
use hls_relay::config::validation::validate_config;
use hls_relay::lifecycle::signals::shutdown_on_ctrl_c;
use hls_relay::lifecycle::startup::{announce, bind_listener, check_entry_document};
use hls_relay::observability::{logging, metrics};
use hls_relay::{HttpServer, RelayConfig, Shutdown};

#[derive(Parser, Debug)]
#[command(author, version, about = "Serve a player page and relay an HLS stream from a private origin", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listening port (overrides listener.bind_address port)
    #[arg(short, long)]
    port: Option<u16>,

    /// Stream origin as host:port
    #[arg(short, long)]
    origin: Option<String>,

    /// Static file root
    #[arg(short, long)]
    root: Option<PathBuf>,
}

impl Args {
    fn apply(&self, config: &mut RelayConfig) {
        if let Some(port) = self.port {
            // An unparsable address is left for validation to report
            if let Ok(mut addr) = config.listener.bind_address.parse::<SocketAddr>() {
                addr.set_port(port);
                config.listener.bind_address = addr.to_string();
            }
        }
        if let Some(origin) = &self.origin {
            config.upstream.origin = origin.clone();
        }
        if let Some(root) = &self.root {
            config.static_files.root = root.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => read_config(path)?,
        None => RelayConfig::default(),
    };
    args.apply(&mut config);

    logging::init_logging(&config.observability.log_level);

    if let Err(errors) = validate_config(&config) {
        let err = ConfigError::Validation(errors);
        tracing::error!(error = %err, "Invalid configuration");
        return Err(err.into());
    }

    tracing::info!("hls-relay v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    check_entry_document(&config.static_files);

    let listener = match bind_listener(&config.listener.bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start server");
            return Err(e.into());
        }
    };

    announce(listener.local_addr()?, &config).await;

    let shutdown = Shutdown::new();
    tokio::spawn(shutdown_on_ctrl_c(shutdown.clone()));

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
