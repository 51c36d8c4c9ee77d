use anyhow::Result;
use clap::{Arg, Command};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use stremio_ua::{ApiServer, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("Stremio UA")
        .version(env!("CARGO_PKG_VERSION"))
        .author("TigreRoll")
        .about("Stremio addon serving uakino.me and eneyida.tv")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file (TOML)")
        )
        .arg(
            Arg::new("host")
                .long("host")
                .value_name("HOST")
                .help("Interface to bind")
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Port to listen on")
                .value_parser(clap::value_parser!(u16))
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue)
        )
        .get_matches();

    // Load configuration
    let config_result = match matches.get_one::<String>("config") {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    };
    let mut config = config_result.unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {}", e);
        Config::default()
    });

    if let Some(host) = matches.get_one::<String>("host") {
        config.server.host = host.clone();
    }
    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }
    let verbose = matches.get_flag("verbose");

    // Initialize logging
    let default_filter = if verbose {
        "stremio_ua=debug,tower_http=debug,info".to_string()
    } else {
        config.logging.level.clone()
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    if verbose {
        info!("Verbose logging enabled");
    }

    if let Err(e) = config.validate() {
        warn!("Invalid configuration: {}", e);
        return Err(e);
    }

    info!("🚀 Stremio UA starting...");
    info!("{}", config.summary());

    ApiServer::new(config)?.start().await
}
