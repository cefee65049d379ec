//! Plant biography CLI
//!
//! Runs the REST API server, or acts as a local client against the same
//! database: sign in, manage accounts, browse plants and read the activity
//! log.
//!
//! ```sh
//! # Run the server with the default config (~/.config/plant-bio/config.toml)
//! plant-bio serve
//!
//! # Custom config path and port
//! plant-bio --config /etc/plant-bio/config.toml serve --port 9000
//!
//! # Validate config without starting
//! plant-bio serve --check
//!
//! # Local client
//! plant-bio login admin@kangan.edu.au admin123
//! plant-bio plants list --season "Buarth Gurru"
//! plant-bio logs stats
//! ```

mod client;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use plant_bio::config::AppConfig;
use plant_bio::server::{init_tracing, ServerHandle, ServerOptions};

use client::{Client, ClientCommand};

/// Plant biography service and client.
#[derive(Parser, Debug)]
#[command(
    name = "plant-bio",
    version,
    about = "QR-linked plant biographies for the horticulture program",
    long_about = "Plant biography service: REST API server and local client.\n\n\
                  Default config: ~/.config/plant-bio/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, global = true, env = "PLANT_BIO_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the REST API server.
    Serve(ServeArgs),
    #[command(flatten)]
    Client(ClientCommand),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Override the listen host.
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip seeding demo accounts and plants.
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .unwrap_or_else(plant_bio::default_config_path);

    let result = match cli.command {
        Command::Serve(args) => serve(config_path, args).await,
        Command::Client(command) => run_client(config_path, command).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn serve(config_path: PathBuf, args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    // ── Config validation mode ─────────────────────────────────
    if args.check {
        if let Some(e) = load_error {
            return Err(e.into());
        }
        println!("✅ Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.listen_address());
        println!("   Public URL  : {}", config.server.public_base_url);
        println!("   Database    : {}", config.database.url);
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    init_tracing(&config);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        seed: !args.no_seed,
    })
    .await?;
    handle.install_signal_handler();

    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}

async fn run_client(
    config_path: PathBuf,
    command: ClientCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load(&config_path)?;
    let mut client = Client::open(&config).await?;
    let output = client.run(command).await?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}
