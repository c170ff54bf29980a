mod onboard_commands;

use {
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "voira", about = "Voira: voice-agent onboarding gateway")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Address to bind to (overrides config value).
    #[arg(long, global = true)]
    bind: Option<String>,
    /// Port to listen on (overrides config value).
    #[arg(long, global = true)]
    port: Option<u16>,
    /// Custom config directory (overrides default ~/.config/voira/).
    #[arg(long, global = true, env = "VOIRA_CONFIG_DIR")]
    config_dir: Option<std::path::PathBuf>,
    /// Custom data directory (overrides default data dir).
    #[arg(long, global = true, env = "VOIRA_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gateway server (default when no subcommand is provided).
    Gateway,
    /// Run the onboarding wizard in the terminal, resuming saved progress.
    Onboard,
    /// Show the saved onboarding progress.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Discard the saved onboarding progress.
    Reset,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "voira starting");

    // Apply directory overrides before loading config
    if let Some(ref dir) = cli.config_dir {
        voira_config::set_config_dir(dir.clone());
    }
    if let Some(ref dir) = cli.data_dir {
        voira_config::set_data_dir(dir.clone());
    }
    let config = voira_config::discover_and_load();

    match cli.command {
        // Default: start gateway when no subcommand is provided
        None | Some(Commands::Gateway) => {
            let bind = cli.bind.unwrap_or_else(|| config.server.bind.clone());
            let port = cli.port.unwrap_or(config.server.port);
            voira_gateway::server::start_gateway(&bind, port, &config).await
        },
        Some(Commands::Onboard) => onboard_commands::handle_onboard(&config).await,
        Some(Commands::Status { json }) => onboard_commands::handle_status(&config, json).await,
        Some(Commands::Reset) => onboard_commands::handle_reset(&config).await,
    }
}
