use clap::{Parser, Subcommand};
use hyla_monitor::config::{apply_overrides, load_config};
use hyla_monitor::watch::{WatchOptions, run_watch};
use shared::DashboardConfig;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "hyla-monitor")]
#[command(about = "Headless runner for the Hyla fleet dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dashboard against a live API and print timeline events
    Watch {
        /// Dashboard configuration file (TOML)
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Overrides `api.base_url` from the configuration
        #[arg(long, env = "HYLA_API_BASE_URL")]
        api_base_url: Option<String>,

        /// Vessel to select once the fleet is loaded
        #[arg(long)]
        vessel: Option<String>,

        /// Seconds to watch before tearing down
        #[arg(long, default_value = "60")]
        duration: u64,
    },
    /// Print the default configuration
    DefaultConfig,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Watch {
            config,
            api_base_url,
            vessel,
            duration,
        } => {
            let config = match load_config(config.as_deref()) {
                Ok(config) => apply_overrides(config, api_base_url),
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    std::process::exit(2);
                }
            };
            let options = WatchOptions {
                config,
                vessel,
                duration: Duration::from_secs(duration),
            };

            match run_watch(options).await {
                Ok(_) => std::process::exit(0),
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    std::process::exit(2);
                }
            }
        }
        Commands::DefaultConfig => match DashboardConfig::default().to_toml_string() {
            Ok(toml) => print!("{toml}"),
            Err(e) => {
                eprintln!("Error: {:#}", e);
                std::process::exit(2);
            }
        },
    }
}
