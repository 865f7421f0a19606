use clap::{Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use places_gateway::common::Provider;
use places_gateway::config::Config;
use places_gateway::hours::{normalize_hours, normalize_untagged};
use places_gateway::logging;
use places_gateway::observability;
use places_gateway::server::{self, AppState};

#[derive(Parser)]
#[command(name = "places_gateway")]
#[command(about = "Google Places / Yelp Fusion gateway with canonical opening hours")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP gateway
    Serve {
        /// Address to bind, overrides BIND_ADDR and the config file
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Normalize an hours payload from a JSON file and print the schedule
    Hours {
        /// Provider the payload came from; `auto` infers it from the shape
        #[arg(long, value_enum, default_value_t = HoursProvider::Auto)]
        provider: HoursProvider,
        /// Path to the JSON payload
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum HoursProvider {
    Google,
    Yelp,
    Auto,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind } => {
            let config = Config::load()?;
            observability::init_metrics(config.metrics_addr()?);

            let addr = match bind {
                Some(addr) => addr,
                None => config.bind_addr()?,
            };
            let state = Arc::new(AppState::from_config(&config)?);
            server::start_server(state, addr).await?;
        }
        Commands::Hours { provider, file } => {
            let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&file)?)?;
            let hours = match provider {
                HoursProvider::Google => normalize_hours(Provider::Google, &raw),
                HoursProvider::Yelp => normalize_hours(Provider::Yelp, &raw),
                HoursProvider::Auto => normalize_untagged(&raw),
            };
            info!(file = %file.display(), unavailable = hours.is_unavailable(), "normalized hours");
            println!("{}", serde_json::to_string_pretty(&hours)?);
        }
    }

    Ok(())
}
