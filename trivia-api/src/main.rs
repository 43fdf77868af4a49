use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{info, warn};

use app_core::{logging, Database, ServiceConfig};
use trivia_api::storage::{SqliteTriviaStore, TriviaStore};
use trivia_api::{seed, server, AppState};

const SERVICE: &str = "trivia-api";
const DEFAULT_PORT: u16 = 5000;

#[derive(Parser)]
#[command(name = "trivia-api")]
#[command(about = "Trivia questions and quiz API")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Port to listen on (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Load the standard categories and questions into an empty database
    Seed,
}

fn open_store(config: &ServiceConfig) -> anyhow::Result<Arc<SqliteTriviaStore>> {
    let db = Arc::new(Database::open(&config.database)?);
    Ok(Arc::new(SqliteTriviaStore::new(db)?))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ServiceConfig::load(SERVICE, DEFAULT_PORT)?;
    let _guard = logging::init_logging(SERVICE, &config)?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }

            let store: Arc<dyn TriviaStore> = open_store(&config)?;
            let mut state = AppState::new(store);
            match app_core::metrics::install_recorder() {
                Ok(handle) => state = state.with_metrics(handle),
                Err(e) => warn!("Metrics disabled: {}", e),
            }

            info!("Starting trivia API with database {}", config.database);
            server::start_server(state, &config.bind_addr()).await?;
        }
        Commands::Seed => {
            let store = open_store(&config)?;
            let inserted = seed::seed(store.as_ref()).await?;
            info!("Seed complete: {} questions inserted", inserted);
        }
    }

    Ok(())
}
