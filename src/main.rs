use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{info, warn};

use app_core::{logging, Database, ServiceConfig};
use fyyur::storage::{ListingStore, SqliteListingStore};
use fyyur::{seed, server, AppState};

const SERVICE: &str = "fyyur";
const DEFAULT_PORT: u16 = 3000;

#[derive(Parser)]
#[command(name = "fyyur")]
#[command(about = "Venue, artist and show listings website")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the website
    Serve {
        /// Port to listen on (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Load demo venues, artists and shows into an empty database
    Seed,
}

fn open_store(config: &ServiceConfig) -> anyhow::Result<Arc<SqliteListingStore>> {
    let db = Arc::new(Database::open(&config.database)?);
    Ok(Arc::new(SqliteListingStore::new(db)?))
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

            let store: Arc<dyn ListingStore> = open_store(&config)?;
            let mut state = AppState::new(store);
            match app_core::metrics::install_recorder() {
                Ok(handle) => state = state.with_metrics(handle),
                Err(e) => warn!("Metrics disabled: {}", e),
            }

            info!("Starting Fyyur with database {}", config.database);
            server::start_server(state, &config.bind_addr()).await?;
        }
        Commands::Seed => {
            let store = open_store(&config)?;
            let shows = seed::seed(store.as_ref()).await?;
            info!("Seed complete: {} shows inserted", shows);
        }
    }

    Ok(())
}
