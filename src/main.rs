use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use wallet_popup::commands::{self, NetworkArgs};
use wallet_popup::config::Config;
use wallet_popup::models::settings::AppSettings;
use wallet_popup::models::network::TransportType;

#[derive(Parser, Debug)]
#[command(
    name = "wallet-popup",
    version,
    about = "Manage the networks a multi-network wallet connects to",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Optional: Path to the JSON file holding configured networks.
    /// Defaults to the settings file value or $WALLET_POPUP_REGISTRY.
    #[arg(long, global = true)]
    registry: Option<PathBuf>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum CliTransport {
    Jrpc,
    Proto,
    Graphql,
}

impl From<CliTransport> for TransportType {
    fn from(value: CliTransport) -> Self {
        match value {
            CliTransport::Jrpc => TransportType::Jrpc,
            CliTransport::Proto => TransportType::Proto,
            CliTransport::Graphql => TransportType::Graphql,
        }
    }
}

#[derive(Args, Debug)]
struct NetworkFields {
    /// Transport type
    #[arg(long = "type", value_enum)]
    transport: Option<CliTransport>,
    /// Display name
    #[arg(long)]
    name: Option<String>,
    /// Endpoint URL. Repeat for multi-endpoint (graphql) networks.
    #[arg(long = "endpoint")]
    endpoints: Vec<String>,
    /// Only use local endpoints (graphql only)
    #[arg(long)]
    local: bool,
    /// Native token symbol
    #[arg(long)]
    symbol: Option<String>,
    /// Block explorer base URL
    #[arg(long)]
    explorer: Option<String>,
    /// Token manifest URL
    #[arg(long)]
    manifest: Option<String>,
    /// Switch to the network after saving it
    #[arg(long)]
    switch: bool,
}

impl NetworkFields {
    fn into_args(self) -> (NetworkArgs, bool) {
        let args = NetworkArgs {
            transport: self.transport.map(TransportType::from),
            name: self.name,
            endpoints: self.endpoints,
            local: self.local,
            symbol: self.symbol,
            explorer: self.explorer,
            manifest: self.manifest,
        };
        (args, self.switch)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List configured networks
    List,
    /// Add a custom network
    Add(NetworkFields),
    /// Edit an existing network
    Edit {
        /// Network id
        id: u32,
        #[command(flatten)]
        fields: NetworkFields,
    },
    /// Delete a custom network
    Delete {
        /// Network id
        id: u32,
        /// Restore it right away (gets a new id)
        #[arg(long)]
        undo: bool,
    },
    /// Reset a built-in network to its defaults, or delete a custom one
    Reset {
        /// Network id
        id: u32,
    },
    /// Make a network the active one
    Switch {
        /// Network id
        id: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let log_filter = AppSettings::stored_log_filter().unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(Env::default().default_filter_or(log_filter)).init();

    let config = Config::load();

    let cli = Cli::parse();
    let registry_path = cli.registry.unwrap_or_else(|| config.registry_path.clone());
    info!("Using network registry: {}", registry_path.display());

    match cli.command {
        Commands::List => {
            commands::list_networks(&registry_path).context("Failed to list networks")?;
        }
        Commands::Add(fields) => {
            let (args, switch) = fields.into_args();
            commands::add_network(&registry_path, args, switch || config.switch_after_save)
                .await
                .context("Failed to add network")?;
        }
        Commands::Edit { id, fields } => {
            let (args, switch) = fields.into_args();
            commands::edit_network(&registry_path, id, args, switch || config.switch_after_save)
                .await
                .with_context(|| format!("Failed to edit network {}", id))?;
        }
        Commands::Delete { id, undo } => {
            commands::delete_network(&registry_path, id, undo)
                .await
                .with_context(|| format!("Failed to delete network {}", id))?;
        }
        Commands::Reset { id } => {
            commands::reset_network(&registry_path, id)
                .await
                .with_context(|| format!("Failed to reset network {}", id))?;
        }
        Commands::Switch { id } => {
            commands::switch_network(&registry_path, id)
                .await
                .with_context(|| format!("Failed to switch to network {}", id))?;
        }
    }

    Ok(())
}
