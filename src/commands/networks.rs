use crate::api::{ConnectionRegistry, DetachedSurface, MemoryRegistry};
use crate::errors::{Result, WalletError};
use crate::models::network::{NetworkConfig, NetworkFormValue, TransportType};
use crate::utils::LogErrorLogger;
use crate::view_models::{NetworkSettingsViewModel, UpdateKind};
use console::{style, Style};
use log::info;
use prettytable::{row, Table};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Form fields given on the command line. Anything left out keeps the
/// current value when editing, or stays empty when adding.
#[derive(Debug, Clone, Default)]
pub struct NetworkArgs {
    pub transport: Option<TransportType>,
    pub name: Option<String>,
    pub endpoints: Vec<String>,
    pub local: bool,
    pub symbol: Option<String>,
    pub explorer: Option<String>,
    pub manifest: Option<String>,
}

impl NetworkArgs {
    fn apply_to(self, form: &mut NetworkFormValue) {
        if let Some(transport) = self.transport {
            form.transport = transport;
        }
        if let Some(name) = self.name {
            form.name = name;
        }
        if !self.endpoints.is_empty() {
            form.endpoints = self.endpoints;
        }
        if self.local {
            form.local = true;
        }
        if let Some(symbol) = self.symbol {
            form.symbol = symbol;
        }
        if let Some(explorer) = self.explorer {
            form.explorer_base_url = explorer;
        }
        if let Some(manifest) = self.manifest {
            form.tokens_manifest_url = manifest;
        }
    }
}

/// One CLI invocation: registry loaded from disk, a settings view-model on
/// top of it, and the registry written back when the command finishes.
struct NetworkSession {
    registry: Arc<MemoryRegistry>,
    vm: NetworkSettingsViewModel,
    path: PathBuf,
}

impl NetworkSession {
    fn open(path: &Path) -> Result<Self> {
        let registry = Arc::new(MemoryRegistry::load(path)?);
        let vm = NetworkSettingsViewModel::new(
            registry.clone(),
            Arc::new(DetachedSurface),
            Arc::new(LogErrorLogger),
        );
        Ok(NetworkSession {
            registry,
            vm,
            path: path.to_path_buf(),
        })
    }

    fn find(&self, connection_id: u32) -> Result<NetworkConfig> {
        self.vm
            .networks()
            .into_iter()
            .find(|n| n.connection_id == Some(connection_id))
            .ok_or_else(|| WalletError::NotFound(format!("Network {} does not exist", connection_id)))
    }

    /// Closes the view-model, waits for any reconnect it started, then saves.
    async fn finish(self, switch: bool) -> Result<()> {
        let mut tasks = self.vm.close_and_maybe_switch(switch);
        tasks.settle().await;
        self.registry.save(&self.path)
    }
}

pub fn list_networks(registry_path: &Path) -> Result<()> {
    let registry = MemoryRegistry::load(registry_path)?;
    let active_id = registry.active_network().connection_id;

    let mut table = Table::new();
    table.add_row(row!["Id", "Name", "Type", "Endpoints", "Symbol", ""]);
    for network in registry.list_networks() {
        let id = network
            .connection_id
            .map(|id| id.to_string())
            .unwrap_or_default();
        let marker = if network.connection_id == active_id { "active" } else { "" };
        table.add_row(row![
            id,
            network.name,
            network.transport,
            network.data.endpoints().join("\n"),
            network.config.symbol.clone().unwrap_or_default(),
            marker
        ]);
    }
    table.printstd();
    Ok(())
}

pub async fn add_network(registry_path: &Path, args: NetworkArgs, switch: bool) -> Result<()> {
    let mut session = NetworkSession::open(registry_path)?;
    session.vm.start_add();

    let mut form = NetworkFormValue::new(args.transport.unwrap_or(TransportType::Jrpc), "", Vec::new());
    args.apply_to(&mut form);
    session.vm.submit(&form).await?;
    print_result(&session.vm);

    session.finish(switch).await
}

pub async fn edit_network(registry_path: &Path, connection_id: u32, args: NetworkArgs, switch: bool) -> Result<()> {
    let mut session = NetworkSession::open(registry_path)?;
    let network = session.find(connection_id)?;

    let mut form = NetworkFormValue::from_network(&network);
    session.vm.start_edit(network);
    args.apply_to(&mut form);
    session.vm.submit(&form).await?;
    print_result(&session.vm);

    session.finish(switch).await
}

/// Deletes a network. With `undo` the deletion is immediately taken back,
/// which stores the network again under a new id.
pub async fn delete_network(registry_path: &Path, connection_id: u32, undo: bool) -> Result<()> {
    let mut session = NetworkSession::open(registry_path)?;
    let network = session.find(connection_id)?;
    session.vm.start_edit(network);

    if !session.vm.can_delete_or_switch() {
        return Err(WalletError::Validation(
            "The active network cannot be deleted; switch to another network first".to_string(),
        ));
    }

    session.vm.confirm_delete().await?;
    println!("{} Network {} deleted.", style("✓").green(), connection_id);

    if undo {
        session.vm.undo_delete().await?;
        println!("{} Deletion undone.", style("↺").cyan());
    }

    session.finish(false).await
}

pub async fn reset_network(registry_path: &Path, connection_id: u32) -> Result<()> {
    let mut session = NetworkSession::open(registry_path)?;
    let network = session.find(connection_id)?;
    let builtin = session.registry.is_default(connection_id);
    session.vm.start_edit(network);
    session.vm.reset_to_default().await?;

    if builtin {
        println!("{} Network {} restored to defaults.", style("✓").green(), connection_id);
    } else {
        println!("{} Network {} deleted.", style("✓").green(), connection_id);
    }
    session.finish(false).await
}

pub async fn switch_network(registry_path: &Path, connection_id: u32) -> Result<()> {
    let session = NetworkSession::open(registry_path)?;
    let network = session.find(connection_id)?;

    if network.same_id(&session.vm.selected_connection()) {
        println!("{} '{}' is already active.", style("ℹ️").cyan(), network.name);
        return Ok(());
    }

    info!("Switching to network {} ('{}')", connection_id, network.name);
    session.registry.activate_network(network.clone()).await?;
    println!("{} Switched to '{}'.", style("✓").green(), network.name);
    session.finish(false).await
}

fn print_result(vm: &NetworkSettingsViewModel) {
    let Some(result) = vm.result() else {
        return;
    };
    let verb = match result.kind {
        UpdateKind::Add => "added",
        UpdateKind::Update => "updated",
    };
    let id = result
        .network
        .connection_id
        .map(|id| id.to_string())
        .unwrap_or_default();
    println!(
        "{} Network '{}' {} (id {}).",
        Style::new().green().apply_to("✓"),
        result.network.name,
        verb,
        id
    );
}
